//! Tests for TOML configuration parsing.

use std::path::PathBuf;

use super::ConfigError;
use super::toml::{TomlConfig, default_config_template};
use crate::ipconfig::ElevationMode;

mod parsing {
    use super::*;

    #[test]
    fn parse_empty_config() {
        let config = TomlConfig::parse("").unwrap();

        assert!(config.adapters.exclude_keywords.is_none());
        assert!(config.adapters.exclude_patterns.is_empty());
        assert!(!config.adapters.include_inactive);
        assert!(config.configure.netsh.is_none());
        assert!(config.probe.timeout_ms.is_none());
    }

    #[test]
    fn parse_adapters_section() {
        let toml = r#"
            [adapters]
            exclude_keywords = ["virtual", "vpn"]
            extra_exclude_keywords = ["npcap"]
            exclude_patterns = ["^Ethernet 3$"]
            include_inactive = true
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        let adapters = &config.adapters;

        assert_eq!(
            adapters.exclude_keywords.as_deref(),
            Some(&["virtual".to_string(), "vpn".to_string()][..])
        );
        assert_eq!(adapters.extra_exclude_keywords, vec!["npcap"]);
        assert_eq!(adapters.exclude_patterns, vec!["^Ethernet 3$"]);
        assert!(adapters.include_inactive);
    }

    #[test]
    fn parse_configure_section() {
        let toml = r#"
            [configure]
            netsh = 'C:\Windows\System32\netsh.exe'
            elevation = "direct"
            artifact_settle_ms = 0
            apply_settle_ms = 3000
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        let configure = &config.configure;

        assert_eq!(
            configure.netsh.as_deref(),
            Some(r"C:\Windows\System32\netsh.exe")
        );
        assert_eq!(configure.elevation, Some(ElevationMode::Direct));
        assert_eq!(configure.artifact_settle_ms, Some(0));
        assert_eq!(configure.apply_settle_ms, Some(3000));
    }

    #[test]
    fn parse_probe_connections_update_sections() {
        let toml = r#"
            [probe]
            timeout_ms = 750

            [connections]
            file = "site/plc-connections.json"

            [update]
            url = "https://example.com/releases/latest"
        "#;

        let config = TomlConfig::parse(toml).unwrap();

        assert_eq!(config.probe.timeout_ms, Some(750));
        assert_eq!(
            config.connections.file,
            Some(PathBuf::from("site/plc-connections.json"))
        );
        assert_eq!(
            config.update.url.as_deref(),
            Some("https://example.com/releases/latest")
        );
    }
}

mod errors {
    use super::*;

    #[test]
    fn unknown_section_is_rejected() {
        let err = TomlConfig::parse("[monitor]\nurl = \"x\"").unwrap_err();

        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(TomlConfig::parse("[probe]\nretries = 3").is_err());
    }

    #[test]
    fn invalid_elevation_mode_is_rejected() {
        let err = TomlConfig::parse("[configure]\nelevation = \"sudo\"").unwrap_err();

        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn negative_timeout_is_rejected() {
        assert!(TomlConfig::parse("[probe]\ntimeout_ms = -1").is_err());
    }

    #[test]
    fn load_missing_file_reports_path() {
        let err = TomlConfig::load(std::path::Path::new("/nonexistent/nodus-ip.toml")).unwrap_err();

        assert!(matches!(err, ConfigError::FileRead { .. }));
        assert!(err.to_string().contains("nodus-ip.toml"));
    }
}

mod template {
    use super::*;

    #[test]
    fn default_template_parses() {
        let config = TomlConfig::parse(&default_config_template()).unwrap();

        assert!(config.adapters.exclude_keywords.is_none());
        assert!(config.configure.elevation.is_none());
    }

    #[test]
    fn default_template_documents_every_section() {
        let template = default_config_template();

        for section in ["[adapters]", "[configure]", "[probe]", "[connections]", "[update]"] {
            assert!(template.contains(section), "missing {section}");
        }
    }
}
