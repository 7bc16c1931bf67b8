//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::ipconfig::ElevationMode;
use crate::network::filter::{ExclusionKeywords, NameRegexFilter};
use crate::profiles::FileConnectionStore;

use super::cli::Cli;
use super::defaults;
use super::error::ConfigError;
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Keywords hiding virtual and tunnel adapters
    pub keywords: ExclusionKeywords,

    /// User patterns hiding further adapters
    pub exclude_patterns: Vec<NameRegexFilter>,

    /// List adapters that are down or have no address
    pub include_inactive: bool,

    /// Network configuration utility
    pub netsh: String,

    /// How administrative rights are obtained
    pub elevation: ElevationMode,

    /// Wait before reading a prompted change's result files
    pub artifact_settle: Duration,

    /// Wait after a successful change
    pub apply_settle: Duration,

    /// Ping reply timeout
    pub probe_timeout: Duration,

    /// Saved connections file. `None` if no location could be determined.
    pub connections_file: Option<PathBuf>,

    /// Latest-release endpoint
    pub update_url: Url,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let connections = self
            .connections_file
            .as_ref()
            .map_or_else(|| "none".to_string(), |p| p.display().to_string());

        write!(
            f,
            "Config {{ netsh: {}, elevation: {}, settle: {}ms/{}ms, probe_timeout: {}ms, \
             keywords: {}, patterns: {}, include_inactive: {}, connections: {} }}",
            self.netsh,
            self.elevation,
            self.artifact_settle.as_millis(),
            self.apply_settle.as_millis(),
            self.probe_timeout.as_millis(),
            self.keywords.len(),
            self.exclude_patterns.len(),
            self.include_inactive,
            connections,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Regex patterns are invalid
    /// - The probe timeout is zero
    /// - The update URL is invalid
    /// - The netsh program is empty
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let adapters = toml.map(|t| &t.adapters);
        let configure = toml.map(|t| &t.configure);

        let keywords = Self::build_keywords(cli, toml);
        let exclude_patterns = Self::build_patterns(cli, toml)?;

        // Flags only enable
        let include_inactive =
            cli.wants_all_adapters() || adapters.is_some_and(|a| a.include_inactive);

        let netsh = cli
            .netsh
            .clone()
            .or_else(|| configure.and_then(|c| c.netsh.clone()))
            .unwrap_or_else(|| defaults::NETSH.to_string());
        if netsh.trim().is_empty() {
            return Err(ConfigError::EmptyProgram);
        }

        let elevation = cli
            .elevation
            .map(ElevationMode::from)
            .or_else(|| configure.and_then(|c| c.elevation))
            .unwrap_or_default();

        let artifact_settle = configure
            .and_then(|c| c.artifact_settle_ms)
            .map_or_else(defaults::artifact_settle, Duration::from_millis);

        let apply_settle = configure
            .and_then(|c| c.apply_settle_ms)
            .map_or_else(defaults::apply_settle, Duration::from_millis);

        let probe_timeout = Self::resolve_probe_timeout(cli, toml)?;
        let update_url = Self::resolve_update_url(toml)?;
        let connections_file = Self::resolve_connections_file(cli, toml);

        Ok(Self {
            keywords,
            exclude_patterns,
            include_inactive,
            netsh,
            elevation,
            artifact_settle,
            apply_settle,
            probe_timeout,
            connections_file,
            update_url,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn build_keywords(cli: &Cli, toml: Option<&TomlConfig>) -> ExclusionKeywords {
        let adapters = toml.map(|t| &t.adapters);

        let base = adapters
            .and_then(|a| a.exclude_keywords.as_ref())
            .map_or_else(ExclusionKeywords::builtin, ExclusionKeywords::new);

        let extra = adapters.map(|a| a.extra_exclude_keywords.as_slice()).unwrap_or_default();

        base.with_keywords(extra).with_keywords(&cli.exclude_keywords)
    }

    fn build_patterns(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Vec<NameRegexFilter>, ConfigError> {
        // CLI patterns replace TOML patterns entirely
        let patterns: &[String] = if cli.exclude_adapters.is_empty() {
            toml.map(|t| t.adapters.exclude_patterns.as_slice())
                .unwrap_or_default()
        } else {
            &cli.exclude_adapters
        };

        patterns
            .iter()
            .map(|pattern| {
                NameRegexFilter::new(pattern).map_err(|e| ConfigError::InvalidRegex {
                    pattern: pattern.clone(),
                    source: e,
                })
            })
            .collect()
    }

    fn resolve_probe_timeout(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Duration, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let millis = cli
            .probe_timeout_ms
            .or_else(|| toml.and_then(|t| t.probe.timeout_ms))
            .unwrap_or(defaults::PROBE_TIMEOUT_MS);

        if millis == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "probe.timeout_ms",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_millis(millis))
    }

    fn resolve_update_url(toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        let url_str = toml
            .and_then(|t| t.update.url.as_deref())
            .unwrap_or(defaults::UPDATE_URL);

        Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: e.to_string(),
        })
    }

    fn resolve_connections_file(cli: &Cli, toml: Option<&TomlConfig>) -> Option<PathBuf> {
        cli.connections_file
            .clone()
            .or_else(|| toml.and_then(|t| t.connections.file.clone()))
            .or_else(FileConnectionStore::default_path)
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
