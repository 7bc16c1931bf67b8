//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::ipconfig::ElevationMode;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Adapter listing configuration
    #[serde(default)]
    pub adapters: AdaptersSection,

    /// Address change configuration
    #[serde(default)]
    pub configure: ConfigureSection,

    /// Ping configuration
    #[serde(default)]
    pub probe: ProbeSection,

    /// Saved connections configuration
    #[serde(default)]
    pub connections: ConnectionsSection,

    /// Update check configuration
    #[serde(default)]
    pub update: UpdateSection,
}

/// Adapter listing configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdaptersSection {
    /// Keywords replacing the built-in exclusion set
    pub exclude_keywords: Option<Vec<String>>,

    /// Keywords added to the exclusion set
    #[serde(default)]
    pub extra_exclude_keywords: Vec<String>,

    /// Regex patterns for adapters to exclude
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// List adapters that are down or have no address
    #[serde(default)]
    pub include_inactive: bool,
}

/// Address change configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigureSection {
    /// Network configuration utility (default: netsh)
    pub netsh: Option<String>,

    /// "prompt" or "direct"
    pub elevation: Option<ElevationMode>,

    /// Wait before reading the runner's result files, in milliseconds
    pub artifact_settle_ms: Option<u64>,

    /// Wait after a successful change, in milliseconds
    pub apply_settle_ms: Option<u64>,
}

/// Ping configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeSection {
    /// Reply timeout in milliseconds
    pub timeout_ms: Option<u64>,
}

/// Saved connections configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionsSection {
    /// Path to the connections file
    pub file: Option<PathBuf>,
}

/// Update check configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateSection {
    /// Latest-release endpoint
    pub url: Option<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# Nodus IP Configuration File

[adapters]
# Keywords that hide an adapter when found in its name or description
# (case-insensitive). Setting this REPLACES the built-in list:
# virtual, vmware, virtualbox, hyper-v, vethernet, loopback, tunnel, vpn,
# tap, tun, wsl, docker, vbox, parallels, pseudo, miniport, wan miniport,
# bluetooth, isatap, teredo, 6to4
# exclude_keywords = ["virtual", "vpn"]

# Keywords added to the list above (or to the built-in list)
# extra_exclude_keywords = ["npcap"]

# Regex patterns matched against adapter name or description
# Note: CLI --exclude-adapter patterns REPLACE these entirely
# exclude_patterns = ["^Ethernet 3$"]

# Also list adapters that are down or have no address
# include_inactive = false

[configure]
# Network configuration utility
# netsh = "netsh"

# How administrative rights are obtained:
#   "prompt" - ask for consent on every change (default)
#   "direct" - nodus-ip already runs as administrator
# elevation = "prompt"

# Wait before reading the result of a prompted change, in ms (0 disables)
# artifact_settle_ms = 1500

# Wait after a successful change before returning, in ms (0 disables)
# apply_settle_ms = 1500

[probe]
# Ping reply timeout in milliseconds
# timeout_ms = 2000

[connections]
# Saved connections file (default: <config dir>/NodusIP/plc-connections.json)
# file = "plc-connections.json"

[update]
# Latest-release endpoint
# url = "https://api.github.com/repos/joshfromtessy/nodus-ip/releases/latest"
"#
    .to_string()
}
