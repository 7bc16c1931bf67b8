//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::ipconfig::ElevationMode;

/// Nodus IP: static IPv4 switching for reaching PLCs
///
/// Lists physical network adapters, assigns a static IPv4 address to one
/// of them, and checks that a device answers ping.
#[derive(Debug, Parser)]
#[command(name = "nodus-ip")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Regex pattern for adapters to exclude (can be specified multiple times)
    #[arg(long = "exclude-adapter", value_name = "PATTERN", global = true)]
    pub exclude_adapters: Vec<String>,

    /// Additional exclusion keyword (can be specified multiple times)
    #[arg(long = "exclude-keyword", value_name = "KEYWORD", global = true)]
    pub exclude_keywords: Vec<String>,

    /// Network configuration utility to invoke
    #[arg(long, value_name = "PROGRAM", global = true)]
    pub netsh: Option<String>,

    /// How administrative rights are obtained
    #[arg(long, value_enum, global = true)]
    pub elevation: Option<ElevationArg>,

    /// Ping timeout in milliseconds
    #[arg(long = "probe-timeout", value_name = "MS", global = true)]
    pub probe_timeout_ms: Option<u64>,

    /// Path to the saved connections file
    #[arg(long = "connections-file", value_name = "FILE", global = true)]
    pub connections_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for nodus-ip
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List adapters that can be configured
    Adapters {
        /// Include adapters that are down or have no address
        #[arg(long)]
        all: bool,
    },

    /// Show the current IPv4 address of an adapter
    CurrentIp {
        /// Adapter name or listed adapter id
        adapter: String,
    },

    /// Assign a static IPv4 address to an adapter
    SetIp {
        /// Adapter name or listed adapter id
        #[arg(long)]
        adapter: String,

        /// Address to assign
        #[arg(long)]
        ip: String,

        /// Subnet mask
        #[arg(long, default_value = "255.255.255.0")]
        mask: String,

        /// Default gateway (omitted when not given)
        #[arg(long)]
        gateway: Option<String>,

        /// Device to ping once the address is applied
        #[arg(long, value_name = "TARGET")]
        probe: Option<String>,
    },

    /// Check whether a device answers ping
    Ping {
        /// IPv4 address or host name
        target: String,
    },

    /// Apply a saved connection and ping its PLC
    Connect {
        /// Connection name (case-insensitive)
        name: String,

        /// Do not ping the PLC afterwards
        #[arg(long = "no-probe")]
        no_probe: bool,
    },

    /// Manage saved connections
    Connections {
        #[command(subcommand)]
        action: ConnectionsCommand,
    },

    /// Check whether a newer release is available
    CheckUpdate,

    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "nodus-ip.toml")]
        output: PathBuf,
    },
}

/// Saved connection management
#[derive(Debug, Subcommand)]
pub enum ConnectionsCommand {
    /// List saved connections
    List,

    /// Save a connection (replaces one with the same name)
    Add {
        /// Connection name
        name: String,

        /// Adapter name or listed adapter id
        #[arg(long)]
        adapter: String,

        /// Local address to assign
        #[arg(long)]
        ip: String,

        /// PLC address
        #[arg(long)]
        plc: String,

        /// Subnet mask
        #[arg(long, default_value = "255.255.255.0")]
        mask: String,

        /// Default gateway
        #[arg(long)]
        gateway: Option<String>,

        /// Building or site
        #[arg(long)]
        building: Option<String>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a saved connection
    Remove {
        /// Connection name (case-insensitive)
        name: String,
    },
}

/// Elevation mode argument for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ElevationArg {
    /// Prompt for consent on every change
    Prompt,
    /// Already running as administrator
    Direct,
}

impl From<ElevationArg> for ElevationMode {
    fn from(arg: ElevationArg) -> Self {
        match arg {
            ElevationArg::Prompt => Self::Prompt,
            ElevationArg::Direct => Self::Direct,
        }
    }
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }

    /// Returns true if `adapters --all` was requested.
    #[must_use]
    pub const fn wants_all_adapters(&self) -> bool {
        matches!(self.command, Command::Adapters { all: true })
    }
}
