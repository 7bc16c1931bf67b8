//! Configuration layer for Nodus IP.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`], [`ConnectionsCommand`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! # Adapter Exclusion
//!
//! - `adapters.exclude_keywords` replaces the built-in keyword set;
//!   `adapters.extra_exclude_keywords` and `--exclude-keyword` add to it.
//! - `--exclude-adapter` patterns **replace** `adapters.exclude_patterns`
//!   entirely (not merged).
//!
//! # Boolean Flag Semantics
//!
//! `--all` and `adapters.include_inactive` use OR semantics: once set in
//! TOML, the CLI cannot turn it off.
//!
//! # TOML-Only Options
//!
//! - `configure.artifact_settle_ms` / `configure.apply_settle_ms` (default 1500)
//! - `update.url`

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod toml_tests;

pub use cli::{Cli, Command, ConnectionsCommand, ElevationArg};
pub use error::ConfigError;
pub use toml::{TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
