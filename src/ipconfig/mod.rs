//! Static IPv4 reconfiguration of network adapters.
//!
//! This module provides:
//! - Request and result types ([`IpConfigurationRequest`], [`IpConfigurationResult`])
//! - The OS command line ([`NetshCommand`])
//! - Ways of running it with administrative rights ([`CommandRunner`],
//!   [`DirectRunner`], [`ElevatedScriptRunner`])
//! - The per-adapter serialized workflow ([`IpConfigurationCommander`])

mod command;
mod commander;
mod elevated;
mod request;
mod runner;

pub use command::{DEFAULT_NETSH, NetshCommand, check_adapter_name};
pub use commander::{DEFAULT_APPLY_SETTLE, IpConfigurationCommander, SUCCESS_MESSAGE};
pub use elevated::{
    ConsentPromptElevator, DEFAULT_ARTIFACT_SETTLE, ElevatedScriptRunner, Elevator, ScriptFlavor,
};
pub use request::{DEFAULT_SUBNET_MASK, IpConfigurationRequest, IpConfigurationResult, RequestError};
pub use runner::{CommandOutcome, CommandRunner, DirectRunner, RunnerError};

use serde::Deserialize;

/// How administrative rights are obtained for the network command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElevationMode {
    /// Ask the OS for consent on every change (temp-artifact protocol).
    #[default]
    Prompt,
    /// The process is already elevated; spawn the command directly.
    Direct,
}

impl std::fmt::Display for ElevationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Prompt => write!(f, "prompt"),
            Self::Direct => write!(f, "direct"),
        }
    }
}
