//! Static address requests and their outcomes.

use std::net::{AddrParseError, Ipv4Addr};

use thiserror::Error;

use crate::network::adapter_name;

/// Default subnet mask for PLC networks.
pub const DEFAULT_SUBNET_MASK: Ipv4Addr = Ipv4Addr::new(255, 255, 255, 0);

/// Error building an [`IpConfigurationRequest`] from text.
#[derive(Debug, Error)]
pub enum RequestError {
    /// A field did not hold a dotted-quad IPv4 address.
    #[error("Invalid {field} '{value}': {source}")]
    InvalidAddress {
        /// Which field was rejected.
        field: &'static str,
        /// The rejected text.
        value: String,
        /// Parser error.
        #[source]
        source: AddrParseError,
    },

    /// The adapter id was empty.
    #[error("Adapter must not be empty")]
    EmptyAdapter,
}

/// A request to assign a static IPv4 configuration to one adapter.
///
/// `adapter_id` may be a composite display id produced by the enumerator
/// (`"Ethernet (Intel(R) I219-V)"`) or a raw adapter name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpConfigurationRequest {
    /// Composite display id or raw adapter name.
    pub adapter_id: String,
    /// Address to assign.
    pub target_ip: Ipv4Addr,
    /// Subnet mask to assign.
    pub subnet_mask: Ipv4Addr,
    /// Default gateway; `None` leaves the gateway token out of the command.
    pub gateway: Option<Ipv4Addr>,
}

impl IpConfigurationRequest {
    /// Creates a request without a gateway.
    #[must_use]
    pub fn new(adapter_id: impl Into<String>, target_ip: Ipv4Addr, subnet_mask: Ipv4Addr) -> Self {
        Self {
            adapter_id: adapter_id.into(),
            target_ip,
            subnet_mask,
            gateway: None,
        }
    }

    /// Sets the gateway.
    #[must_use]
    pub const fn with_gateway(mut self, gateway: Option<Ipv4Addr>) -> Self {
        self.gateway = gateway;
        self
    }

    /// Parses a request from user-supplied text.
    ///
    /// An empty (or whitespace-only) gateway means "no gateway".
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the adapter is empty or any non-empty
    /// address field is not a dotted-quad IPv4 address.
    pub fn parse(
        adapter_id: &str,
        target_ip: &str,
        subnet_mask: &str,
        gateway: &str,
    ) -> Result<Self, RequestError> {
        if adapter_id.trim().is_empty() {
            return Err(RequestError::EmptyAdapter);
        }

        let gateway = gateway.trim();
        let gateway = if gateway.is_empty() {
            None
        } else {
            Some(parse_field("gateway", gateway)?)
        };

        Ok(Self {
            adapter_id: adapter_id.to_string(),
            target_ip: parse_field("IP address", target_ip)?,
            subnet_mask: parse_field("subnet mask", subnet_mask)?,
            gateway,
        })
    }

    /// Returns the real adapter name recovered from `adapter_id`.
    #[must_use]
    pub fn adapter_name(&self) -> &str {
        adapter_name(&self.adapter_id)
    }
}

fn parse_field(field: &'static str, value: &str) -> Result<Ipv4Addr, RequestError> {
    value
        .trim()
        .parse()
        .map_err(|source| RequestError::InvalidAddress {
            field,
            value: value.to_string(),
            source,
        })
}

/// Outcome of a configuration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpConfigurationResult {
    /// Whether the OS utility reported success.
    pub success: bool,
    /// Human-readable outcome. On failure this carries the exit code,
    /// captured output, adapter name and command line where known.
    pub message: String,
}

impl IpConfigurationResult {
    /// A successful outcome.
    #[must_use]
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// A failed outcome.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
