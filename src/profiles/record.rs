//! Saved PLC connection records.

use chrono::{Local, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::ipconfig::{DEFAULT_SUBNET_MASK, IpConfigurationRequest, RequestError};

/// Default building label for new records.
pub const DEFAULT_BUILDING: &str = "West";

/// `LastConnected` of a record that never connected.
pub const NEVER_CONNECTED: &str = "0001-01-01T00:00:00";

/// Values of [`ConnectionRecord::status`].
pub mod status {
    /// No attempt recorded yet.
    pub const UNKNOWN: &str = "Unknown";
    /// The address was applied and the PLC was not checked.
    pub const CONNECTED: &str = "Connected";
    /// The address could not be applied.
    pub const FAILED: &str = "Failed";
    /// The PLC answered after connecting.
    pub const ONLINE: &str = "Online";
    /// The PLC did not answer after connecting.
    pub const OFFLINE: &str = "Offline";
}

/// A saved PLC connection: which adapter to reconfigure, with which address,
/// to reach which device.
///
/// Stored with PascalCase keys. Missing fields take their defaults and
/// unknown fields are ignored, so files written by older versions load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ConnectionRecord {
    /// Display name, unique case-insensitively.
    pub name: String,
    /// Address of the PLC, probed after connecting.
    pub plc_ip_address: String,
    /// Address to assign to the local adapter.
    pub my_ip_address: String,
    /// Subnet mask to assign.
    pub subnet_mask: String,
    /// Gateway to assign; empty for none.
    pub gateway: String,
    /// Adapter display id or raw name.
    pub network_adapter: String,
    /// Outcome of the last connect, one of the [`status`] values.
    pub status: String,
    /// Local time of the last successful connect.
    pub last_connected: String,
    /// Free-form notes.
    pub notes: String,
    /// Site grouping.
    pub building: String,
}

impl Default for ConnectionRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            plc_ip_address: String::new(),
            my_ip_address: String::new(),
            subnet_mask: DEFAULT_SUBNET_MASK.to_string(),
            gateway: String::new(),
            network_adapter: String::new(),
            status: status::UNKNOWN.to_string(),
            last_connected: NEVER_CONNECTED.to_string(),
            notes: String::new(),
            building: DEFAULT_BUILDING.to_string(),
        }
    }
}

impl ConnectionRecord {
    /// Creates a record with default mask and building.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        network_adapter: impl Into<String>,
        my_ip_address: impl Into<String>,
        plc_ip_address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            network_adapter: network_adapter.into(),
            my_ip_address: my_ip_address.into(),
            plc_ip_address: plc_ip_address.into(),
            ..Self::default()
        }
    }

    /// Builds the request that applies this record's local address.
    ///
    /// An empty mask falls back to `255.255.255.0`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the adapter is empty or an address is invalid.
    pub fn to_request(&self) -> Result<IpConfigurationRequest, RequestError> {
        let mask = if self.subnet_mask.trim().is_empty() {
            DEFAULT_SUBNET_MASK.to_string()
        } else {
            self.subnet_mask.clone()
        };
        IpConfigurationRequest::parse(
            &self.network_adapter,
            &self.my_ip_address,
            &mask,
            &self.gateway,
        )
    }

    /// The device to probe once the address is applied.
    #[must_use]
    pub fn probe_target(&self) -> &str {
        self.plc_ip_address.trim()
    }

    /// Records the outcome of a connect attempt.
    ///
    /// `reachable` is the PLC check result, `None` if it was skipped.
    pub fn record_attempt(&mut self, applied: bool, reachable: Option<bool>) {
        let outcome = match (applied, reachable) {
            (false, _) => status::FAILED,
            (true, None) => status::CONNECTED,
            (true, Some(true)) => status::ONLINE,
            (true, Some(false)) => status::OFFLINE,
        };
        self.status = outcome.to_string();
        if applied {
            self.last_connected = Local::now().to_rfc3339_opts(SecondsFormat::Millis, false);
        }
    }

    /// Returns true if this record is called `name`, ignoring case.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }
}

/// Finds the record called `name`, ignoring case.
#[must_use]
pub fn find_record<'a>(
    records: &'a mut [ConnectionRecord],
    name: &str,
) -> Option<&'a mut ConnectionRecord> {
    records.iter_mut().find(|record| record.is_named(name))
}
