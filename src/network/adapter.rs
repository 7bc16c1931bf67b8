//! Core network types for adapter representation.

use std::fmt;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

/// Suffix appended to the display id of adapters that are not operationally up.
pub const INACTIVE_SUFFIX: &str = " [INACTIVE]";

/// Network interface type classification.
///
/// Only [`Ethernet`](Self::Ethernet), [`GigabitEthernet`](Self::GigabitEthernet)
/// and [`WirelessLan`](Self::WirelessLan) adapters are offered for configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterfaceKind {
    /// Physical Ethernet adapter.
    Ethernet,
    /// Gigabit Ethernet adapter (reported separately by some drivers).
    GigabitEthernet,
    /// Wireless (Wi-Fi) adapter.
    WirelessLan,
    /// Loopback adapter (localhost).
    Loopback,
    /// Tunnel or point-to-point adapter.
    Tunnel,
    /// Unknown or other adapter type, preserving the original type code for debugging.
    Other(u32),
}

impl InterfaceKind {
    /// Returns true if adapters of this kind may be offered for configuration.
    #[must_use]
    pub const fn is_eligible(self) -> bool {
        matches!(
            self,
            Self::Ethernet | Self::GigabitEthernet | Self::WirelessLan
        )
    }
}

impl fmt::Display for InterfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ethernet => write!(f, "Ethernet"),
            Self::GigabitEthernet => write!(f, "Gigabit Ethernet"),
            Self::WirelessLan => write!(f, "Wireless LAN"),
            Self::Loopback => write!(f, "Loopback"),
            Self::Tunnel => write!(f, "Tunnel"),
            Self::Other(code) => write!(f, "Other({code})"),
        }
    }
}

/// Operational status of an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperStatus {
    /// The adapter can pass packets.
    Up,
    /// The adapter is disabled or disconnected.
    Down,
    /// Any other state (testing, dormant, not present, ...).
    Other,
}

impl OperStatus {
    /// Returns true if the adapter is operationally up.
    #[must_use]
    pub const fn is_up(self) -> bool {
        matches!(self, Self::Up)
    }
}

/// One network interface as reported by the operating system.
///
/// Descriptors are recomputed on every enumeration and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterDescriptor {
    /// The OS-level interface name (e.g., "Ethernet", "Wi-Fi").
    pub name: String,
    /// Vendor or driver description (e.g., "Intel(R) I219-V").
    pub description: String,
    /// The type of adapter.
    pub kind: InterfaceKind,
    /// Current operational status.
    pub status: OperStatus,
    /// All IPv4 unicast addresses assigned to this adapter, in OS order.
    pub ipv4_addresses: Vec<Ipv4Addr>,
}

impl AdapterDescriptor {
    /// Creates a new adapter descriptor.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        kind: InterfaceKind,
        status: OperStatus,
        ipv4_addresses: Vec<Ipv4Addr>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            status,
            ipv4_addresses,
        }
    }

    /// Returns true if the adapter is operationally up.
    #[must_use]
    pub const fn is_up(&self) -> bool {
        self.status.is_up()
    }

    /// Returns true if at least one assigned IPv4 address is not a loopback address.
    #[must_use]
    pub fn has_routable_ipv4(&self) -> bool {
        self.ipv4_addresses.iter().any(|addr| !addr.is_loopback())
    }

    /// Returns the first assigned IPv4 address, if any.
    #[must_use]
    pub fn first_ipv4(&self) -> Option<Ipv4Addr> {
        self.ipv4_addresses.first().copied()
    }

    /// Returns true if [`adapter_name`] recovers this adapter's name from its display id.
    ///
    /// Names that are empty, contain `(`, or carry surrounding whitespace
    /// cannot survive the round trip.
    #[must_use]
    pub fn has_recoverable_name(&self) -> bool {
        !self.name.is_empty() && !self.name.contains('(') && self.name.trim() == self.name
    }

    /// Builds the composite display id for this adapter.
    #[must_use]
    pub fn display_id(&self) -> AdapterId {
        AdapterId::for_adapter(self)
    }
}

/// Composite display identifier: `"{name} ({description})"`, plus
/// [`INACTIVE_SUFFIX`] when the adapter is not up.
///
/// Ordering is ordinal over the underlying string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdapterId(String);

impl AdapterId {
    /// Builds the display id for the given adapter.
    #[must_use]
    pub fn for_adapter(adapter: &AdapterDescriptor) -> Self {
        let suffix = if adapter.is_up() { "" } else { INACTIVE_SUFFIX };
        Self(format!(
            "{} ({}){suffix}",
            adapter.name, adapter.description
        ))
    }

    /// Returns the display string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the OS interface name encoded in this id.
    #[must_use]
    pub fn adapter_name(&self) -> &str {
        adapter_name(&self.0)
    }

    /// Returns true if the id was produced for an adapter that was not up.
    #[must_use]
    pub fn is_inactive(&self) -> bool {
        self.0.ends_with(INACTIVE_SUFFIX)
    }

    /// Consumes the id and returns the display string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for AdapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AdapterId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resolves the OS interface name from a display id or a raw name.
///
/// The name is the text before the first `(`, trimmed. Input without `(`
/// is returned unchanged.
#[must_use]
pub fn adapter_name(id: &str) -> &str {
    match id.find('(') {
        Some(index) => id[..index].trim(),
        None => id,
    }
}
