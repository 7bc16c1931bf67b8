//! Unix adapter fetching via `getifaddrs` and `/sys/class/net`.

use std::collections::BTreeMap;
use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

use crate::network::{AdapterDescriptor, AdapterFetcher, FetchError, InterfaceKind, OperStatus};

/// Default sysfs directory listing network interfaces.
const SYSFS_NET: &str = "/sys/class/net";

/// `ARPHRD_ETHER` from `if_arp.h`.
const ARPHRD_ETHER: u32 = 1;

/// `ARPHRD_LOOPBACK` from `if_arp.h`.
const ARPHRD_LOOPBACK: u32 = 772;

/// `ARPHRD_NONE` from `if_arp.h` (tun devices).
const ARPHRD_NONE: u32 = 65534;

/// `ARPHRD_PPP` from `if_arp.h`.
const ARPHRD_PPP: u32 = 512;

/// Unix implementation of [`AdapterFetcher`].
///
/// Addresses come from `getifaddrs`. Where `/sys/class/net` exists, it
/// supplies the interface type, operational state and driver name, and
/// interfaces without any address are reported too.
#[derive(Debug, Clone)]
pub struct UnixFetcher {
    sysfs_root: PathBuf,
}

impl UnixFetcher {
    /// Creates a fetcher reading `/sys/class/net`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sysfs_root(SYSFS_NET)
    }

    /// Creates a fetcher reading interface metadata from another directory.
    #[must_use]
    pub fn with_sysfs_root(root: impl Into<PathBuf>) -> Self {
        Self {
            sysfs_root: root.into(),
        }
    }

    /// Builds descriptors from per-interface address lists.
    fn describe(&self, addresses: BTreeMap<String, InterfaceAddresses>) -> Vec<AdapterDescriptor> {
        addresses
            .into_iter()
            .map(|(name, addrs)| {
                let base = self.sysfs_root.join(&name);
                if base.is_dir() {
                    describe_from_sysfs(&base, name, addrs.ipv4)
                } else {
                    describe_without_sysfs(name, addrs)
                }
            })
            .collect()
    }
}

impl Default for UnixFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl AdapterFetcher for UnixFetcher {
    fn fetch(&self) -> Result<Vec<AdapterDescriptor>, FetchError> {
        let interfaces = if_addrs::get_if_addrs().map_err(|e| FetchError::Io {
            context: "interface addresses".to_string(),
            source: e,
        })?;

        let mut grouped: BTreeMap<String, InterfaceAddresses> = BTreeMap::new();
        for iface in interfaces {
            let entry = grouped.entry(iface.name.clone()).or_default();
            entry.loopback |= iface.is_loopback();
            if let IpAddr::V4(addr) = iface.ip() {
                entry.ipv4.push(addr);
            }
        }

        // Interfaces without addresses are only visible through sysfs.
        if let Ok(entries) = fs::read_dir(&self.sysfs_root) {
            for entry in entries.flatten() {
                let name = entry.file_name().to_string_lossy().into_owned();
                grouped.entry(name).or_default();
            }
        }

        Ok(self.describe(grouped))
    }
}

#[derive(Debug, Default)]
struct InterfaceAddresses {
    ipv4: Vec<Ipv4Addr>,
    loopback: bool,
}

fn describe_from_sysfs(base: &Path, name: String, ipv4: Vec<Ipv4Addr>) -> AdapterDescriptor {
    let kind = classify(base);
    let status = read_trimmed(&base.join("operstate"))
        .map_or(OperStatus::Other, |state| parse_operstate(&state));
    let description = driver_name(base).unwrap_or_else(|| kind.to_string());

    AdapterDescriptor::new(name, description, kind, status, ipv4)
}

fn describe_without_sysfs(name: String, addrs: InterfaceAddresses) -> AdapterDescriptor {
    let kind = if addrs.loopback {
        InterfaceKind::Loopback
    } else {
        InterfaceKind::Ethernet
    };
    let status = if addrs.ipv4.is_empty() {
        OperStatus::Other
    } else {
        OperStatus::Up
    };

    AdapterDescriptor::new(name, kind.to_string(), kind, status, addrs.ipv4)
}

/// Classifies an interface from its sysfs directory.
///
/// Ethernet-framed interfaces without a backing `device` (bridges, veth
/// pairs, container networks) are reported as `Other(ARPHRD_ETHER)`.
fn classify(base: &Path) -> InterfaceKind {
    if base.join("wireless").is_dir() || base.join("phy80211").exists() {
        return InterfaceKind::WirelessLan;
    }

    let arp_type = read_trimmed(&base.join("type"))
        .and_then(|t| t.parse::<u32>().ok())
        .unwrap_or(0);

    match arp_type {
        ARPHRD_LOOPBACK => InterfaceKind::Loopback,
        ARPHRD_NONE | ARPHRD_PPP => InterfaceKind::Tunnel,
        ARPHRD_ETHER if base.join("device").exists() => InterfaceKind::Ethernet,
        other => InterfaceKind::Other(other),
    }
}

fn parse_operstate(state: &str) -> OperStatus {
    match state {
        "up" => OperStatus::Up,
        "down" | "lowerlayerdown" => OperStatus::Down,
        _ => OperStatus::Other,
    }
}

fn driver_name(base: &Path) -> Option<String> {
    let target = fs::read_link(base.join("device").join("driver")).ok()?;
    target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok().map(|s| s.trim().to_string())
}
