//! Windows-specific network adapter fetching using `GetAdaptersAddresses`.

use crate::network::{AdapterDescriptor, AdapterFetcher, FetchError, InterfaceKind, OperStatus};
use std::net::Ipv4Addr;
use windows::Win32::Foundation::WIN32_ERROR;
use windows::Win32::NetworkManagement::IpHelper::{
    GAA_FLAG_SKIP_ANYCAST, GAA_FLAG_SKIP_DNS_SERVER, GAA_FLAG_SKIP_MULTICAST, GetAdaptersAddresses,
    IF_TYPE_ETHERNET_CSMACD, IF_TYPE_IEEE80211, IF_TYPE_SOFTWARE_LOOPBACK, IP_ADAPTER_ADDRESSES_LH,
};
use windows::Win32::NetworkManagement::Ndis::{IF_OPER_STATUS, IfOperStatusDown, IfOperStatusUp};
use windows::Win32::Networking::WinSock::{AF_INET, SOCKADDR_IN};

/// Interface type for PPP (Point-to-Point Protocol) adapters.
/// Value from Windows SDK `ipifcons.h` - not exported by the `windows` crate.
const IF_TYPE_PPP: u32 = 23;

/// Interface type for tunnel adapters (VPN, etc.).
/// Value from Windows SDK `ipifcons.h` - not exported by the `windows` crate.
const IF_TYPE_TUNNEL: u32 = 131;

/// Interface type for Gigabit Ethernet adapters.
/// Value from Windows SDK `ipifcons.h` - not exported by the `windows` crate.
const IF_TYPE_GIGABITETHERNET: u32 = 117;

/// Buffer size hint for `GetAdaptersAddresses`.
/// The API will tell us the actual required size if this is insufficient.
const INITIAL_BUFFER_SIZE: u32 = 16384;

/// Windows implementation of [`AdapterFetcher`] using `GetAdaptersAddresses`.
///
/// Retrieves all network adapters with their friendly name, description,
/// interface type, operational status and IPv4 unicast addresses.
///
/// # Example
///
/// ```no_run
/// use nodus_ip::network::{AdapterFetcher, platform::WindowsFetcher};
///
/// let fetcher = WindowsFetcher::new();
/// let adapters = fetcher.fetch().expect("Failed to fetch adapters");
///
/// for adapter in adapters {
///     println!("{} ({}): {:?}", adapter.name, adapter.description, adapter.ipv4_addresses);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct WindowsFetcher {
    _private: (),
}

impl WindowsFetcher {
    /// Creates a new Windows adapter fetcher.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl AdapterFetcher for WindowsFetcher {
    fn fetch(&self) -> Result<Vec<AdapterDescriptor>, FetchError> {
        fetch_adapters()
    }
}

/// Fetches all network adapters using `GetAdaptersAddresses`.
fn fetch_adapters() -> Result<Vec<AdapterDescriptor>, FetchError> {
    let raw_adapters = get_adapter_addresses()?;
    if raw_adapters.is_empty() {
        return Ok(Vec::new());
    }

    let mut adapters = Vec::new();
    // SAFETY: GetAdaptersAddresses returns a properly aligned buffer for IP_ADAPTER_ADDRESSES_LH.
    #[allow(clippy::cast_ptr_alignment)]
    let mut current = raw_adapters.as_ptr().cast::<IP_ADAPTER_ADDRESSES_LH>();

    // SAFETY: We iterate through a linked list returned by GetAdaptersAddresses.
    // The list is valid as long as the buffer (`raw_adapters`) is alive.
    while !current.is_null() {
        let adapter = unsafe { &*current };

        if let Some(descriptor) = parse_adapter(adapter) {
            adapters.push(descriptor);
        }

        current = adapter.Next;
    }

    Ok(adapters)
}

/// Calls `GetAdaptersAddresses` for IPv4 and returns the raw buffer.
///
/// Two-call pattern: estimated buffer first, exact size on overflow.
fn get_adapter_addresses() -> Result<Vec<u8>, FetchError> {
    let flags = GAA_FLAG_SKIP_ANYCAST | GAA_FLAG_SKIP_MULTICAST | GAA_FLAG_SKIP_DNS_SERVER;
    let family = u32::from(AF_INET.0);

    let mut buffer: Vec<u8> = vec![0u8; INITIAL_BUFFER_SIZE as usize];
    let mut size = INITIAL_BUFFER_SIZE;

    // SAFETY: We provide a valid buffer and size. The function writes adapter
    // information to the buffer and updates `size` with the required length.
    let result = unsafe {
        GetAdaptersAddresses(
            family,
            flags,
            None,
            Some(buffer.as_mut_ptr().cast()),
            &raw mut size,
        )
    };

    handle_api_result(result, &mut buffer, &mut size, flags, family)?;

    Ok(buffer)
}

/// Handles the result of `GetAdaptersAddresses`, retrying once with a larger buffer.
#[cfg(not(tarpaulin_include))]
fn handle_api_result(
    result: u32,
    buffer: &mut Vec<u8>,
    size: &mut u32,
    flags: windows::Win32::NetworkManagement::IpHelper::GET_ADAPTERS_ADDRESSES_FLAGS,
    family: u32,
) -> Result<(), FetchError> {
    use windows::Win32::Foundation::{ERROR_BUFFER_OVERFLOW, ERROR_NO_DATA, NO_ERROR};

    if result == ERROR_BUFFER_OVERFLOW.0 {
        buffer.resize(*size as usize, 0);

        // SAFETY: Same as above, but with correctly sized buffer
        let result = unsafe {
            GetAdaptersAddresses(
                family,
                flags,
                None,
                Some(buffer.as_mut_ptr().cast()),
                &raw mut *size,
            )
        };

        if result != NO_ERROR.0 {
            return Err(windows::core::Error::from(WIN32_ERROR(result)).into());
        }
    } else if result == ERROR_NO_DATA.0 {
        // No adapters for this family
        buffer.clear();
    } else if result != NO_ERROR.0 {
        return Err(windows::core::Error::from(WIN32_ERROR(result)).into());
    }

    Ok(())
}

/// Parses a single `IP_ADAPTER_ADDRESSES_LH` structure into an [`AdapterDescriptor`].
///
/// Returns `None` if the adapter name cannot be read.
fn parse_adapter(adapter: &IP_ADAPTER_ADDRESSES_LH) -> Option<AdapterDescriptor> {
    let name = unsafe { adapter.FriendlyName.to_string().ok()? };
    if name.is_empty() {
        return None;
    }
    let description = unsafe { adapter.Description.to_string().unwrap_or_default() };

    Some(AdapterDescriptor::new(
        name,
        description,
        map_adapter_type(adapter.IfType),
        map_oper_status(adapter.OperStatus),
        collect_ipv4_addresses(adapter),
    ))
}

/// Maps Windows `IF_TYPE_*` constants to [`InterfaceKind`].
const fn map_adapter_type(if_type: u32) -> InterfaceKind {
    match if_type {
        IF_TYPE_ETHERNET_CSMACD => InterfaceKind::Ethernet,
        IF_TYPE_GIGABITETHERNET => InterfaceKind::GigabitEthernet,
        IF_TYPE_IEEE80211 => InterfaceKind::WirelessLan,
        IF_TYPE_SOFTWARE_LOOPBACK => InterfaceKind::Loopback,
        IF_TYPE_TUNNEL | IF_TYPE_PPP => InterfaceKind::Tunnel,
        other => InterfaceKind::Other(other),
    }
}

/// Maps `IF_OPER_STATUS` to [`OperStatus`].
fn map_oper_status(status: IF_OPER_STATUS) -> OperStatus {
    if status == IfOperStatusUp {
        OperStatus::Up
    } else if status == IfOperStatusDown {
        OperStatus::Down
    } else {
        OperStatus::Other
    }
}

/// Collects IPv4 unicast addresses from an adapter, in OS order.
#[allow(clippy::cast_ptr_alignment)]
fn collect_ipv4_addresses(adapter: &IP_ADAPTER_ADDRESSES_LH) -> Vec<Ipv4Addr> {
    let mut addresses = Vec::new();

    let mut unicast = adapter.FirstUnicastAddress;

    // SAFETY: We iterate through a linked list of unicast addresses.
    // Each address is valid as long as the parent adapter buffer is alive.
    while !unicast.is_null() {
        let addr_entry = unsafe { &*unicast };

        // SAFETY: The Address field contains a valid SOCKET_ADDRESS structure.
        if let Some(sockaddr) = unsafe { addr_entry.Address.lpSockaddr.as_ref() } {
            if sockaddr.sa_family == AF_INET {
                // SAFETY: We verified the family is AF_INET, so this is a valid cast.
                let sockaddr_in =
                    unsafe { &*(std::ptr::from_ref(sockaddr).cast::<SOCKADDR_IN>()) };
                // SAFETY: sin_addr contains the IPv4 address bytes in network order.
                let octets = unsafe { sockaddr_in.sin_addr.S_un.S_un_b };
                addresses.push(Ipv4Addr::new(
                    octets.s_b1,
                    octets.s_b2,
                    octets.s_b3,
                    octets.s_b4,
                ));
            }
        }

        unicast = addr_entry.Next;
    }

    addresses
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_adapter_type_ethernet() {
        assert_eq!(
            map_adapter_type(IF_TYPE_ETHERNET_CSMACD),
            InterfaceKind::Ethernet
        );
    }

    #[test]
    fn map_adapter_type_gigabit() {
        assert_eq!(
            map_adapter_type(IF_TYPE_GIGABITETHERNET),
            InterfaceKind::GigabitEthernet
        );
    }

    #[test]
    fn map_adapter_type_wireless() {
        assert_eq!(
            map_adapter_type(IF_TYPE_IEEE80211),
            InterfaceKind::WirelessLan
        );
    }

    #[test]
    fn map_adapter_type_tunnel_and_ppp() {
        assert_eq!(map_adapter_type(IF_TYPE_TUNNEL), InterfaceKind::Tunnel);
        assert_eq!(map_adapter_type(IF_TYPE_PPP), InterfaceKind::Tunnel);
    }

    #[test]
    fn map_adapter_type_unknown_preserves_code() {
        assert_eq!(map_adapter_type(999), InterfaceKind::Other(999));
    }

    #[test]
    fn map_oper_status_values() {
        assert_eq!(map_oper_status(IfOperStatusUp), OperStatus::Up);
        assert_eq!(map_oper_status(IfOperStatusDown), OperStatus::Down);
        assert_eq!(map_oper_status(IF_OPER_STATUS(5)), OperStatus::Other);
    }

    #[test]
    fn fetch_adapters_includes_loopback() {
        let adapters = WindowsFetcher::new().fetch().expect("fetch() failed");

        assert!(
            adapters
                .iter()
                .any(|a| a.ipv4_addresses.contains(&Ipv4Addr::LOCALHOST)),
            "Expected loopback address, got adapters: {adapters:?}"
        );
    }
}
