//! Tests for the adapter enumerator.

use std::collections::VecDeque;
use std::net::Ipv4Addr;
use std::sync::Mutex;

use super::enumerator::{AdapterEnumerator, CurrentIpv4, select_adapters};
use super::filter::{BUILTIN_EXCLUDE_KEYWORDS, ExclusionKeywords, FilterChain, NameRegexFilter};
use super::{AdapterDescriptor, AdapterFetcher, FetchError, InterfaceKind, OperStatus, adapter_name};

/// A mock fetcher for testing that returns predefined results.
///
/// Uses `Mutex<VecDeque>` to avoid requiring `Clone` on `FetchError`.
/// The last adapter list is repeated once the queue is exhausted.
struct MockFetcher {
    results: Mutex<VecDeque<Result<Vec<AdapterDescriptor>, FetchError>>>,
}

impl MockFetcher {
    fn returning(adapters: Vec<AdapterDescriptor>) -> Self {
        Self {
            results: Mutex::new(VecDeque::from([Ok(adapters)])),
        }
    }

    fn failing() -> Self {
        Self {
            results: Mutex::new(VecDeque::from([Err(FetchError::Platform {
                message: "query failed".to_string(),
            })])),
        }
    }
}

impl AdapterFetcher for MockFetcher {
    fn fetch(&self) -> Result<Vec<AdapterDescriptor>, FetchError> {
        let mut results = self.results.lock().unwrap();
        if results.len() > 1 {
            return results.pop_front().unwrap();
        }
        match results.front() {
            Some(Ok(adapters)) => Ok(adapters.clone()),
            Some(Err(_)) => results.pop_front().unwrap(),
            None => Ok(vec![]),
        }
    }
}

fn adapter(
    name: &str,
    description: &str,
    kind: InterfaceKind,
    status: OperStatus,
    ipv4: &[&str],
) -> AdapterDescriptor {
    AdapterDescriptor::new(
        name,
        description,
        kind,
        status,
        ipv4.iter().map(|ip| ip.parse::<Ipv4Addr>().unwrap()).collect(),
    )
}

fn intel_ethernet() -> AdapterDescriptor {
    adapter(
        "Ethernet",
        "Intel(R) I219-V",
        InterfaceKind::Ethernet,
        OperStatus::Up,
        &["192.168.1.10"],
    )
}

fn tap_vpn() -> AdapterDescriptor {
    adapter(
        "VPN",
        "TAP-Windows Adapter",
        InterfaceKind::Ethernet,
        OperStatus::Up,
        &["10.8.0.2"],
    )
}

fn disconnected_usb() -> AdapterDescriptor {
    adapter(
        "Ethernet 2",
        "Realtek USB GbE Family Controller",
        InterfaceKind::Ethernet,
        OperStatus::Down,
        &[],
    )
}

fn wifi() -> AdapterDescriptor {
    adapter(
        "Wi-Fi",
        "Intel(R) Wi-Fi 6 AX201 160MHz",
        InterfaceKind::WirelessLan,
        OperStatus::Up,
        &["192.168.0.23"],
    )
}

/// A mixed host: physical, virtual, tunnel and loopback adapters.
fn busy_host() -> Vec<AdapterDescriptor> {
    vec![
        wifi(),
        intel_ethernet(),
        tap_vpn(),
        disconnected_usb(),
        adapter(
            "vEthernet (WSL)",
            "Hyper-V Virtual Ethernet Adapter",
            InterfaceKind::Ethernet,
            OperStatus::Up,
            &["172.20.0.1"],
        ),
        adapter(
            "Loopback Pseudo-Interface 1",
            "Software Loopback Interface 1",
            InterfaceKind::Loopback,
            OperStatus::Up,
            &["127.0.0.1"],
        ),
        adapter(
            "Bluetooth Network Connection",
            "Bluetooth Device (Personal Area Network)",
            InterfaceKind::Ethernet,
            OperStatus::Down,
            &[],
        ),
        adapter(
            "Local Area Connection* 1",
            "Microsoft Wi-Fi Direct Virtual Adapter",
            InterfaceKind::WirelessLan,
            OperStatus::Down,
            &[],
        ),
        adapter(
            "Cellular",
            "Mobile Broadband Modem",
            InterfaceKind::Other(243),
            OperStatus::Up,
            &["100.64.0.7"],
        ),
    ]
}

fn ids(list: &[super::AdapterId]) -> Vec<&str> {
    list.iter().map(super::AdapterId::as_str).collect()
}

mod list_adapters {
    use super::*;

    #[test]
    fn physical_adapter_kept_and_tap_vpn_dropped() {
        let enumerator = AdapterEnumerator::new(MockFetcher::returning(vec![
            intel_ethernet(),
            tap_vpn(),
        ]));

        let result = enumerator.list_adapters(false);

        assert_eq!(ids(&result), vec!["Ethernet (Intel(R) I219-V)"]);
    }

    #[test]
    fn active_listing_on_busy_host() {
        let enumerator = AdapterEnumerator::new(MockFetcher::returning(busy_host()));

        let result = enumerator.list_adapters(false);

        assert_eq!(
            ids(&result),
            vec!["Ethernet (Intel(R) I219-V)", "Wi-Fi (Intel(R) Wi-Fi 6 AX201 160MHz)"]
        );
    }

    #[test]
    fn inactive_listing_marks_down_adapters() {
        let enumerator = AdapterEnumerator::new(MockFetcher::returning(busy_host()));

        let result = enumerator.list_adapters(true);

        assert_eq!(
            ids(&result),
            vec![
                "Ethernet (Intel(R) I219-V)",
                "Ethernet 2 (Realtek USB GbE Family Controller) [INACTIVE]",
                "Wi-Fi (Intel(R) Wi-Fi 6 AX201 160MHz)",
            ]
        );
    }

    #[test]
    fn inactive_listing_does_not_require_ipv4() {
        let mut up_without_ip = intel_ethernet();
        up_without_ip.ipv4_addresses.clear();
        let enumerator = AdapterEnumerator::new(MockFetcher::returning(vec![up_without_ip]));

        assert!(enumerator.list_adapters(false).is_empty());
        assert_eq!(
            ids(&enumerator.list_adapters(true)),
            vec!["Ethernet (Intel(R) I219-V)"]
        );
    }

    #[test]
    fn loopback_only_address_is_not_enough() {
        let mut adapter = intel_ethernet();
        adapter.ipv4_addresses = vec![Ipv4Addr::LOCALHOST];
        let enumerator = AdapterEnumerator::new(MockFetcher::returning(vec![adapter]));

        assert!(enumerator.list_adapters(false).is_empty());
    }

    #[test]
    fn ineligible_kinds_dropped_even_when_inactive_included() {
        let enumerator = AdapterEnumerator::new(MockFetcher::returning(vec![adapter(
            "Cellular",
            "Mobile Broadband Modem",
            InterfaceKind::Other(243),
            OperStatus::Up,
            &["100.64.0.7"],
        )]));

        assert!(enumerator.list_adapters(true).is_empty());
    }

    #[test]
    fn gigabit_ethernet_is_eligible() {
        let mut adapter = intel_ethernet();
        adapter.kind = InterfaceKind::GigabitEthernet;
        let enumerator = AdapterEnumerator::new(MockFetcher::returning(vec![adapter]));

        assert_eq!(enumerator.list_adapters(false).len(), 1);
    }

    #[test]
    fn duplicates_are_removed() {
        let enumerator = AdapterEnumerator::new(MockFetcher::returning(vec![
            intel_ethernet(),
            wifi(),
            intel_ethernet(),
        ]));

        let result = enumerator.list_adapters(false);

        assert_eq!(result.len(), 2);
    }

    #[test]
    fn output_is_strictly_ascending() {
        let mut adapters = busy_host();
        adapters.extend(busy_host());
        adapters.reverse();
        let enumerator = AdapterEnumerator::new(MockFetcher::returning(adapters));

        for include_inactive in [false, true] {
            let result = enumerator.list_adapters(include_inactive);
            assert!(
                result.windows(2).all(|pair| pair[0] < pair[1]),
                "not strictly ascending: {result:?}"
            );
        }
    }

    #[test]
    fn survivors_contain_no_exclusion_keyword_and_are_up() {
        let host = busy_host();
        let enumerator = AdapterEnumerator::new(MockFetcher::returning(host.clone()));

        for id in enumerator.list_adapters(false) {
            let source = host
                .iter()
                .find(|a| a.name == id.adapter_name())
                .expect("id must map back to an adapter");
            let text = format!("{} {}", source.name, source.description).to_lowercase();

            assert!(source.is_up());
            for keyword in BUILTIN_EXCLUDE_KEYWORDS {
                assert!(!text.contains(keyword), "{id} contains {keyword}");
            }
        }
    }

    #[test]
    fn every_id_round_trips_to_adapter_name() {
        let host = busy_host();
        let enumerator = AdapterEnumerator::new(MockFetcher::returning(host.clone()));

        for id in enumerator.list_adapters(true) {
            assert!(host.iter().any(|a| a.name == adapter_name(id.as_str())));
        }
    }

    #[test]
    fn names_that_cannot_round_trip_are_skipped() {
        let mut tricky = intel_ethernet();
        tricky.name = "Ethernet (2)".to_string();
        let enumerator = AdapterEnumerator::new(MockFetcher::returning(vec![tricky, wifi()]));

        let result = enumerator.list_adapters(false);

        assert_eq!(ids(&result), vec!["Wi-Fi (Intel(R) Wi-Fi 6 AX201 160MHz)"]);
    }

    #[test]
    fn fetch_failure_yields_empty_list() {
        let enumerator = AdapterEnumerator::new(MockFetcher::failing());

        assert!(enumerator.list_adapters(false).is_empty());
    }

    #[test]
    fn custom_keywords_replace_builtin() {
        let enumerator = AdapterEnumerator::new(MockFetcher::returning(vec![
            intel_ethernet(),
            tap_vpn(),
        ]))
        .with_keywords(ExclusionKeywords::new(["intel"]));

        assert_eq!(ids(&enumerator.list_adapters(false)), vec!["VPN (TAP-Windows Adapter)"]);
    }

    #[test]
    fn exclude_patterns_remove_matches() {
        let enumerator = AdapterEnumerator::new(MockFetcher::returning(vec![
            intel_ethernet(),
            wifi(),
        ]))
        .with_exclude_patterns([NameRegexFilter::new("^Wi-Fi$").unwrap()]);

        assert_eq!(ids(&enumerator.list_adapters(false)), vec!["Ethernet (Intel(R) I219-V)"]);
    }
}

mod select {
    use super::*;

    #[test]
    fn empty_chain_still_sorts_and_dedups() {
        let adapters = vec![wifi(), intel_ethernet(), wifi()];

        let result = select_adapters(&adapters, &FilterChain::new());

        assert_eq!(
            ids(&result),
            vec!["Ethernet (Intel(R) I219-V)", "Wi-Fi (Intel(R) Wi-Fi 6 AX201 160MHz)"]
        );
    }

    #[test]
    fn no_adapters_yields_empty() {
        assert!(select_adapters(&[], &FilterChain::new()).is_empty());
    }
}

mod current_ipv4 {
    use super::*;

    #[test]
    fn returns_first_address_by_exact_name() {
        let mut ethernet = intel_ethernet();
        ethernet.ipv4_addresses.push("192.168.1.99".parse().unwrap());
        let enumerator = AdapterEnumerator::new(MockFetcher::returning(vec![ethernet]));

        let result = enumerator.current_ipv4("Ethernet");

        assert_eq!(result, CurrentIpv4::Address("192.168.1.10".parse().unwrap()));
        assert_eq!(result.to_string(), "192.168.1.10");
    }

    #[test]
    fn accepts_display_id() {
        let enumerator = AdapterEnumerator::new(MockFetcher::returning(vec![intel_ethernet()]));

        let result = enumerator.current_ipv4("Ethernet (Intel(R) I219-V)");

        assert_eq!(result, CurrentIpv4::Address("192.168.1.10".parse().unwrap()));
    }

    #[test]
    fn name_match_is_exact() {
        let enumerator = AdapterEnumerator::new(MockFetcher::returning(vec![intel_ethernet()]));

        assert_eq!(enumerator.current_ipv4("ethernet"), CurrentIpv4::NotFound);
        assert_eq!(enumerator.current_ipv4("Ethernet 2"), CurrentIpv4::NotFound);
    }

    #[test]
    fn adapter_without_address_reports_no_ip() {
        let enumerator = AdapterEnumerator::new(MockFetcher::returning(vec![disconnected_usb()]));

        let result = enumerator.current_ipv4("Ethernet 2");

        assert_eq!(result, CurrentIpv4::NoAddress);
        assert_eq!(result.to_string(), "No IP");
    }

    #[test]
    fn missing_adapter_reports_not_found() {
        let enumerator = AdapterEnumerator::new(MockFetcher::returning(vec![]));

        assert_eq!(enumerator.current_ipv4("Ethernet").to_string(), "Not found");
    }

    #[test]
    fn fetch_failure_reports_error_sentinel() {
        let enumerator = AdapterEnumerator::new(MockFetcher::failing());

        let result = enumerator.current_ipv4("Ethernet");

        assert_eq!(result, CurrentIpv4::Unavailable);
        assert_eq!(result.to_string(), "Error");
    }
}
