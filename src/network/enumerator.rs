//! Adapter enumeration: filtering, display ids and current-address lookup.

use std::fmt;
use std::net::Ipv4Addr;

use super::filter::{
    AdapterFilter, ExclusionKeywords, FilterChain, KeywordFilter, KindFilter, NameRegexFilter,
    RoutableIpv4Filter, UpFilter,
};
use super::{AdapterDescriptor, AdapterFetcher, AdapterId, adapter_name};

/// Result of looking up an adapter's current IPv4 address.
///
/// `Display` renders the address, or one of the sentinels
/// `"No IP"`, `"Not found"` and `"Error"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentIpv4 {
    /// The adapter's first IPv4 unicast address.
    Address(Ipv4Addr),
    /// The adapter exists but has no IPv4 address.
    NoAddress,
    /// No adapter with that name exists.
    NotFound,
    /// The adapter list could not be fetched.
    Unavailable,
}

impl fmt::Display for CurrentIpv4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(addr) => write!(f, "{addr}"),
            Self::NoAddress => write!(f, "No IP"),
            Self::NotFound => write!(f, "Not found"),
            Self::Unavailable => write!(f, "Error"),
        }
    }
}

/// Lists the host's physical adapters as sorted, deduplicated display ids.
///
/// Filtering pipeline (see [`AdapterEnumerator::filter_chain`]):
/// 1. Unless inactive adapters are requested, require status Up
/// 2. Require an eligible kind (Ethernet, Gigabit Ethernet, Wireless LAN)
/// 3. Exclude adapters whose name or description contains an exclusion keyword,
///    or matches an extra exclusion pattern
/// 4. Unless inactive adapters are requested, require a non-loopback IPv4 address
///
/// Every enumeration queries the fetcher afresh; the enumerator holds no
/// adapter state and is safe to share between concurrent callers.
///
/// # Example
///
/// ```ignore
/// use nodus_ip::network::{AdapterEnumerator, platform::PlatformFetcher};
///
/// let enumerator = AdapterEnumerator::new(PlatformFetcher::default());
/// for id in enumerator.list_adapters(false) {
///     println!("{id}");
/// }
/// ```
#[derive(Debug)]
pub struct AdapterEnumerator<F> {
    fetcher: F,
    keywords: ExclusionKeywords,
    exclude_patterns: Vec<NameRegexFilter>,
}

impl<F: AdapterFetcher> AdapterEnumerator<F> {
    /// Creates an enumerator using the built-in exclusion keywords.
    #[must_use]
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            keywords: ExclusionKeywords::builtin(),
            exclude_patterns: Vec::new(),
        }
    }

    /// Replaces the exclusion keyword set.
    #[must_use]
    pub fn with_keywords(mut self, keywords: ExclusionKeywords) -> Self {
        self.keywords = keywords;
        self
    }

    /// Adds extra exclusion patterns matched against name or description.
    #[must_use]
    pub fn with_exclude_patterns(
        mut self,
        patterns: impl IntoIterator<Item = NameRegexFilter>,
    ) -> Self {
        self.exclude_patterns.extend(patterns);
        self
    }

    /// Returns the exclusion keyword set.
    #[must_use]
    pub const fn keywords(&self) -> &ExclusionKeywords {
        &self.keywords
    }

    /// Lists eligible adapters as display ids, sorted ascending and deduplicated.
    ///
    /// Fetch failures are logged and produce an empty list.
    #[must_use]
    pub fn list_adapters(&self, include_inactive: bool) -> Vec<AdapterId> {
        match self.fetcher.fetch() {
            Ok(adapters) => select_adapters(&adapters, &self.filter_chain(include_inactive)),
            Err(e) => {
                tracing::warn!("Failed to enumerate network adapters: {e}");
                Vec::new()
            }
        }
    }

    /// Returns the first IPv4 address of the adapter with the given name.
    ///
    /// Accepts a raw OS name or a display id. Never fails; see [`CurrentIpv4`].
    #[must_use]
    pub fn current_ipv4(&self, adapter: &str) -> CurrentIpv4 {
        let name = adapter_name(adapter);

        let adapters = match self.fetcher.fetch() {
            Ok(adapters) => adapters,
            Err(e) => {
                tracing::warn!("Failed to look up adapter '{name}': {e}");
                return CurrentIpv4::Unavailable;
            }
        };

        adapters
            .iter()
            .find(|a| a.name == name)
            .map_or(CurrentIpv4::NotFound, |a| {
                a.first_ipv4()
                    .map_or(CurrentIpv4::NoAddress, CurrentIpv4::Address)
            })
    }

    /// Builds the filter chain for one enumeration.
    #[must_use]
    pub fn filter_chain(&self, include_inactive: bool) -> FilterChain {
        let mut chain = FilterChain::new();

        if !include_inactive {
            chain = chain.require(UpFilter);
        }

        chain = chain
            .require(KindFilter::eligible())
            .exclude(KeywordFilter::new(self.keywords.clone()));

        for pattern in &self.exclude_patterns {
            chain = chain.exclude(pattern.clone());
        }

        if !include_inactive {
            chain = chain.require(RoutableIpv4Filter);
        }

        chain
    }
}

/// Applies the filter and maps survivors to sorted, deduplicated display ids.
///
/// Adapters whose name would not survive the display-id round trip are dropped.
#[must_use]
pub fn select_adapters(adapters: &[AdapterDescriptor], filter: &impl AdapterFilter) -> Vec<AdapterId> {
    let mut ids: Vec<AdapterId> = adapters
        .iter()
        .filter(|adapter| filter.matches(adapter))
        .filter(|adapter| {
            let recoverable = adapter.has_recoverable_name();
            if !recoverable {
                tracing::debug!(
                    "Skipping adapter '{}': name cannot be recovered from its display id",
                    adapter.name
                );
            }
            recoverable
        })
        .map(AdapterDescriptor::display_id)
        .collect();

    ids.sort();
    ids.dedup();
    ids
}
