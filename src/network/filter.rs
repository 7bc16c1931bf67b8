//! Adapter filtering for the enumeration pipeline.
//!
//! # Design
//!
//! - **Pure Matchers**: [`KindFilter`], [`KeywordFilter`], [`NameRegexFilter`],
//!   [`UpFilter`] and [`RoutableIpv4Filter`] only answer "does this adapter
//!   match?" without include/exclude semantics.
//! - **Filter Chain**: [`FilterChain`] combines matchers:
//!   - Require filters: AND logic (must match ALL)
//!   - Exclude filters: must match NONE
//!   - Include filters: OR logic (match ANY, empty = match all)
//! - **Data-driven exclusion**: [`ExclusionKeywords`] is an injectable set,
//!   seeded from [`BUILTIN_EXCLUDE_KEYWORDS`].

use std::collections::HashSet;

use regex::Regex;

use super::{AdapterDescriptor, InterfaceKind};

/// Keywords identifying virtual, tunnel and other non-physical adapters.
pub const BUILTIN_EXCLUDE_KEYWORDS: &[&str] = &[
    "virtual",
    "vmware",
    "virtualbox",
    "hyper-v",
    "vethernet",
    "loopback",
    "tunnel",
    "vpn",
    "tap",
    "tun",
    "wsl",
    "docker",
    "vbox",
    "parallels",
    "pseudo",
    "miniport",
    "wan miniport",
    "bluetooth",
    "isatap",
    "teredo",
    "6to4",
];

/// Trait for filtering network adapters.
///
/// Filters must be `Send + Sync` to support concurrent access in async contexts.
pub trait AdapterFilter: Send + Sync {
    /// Returns `true` if the adapter matches this filter.
    fn matches(&self, adapter: &AdapterDescriptor) -> bool;
}

// ============================================================================
// ExclusionKeywords - Lower-cased substring set
// ============================================================================

/// A set of lower-cased keywords matched by substring containment.
///
/// Keywords are trimmed and lower-cased on insertion; empty keywords are
/// ignored and duplicates are kept once, in first-seen order.
///
/// # Examples
///
/// ```
/// use nodus_ip::network::filter::ExclusionKeywords;
///
/// let keywords = ExclusionKeywords::builtin().with_keywords(["Npcap"]);
///
/// assert!(keywords.matches("TAP-Windows Adapter V9"));
/// assert!(keywords.matches("npcap loopback"));
/// assert!(!keywords.matches("Intel(R) I219-V"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionKeywords {
    keywords: Vec<String>,
}

impl ExclusionKeywords {
    /// Creates a keyword set from the given keywords.
    #[must_use]
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: Vec::new(),
        }
        .with_keywords(keywords)
    }

    /// Creates the built-in keyword set ([`BUILTIN_EXCLUDE_KEYWORDS`]).
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(BUILTIN_EXCLUDE_KEYWORDS)
    }

    /// Adds keywords to the set (builder pattern).
    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if !keyword.is_empty() && !self.keywords.contains(&keyword) {
                self.keywords.push(keyword);
            }
        }
        self
    }

    /// Returns true if the lower-cased text contains any keyword.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.keywords.iter().any(|keyword| text.contains(keyword))
    }

    /// Returns the keywords in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    /// Returns the number of keywords.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Returns true if the set holds no keywords.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl Default for ExclusionKeywords {
    fn default() -> Self {
        Self::builtin()
    }
}

// ============================================================================
// KeywordFilter - Pure matcher by name/description keywords
// ============================================================================

/// Matches adapters whose name or description contains any keyword.
///
/// # Examples
///
/// ```
/// use nodus_ip::network::filter::{AdapterFilter, ExclusionKeywords, KeywordFilter};
/// use nodus_ip::network::{AdapterDescriptor, InterfaceKind, OperStatus};
///
/// let filter = KeywordFilter::new(ExclusionKeywords::builtin());
///
/// let vpn = AdapterDescriptor::new(
///     "VPN", "TAP-Windows Adapter", InterfaceKind::Ethernet, OperStatus::Up, vec![],
/// );
/// let nic = AdapterDescriptor::new(
///     "Ethernet", "Intel(R) I219-V", InterfaceKind::Ethernet, OperStatus::Up, vec![],
/// );
///
/// assert!(filter.matches(&vpn));
/// assert!(!filter.matches(&nic));
/// ```
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    keywords: ExclusionKeywords,
}

impl KeywordFilter {
    /// Creates a keyword filter over the given set.
    #[must_use]
    pub const fn new(keywords: ExclusionKeywords) -> Self {
        Self { keywords }
    }

    /// Returns the keyword set.
    #[must_use]
    pub const fn keywords(&self) -> &ExclusionKeywords {
        &self.keywords
    }
}

impl AdapterFilter for KeywordFilter {
    fn matches(&self, adapter: &AdapterDescriptor) -> bool {
        self.keywords.matches(&adapter.name) || self.keywords.matches(&adapter.description)
    }
}

// ============================================================================
// KindFilter - Pure matcher by interface kind
// ============================================================================

/// Matches adapters whose kind is contained in the specified set.
#[derive(Debug, Clone)]
pub struct KindFilter {
    kinds: HashSet<InterfaceKind>,
}

impl KindFilter {
    /// Creates a kind filter matching any of the specified kinds.
    #[must_use]
    pub fn new(kinds: impl IntoIterator<Item = InterfaceKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    /// Creates a filter matching the kinds eligible for configuration.
    #[must_use]
    pub fn eligible() -> Self {
        Self::new([
            InterfaceKind::Ethernet,
            InterfaceKind::GigabitEthernet,
            InterfaceKind::WirelessLan,
        ])
    }
}

impl AdapterFilter for KindFilter {
    fn matches(&self, adapter: &AdapterDescriptor) -> bool {
        self.kinds.contains(&adapter.kind)
    }
}

// ============================================================================
// UpFilter / RoutableIpv4Filter - State matchers
// ============================================================================

/// Matches adapters that are operationally up.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpFilter;

impl AdapterFilter for UpFilter {
    fn matches(&self, adapter: &AdapterDescriptor) -> bool {
        adapter.is_up()
    }
}

/// Matches adapters holding at least one non-loopback IPv4 address.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoutableIpv4Filter;

impl AdapterFilter for RoutableIpv4Filter {
    fn matches(&self, adapter: &AdapterDescriptor) -> bool {
        adapter.has_routable_ipv4()
    }
}

// ============================================================================
// NameRegexFilter - Pure matcher by name/description pattern
// ============================================================================

/// Matches adapters whose name or description matches a regex pattern.
///
/// # Examples
///
/// ```
/// use nodus_ip::network::filter::{AdapterFilter, NameRegexFilter};
/// use nodus_ip::network::{AdapterDescriptor, InterfaceKind, OperStatus};
///
/// let filter = NameRegexFilter::new(r"(?i)npcap").unwrap();
///
/// let npcap = AdapterDescriptor::new(
///     "Ethernet 3", "Npcap Packet Driver", InterfaceKind::Ethernet, OperStatus::Up, vec![],
/// );
/// assert!(filter.matches(&npcap));
/// ```
#[derive(Debug, Clone)]
pub struct NameRegexFilter {
    pattern: Regex,
}

impl NameRegexFilter {
    /// Creates a filter with the given regex pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the regex pattern is invalid.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// Returns a reference to the regex pattern.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Regex is not a const type
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

impl AdapterFilter for NameRegexFilter {
    fn matches(&self, adapter: &AdapterDescriptor) -> bool {
        self.pattern.is_match(&adapter.name) || self.pattern.is_match(&adapter.description)
    }
}

// ============================================================================
// FilterChain - Require AND / Exclude NONE
// ============================================================================

/// Filter chain with require/exclude semantics.
///
/// Evaluation order:
/// 1. **Require filters (AND)**: Adapter must match ALL requires.
/// 2. **Exclude filters**: Any match → reject.
///
/// # Examples
///
/// ```
/// use nodus_ip::network::filter::{AdapterFilter, FilterChain, KindFilter, UpFilter};
/// use nodus_ip::network::{AdapterDescriptor, InterfaceKind, OperStatus};
///
/// let chain = FilterChain::new()
///     .require(UpFilter)
///     .require(KindFilter::eligible());
///
/// let up = AdapterDescriptor::new("Ethernet", "x", InterfaceKind::Ethernet, OperStatus::Up, vec![]);
/// let down = AdapterDescriptor::new("Ethernet 2", "x", InterfaceKind::Ethernet, OperStatus::Down, vec![]);
///
/// assert!(chain.matches(&up));
/// assert!(!chain.matches(&down));
/// ```
#[derive(Default)]
pub struct FilterChain {
    requires: Vec<Box<dyn AdapterFilter>>,
    excludes: Vec<Box<dyn AdapterFilter>>,
}

impl FilterChain {
    /// Creates an empty filter chain (matches all adapters).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a required filter (AND semantics).
    #[must_use]
    pub fn require<F: AdapterFilter + 'static>(mut self, filter: F) -> Self {
        self.requires.push(Box::new(filter));
        self
    }

    /// Adds an exclude filter: adapters matching it are rejected.
    #[must_use]
    pub fn exclude<F: AdapterFilter + 'static>(mut self, filter: F) -> Self {
        self.excludes.push(Box::new(filter));
        self
    }
}

impl AdapterFilter for FilterChain {
    fn matches(&self, adapter: &AdapterDescriptor) -> bool {
        if !self.requires.iter().all(|f| f.matches(adapter)) {
            return false;
        }

        !self.excludes.iter().any(|f| f.matches(adapter))
    }
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterChain")
            .field("require_count", &self.requires.len())
            .field("exclude_count", &self.excludes.len())
            .finish()
    }
}

// Blanket implementation: any &T where T: AdapterFilter also implements AdapterFilter
impl<T: AdapterFilter + ?Sized> AdapterFilter for &T {
    fn matches(&self, adapter: &AdapterDescriptor) -> bool {
        (*self).matches(adapter)
    }
}

// Box<dyn AdapterFilter> implements AdapterFilter
impl AdapterFilter for Box<dyn AdapterFilter> {
    fn matches(&self, adapter: &AdapterDescriptor) -> bool {
        self.as_ref().matches(adapter)
    }
}
