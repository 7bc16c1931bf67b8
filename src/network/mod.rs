//! Network adapter discovery.
//!
//! This module provides types and traits for:
//! - Representing adapters ([`AdapterDescriptor`], [`InterfaceKind`], [`OperStatus`])
//! - Composite display ids and name recovery ([`AdapterId`], [`adapter_name`])
//! - Fetching adapter information ([`AdapterFetcher`])
//! - Filtering and listing adapters ([`filter`], [`AdapterEnumerator`])
//! - Platform-specific implementations ([`platform`])

mod adapter;
mod enumerator;
mod fetcher;
pub mod filter;
pub mod platform;

#[cfg(test)]
mod enumerator_tests;

pub use adapter::{
    AdapterDescriptor, AdapterId, INACTIVE_SUFFIX, InterfaceKind, OperStatus, adapter_name,
};
pub use enumerator::{AdapterEnumerator, CurrentIpv4, select_adapters};
pub use fetcher::{AdapterFetcher, FetchError};
