//! Platform-specific network adapter fetcher implementations.
//!
//! This module provides conditional compilation for platform-specific
//! implementations of the [`AdapterFetcher`](super::AdapterFetcher) trait.
//!
//! # Platform Support
//!
//! - **Windows**: Uses `GetAdaptersAddresses` API via the `windows` crate.
//! - **Unix**: Uses `getifaddrs` (via `if-addrs`) for addresses and
//!   `/sys/class/net` for interface type, state and driver.

#[cfg(windows)]
mod windows;

#[cfg(not(windows))]
mod unix;

#[cfg(windows)]
pub use windows::WindowsFetcher;

#[cfg(not(windows))]
pub use unix::UnixFetcher;

// Re-export platform-specific fetcher as PlatformFetcher for convenience
#[cfg(windows)]
pub use windows::WindowsFetcher as PlatformFetcher;

#[cfg(not(windows))]
pub use unix::UnixFetcher as PlatformFetcher;
