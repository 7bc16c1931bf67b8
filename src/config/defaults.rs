//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

pub use crate::ipconfig::DEFAULT_NETSH as NETSH;
pub use crate::update::DEFAULT_RELEASES_API_URL as UPDATE_URL;

/// Default wait before reading the elevated runner's result files, in milliseconds.
pub const ARTIFACT_SETTLE_MS: u64 = 1500;

/// Default wait after a successful change, in milliseconds.
pub const APPLY_SETTLE_MS: u64 = 1500;

/// Default ping timeout in milliseconds.
pub const PROBE_TIMEOUT_MS: u64 = 2000;

/// Default artifact settle as Duration.
#[must_use]
pub const fn artifact_settle() -> Duration {
    Duration::from_millis(ARTIFACT_SETTLE_MS)
}

/// Default apply settle as Duration.
#[must_use]
pub const fn apply_settle() -> Duration {
    Duration::from_millis(APPLY_SETTLE_MS)
}

/// Default probe timeout as Duration.
#[must_use]
pub const fn probe_timeout() -> Duration {
    Duration::from_millis(PROBE_TIMEOUT_MS)
}
