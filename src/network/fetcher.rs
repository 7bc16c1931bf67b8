//! Adapter fetching trait and error types.

use super::AdapterDescriptor;
use thiserror::Error;

/// Error type for adapter fetching operations.
///
/// Describes what went wrong without dictating recovery strategy.
/// The enumerator collapses every variant into an empty list.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Windows API call failed.
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    WindowsApi(#[from] windows::core::Error),

    /// Reading interface information from the OS failed.
    #[error("Failed to read {context}: {source}")]
    Io {
        /// What was being read.
        context: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Platform-specific error with a generic message.
    #[error("Platform error: {message}")]
    Platform {
        /// Error message describing the platform-specific failure.
        message: String,
    },
}

/// Trait for fetching the host's network adapters.
///
/// # Design
///
/// - Enables dependency injection for testing with mock implementations
/// - Platform-specific implementations provided in [`super::platform`]
///
/// # Example
///
/// ```ignore
/// use nodus_ip::network::{AdapterDescriptor, AdapterFetcher, FetchError};
///
/// struct FixedFetcher(Vec<AdapterDescriptor>);
///
/// impl AdapterFetcher for FixedFetcher {
///     fn fetch(&self) -> Result<Vec<AdapterDescriptor>, FetchError> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
pub trait AdapterFetcher: Send + Sync {
    /// Fetches the current state of all network adapters.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when:
    /// - Platform API calls fail (e.g., `FetchError::WindowsApi` on Windows)
    /// - Interface information cannot be read (`FetchError::Io`)
    /// - Other platform-specific failures (`FetchError::Platform`)
    ///
    /// # Implementation Notes
    ///
    /// - Implementations should return ALL adapters; filtering is done by the caller
    /// - This is a synchronous, side-effect-free query
    fn fetch(&self) -> Result<Vec<AdapterDescriptor>, FetchError>;
}

impl<T: AdapterFetcher + ?Sized> AdapterFetcher for &T {
    fn fetch(&self) -> Result<Vec<AdapterDescriptor>, FetchError> {
        (**self).fetch()
    }
}

impl<T: AdapterFetcher + ?Sized> AdapterFetcher for std::sync::Arc<T> {
    fn fetch(&self) -> Result<Vec<AdapterDescriptor>, FetchError> {
        (**self).fetch()
    }
}
