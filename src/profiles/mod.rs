//! Persistence of saved PLC connections.
//!
//! This module provides the [`ConnectionRecord`] type and a store
//! abstraction for reading and writing the list of records.

mod file;
mod record;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use file::FileConnectionStore;
pub use record::{ConnectionRecord, DEFAULT_BUILDING, NEVER_CONNECTED, find_record, status};

use std::io;

use thiserror::Error;

/// Result of loading records from persistent storage.
///
/// - Successfully loaded records
/// - No file exists yet
/// - A file exists but is unreadable
#[derive(Debug, Clone)]
pub enum LoadResult {
    /// Successfully loaded records.
    Loaded(Vec<ConnectionRecord>),

    /// No file exists (nothing saved yet).
    NotFound,

    /// The file exists but could not be read or parsed.
    Corrupted {
        /// Reason for corruption (for logging/debugging).
        reason: String,
    },
}

/// Errors that can occur while saving records.
///
/// Read-side issues are modeled as [`LoadResult`] variants.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to write the file.
    #[error("Failed to write connections file: {0}")]
    Write(#[source] io::Error),

    /// Failed to serialize records to JSON.
    #[error("Failed to serialize connections: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The background write task did not complete.
    #[error("Connections write task failed: {0}")]
    Task(String),
}

/// Abstraction for persisting connection records.
///
/// Implementations should:
/// - Use atomic writes to prevent corruption from crashes
/// - Handle missing files gracefully (return `LoadResult::NotFound`)
/// - Degrade gracefully on read errors (return `LoadResult::Corrupted`)
pub trait ConnectionStore: Send + Sync {
    /// Loads the saved records.
    fn load(&self) -> LoadResult;

    /// Replaces the saved records.
    ///
    /// # Errors
    ///
    /// Returns an error if the records cannot be written.
    fn save(
        &self,
        records: &[ConnectionRecord],
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
