//! File-based connection store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{ConnectionRecord, ConnectionStore, LoadResult, StoreError};

/// Directory under the user config dir holding application data.
const APP_DIR: &str = "NodusIP";

/// File name of the connections list.
const FILE_NAME: &str = "plc-connections.json";

/// File-based implementation of [`ConnectionStore`].
///
/// Stores records as a pretty-printed JSON array.
///
/// # Atomic Writes
///
/// 1. Write to `{path}.tmp`
/// 2. Rename `{path}.tmp` to `{path}`
#[derive(Debug, Clone)]
pub struct FileConnectionStore {
    path: PathBuf,
}

impl FileConnectionStore {
    /// Creates a store at the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/NodusIP/plc-connections.json`, if the platform has a
    /// config directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(FILE_NAME))
    }

    /// Returns the path to the connections file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save_blocking(path: &Path, records: &[ConnectionRecord]) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(records).map_err(StoreError::Serialize)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(StoreError::Write)?;
            }
        }

        // plc-connections.json -> plc-connections.json.tmp
        let temp_path = PathBuf::from(format!("{}.tmp", path.display()));

        std::fs::write(&temp_path, content).map_err(StoreError::Write)?;
        std::fs::rename(&temp_path, path).map_err(StoreError::Write)?;

        Ok(())
    }
}

impl ConnectionStore for FileConnectionStore {
    fn load(&self) -> LoadResult {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return LoadResult::NotFound,
            Err(e) => {
                return LoadResult::Corrupted {
                    reason: format!("Failed to read file: {e}"),
                };
            }
        };

        let content = content.trim_start_matches('\u{feff}');
        if content.trim().is_empty() {
            return LoadResult::Loaded(Vec::new());
        }

        match serde_json::from_str::<Vec<ConnectionRecord>>(content) {
            Ok(records) => LoadResult::Loaded(records),
            Err(e) => LoadResult::Corrupted {
                reason: format!("Invalid JSON: {e}"),
            },
        }
    }

    async fn save(&self, records: &[ConnectionRecord]) -> Result<(), StoreError> {
        let path = self.path.clone();
        let records = records.to_vec();

        tokio::task::spawn_blocking(move || Self::save_blocking(&path, &records))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
    }
}
