//! Persistence adapters for the favorites blob
//!
//! The blob keeps the shape `{"coins":{"favorited":[...]}}` under the
//! `root` key. [`FileStorage`] maps the key to `<dir>/root.json`;
//! [`MemoryStorage`] keeps it in process for tests and ephemeral sessions.

use crate::constants::PERSIST_KEY;
use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Persisted application state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub coins: CoinsState,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinsState {
    #[serde(default)]
    pub favorited: Vec<String>,
}

/// Storage seam for the favorites list
pub trait FavoritesPersistence: Send + Sync {
    /// Reads the stored ids; an absent blob is an empty list
    fn load(&self) -> Result<Vec<String>, StorageError>;

    /// Replaces the stored ids
    fn save(&self, favorited: &[String]) -> Result<(), StorageError>;
}

/// JSON file adapter
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Stores the blob as `<dir>/root.json`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", PERSIST_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_state(&self) -> Result<Option<PersistedState>, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }
}

impl FavoritesPersistence for FileStorage {
    fn load(&self) -> Result<Vec<String>, StorageError> {
        let state = self.read_state()?.unwrap_or_default();
        tracing::debug!(
            path = %self.path.display(),
            count = state.coins.favorited.len(),
            "Loaded persisted favorites"
        );
        Ok(state.coins.favorited)
    }

    fn save(&self, favorited: &[String]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let state = PersistedState {
            coins: CoinsState {
                favorited: favorited.to_vec(),
            },
        };
        let json = serde_json::to_string_pretty(&state)?;

        // Write then rename so a crash never leaves a truncated blob
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-process adapter; clones share the same blob
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: Arc<Mutex<PersistedState>>,
}

impl MemoryStorage {
    pub fn with_favorites(ids: &[&str]) -> Self {
        let state = PersistedState {
            coins: CoinsState {
                favorited: ids.iter().map(|id| id.to_string()).collect(),
            },
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Snapshot of the stored blob
    pub fn snapshot(&self) -> PersistedState {
        match self.state.lock() {
            Ok(state) => state.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl FavoritesPersistence for MemoryStorage {
    fn load(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.snapshot().coins.favorited)
    }

    fn save(&self, favorited: &[String]) -> Result<(), StorageError> {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.coins.favorited = favorited.to_vec();
        Ok(())
    }
}
