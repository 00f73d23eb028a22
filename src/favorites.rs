//! Persisted set of favorited coin ids

use crate::error::StorageError;
use crate::storage::FavoritesPersistence;
use crate::types::{DashboardEvent, MarketRecord};
use std::collections::HashSet;
use tokio::sync::broadcast;

/// Proof that the user confirmed clearing every favorite
///
/// The view obtains one from its confirmation dialog and hands it to
/// [`FavoritesStore::clear`].
#[derive(Debug)]
pub struct ClearConfirmation(());

impl ClearConfirmation {
    pub fn confirmed() -> Self {
        Self(())
    }
}

/// Ordered, duplicate-free list of favorite ids
///
/// Only obtainable through [`FavoritesStore::open`], which hydrates from
/// storage before returning.
pub struct FavoritesStore {
    ids: Vec<String>,
    storage: Box<dyn FavoritesPersistence>,
    events: Option<broadcast::Sender<DashboardEvent>>,
}

impl FavoritesStore {
    /// Loads the persisted favorites
    pub fn open(storage: Box<dyn FavoritesPersistence>) -> Result<Self, StorageError> {
        let stored = storage.load()?;
        let stored_len = stored.len();

        let mut seen = HashSet::with_capacity(stored_len);
        let ids: Vec<String> = stored
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();

        if ids.len() != stored_len {
            tracing::warn!(
                dropped = stored_len - ids.len(),
                "Dropped duplicate favorites from the stored blob"
            );
        }
        tracing::info!(count = ids.len(), "Favorites hydrated");

        Ok(Self {
            ids,
            storage,
            events: None,
        })
    }

    /// Publishes a `FavoritesChanged` event after every mutation
    pub fn with_events(mut self, events: broadcast::Sender<DashboardEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Adds `coin_id` if absent, removes it if present; returns the new membership
    pub fn toggle(&mut self, coin_id: &str) -> bool {
        let now_favorite = match self.ids.iter().position(|id| id == coin_id) {
            Some(index) => {
                self.ids.remove(index);
                false
            }
            None => {
                self.ids.push(coin_id.to_string());
                true
            }
        };

        tracing::debug!(coin_id, favorite = now_favorite, "Toggled favorite");
        self.persist();
        now_favorite
    }

    /// Removes every favorite
    pub fn clear(&mut self, _confirmation: ClearConfirmation) {
        if self.ids.is_empty() {
            return;
        }
        tracing::info!(count = self.ids.len(), "Clearing favorites");
        self.ids.clear();
        self.persist();
    }

    pub fn is_favorite(&self, coin_id: &str) -> bool {
        self.ids.iter().any(|id| id == coin_id)
    }

    /// Favorite ids in the order they were added
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Records for the favorites present in `records`, in favorites order
    pub fn favorite_records(&self, records: &[MarketRecord]) -> Vec<MarketRecord> {
        self.ids
            .iter()
            .filter_map(|id| records.iter().find(|record| &record.id == id))
            .cloned()
            .collect()
    }

    /// Favorites with no matching record in `records`
    ///
    /// These are kept; a coin can drop out of one listing and come back.
    pub fn orphaned_ids(&self, records: &[MarketRecord]) -> Vec<String> {
        let present: HashSet<&str> = records.iter().map(|record| record.id.as_str()).collect();
        self.ids
            .iter()
            .filter(|id| !present.contains(id.as_str()))
            .cloned()
            .collect()
    }

    // The in-memory list stays authoritative when a save fails
    fn persist(&self) {
        if let Err(e) = self.storage.save(&self.ids) {
            tracing::warn!(error = %e, "Failed to persist favorites");
        }
        if let Some(events) = &self.events {
            // No receivers is fine
            let _ = events.send(DashboardEvent::favorites_changed(self.ids.len()));
        }
    }
}
