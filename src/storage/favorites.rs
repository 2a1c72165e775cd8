//! Favorites persistence over the key-value store.
//!
//! Two stable keys hold the persisted artifacts: the identity set and the
//! full article list. Reads degrade to an empty list on any failure; writes
//! are best-effort and callers treat errors as non-fatal.

use anyhow::Result;

use super::db::Database;
use crate::favorites::Favorites;

/// JSON array of identities, in list order.
pub const FAVORITES_IDS_KEY: &str = "favorites.ids";
/// JSON array of the full favorite articles, most-recent-first.
pub const FAVORITES_DATA_KEY: &str = "favorites.data";

impl Database {
    /// Load the persisted favorites list. Never fails: storage errors and
    /// malformed content both degrade to an empty list.
    pub async fn load_favorites(&self) -> Favorites {
        let raw = match self.get_state(FAVORITES_DATA_KEY).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read favorites, starting empty");
                return Favorites::new();
            }
        };
        let favorites = Favorites::from_persisted(raw.as_deref());
        tracing::debug!(count = favorites.len(), "Loaded favorites");
        favorites
    }

    /// Persist both favorites artifacts.
    pub async fn save_favorites(&self, favorites: &Favorites) -> Result<()> {
        let data = favorites.items_json()?;
        let ids = favorites.ids_json()?;
        self.set_state(FAVORITES_DATA_KEY, &data).await?;
        self.set_state(FAVORITES_IDS_KEY, &ids).await?;
        Ok(())
    }

    /// Drop all persisted favorites state (the `--reset-favorites` flag).
    pub async fn reset_favorites(&self) -> Result<()> {
        self.delete_state(FAVORITES_DATA_KEY).await?;
        self.delete_state(FAVORITES_IDS_KEY).await?;
        Ok(())
    }
}
