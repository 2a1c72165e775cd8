//! Locally persisted favorites: an ordered-unique article list.
//!
//! One abstraction owns both the ordered list and the identity set; the set
//! is maintained incrementally and is always exactly the identities present
//! in the list, which removes the possibility of the two drifting apart.
//! Persistence serializes two artifacts (the list and the identity set) so a
//! reload reconstructs the exact prior state.

use crate::api::Article;
use std::collections::HashSet;

/// Most-recently-added entries are kept; the list never exceeds this.
pub const FAVORITES_CAP: usize = 200;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Favorites {
    items: Vec<Article>,
    ids: HashSet<String>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from an ordered list, deduplicating by identity (first
    /// occurrence wins) and enforcing the cap. Used when loading persisted
    /// state, so a hand-edited or partially corrupt list still normalizes.
    pub fn from_items(items: Vec<Article>) -> Self {
        let mut favorites = Favorites::new();
        for article in items {
            if favorites.items.len() >= FAVORITES_CAP {
                break;
            }
            if favorites.ids.insert(article.identity().to_string()) {
                favorites.items.push(article);
            }
        }
        favorites
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Article] {
        &self.items
    }

    pub fn contains(&self, article: &Article) -> bool {
        self.ids.contains(article.identity())
    }

    /// Add or remove by identity. Adds prepend (most-recent-first) and
    /// truncate to the cap, dropping the oldest entries. Returns true when
    /// the article is a favorite after the call.
    pub fn toggle(&mut self, article: &Article) -> bool {
        let id = article.identity().to_string();
        if self.ids.remove(&id) {
            self.items.retain(|a| a.identity() != id);
            false
        } else {
            self.items.insert(0, article.clone());
            self.ids.insert(id);
            while self.items.len() > FAVORITES_CAP {
                if let Some(dropped) = self.items.pop() {
                    self.ids.remove(dropped.identity());
                }
            }
            true
        }
    }

    /// JSON artifact of the identity set, in list order.
    pub fn ids_json(&self) -> serde_json::Result<String> {
        let ids: Vec<&str> = self.items.iter().map(|a| a.identity()).collect();
        serde_json::to_string(&ids)
    }

    /// JSON artifact of the full article list.
    pub fn items_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.items)
    }

    /// Reconstruct from the persisted list artifact. Malformed or missing
    /// content degrades to an empty list; the identity set is rebuilt from
    /// the list, which is authoritative.
    pub fn from_persisted(items_raw: Option<&str>) -> Self {
        let Some(raw) = items_raw else {
            return Favorites::new();
        };
        match serde_json::from_str::<Vec<Article>>(raw) {
            Ok(items) => Favorites::from_items(items),
            Err(e) => {
                tracing::warn!(error = %e, "Malformed favorites data, starting empty");
                Favorites::new()
            }
        }
    }
}
