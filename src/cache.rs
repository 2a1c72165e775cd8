//! In-memory page cache, partitioned by query key.
//!
//! Owned exclusively by the application state. Background fetch tasks never
//! touch the cache directly: they report over the event channel and the
//! event handler commits after the generation check, so a partition is only
//! ever mutated from the single logical owner.

use crate::api::Article;
use crate::query::QueryKey;
use std::collections::{BTreeMap, HashMap};

/// Per-query-key mapping of 1-based page number to fetched article list.
///
/// A page maps to an entry only after a successful fetch for that
/// (key, page) pair. Entries are never evicted by size or age; the only
/// removal is [`PageCache::clear`] on a query-key change.
#[derive(Debug, Default)]
pub struct PageCache {
    partitions: HashMap<QueryKey, BTreeMap<u32, Vec<Article>>>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, key: &QueryKey, page: u32) -> bool {
        self.partitions
            .get(key)
            .is_some_and(|p| p.contains_key(&page))
    }

    pub fn get(&self, key: &QueryKey, page: u32) -> Option<&[Article]> {
        self.partitions
            .get(key)
            .and_then(|p| p.get(&page))
            .map(Vec::as_slice)
    }

    pub fn insert(&mut self, key: &QueryKey, page: u32, articles: Vec<Article>) {
        self.partitions
            .entry(key.clone())
            .or_default()
            .insert(page, articles);
    }

    /// Empty a partition in place. The partition itself stays registered so
    /// a later insert for the same key reuses it; absent keys are a no-op.
    pub fn clear(&mut self, key: &QueryKey) {
        if let Some(partition) = self.partitions.get_mut(key) {
            partition.clear();
        }
    }
}
