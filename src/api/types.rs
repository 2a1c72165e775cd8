//! Wire types for the upstream news search API.
//!
//! Every field except `url` is optional upstream; `#[serde(default)]` keeps
//! deserialization tolerant of sparse items so one malformed attribute never
//! drops a whole page.

use serde::{Deserialize, Serialize};

/// One upstream news item.
///
/// Identity for dedup and favorites is the first non-empty of `uuid`, `id`,
/// `url`, in that priority (see [`Article::identity`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub url: String,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub source: Option<Source>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

impl Article {
    /// Stable identity for dedup/favorites: `uuid`, else `id`, else `url`.
    ///
    /// Empty strings count as absent, so an item with `uuid: ""` still
    /// falls through to `id` or `url`.
    pub fn identity(&self) -> &str {
        if let Some(uuid) = self.uuid.as_deref() {
            if !uuid.is_empty() {
                return uuid;
            }
        }
        if let Some(id) = self.id.as_deref() {
            if !id.is_empty() {
                return id;
            }
        }
        &self.url
    }

    /// Body text for display: `description`, falling back to `snippet`.
    pub fn body(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.snippet.as_deref().filter(|s| !s.is_empty()))
    }
}

/// Upstream `source` is either free text or a named object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Source {
    Text(String),
    Named { name: Option<String> },
}

impl Source {
    pub fn display(&self) -> Option<&str> {
        match self {
            Source::Text(s) if !s.is_empty() => Some(s),
            Source::Named { name: Some(n) } if !n.is_empty() => Some(n),
            _ => None,
        }
    }
}

/// Top-level response envelope from the news service.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsResponse {
    #[serde(default)]
    pub data: Vec<Article>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

/// Pagination metadata the service returns alongside each page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub found: Option<u64>,
    #[serde(default)]
    pub returned: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub page: Option<u64>,
}
