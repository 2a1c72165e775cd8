//! Client for the upstream news search API.
//!
//! This module carries the proxy's responsibilities in-process: it holds the
//! API credential (appended only at send time, never logged), builds the
//! upstream query from a page/search/category selection, and normalizes
//! upstream failures into [`NewsError`]. No retry logic lives here; retry,
//! if any, is a user-initiated re-navigation.

use chrono::{Duration as ChronoDuration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::types::{Article, NewsResponse};
use crate::query::DEFAULT_CATEGORY;

/// Per-page item limit enforced upstream.
const PAGE_LIMIT: &str = "3";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Error)]
pub enum NewsError {
    /// Upstream rejected the credential (HTTP 401/403).
    #[error("Authentication failed")]
    Auth,
    /// Usage cap hit (HTTP 429 or a usage_limit error code in the body).
    #[error("Usage limit reached")]
    RateLimited,
    /// Any other non-success upstream response.
    #[error("Upstream error: status {0}")]
    Upstream(u16),
    /// Network-level failure (DNS, connection, TLS).
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Request timed out after 20s")]
    Timeout,
    /// Successful status but a body that does not parse as a news response.
    #[error("Invalid response body: {0}")]
    InvalidBody(String),
}

impl NewsError {
    /// The user-visible message for this failure. Cancellation never reaches
    /// here; the coordinator swallows aborted requests before translation.
    pub fn user_message(&self) -> String {
        match self {
            NewsError::RateLimited => {
                "Daily request limit reached. Please try again later.".to_string()
            }
            NewsError::Auth => {
                "News API authentication failed. Check your API token.".to_string()
            }
            NewsError::Upstream(status) => {
                format!("Upstream error from the news service (status {status}).")
            }
            NewsError::Timeout => "News request timed out.".to_string(),
            NewsError::Network(_) | NewsError::InvalidBody(_) => {
                "Failed to fetch news.".to_string()
            }
        }
    }
}

/// One page request. A non-empty `search` takes precedence over `category`;
/// with neither set, the default category applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    pub page: u32,
    pub search: Option<String>,
    pub category: Option<String>,
}

impl NewsQuery {
    /// Build from the active selection, resolving the search-vs-category
    /// rule: the two are mutually exclusive at the protocol level.
    pub fn from_selection(page: u32, search: &str, category: &str) -> Self {
        let search = search.trim();
        if !search.is_empty() {
            NewsQuery {
                page,
                search: Some(search.to_string()),
                category: None,
            }
        } else {
            let category = category.trim();
            NewsQuery {
                page,
                search: None,
                category: Some(
                    if category.is_empty() {
                        DEFAULT_CATEGORY
                    } else {
                        category
                    }
                    .to_string(),
                ),
            }
        }
    }
}

/// Error envelope the upstream service returns on failures.
#[derive(Debug, Default, Deserialize)]
struct UpstreamErrorBody {
    #[serde(default)]
    error: Option<UpstreamErrorDetail>,
}

#[derive(Debug, Default, Deserialize)]
struct UpstreamErrorDetail {
    #[serde(default)]
    code: Option<String>,
}

/// Cheap-to-clone handle to the news service.
#[derive(Clone)]
pub struct NewsClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    token: SecretString,
    search_recency_days: u64,
}

impl std::fmt::Debug for NewsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsClient")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .field("search_recency_days", &self.search_recency_days)
            .finish()
    }
}

impl NewsClient {
    pub fn new(
        base_url: &str,
        token: SecretString,
        search_recency_days: u64,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Duration::from_secs(30))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: Arc::from(base_url),
            token,
            search_recency_days,
        })
    }

    /// Fetch one page of up to three articles.
    ///
    /// Searched queries are sorted by publish date and bounded to the
    /// configured recency window so results stay current.
    pub async fn fetch_page(&self, query: &NewsQuery) -> Result<Vec<Article>, NewsError> {
        let mut params: Vec<(&str, String)> = vec![
            ("language", "en".to_string()),
            ("limit", PAGE_LIMIT.to_string()),
            ("page", query.page.to_string()),
        ];

        if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
            params.push(("sort", "published_on".to_string()));
            if self.search_recency_days > 0 {
                let after = Utc::now() - ChronoDuration::days(self.search_recency_days as i64);
                params.push(("published_after", after.format("%Y-%m-%d").to_string()));
            }
        } else {
            let category = query
                .category
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or(DEFAULT_CATEGORY);
            params.push(("categories", category.to_string()));
        }

        // Log the request before the token is attached.
        tracing::debug!(
            base_url = %self.base_url,
            page = query.page,
            search = query.search.as_deref().unwrap_or(""),
            category = query.category.as_deref().unwrap_or(""),
            "Requesting news page"
        );

        params.push(("api_token", self.token.expose_secret().to_string()));

        let request = self.http.get(self.base_url.as_ref()).query(&params).send();
        let response = tokio::time::timeout(REQUEST_TIMEOUT, request)
            .await
            .map_err(|_| NewsError::Timeout)?
            .map_err(NewsError::Network)?;

        let status = response.status();
        if !status.is_success() {
            // Normalize usage-limit errors even when the service does not
            // return 429 for them.
            let body: UpstreamErrorBody = response.json().await.unwrap_or_default();
            let code = body
                .error
                .and_then(|e| e.code)
                .unwrap_or_default()
                .to_ascii_lowercase();
            if status.as_u16() == 429 || code.contains("usage_limit") {
                return Err(NewsError::RateLimited);
            }
            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(NewsError::Auth);
            }
            return Err(NewsError::Upstream(status.as_u16()));
        }

        let parsed: NewsResponse = response
            .json()
            .await
            .map_err(|e| NewsError::InvalidBody(e.to_string()))?;
        tracing::debug!(page = query.page, returned = parsed.data.len(), "News page received");
        Ok(parsed.data)
    }
}
