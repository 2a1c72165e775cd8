//! Application state and the fetch/prefetch coordinator.
//!
//! All mutable state lives here, owned by the event loop's single task.
//! Background fetches run in spawned tasks that report back over an mpsc
//! channel; they never touch the state directly. Stale results are rejected
//! two ways: foreground fetches carry a generation number checked on
//! arrival, and the in-flight foreground task is aborted whenever a newer
//! request supersedes it. Prefetches are not aborted, only discarded if the
//! query has moved on by the time they land.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::{Article, NewsClient, NewsError, NewsQuery};
use crate::cache::PageCache;
use crate::favorites::Favorites;
use crate::pager::{page_count, page_slice, Pager, PAGE_SIZE};
use crate::query::{QueryKey, DEFAULT_CATEGORY};
use crate::storage::Database;

/// Longest accepted search input.
const MAX_SEARCH_LEN: usize = 256;
/// How long a transient status message stays visible.
const STATUS_TTL: Duration = Duration::from_secs(3);

/// Messages from background fetch tasks to the event loop.
#[derive(Debug)]
pub enum AppEvent {
    /// A foreground page fetch finished. Carries the generation it was
    /// spawned under; a mismatch on arrival means the result is stale.
    PageLoaded {
        key: QueryKey,
        page: u32,
        generation: u64,
        result: Result<Vec<Article>, NewsError>,
    },
    /// A speculative fetch finished. No generation: prefetches are valid
    /// whenever their query key still matches the active one.
    PagePrefetched {
        key: QueryKey,
        page: u32,
        result: Result<Vec<Article>, NewsError>,
    },
}

pub struct App {
    pub db: Database,
    client: NewsClient,

    pub categories: Vec<String>,
    pub selected_category: usize,
    /// Committed search query; empty means category browsing.
    pub search: String,
    /// Draft text while the search prompt is open.
    pub search_input: String,
    pub search_mode: bool,

    pub favorites_view: bool,
    pub pager: Pager,
    pub fav_pager: Pager,
    pub cache: PageCache,

    pub is_loading: bool,
    pub error: Option<String>,
    fetch_generation: u64,
    fetch_handle: Option<JoinHandle<()>>,
    prefetching: HashSet<(QueryKey, u32)>,
    save_handle: Option<JoinHandle<()>>,

    pub favorites: Favorites,
    pub status_message: Option<(String, Instant)>,
    pub needs_redraw: bool,
    pub spinner_frame: usize,
}

impl App {
    pub fn new(
        db: Database,
        client: NewsClient,
        categories: Vec<String>,
        favorites: Favorites,
    ) -> Self {
        let categories = if categories.is_empty() {
            vec![DEFAULT_CATEGORY.to_string()]
        } else {
            categories
        };
        Self {
            db,
            client,
            categories,
            selected_category: 0,
            search: String::new(),
            search_input: String::new(),
            search_mode: false,
            favorites_view: false,
            pager: Pager::default(),
            fav_pager: Pager::default(),
            cache: PageCache::new(),
            is_loading: false,
            error: None,
            fetch_generation: 0,
            fetch_handle: None,
            prefetching: HashSet::new(),
            save_handle: None,
            favorites,
            status_message: None,
            needs_redraw: true,
            spinner_frame: 0,
        }
    }

    pub fn current_category(&self) -> &str {
        self.categories
            .get(self.selected_category)
            .map(String::as_str)
            .unwrap_or(DEFAULT_CATEGORY)
    }

    /// Cache partition key for the active selection.
    pub fn query_key(&self) -> QueryKey {
        QueryKey::derive(self.current_category(), &self.search)
    }

    fn news_query(&self, page: u32) -> NewsQuery {
        NewsQuery::from_selection(page, &self.search, self.current_category())
    }

    /// Articles on the page currently being viewed, empty while loading.
    pub fn current_articles(&self) -> &[Article] {
        if self.favorites_view {
            return page_slice(self.favorites.items(), self.fav_pager.page);
        }
        self.cache
            .get(&self.query_key(), self.pager.page)
            .unwrap_or(&[])
    }

    pub fn current_article(&self) -> Option<&Article> {
        let index = if self.favorites_view {
            self.fav_pager.index
        } else {
            self.pager.index
        };
        self.current_articles().get(index)
    }

    // ========================================================================
    // Fetch coordination
    // ========================================================================

    /// Make the current page available: serve from cache if present,
    /// otherwise supersede any in-flight foreground fetch and spawn a new one.
    pub fn ensure_page_loaded(&mut self, tx: &mpsc::Sender<AppEvent>) {
        let key = self.query_key();
        let page = self.pager.page;

        if let Some(articles) = self.cache.get(&key, page) {
            let count = articles.len();
            // A fetch for some other target may still be in flight; abandon
            // it so a late failure cannot surface on this cached page.
            if let Some(handle) = self.fetch_handle.take() {
                handle.abort();
                self.fetch_generation = self.fetch_generation.wrapping_add(1);
            }
            self.is_loading = false;
            self.error = None;
            self.pager.clamp_index(count);
            return;
        }

        if let Some(handle) = self.fetch_handle.take() {
            handle.abort();
        }
        self.fetch_generation = self.fetch_generation.wrapping_add(1);
        let generation = self.fetch_generation;
        self.is_loading = true;
        self.error = None;

        tracing::debug!(key = %key, page, generation, "Fetching page");
        let client = self.client.clone();
        let query = self.news_query(page);
        let tx = tx.clone();
        let event_key = key;
        self.fetch_handle = Some(tokio::spawn(async move {
            let result = client.fetch_page(&query).await;
            let _ = tx
                .send(AppEvent::PageLoaded {
                    key: event_key,
                    page,
                    generation,
                    result,
                })
                .await;
        }));
    }

    /// Speculatively warm the adjacent page suggested by the cursor
    /// position: the next page when on the last slot, the previous page when
    /// on the first slot past page 1. Skipped when the target is cached or
    /// already being fetched, and while the current page itself is absent.
    pub fn maybe_prefetch(&mut self, tx: &mpsc::Sender<AppEvent>) {
        if self.favorites_view {
            return;
        }
        let key = self.query_key();
        if !self.cache.has(&key, self.pager.page) {
            return;
        }
        let target = if self.pager.index == PAGE_SIZE - 1 {
            Some(self.pager.page + 1)
        } else if self.pager.index == 0 && self.pager.page > 1 {
            Some(self.pager.page - 1)
        } else {
            None
        };
        let Some(page) = target else { return };
        if self.cache.has(&key, page) {
            return;
        }
        if !self.prefetching.insert((key.clone(), page)) {
            return;
        }

        tracing::debug!(key = %key, page, "Prefetching page");
        let client = self.client.clone();
        let query = self.news_query(page);
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = client.fetch_page(&query).await;
            let _ = tx.send(AppEvent::PagePrefetched { key, page, result }).await;
        });
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::PageLoaded {
                key,
                page,
                generation,
                result,
            } => self.apply_page_loaded(key, page, generation, result),
            AppEvent::PagePrefetched { key, page, result } => {
                self.apply_page_prefetched(key, page, result)
            }
        }
        self.needs_redraw = true;
    }

    fn apply_page_loaded(
        &mut self,
        key: QueryKey,
        page: u32,
        generation: u64,
        result: Result<Vec<Article>, NewsError>,
    ) {
        if generation != self.fetch_generation {
            tracing::debug!(
                key = %key,
                page,
                generation,
                current = self.fetch_generation,
                "Discarding stale page result"
            );
            return;
        }
        self.fetch_handle = None;
        self.is_loading = false;

        match result {
            Ok(articles) => {
                self.error = None;
                let count = articles.len();
                self.cache.insert(&key, page, articles);
                if key == self.query_key() && page == self.pager.page {
                    self.pager.clamp_index(count);
                }
                tracing::debug!(key = %key, page, count, "Page cached");
            }
            Err(e) => {
                tracing::warn!(key = %key, page, error = %e, "Page fetch failed");
                self.error = Some(e.user_message());
            }
        }
    }

    fn apply_page_prefetched(
        &mut self,
        key: QueryKey,
        page: u32,
        result: Result<Vec<Article>, NewsError>,
    ) {
        self.prefetching.remove(&(key.clone(), page));

        match result {
            Ok(articles) => {
                if key == self.query_key() {
                    self.cache.insert(&key, page, articles);
                } else {
                    tracing::debug!(key = %key, page, "Discarding prefetch for superseded query");
                }
            }
            // Speculative fetches fail silently; the page will be fetched in
            // the foreground if the user actually navigates to it.
            Err(e) => {
                tracing::debug!(key = %key, page, error = %e, "Prefetch failed");
            }
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    fn after_nav(&mut self, tx: &mpsc::Sender<AppEvent>) {
        self.ensure_page_loaded(tx);
        self.maybe_prefetch(tx);
        self.needs_redraw = true;
    }

    pub fn go_next(&mut self, tx: &mpsc::Sender<AppEvent>) {
        if self.favorites_view {
            self.fav_pager.advance_within(self.favorites.len());
            self.needs_redraw = true;
            return;
        }
        self.pager.advance();
        self.after_nav(tx);
    }

    pub fn go_prev(&mut self, tx: &mpsc::Sender<AppEvent>) {
        if self.favorites_view {
            self.fav_pager.retreat_within(self.favorites.len());
            self.needs_redraw = true;
            return;
        }
        self.pager.retreat();
        self.after_nav(tx);
    }

    pub fn go_first(&mut self, tx: &mpsc::Sender<AppEvent>) {
        if self.favorites_view {
            self.fav_pager.first();
            self.needs_redraw = true;
            return;
        }
        self.pager.first();
        self.after_nav(tx);
    }

    pub fn select_dot(&mut self, i: usize, tx: &mpsc::Sender<AppEvent>) {
        if self.favorites_view {
            self.fav_pager.dot_select(i);
            self.fav_pager
                .clamp_index(page_count(self.favorites.len(), self.fav_pager.page));
            self.needs_redraw = true;
            return;
        }
        self.pager.dot_select(i);
        self.after_nav(tx);
    }

    // ========================================================================
    // Query changes
    // ========================================================================

    pub fn set_category(&mut self, idx: usize, tx: &mpsc::Sender<AppEvent>) {
        if idx >= self.categories.len() {
            return;
        }
        self.selected_category = idx;
        self.search.clear();
        self.search_input.clear();
        self.favorites_view = false;
        self.reset_query(tx);
    }

    pub fn cycle_category(&mut self, tx: &mpsc::Sender<AppEvent>) {
        let next = (self.selected_category + 1) % self.categories.len();
        self.set_category(next, tx);
    }

    pub fn start_search(&mut self) {
        self.search_mode = true;
        self.search_input = self.search.clone();
        self.needs_redraw = true;
    }

    pub fn cancel_search(&mut self) {
        self.search_mode = false;
        self.search_input = self.search.clone();
        self.needs_redraw = true;
    }

    pub fn push_search_char(&mut self, c: char) {
        if self.search_input.chars().count() < MAX_SEARCH_LEN {
            self.search_input.push(c);
            self.needs_redraw = true;
        }
    }

    pub fn pop_search_char(&mut self) {
        self.search_input.pop();
        self.needs_redraw = true;
    }

    /// Commit the search prompt. An unchanged query closes the prompt
    /// without refetching; an emptied one returns to category browsing.
    pub fn submit_search(&mut self, tx: &mpsc::Sender<AppEvent>) {
        self.search_mode = false;
        let submitted = self.search_input.trim().to_string();
        self.search_input = submitted.clone();

        if submitted == self.search {
            self.favorites_view = false;
            self.needs_redraw = true;
            return;
        }
        self.search = submitted;
        self.favorites_view = false;
        self.reset_query(tx);
    }

    /// Start the active query over from a clean slate: position at page 1,
    /// drop any cached pages for this key so data comes back fresh, forget
    /// in-flight prefetches, and fetch the first page.
    fn reset_query(&mut self, tx: &mpsc::Sender<AppEvent>) {
        let key = self.query_key();
        self.pager.reset();
        self.cache.clear(&key);
        self.prefetching.clear();
        if let Some(handle) = self.fetch_handle.take() {
            handle.abort();
        }
        self.error = None;
        self.ensure_page_loaded(tx);
        self.needs_redraw = true;
    }

    // ========================================================================
    // Favorites
    // ========================================================================

    pub fn toggle_favorite(&mut self) {
        let Some(article) = self.current_article().cloned() else {
            return;
        };
        let added = self.favorites.toggle(&article);
        self.fav_pager.reclamp(self.favorites.len());

        // Best effort: a failed write keeps the in-memory list usable.
        // Each save awaits the previous one so rapid toggles cannot persist
        // an older snapshot over a newer one.
        let db = self.db.clone();
        let snapshot = self.favorites.clone();
        let prev_save = self.save_handle.take();
        self.save_handle = Some(tokio::spawn(async move {
            if let Some(prev) = prev_save {
                let _ = prev.await;
            }
            if let Err(e) = db.save_favorites(&snapshot).await {
                tracing::warn!(error = %e, "Failed to persist favorites");
            }
        }));

        self.set_status(if added {
            "Added to favorites"
        } else {
            "Removed from favorites"
        });
        self.needs_redraw = true;
    }

    pub fn toggle_favorites_view(&mut self, tx: &mpsc::Sender<AppEvent>) {
        self.favorites_view = !self.favorites_view;
        if self.favorites_view {
            self.fav_pager.reclamp(self.favorites.len());
        } else {
            self.after_nav(tx);
        }
        self.needs_redraw = true;
    }

    // ========================================================================
    // Status / housekeeping
    // ========================================================================

    pub fn open_current(&mut self) {
        let Some(article) = self.current_article() else {
            return;
        };
        let url = article.url.clone();
        match open::that_detached(&url) {
            Ok(()) => {
                tracing::info!(url = %url, "Opened article in browser");
                self.set_status("Opened in browser");
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Failed to open browser");
                self.set_status("Failed to open browser");
            }
        }
    }

    pub fn set_status(&mut self, message: &str) {
        self.status_message = Some((message.to_string(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Periodic tick: advance the spinner and expire stale status messages.
    pub fn on_tick(&mut self) {
        if self.is_loading {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
            self.needs_redraw = true;
        }
        if let Some((_, shown_at)) = &self.status_message {
            if shown_at.elapsed() >= STATUS_TTL {
                self.status_message = None;
                self.needs_redraw = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    async fn test_app() -> (App, mpsc::Sender<AppEvent>, mpsc::Receiver<AppEvent>) {
        let db = Database::open(":memory:").await.unwrap();
        // Points at a closed port; state tests never await the fetch result.
        let client = NewsClient::new(
            "http://127.0.0.1:9/news",
            SecretString::from("test".to_string()),
            30,
        )
        .unwrap();
        let app = App::new(
            db,
            client,
            vec!["tech".to_string(), "science".to_string()],
            Favorites::new(),
        );
        let (tx, rx) = mpsc::channel(32);
        (app, tx, rx)
    }

    fn article(url: &str) -> Article {
        serde_json::from_str(&format!(r#"{{"url": "{url}", "title": "t"}}"#)).unwrap()
    }

    fn full_page(prefix: &str) -> Vec<Article> {
        (0..PAGE_SIZE)
            .map(|i| article(&format!("https://example.com/{prefix}/{i}")))
            .collect()
    }

    #[tokio::test]
    async fn test_cache_hit_does_not_spawn_fetch() {
        let (mut app, tx, _rx) = test_app().await;
        let key = app.query_key();
        app.cache.insert(&key, 1, full_page("a"));

        app.ensure_page_loaded(&tx);
        assert!(!app.is_loading);
        assert!(app.fetch_handle.is_none());
        assert_eq!(app.fetch_generation, 0);
    }

    #[tokio::test]
    async fn test_cache_miss_spawns_and_bumps_generation() {
        let (mut app, tx, _rx) = test_app().await;
        app.ensure_page_loaded(&tx);
        assert!(app.is_loading);
        assert!(app.fetch_handle.is_some());
        assert_eq!(app.fetch_generation, 1);
    }

    #[tokio::test]
    async fn test_stale_generation_result_is_discarded() {
        let (mut app, tx, _rx) = test_app().await;
        app.ensure_page_loaded(&tx);
        app.ensure_page_loaded(&tx); // supersedes; generation is now 2

        let key = app.query_key();
        app.handle_event(AppEvent::PageLoaded {
            key: key.clone(),
            page: 1,
            generation: 1,
            result: Ok(full_page("stale")),
        });

        assert!(!app.cache.has(&key, 1));
        assert!(app.is_loading); // the live fetch is still outstanding
    }

    #[tokio::test]
    async fn test_current_generation_result_commits_and_clamps() {
        let (mut app, tx, _rx) = test_app().await;
        app.pager.index = 2;
        app.ensure_page_loaded(&tx);

        let key = app.query_key();
        app.handle_event(AppEvent::PageLoaded {
            key: key.clone(),
            page: 1,
            generation: 1,
            result: Ok(vec![article("https://example.com/only")]),
        });

        assert!(!app.is_loading);
        assert!(app.cache.has(&key, 1));
        assert_eq!(app.pager.index, 0); // clamped to the single result
    }

    #[tokio::test]
    async fn test_abandoned_fetch_failure_stays_off_a_cached_page() {
        let (mut app, tx, _rx) = test_app().await;
        let key = app.query_key();
        app.cache.insert(&key, 2, full_page("p2"));

        // Page 1 is a miss and starts a fetch under generation 1.
        app.ensure_page_loaded(&tx);
        assert!(app.is_loading);

        // Navigating onto cached page 2 abandons that fetch.
        app.pager = Pager { page: 2, index: 0 };
        app.ensure_page_loaded(&tx);
        assert!(!app.is_loading);
        assert!(app.error.is_none());

        // Its failure arriving late is rejected, not surfaced.
        app.handle_event(AppEvent::PageLoaded {
            key: key.clone(),
            page: 1,
            generation: 1,
            result: Err(NewsError::Upstream(500)),
        });
        assert!(app.error.is_none());
        assert!(!app.is_loading);
    }

    #[tokio::test]
    async fn test_fetch_error_sets_user_message() {
        let (mut app, tx, _rx) = test_app().await;
        app.ensure_page_loaded(&tx);

        app.handle_event(AppEvent::PageLoaded {
            key: app.query_key(),
            page: 1,
            generation: 1,
            result: Err(NewsError::RateLimited),
        });

        assert!(!app.is_loading);
        assert_eq!(
            app.error.as_deref(),
            Some("Daily request limit reached. Please try again later.")
        );
    }

    #[tokio::test]
    async fn test_prefetch_commits_for_current_key_only() {
        let (mut app, _tx, _rx) = test_app().await;
        let current = app.query_key();
        let stale = QueryKey::derive("science", "");

        app.handle_event(AppEvent::PagePrefetched {
            key: stale.clone(),
            page: 2,
            result: Ok(full_page("stale")),
        });
        app.handle_event(AppEvent::PagePrefetched {
            key: current.clone(),
            page: 2,
            result: Ok(full_page("fresh")),
        });

        assert!(!app.cache.has(&stale, 2));
        assert!(app.cache.has(&current, 2));
    }

    #[tokio::test]
    async fn test_prefetch_failure_is_silent() {
        let (mut app, _tx, _rx) = test_app().await;
        app.handle_event(AppEvent::PagePrefetched {
            key: app.query_key(),
            page: 2,
            result: Err(NewsError::Upstream(500)),
        });
        assert!(app.error.is_none());
    }

    #[tokio::test]
    async fn test_prefetch_targets() {
        let (mut app, tx, _rx) = test_app().await;
        let key = app.query_key();
        app.cache.insert(&key, 1, full_page("p1"));
        app.cache.insert(&key, 2, full_page("p2"));

        // Middle slot: nothing to prefetch.
        app.pager = Pager { page: 1, index: 1 };
        app.maybe_prefetch(&tx);
        assert!(app.prefetching.is_empty());

        // Last slot: next page is the target.
        app.pager = Pager { page: 1, index: 2 };
        app.maybe_prefetch(&tx);
        assert!(app.prefetching.contains(&(key.clone(), 2)) || app.cache.has(&key, 2));
        // Page 2 is cached, so no task was actually registered.
        assert!(app.prefetching.is_empty());

        // Last slot of page 2: page 3 is uncached, so a task registers.
        app.pager = Pager { page: 2, index: 2 };
        app.maybe_prefetch(&tx);
        assert!(app.prefetching.contains(&(key.clone(), 3)));

        // A second trigger for the same target does not duplicate the task.
        app.maybe_prefetch(&tx);
        assert_eq!(app.prefetching.len(), 1);
    }

    #[tokio::test]
    async fn test_prefetch_previous_page_from_first_slot() {
        let (mut app, tx, _rx) = test_app().await;
        let key = app.query_key();
        app.cache.insert(&key, 2, full_page("p2"));
        app.pager = Pager { page: 2, index: 0 };

        app.maybe_prefetch(&tx);
        assert!(app.prefetching.contains(&(key, 1)));
    }

    #[tokio::test]
    async fn test_set_category_clears_search_and_resets() {
        let (mut app, tx, _rx) = test_app().await;
        app.search = "rust".to_string();
        app.search_input = "rust".to_string();
        app.pager = Pager { page: 3, index: 1 };
        app.favorites_view = true;

        app.set_category(1, &tx);

        assert_eq!(app.current_category(), "science");
        assert!(app.search.is_empty());
        assert!(!app.favorites_view);
        assert_eq!(app.pager, Pager::default());
        assert!(app.is_loading);
    }

    #[tokio::test]
    async fn test_submit_unchanged_search_does_not_refetch() {
        let (mut app, tx, _rx) = test_app().await;
        app.search = "rust".to_string();
        let key = app.query_key();
        app.cache.insert(&key, 1, full_page("r"));
        app.pager = Pager { page: 1, index: 1 };

        app.start_search();
        app.submit_search(&tx);

        assert_eq!(app.fetch_generation, 0);
        assert!(app.cache.has(&key, 1));
        assert_eq!(app.pager, Pager { page: 1, index: 1 });
    }

    #[tokio::test]
    async fn test_submit_new_search_resets_pager_and_refetches() {
        let (mut app, tx, _rx) = test_app().await;
        let old_key = app.query_key();
        app.cache.insert(&old_key, 1, full_page("old"));
        app.pager = Pager { page: 2, index: 1 };

        app.start_search();
        for c in "rust".chars() {
            app.push_search_char(c);
        }
        app.submit_search(&tx);

        assert_eq!(app.search, "rust");
        assert_eq!(app.pager, Pager::default());
        assert!(app.is_loading);
        assert_eq!(app.query_key().as_str(), "search:rust");
        // The old partition is untouched; only the new key was cleared.
        assert!(app.cache.has(&old_key, 1));
    }

    #[tokio::test]
    async fn test_query_change_clears_new_key_partition() {
        let (mut app, tx, _rx) = test_app().await;
        let science_key = QueryKey::derive("science", "");
        app.cache.insert(&science_key, 1, full_page("stale"));

        app.set_category(1, &tx);

        assert!(!app.cache.has(&science_key, 1));
        assert!(app.is_loading);
    }

    #[tokio::test]
    async fn test_toggle_favorite_updates_list_and_status() {
        let (mut app, _tx, _rx) = test_app().await;
        let key = app.query_key();
        app.cache.insert(&key, 1, full_page("a"));

        app.toggle_favorite();
        assert_eq!(app.favorites.len(), 1);
        assert_eq!(
            app.status_message.as_ref().map(|(m, _)| m.as_str()),
            Some("Added to favorites")
        );

        app.toggle_favorite();
        assert!(app.favorites.is_empty());
        assert_eq!(
            app.status_message.as_ref().map(|(m, _)| m.as_str()),
            Some("Removed from favorites")
        );
    }

    #[tokio::test]
    async fn test_rapid_toggles_persist_the_final_state() {
        let (mut app, _tx, _rx) = test_app().await;
        let key = app.query_key();
        app.cache.insert(&key, 1, full_page("a"));

        // Add, remove, add again without yielding in between; saves chain,
        // so awaiting the last one covers all three writes in order.
        app.toggle_favorite();
        app.toggle_favorite();
        app.toggle_favorite();
        app.save_handle.take().unwrap().await.unwrap();

        let persisted = app.db.load_favorites().await;
        assert_eq!(persisted, app.favorites);
        assert_eq!(persisted.len(), 1);
    }

    #[tokio::test]
    async fn test_rapid_unfavorite_persists_empty_list() {
        let (mut app, _tx, _rx) = test_app().await;
        let key = app.query_key();
        app.cache.insert(&key, 1, full_page("a"));

        app.toggle_favorite();
        app.toggle_favorite();
        app.save_handle.take().unwrap().await.unwrap();

        assert!(app.favorites.is_empty());
        assert!(app.db.load_favorites().await.is_empty());
    }

    #[tokio::test]
    async fn test_favorites_navigation_respects_counts() {
        let (mut app, tx, _rx) = test_app().await;
        for i in 0..4 {
            app.favorites.toggle(&article(&format!("https://example.com/{i}")));
        }
        app.toggle_favorites_view(&tx);
        assert!(app.favorites_view);

        // 4 favorites: page 2 holds one item.
        app.go_next(&tx);
        app.go_next(&tx);
        app.go_next(&tx);
        assert_eq!(app.fav_pager, Pager { page: 2, index: 0 });
        app.go_next(&tx);
        assert_eq!(app.fav_pager, Pager { page: 2, index: 0 });

        app.go_prev(&tx);
        assert_eq!(app.fav_pager, Pager { page: 1, index: 2 });
    }

    #[tokio::test]
    async fn test_unfavoriting_reclamps_favorites_pager() {
        let (mut app, tx, _rx) = test_app().await;
        for i in 0..4 {
            app.favorites.toggle(&article(&format!("https://example.com/{i}")));
        }
        app.toggle_favorites_view(&tx);
        app.fav_pager = Pager { page: 2, index: 0 };

        // Removing the only item on page 2 pulls the pager back onto page 1.
        app.toggle_favorite();
        assert_eq!(app.favorites.len(), 3);
        assert_eq!(app.fav_pager, Pager { page: 1, index: 0 });
    }

    #[tokio::test]
    async fn test_current_articles_in_favorites_view() {
        let (mut app, tx, _rx) = test_app().await;
        app.favorites.toggle(&article("https://example.com/fav"));
        app.toggle_favorites_view(&tx);

        let visible = app.current_articles();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].url, "https://example.com/fav");
    }

    #[tokio::test]
    async fn test_search_input_editing() {
        let (mut app, _tx, _rx) = test_app().await;
        app.search = "rust".to_string();
        app.start_search();
        assert_eq!(app.search_input, "rust");

        app.push_search_char('!');
        app.pop_search_char();
        app.cancel_search();
        assert_eq!(app.search_input, "rust");
        assert!(!app.search_mode);
    }
}
