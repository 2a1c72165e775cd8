//! A terminal news browser: three headlines per page, cached per query,
//! prefetched around the cursor, with locally persisted favorites.

pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod favorites;
pub mod pager;
pub mod query;
pub mod storage;
pub mod ui;
