//! Upstream news API surface: the wire types and the credential-holding
//! client with its error taxonomy.

mod client;
mod types;

pub use client::{NewsClient, NewsError, NewsQuery};
pub use types::{Article, Meta, NewsResponse, Source};
