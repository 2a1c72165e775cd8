//! Cache-partition key derivation for the active category/search selection.

use std::fmt;

/// Category applied when neither a search nor a category is meaningfully set.
pub const DEFAULT_CATEGORY: &str = "tech";

/// Stable partition key for the page cache.
///
/// A non-empty (trimmed) search wins over the category; two selections with
/// the same effective search/category always map to the same key, and a
/// search for `"x"` can never collide with the category `"x"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(String);

impl QueryKey {
    pub fn derive(category: &str, search: &str) -> Self {
        let search = search.trim();
        if !search.is_empty() {
            return QueryKey(format!("search:{search}"));
        }
        let category = category.trim();
        let category = if category.is_empty() {
            DEFAULT_CATEGORY
        } else {
            category
        };
        QueryKey(format!("category:{category}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
