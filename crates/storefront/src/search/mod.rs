//! Product search over the trending list, plus recent-search history.
//!
//! There is no search index: a query matches a product when its name or
//! category contains the query, ignoring case.

mod recent;

use tracing::instrument;

use crate::catalog::TrendingProduct;

pub use recent::{MAX_RECENT_SEARCHES, RecentSearches};

/// Normalize a raw query: trimmed, or `None` if blank.
#[must_use]
pub fn normalize_query(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Products whose name or category contains `query`, case-insensitively.
///
/// Results keep the order of `products`. A blank query matches nothing.
#[instrument(skip(products))]
#[must_use]
pub fn search<'a>(products: &'a [TrendingProduct], query: &str) -> Vec<&'a TrendingProduct> {
    let Some(query) = normalize_query(query) else {
        return Vec::new();
    };
    let needle = query.to_lowercase();

    let results: Vec<&TrendingProduct> = products
        .iter()
        .filter(|product| {
            product.name.to_lowercase().contains(&needle)
                || product.category.to_lowercase().contains(&needle)
        })
        .collect();

    tracing::debug!(results = results.len(), "Search complete");
    results
}
