//! Search route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use dewdrop_core::Price;

use crate::catalog::{TrendingProduct, trending_products};
use crate::error::Result;
use crate::latency;
use crate::middleware::Shopper;
use crate::search::{self, normalize_query};
use crate::state::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// A matching product with the price the shopper would pay.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    #[serde(flatten)]
    pub product: TrendingProduct,
    pub effective_price: Price,
}

impl From<&TrendingProduct> for SearchHit {
    fn from(product: &TrendingProduct) -> Self {
        Self {
            product: product.clone(),
            effective_price: product.effective_price(),
        }
    }
}

/// Search response.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchHit>,
}

/// Search trending products by name or category.
///
/// Non-blank queries are recorded in recent searches before the simulated
/// delay; blank queries return immediately with no results.
#[instrument(skip(state, shopper), fields(shopper_id = %shopper.id))]
pub async fn search(
    State(state): State<AppState>,
    shopper: Shopper,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>> {
    let Some(query) = normalize_query(&params.q) else {
        return Ok(Json(SearchResponse {
            query: String::new(),
            results: Vec::new(),
        }));
    };

    shopper.session.lock().await.recent_searches.record(query)?;

    let results = latency::delayed(state.latency().search, async {
        search::search(trending_products(), query)
            .into_iter()
            .map(SearchHit::from)
            .collect::<Vec<_>>()
    })
    .await;

    Ok(Json(SearchResponse {
        query: query.to_string(),
        results,
    }))
}

/// List recent searches, newest first.
#[instrument(skip(shopper), fields(shopper_id = %shopper.id))]
pub async fn recent(shopper: Shopper) -> Json<Vec<String>> {
    let session = shopper.session.lock().await;
    Json(session.recent_searches.queries().to_vec())
}

/// Forget recent searches.
#[instrument(skip(shopper), fields(shopper_id = %shopper.id))]
pub async fn clear_recent(shopper: Shopper) -> Result<Json<Vec<String>>> {
    let mut session = shopper.session.lock().await;
    session.recent_searches.clear()?;
    Ok(Json(Vec::new()))
}

/// List trending products.
pub async fn trending() -> Json<&'static [TrendingProduct]> {
    Json(trending_products())
}
