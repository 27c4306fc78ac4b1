//! Cart route handlers.
//!
//! Every handler responds with the full cart view so the client can redraw
//! the drawer from a single response.

use axum::{Json, extract::Path};
use dewdrop_core::{Price, ProductId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::cart::{CartItem, CartStore, CartTotals, NewCartItem};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::Shopper;

/// A cart line with its computed totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    #[serde(flatten)]
    pub item: CartItem,
    pub line_total: Price,
    pub line_list_total: Price,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub totals: CartTotals,
    pub is_open: bool,
}

impl From<&CartStore> for CartView {
    fn from(cart: &CartStore) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .map(|item| CartLineView {
                    item: item.clone(),
                    line_total: item.line_total(),
                    line_list_total: item.line_list_total(),
                })
                .collect(),
            totals: cart.totals(),
            is_open: cart.is_open(),
        }
    }
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityForm {
    pub quantity: i64,
}

/// Cart visibility request body.
#[derive(Debug, Deserialize)]
pub struct OpenForm {
    pub open: bool,
}

/// Reject candidates that could never be a real product line.
fn validate_candidate(item: &NewCartItem) -> Result<()> {
    if item.id.as_str().trim().is_empty() {
        return Err(AppError::BadRequest("product id is required".to_string()));
    }
    if item.price <= Price::ZERO {
        return Err(AppError::BadRequest("price must be positive".to_string()));
    }
    if item.discounted_price.is_some_and(|discounted| discounted <= Price::ZERO) {
        return Err(AppError::BadRequest(
            "discounted price must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Show the cart.
#[instrument(skip(shopper), fields(shopper_id = %shopper.id))]
pub async fn show(shopper: Shopper) -> Json<CartView> {
    let session = shopper.session.lock().await;
    Json(CartView::from(&session.cart))
}

/// Add one unit of a product.
#[instrument(skip(shopper, item), fields(shopper_id = %shopper.id, product_id = %item.id))]
pub async fn add(shopper: Shopper, Json(item): Json<NewCartItem>) -> Result<Json<CartView>> {
    validate_candidate(&item)?;
    add_breadcrumb("cart", "Added item", Some(&[("product_id", item.id.as_str())]));

    let mut session = shopper.session.lock().await;
    session.cart.add_item(item)?;
    Ok(Json(CartView::from(&session.cart)))
}

/// Set a line's quantity; zero or less removes it.
#[instrument(skip(shopper), fields(shopper_id = %shopper.id))]
pub async fn update(
    shopper: Shopper,
    Path(id): Path<String>,
    Json(form): Json<UpdateQuantityForm>,
) -> Result<Json<CartView>> {
    let mut session = shopper.session.lock().await;
    session.cart.update_quantity(&ProductId::new(id), form.quantity)?;
    Ok(Json(CartView::from(&session.cart)))
}

/// Remove a line.
#[instrument(skip(shopper), fields(shopper_id = %shopper.id))]
pub async fn remove(shopper: Shopper, Path(id): Path<String>) -> Result<Json<CartView>> {
    let mut session = shopper.session.lock().await;
    session.cart.remove_item(&ProductId::new(id))?;
    Ok(Json(CartView::from(&session.cart)))
}

/// Show or hide the cart drawer.
#[instrument(skip(shopper), fields(shopper_id = %shopper.id))]
pub async fn set_open(shopper: Shopper, Json(form): Json<OpenForm>) -> Json<CartView> {
    let mut session = shopper.session.lock().await;
    session.cart.set_open(form.open);
    Json(CartView::from(&session.cart))
}
