//! HTTP route handlers for the storefront.
//!
//! All routes speak JSON and act on the current shopper's session.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                            - Health check
//!
//! # Cart
//! GET    /cart                              - Cart view (items, totals, isOpen)
//! POST   /cart/items                        - Add one unit of a product
//! PATCH  /cart/items/{id}                   - Set a line's quantity
//! DELETE /cart/items/{id}                   - Remove a line
//! PUT    /cart/open                         - Show or hide the cart drawer
//!
//! # Skin quiz
//! GET    /quiz                              - Quiz progress
//! POST   /quiz/answer                       - Answer the current question
//! POST   /quiz/previous                     - Go back one question
//! POST   /quiz/reset                        - Start over
//! GET    /quiz/questions                    - Question set
//! POST   /quiz/submit                       - Recommendations (delayed)
//! GET    /quiz/history                      - Past results, newest first
//! POST   /quiz/recommendations/{id}/cart    - Add a recommendation to the cart
//!
//! # Search
//! GET    /search?q=                         - Search trending products (delayed)
//! GET    /search/recent                     - Recent searches
//! DELETE /search/recent                     - Clear recent searches
//! GET    /search/trending                   - Trending products
//! ```

pub mod cart;
pub mod quiz;
pub mod search;

use axum::{
    Router,
    routing::{get, patch, post, put},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items", post(cart::add))
        .route("/items/{id}", patch(cart::update).delete(cart::remove))
        .route("/open", put(cart::set_open))
}

/// Create the quiz routes router.
pub fn quiz_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(quiz::show))
        .route("/answer", post(quiz::answer))
        .route("/previous", post(quiz::previous))
        .route("/reset", post(quiz::reset))
        .route("/questions", get(quiz::questions))
        .route("/submit", post(quiz::submit))
        .route("/history", get(quiz::history))
        .route("/recommendations/{id}/cart", post(quiz::add_to_cart))
}

/// Create the search routes router.
pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(search::search))
        .route("/recent", get(search::recent).delete(search::clear_recent))
        .route("/trending", get(search::trending))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/cart", cart_routes())
        .nest("/quiz", quiz_routes())
        .nest("/search", search_routes())
}
