//! Shopper extractor.
//!
//! Resolves the cookie session to the shopper's live [`ShopperSession`],
//! assigning a new shopper ID on the first request.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use uuid::Uuid;

use super::session::session_keys;
use crate::error::AppError;
use crate::session::SessionHandle;
use crate::state::AppState;

/// The current shopper's ID and session.
///
/// # Example
///
/// ```rust,ignore
/// async fn cart_count(shopper: Shopper) -> String {
///     shopper.session.lock().await.cart.item_count().to_string()
/// }
/// ```
pub struct Shopper {
    pub id: Uuid,
    pub session: SessionHandle,
}

/// Read the shopper ID from the cookie session, assigning one if absent.
async fn shopper_id(session: &Session) -> Result<Uuid, AppError> {
    if let Some(id) = session.get::<Uuid>(session_keys::SHOPPER_ID).await? {
        return Ok(id);
    }

    let id = Uuid::new_v4();
    session.insert(session_keys::SHOPPER_ID, id).await?;
    tracing::debug!(shopper_id = %id, "Assigned new shopper ID");
    Ok(id)
}

impl FromRequestParts<AppState> for Shopper {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let id = shopper_id(&session).await?;
        let session = state.sessions().session(id).await;

        tracing::Span::current().record("shopper_id", tracing::field::display(id));
        Ok(Self { id, session })
    }
}
