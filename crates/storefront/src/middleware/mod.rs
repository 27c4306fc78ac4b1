//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with in-memory store)
//!
//! Route handlers reach the shopper's state through the [`Shopper`] extractor.

pub mod session;
pub mod shopper;

pub use session::create_session_layer;
pub use shopper::Shopper;
