//! Simulated response latency.
//!
//! Quiz and search results are computed instantly from in-memory lists, but
//! the storefront holds them back briefly so the loading state is visible.
//! The delay always completes; there is no cancellation.

use std::future::Future;
use std::time::Duration;

/// Run `work` after waiting `delay`.
///
/// A zero delay skips the timer entirely.
pub async fn delayed<F, T>(delay: Duration, work: F) -> T
where
    F: Future<Output = T>,
{
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    work.await
}
