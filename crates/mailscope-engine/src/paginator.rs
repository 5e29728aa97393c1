//! Paginator and live-query contracts.
//!
//! A paginator is an engine-side cursor over one label's items. Alongside
//! each paginator the engine registers a live query: a push channel through
//! which it reports that the underlying data changed. Both are handed to the
//! cache layer as trait objects; the engine owns the actual cursors.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::EngineResult;

/// Engine-side cursor yielding pages of items for one label.
///
/// `current_page` returns the page at the cursor without advancing it,
/// `next_page` advances the cursor and returns the page it lands on, and
/// `reload` resets the cursor and returns the complete current result set.
/// All calls after the live query has been disconnected fail with
/// [`EngineError::PaginatorDisconnected`](crate::EngineError::PaginatorDisconnected).
#[async_trait]
pub trait Paginator: Send + Sync {
    /// Item type yielded by this paginator.
    type Item;

    /// Returns the page at the current cursor position.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the fetch or the paginator is
    /// disconnected.
    async fn current_page(&self) -> EngineResult<Vec<Self::Item>>;

    /// Advances the cursor and returns the next page.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the fetch or the paginator is
    /// disconnected.
    async fn next_page(&self) -> EngineResult<Vec<Self::Item>>;

    /// Resets the cursor and returns the complete current result set.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the fetch or the paginator is
    /// disconnected.
    async fn reload(&self) -> EngineResult<Vec<Self::Item>>;

    /// Returns the live-query handle registered with this paginator.
    fn live_query(&self) -> Arc<dyn LiveQueryHandle>;
}

/// Handle for a live-query registration.
///
/// `disconnect` is idempotent: the first call tears the registration down,
/// later calls are no-ops. Teardown races (label switch versus app teardown)
/// are expected and must not fail.
pub trait LiveQueryHandle: Send + Sync {
    /// Disconnects the live query. Safe to call more than once.
    fn disconnect(&self);

    /// Returns true while the live query is still connected.
    fn is_connected(&self) -> bool;
}

/// Callback invoked by the engine when a live query observes a data change.
///
/// The engine calls `on_update` from its own execution context, possibly
/// concurrently with in-flight page fetches. Implementations must only hand
/// the signal off; they must not run consumer code inline.
pub trait LiveQueryCallback: Send + Sync {
    /// Called by the engine after the underlying data changed.
    fn on_update(&self);
}
