//! Paginator leases.
//!
//! A lease is the registry's record of one live paginator: the engine
//! handle, the live-query registration, and the flags shared with the
//! lease's bridge callback.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use mailscope_engine::{LabelScope, Paginator};
use tracing::debug;

/// Flags shared between a lease and its live-query bridge callback.
///
/// `disconnected` makes teardown exactly-once and lets a stale callback
/// recognize it outlived its lease; `stale` records that the engine
/// reported a data change since the last successful fetch.
#[derive(Debug, Default)]
pub(crate) struct LeaseState {
    disconnected: AtomicBool,
    stale: AtomicBool,
}

impl LeaseState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns true while the lease has not been disconnected.
    pub(crate) fn is_connected(&self) -> bool {
        !self.disconnected.load(Ordering::SeqCst)
    }

    /// Marks the lease disconnected. Returns true for the call that made
    /// the transition; later calls return false.
    pub(crate) fn mark_disconnected(&self) -> bool {
        !self.disconnected.swap(true, Ordering::SeqCst)
    }

    pub(crate) fn mark_stale(&self) {
        self.stale.store(true, Ordering::SeqCst);
    }

    pub(crate) fn clear_stale(&self) {
        self.stale.store(false, Ordering::SeqCst);
    }

    pub(crate) fn is_stale(&self) -> bool {
        self.stale.load(Ordering::SeqCst)
    }
}

/// An active paginator owned by the registry for one (user, label) scope.
pub(crate) struct PaginatorLease<T> {
    label: LabelScope,
    handle: Arc<dyn Paginator<Item = T>>,
    state: Arc<LeaseState>,
    created_at: DateTime<Utc>,
}

impl<T> PaginatorLease<T> {
    pub(crate) fn new(
        label: LabelScope,
        handle: Arc<dyn Paginator<Item = T>>,
        state: Arc<LeaseState>,
    ) -> Self {
        Self {
            label,
            handle,
            state,
            created_at: Utc::now(),
        }
    }

    pub(crate) fn label(&self) -> &LabelScope {
        &self.label
    }

    pub(crate) fn handle(&self) -> Arc<dyn Paginator<Item = T>> {
        Arc::clone(&self.handle)
    }

    pub(crate) fn state(&self) -> Arc<LeaseState> {
        Arc::clone(&self.state)
    }

    /// Disconnects the lease's live query, exactly once.
    ///
    /// Safe to call repeatedly; only the first call reaches the engine.
    /// In-flight fetches holding this lease's handle observe the
    /// disconnected state and fail instead of serving stale data.
    pub(crate) fn disconnect(&self) {
        if self.state.mark_disconnected() {
            self.handle.live_query().disconnect();
            debug!(
                label = %self.label,
                lived_for = %(Utc::now() - self.created_at),
                "disconnected paginator lease"
            );
        }
    }
}
