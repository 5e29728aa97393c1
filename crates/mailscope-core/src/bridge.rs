//! Live-query bridge.
//!
//! Adapts the engine's push callbacks to the invalidation tracker. One
//! callback is created per lease and never shared, so a callback that
//! outlives its lease (the engine may still hold it briefly after a
//! disconnect) can recognize the race and drop the signal.

use std::sync::Arc;

use mailscope_engine::{LabelScope, LiveQueryCallback};
use tracing::{debug, trace};

use crate::invalidation::{InvalidationTracker, PagerKind};
use crate::pager::LeaseState;

/// Per-lease callback registered with the engine's live query.
///
/// Runs on the engine's execution context. It does not re-fetch pages: it
/// marks the lease stale and posts the kind-tagged event onto the tracker's
/// channel, where consumers pick it up on their own tasks.
pub(crate) struct LeaseCallback {
    kind: PagerKind,
    label: LabelScope,
    state: Arc<LeaseState>,
    tracker: InvalidationTracker,
}

impl LeaseCallback {
    pub(crate) fn new(
        kind: PagerKind,
        label: LabelScope,
        state: Arc<LeaseState>,
        tracker: InvalidationTracker,
    ) -> Self {
        Self {
            kind,
            label,
            state,
            tracker,
        }
    }
}

impl LiveQueryCallback for LeaseCallback {
    fn on_update(&self) {
        if !self.state.is_connected() {
            debug!(label = %self.label, "dropping update from superseded lease");
            return;
        }
        self.state.mark_stale();
        trace!(label = %self.label, kind = ?self.kind, "republishing engine update");
        self.tracker.notify(self.kind.invalidation_domains());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::invalidation::DataDomain;

    fn callback(kind: PagerKind) -> (LeaseCallback, Arc<LeaseState>, InvalidationTracker) {
        let state = Arc::new(LeaseState::new());
        let tracker = InvalidationTracker::new(8);
        let callback = LeaseCallback::new(
            kind,
            LabelScope::new("INBOX"),
            Arc::clone(&state),
            tracker.clone(),
        );
        (callback, state, tracker)
    }

    #[tokio::test]
    async fn update_marks_stale_and_publishes_tagged_event() {
        let (callback, state, tracker) = callback(PagerKind::Conversations);
        let mut receiver = tracker.subscribe();

        callback.on_update();

        assert!(state.is_stale());
        let event = receiver.recv().await.unwrap();
        assert!(event.domains.contains(DataDomain::Conversations));
        assert!(event.domains.contains(DataDomain::Labels));
    }

    #[tokio::test]
    async fn update_after_disconnect_is_dropped() {
        let (callback, state, tracker) = callback(PagerKind::Messages);
        let mut receiver = tracker.subscribe();

        state.mark_disconnected();
        callback.on_update();

        assert!(!state.is_stale());
        assert!(receiver.try_recv().is_err());
    }
}
