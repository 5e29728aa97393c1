//! Invalidation tracker.
//!
//! Translates engine-pushed change signals into a typed notification stream.
//! The tracker is a pure relay: no deduplication, no coalescing, no state.
//! Consumers that want to debounce own that policy.

use tokio::sync::broadcast;
use tracing::trace;

use super::domain::DomainSet;

/// A data-change notification tagged with the affected domains.
///
/// Events carry no payload data; consumers re-query whatever they need from
/// the domains marked stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationEvent {
    /// Domains marked stale by this event.
    pub domains: DomainSet,
}

/// Multicast relay for invalidation events.
///
/// Cloning a tracker shares the underlying channel: registries for several
/// pager kinds publish into one stream, and every subscriber observes every
/// event published after it subscribed. Publishing is safe from any thread,
/// including the engine's callback context; subscribers consume on their
/// own tasks.
#[derive(Debug, Clone)]
pub struct InvalidationTracker {
    sender: broadcast::Sender<InvalidationEvent>,
}

impl InvalidationTracker {
    /// Creates a tracker whose channel buffers up to `capacity` events per
    /// subscriber before the slowest subscriber starts lagging.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to the notification stream.
    ///
    /// The stream never completes while the tracker is alive.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<InvalidationEvent> {
        self.sender.subscribe()
    }

    /// Publishes an invalidation for the given domains.
    ///
    /// Fire-and-forget: an event published while nobody is subscribed is
    /// dropped.
    pub fn notify(&self, domains: DomainSet) {
        if self.sender.send(InvalidationEvent { domains }).is_err() {
            trace!("invalidation event dropped: no subscribers");
        }
    }
}

impl Default for InvalidationTracker {
    fn default() -> Self {
        Self::new(crate::config::PagerConfig::default().invalidation_capacity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::domain::DataDomain;
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let tracker = InvalidationTracker::new(8);
        let mut receiver = tracker.subscribe();

        tracker.notify(DomainSet::from_vec(vec![DataDomain::Conversations]));

        let event = receiver.recv().await.unwrap();
        assert!(event.domains.contains(DataDomain::Conversations));
        assert_eq!(event.domains.len(), 1);
    }

    #[tokio::test]
    async fn every_subscriber_observes_every_event() {
        let tracker = InvalidationTracker::new(8);
        let mut first = tracker.subscribe();
        let mut second = tracker.subscribe();

        tracker.notify(DomainSet::from_vec(vec![DataDomain::Labels]));

        assert_eq!(first.recv().await.unwrap(), second.recv().await.unwrap());
    }

    #[tokio::test]
    async fn clones_share_the_stream() {
        let tracker = InvalidationTracker::new(8);
        let publisher = tracker.clone();
        let mut receiver = tracker.subscribe();

        publisher.notify(DomainSet::from_vec(vec![DataDomain::Messages]));

        let event = receiver.recv().await.unwrap();
        assert!(event.domains.contains(DataDomain::Messages));
    }

    #[test]
    fn notify_without_subscribers_is_fine() {
        let tracker = InvalidationTracker::new(8);
        tracker.notify(DomainSet::from_vec(vec![DataDomain::Conversations]));
    }
}
