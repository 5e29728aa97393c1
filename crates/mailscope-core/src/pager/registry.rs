//! Paginator lease registry.

use std::collections::HashMap;
use std::sync::Arc;

use mailscope_engine::{
    EngineSession, LabelScope, LiveQueryCallback, MailEngine, Paginator, UserId,
};
use tokio::sync::Mutex;
use tracing::debug;

use super::lease::{LeaseState, PaginatorLease};
use crate::bridge::LeaseCallback;
use crate::error::{Error, Result};
use crate::invalidation::{InvalidationTracker, PagerKind};
use crate::mailbox;
use crate::page::{PageKey, PageToLoad};

/// Label-scoped paginator cache for one item type.
///
/// The registry owns at most one live paginator per user: the one scoped to
/// the label that user most recently requested. Requesting a different
/// label disconnects the previous lease and creates a fresh paginator with
/// its own live-query registration. Several registries (conversations,
/// messages, search) typically share one [`InvalidationTracker`] so
/// consumers observe a single notification stream.
pub struct PaginatorRegistry<E: MailEngine> {
    engine: Arc<E>,
    kind: PagerKind,
    tracker: InvalidationTracker,
    leases: Mutex<HashMap<UserId, PaginatorLease<E::Item>>>,
}

impl<E: MailEngine> PaginatorRegistry<E> {
    /// Creates a registry serving paginators of the given kind.
    pub fn new(engine: Arc<E>, kind: PagerKind, tracker: InvalidationTracker) -> Self {
        Self {
            engine,
            kind,
            tracker,
            leases: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the pager kind this registry serves.
    #[must_use]
    pub const fn kind(&self) -> PagerKind {
        self.kind
    }

    /// Returns the tracker this registry publishes invalidations to.
    #[must_use]
    pub const fn tracker(&self) -> &InvalidationTracker {
        &self.tracker
    }

    /// Serves a page request.
    ///
    /// Returns `Ok(None)` when the user has no session (logged-out state;
    /// nothing is created and no engine context is touched), `Ok(Some(_))`
    /// with the page the engine yielded — an empty vector is a successful
    /// empty page — or an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Engine`] when the engine rejects the switch,
    /// creation, or fetch, and [`Error::LeaseInvalidated`] when the lease
    /// was disconnected underneath the request (label switch or teardown
    /// racing the fetch).
    pub async fn get_page(&self, user_id: UserId, key: &PageKey) -> Result<Option<Vec<E::Item>>> {
        let Some(session) = self.engine.resolve_session(user_id).await else {
            debug!(user = %user_id, "no session; page request yields nothing");
            return Ok(None);
        };

        let (handle, state) = self.lease_for(&session, user_id, &key.label).await?;

        if !state.is_connected() {
            return Err(Error::LeaseInvalidated {
                label: key.label.clone(),
            });
        }
        let items = match key.mode {
            PageToLoad::First => handle.current_page().await?,
            PageToLoad::Next => handle.next_page().await?,
            PageToLoad::All => handle.reload().await?,
        };
        // a fetch that raced a disconnect must not be served as current data
        if !state.is_connected() {
            return Err(Error::LeaseInvalidated {
                label: key.label.clone(),
            });
        }
        state.clear_stale();
        Ok(Some(items))
    }

    /// Returns true if the user's current lease saw an engine update since
    /// its last successful fetch.
    ///
    /// Consumers decide whether to refetch; the registry never refetches on
    /// its own.
    pub async fn is_stale(&self, user_id: UserId) -> bool {
        self.leases
            .lock()
            .await
            .get(&user_id)
            .is_some_and(|lease| lease.state().is_stale())
    }

    /// Disconnects one user's lease, if any. Invoked on per-account logout.
    pub async fn disconnect_user(&self, user_id: UserId) {
        if let Some(lease) = self.leases.lock().await.remove(&user_id) {
            debug!(user = %user_id, label = %lease.label(), "disconnecting lease on logout");
            lease.disconnect();
        }
    }

    /// Disconnects every lease owned by this registry. Invoked on session
    /// end or app teardown. Safe to call more than once.
    pub async fn disconnect(&self) {
        let mut leases = self.leases.lock().await;
        for (user_id, lease) in leases.drain() {
            debug!(user = %user_id, label = %lease.label(), "disconnecting lease on teardown");
            lease.disconnect();
        }
    }

    /// Resolves the lease serving `label` for `user_id`, creating or
    /// replacing as needed.
    ///
    /// The whole sequence — context switch, lookup, disconnect-if-stale,
    /// create, store — runs under the registry lock, so concurrent requests
    /// for the same label create the underlying paginator at most once per
    /// label epoch, and a request for a new label can never observe a
    /// half-disconnected predecessor.
    async fn lease_for(
        &self,
        session: &EngineSession,
        user_id: UserId,
        label: &LabelScope,
    ) -> Result<(Arc<dyn Paginator<Item = E::Item>>, Arc<LeaseState>)> {
        let mut leases = self.leases.lock().await;

        mailbox::align_context(self.engine.as_ref(), session, label).await?;

        if let Some(lease) = leases.get(&user_id)
            && lease.label() == label
        {
            return Ok((lease.handle(), lease.state()));
        }

        if let Some(superseded) = leases.remove(&user_id) {
            debug!(
                user = %user_id,
                from = %superseded.label(),
                to = %label,
                "superseding lease for new label"
            );
            superseded.disconnect();
        }

        let state = Arc::new(LeaseState::new());
        let callback: Arc<dyn LiveQueryCallback> = Arc::new(LeaseCallback::new(
            self.kind,
            label.clone(),
            Arc::clone(&state),
            self.tracker.clone(),
        ));
        let handle = self.engine.create_paginator(session, label, callback).await?;
        debug!(user = %user_id, label = %label, "created paginator lease");

        let lease = PaginatorLease::new(label.clone(), handle, state);
        let resolved = (lease.handle(), lease.state());
        leases.insert(user_id, lease);
        Ok(resolved)
    }
}
