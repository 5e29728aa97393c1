//! Engine session and the mailbox engine contract.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::EngineResult;
use crate::paginator::{LiveQueryCallback, Paginator};
use crate::types::{LabelScope, UserId};

/// Opaque handle to an engine session for one user.
///
/// A session is only valid while the user is logged in; the engine may
/// invalidate it at any time, in which case operations against it fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSession {
    user_id: UserId,
}

impl EngineSession {
    /// Creates a session handle for a user.
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    /// Returns the user this session belongs to.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }
}

/// The mailbox/session engine consumed by the cache layer.
///
/// The engine owns sessions, the active mailbox context, and all query
/// cursors. The cache layer never mutates engine state other than through
/// `switch_mailbox`, which is idempotent on the engine side.
#[async_trait]
pub trait MailEngine: Send + Sync {
    /// Item type yielded by this engine's paginators.
    type Item: Send + 'static;

    /// Resolves the session for a user.
    ///
    /// Returns `None` when no session exists (logged-out state). This is a
    /// normal, retryable condition, not a failure.
    async fn resolve_session(&self, user_id: UserId) -> Option<EngineSession>;

    /// Points the engine's active mailbox context at the given label.
    ///
    /// Idempotent: re-switching to the current label is a no-op on the
    /// engine side.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the switch, e.g. because the
    /// session has been invalidated.
    async fn switch_mailbox(
        &self,
        session: &EngineSession,
        label: &LabelScope,
    ) -> EngineResult<()>;

    /// Creates a paginator scoped to a label, registering `on_update` as
    /// its live-query callback.
    ///
    /// The callback may fire from the engine's own execution context any
    /// time after this call returns, until the paginator's live query is
    /// disconnected.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot create the paginator.
    async fn create_paginator(
        &self,
        session: &EngineSession,
        label: &LabelScope,
        on_update: Arc<dyn LiveQueryCallback>,
    ) -> EngineResult<Arc<dyn Paginator<Item = Self::Item>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_reports_user() {
        let session = EngineSession::new(UserId::new(7));
        assert_eq!(session.user_id(), UserId::new(7));
    }

    #[test]
    fn session_equality() {
        assert_eq!(
            EngineSession::new(UserId::new(1)),
            EngineSession::new(UserId::new(1))
        );
        assert_ne!(
            EngineSession::new(UserId::new(1)),
            EngineSession::new(UserId::new(2))
        );
    }
}
