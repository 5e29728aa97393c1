//! In-memory engine implementation.
//!
//! A deterministic, scriptable engine used by tests and development builds.
//! Pages are scripted per label, every engine call is recorded for ordering
//! assertions, and `fire_update` simulates the engine pushing a live-query
//! notification from its own context.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::paginator::{LiveQueryCallback, LiveQueryHandle, Paginator};
use crate::session::{EngineSession, MailEngine};
use crate::types::{LabelScope, UserId};

/// A recorded engine call.
///
/// The in-memory engine appends one entry per operation, in invocation
/// order. Tests assert against this log to verify call sequencing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    /// `resolve_session` was invoked for a user.
    ResolveSession(UserId),
    /// `switch_mailbox` was invoked for a user and label.
    SwitchMailbox(UserId, LabelScope),
    /// `create_paginator` was invoked for a user and label.
    CreatePaginator(UserId, LabelScope),
    /// `current_page` was invoked on a label's paginator.
    CurrentPage(LabelScope),
    /// `next_page` was invoked on a label's paginator.
    NextPage(LabelScope),
    /// `reload` was invoked on a label's paginator.
    Reload(LabelScope),
    /// A live query was disconnected (recorded once per registration).
    Disconnect(LabelScope),
}

struct LiveQueryRegistration {
    callback: Arc<dyn LiveQueryCallback>,
    connected: Arc<AtomicBool>,
}

struct Inner<T> {
    sessions: HashSet<UserId>,
    pages: HashMap<LabelScope, Vec<Vec<T>>>,
    live_queries: HashMap<LabelScope, Vec<LiveQueryRegistration>>,
    switch_error: Option<String>,
    create_error: Option<String>,
}

impl<T> Inner<T> {
    fn new() -> Self {
        Self {
            sessions: HashSet::new(),
            pages: HashMap::new(),
            live_queries: HashMap::new(),
            switch_error: None,
            create_error: None,
        }
    }
}

struct EngineState<T> {
    inner: RwLock<Inner<T>>,
    calls: Arc<Mutex<Vec<EngineCall>>>,
}

impl<T> EngineState<T> {
    fn record(&self, call: EngineCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

/// Scriptable in-memory engine.
///
/// Sessions exist for users added with [`log_in`](Self::log_in); page
/// content is scripted per label with [`set_pages`](Self::set_pages).
/// Switch and create failures can be injected once via
/// [`fail_next_switch`](Self::fail_next_switch) /
/// [`fail_next_create`](Self::fail_next_create).
pub struct InMemoryEngine<T> {
    state: Arc<EngineState<T>>,
}

impl<T> InMemoryEngine<T> {
    /// Creates an empty engine with no sessions and no pages.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(EngineState {
                inner: RwLock::new(Inner::new()),
                calls: Arc::new(Mutex::new(Vec::new())),
            }),
        }
    }

    /// Registers a session for a user.
    pub async fn log_in(&self, user_id: UserId) {
        self.state.inner.write().await.sessions.insert(user_id);
    }

    /// Removes a user's session. Existing session handles become invalid.
    pub async fn log_out(&self, user_id: UserId) {
        self.state.inner.write().await.sessions.remove(&user_id);
    }

    /// Scripts the pages served for a label.
    pub async fn set_pages(&self, label: LabelScope, pages: Vec<Vec<T>>) {
        self.state.inner.write().await.pages.insert(label, pages);
    }

    /// Makes the next `switch_mailbox` call fail with the given message.
    pub async fn fail_next_switch(&self, message: impl Into<String>) {
        self.state.inner.write().await.switch_error = Some(message.into());
    }

    /// Makes the next `create_paginator` call fail with the given message.
    pub async fn fail_next_create(&self, message: impl Into<String>) {
        self.state.inner.write().await.create_error = Some(message.into());
    }

    /// Simulates the engine pushing a data-change notification for a label.
    ///
    /// Invokes every still-connected callback registered for the label and
    /// returns how many were invoked. Callbacks run outside the engine lock,
    /// mirroring delivery from the engine's own context.
    pub async fn fire_update(&self, label: &LabelScope) -> usize {
        let callbacks: Vec<Arc<dyn LiveQueryCallback>> = {
            let inner = self.state.inner.read().await;
            inner
                .live_queries
                .get(label)
                .map(|regs| {
                    regs.iter()
                        .filter(|reg| reg.connected.load(Ordering::SeqCst))
                        .map(|reg| Arc::clone(&reg.callback))
                        .collect()
                })
                .unwrap_or_default()
        };
        debug!(label = %label, count = callbacks.len(), "firing live-query update");
        for callback in &callbacks {
            callback.on_update();
        }
        callbacks.len()
    }

    /// Returns the number of still-connected live queries for a label.
    pub async fn active_live_queries(&self, label: &LabelScope) -> usize {
        self.state
            .inner
            .read()
            .await
            .live_queries
            .get(label)
            .map(|regs| {
                regs.iter()
                    .filter(|reg| reg.connected.load(Ordering::SeqCst))
                    .count()
            })
            .unwrap_or_default()
    }

    /// Returns a snapshot of the recorded call log.
    #[must_use]
    pub fn calls(&self) -> Vec<EngineCall> {
        self.state
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clears the recorded call log.
    pub fn clear_calls(&self) {
        self.state
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl<T> Default for InMemoryEngine<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> MailEngine for InMemoryEngine<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Item = T;

    async fn resolve_session(&self, user_id: UserId) -> Option<EngineSession> {
        self.state.record(EngineCall::ResolveSession(user_id));
        let inner = self.state.inner.read().await;
        inner
            .sessions
            .contains(&user_id)
            .then(|| EngineSession::new(user_id))
    }

    async fn switch_mailbox(
        &self,
        session: &EngineSession,
        label: &LabelScope,
    ) -> EngineResult<()> {
        self.state
            .record(EngineCall::SwitchMailbox(session.user_id(), label.clone()));
        let mut inner = self.state.inner.write().await;
        if let Some(message) = inner.switch_error.take() {
            return Err(EngineError::MailboxSwitch(message));
        }
        if !inner.sessions.contains(&session.user_id()) {
            return Err(EngineError::MailboxSwitch(format!(
                "session for user {} is no longer valid",
                session.user_id()
            )));
        }
        Ok(())
    }

    async fn create_paginator(
        &self,
        session: &EngineSession,
        label: &LabelScope,
        on_update: Arc<dyn LiveQueryCallback>,
    ) -> EngineResult<Arc<dyn Paginator<Item = T>>> {
        self.state
            .record(EngineCall::CreatePaginator(session.user_id(), label.clone()));
        let mut inner = self.state.inner.write().await;
        if let Some(message) = inner.create_error.take() {
            return Err(EngineError::PaginatorCreate(message));
        }
        if !inner.sessions.contains(&session.user_id()) {
            return Err(EngineError::PaginatorCreate(format!(
                "session for user {} is no longer valid",
                session.user_id()
            )));
        }

        let connected = Arc::new(AtomicBool::new(true));
        inner
            .live_queries
            .entry(label.clone())
            .or_default()
            .push(LiveQueryRegistration {
                callback: on_update,
                connected: Arc::clone(&connected),
            });

        let live_query = Arc::new(MemoryLiveQuery {
            label: label.clone(),
            connected,
            calls: Arc::clone(&self.state.calls),
        });
        Ok(Arc::new(MemoryPaginator {
            label: label.clone(),
            state: Arc::clone(&self.state),
            cursor: Mutex::new(0),
            live_query,
        }))
    }
}

struct MemoryLiveQuery {
    label: LabelScope,
    connected: Arc<AtomicBool>,
    calls: Arc<Mutex<Vec<EngineCall>>>,
}

impl LiveQueryHandle for MemoryLiveQuery {
    fn disconnect(&self) {
        // swap keeps teardown races to a single recorded disconnect
        if self.connected.swap(false, Ordering::SeqCst) {
            self.calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(EngineCall::Disconnect(self.label.clone()));
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

struct MemoryPaginator<T> {
    label: LabelScope,
    state: Arc<EngineState<T>>,
    cursor: Mutex<usize>,
    live_query: Arc<MemoryLiveQuery>,
}

impl<T: Clone> MemoryPaginator<T> {
    fn guard_connected(&self) -> EngineResult<()> {
        if self.live_query.is_connected() {
            Ok(())
        } else {
            Err(EngineError::PaginatorDisconnected)
        }
    }

    fn cursor_position(&self) -> usize {
        *self.cursor.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn page_at(&self, index: usize) -> Vec<T> {
        let inner = self.state.inner.read().await;
        inner
            .pages
            .get(&self.label)
            .and_then(|pages| pages.get(index))
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl<T> Paginator for MemoryPaginator<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Item = T;

    async fn current_page(&self) -> EngineResult<Vec<T>> {
        self.state.record(EngineCall::CurrentPage(self.label.clone()));
        self.guard_connected()?;
        let position = self.cursor_position();
        Ok(self.page_at(position).await)
    }

    async fn next_page(&self) -> EngineResult<Vec<T>> {
        self.state.record(EngineCall::NextPage(self.label.clone()));
        self.guard_connected()?;
        let position = {
            let mut cursor = self.cursor.lock().unwrap_or_else(PoisonError::into_inner);
            *cursor += 1;
            *cursor
        };
        Ok(self.page_at(position).await)
    }

    async fn reload(&self) -> EngineResult<Vec<T>> {
        self.state.record(EngineCall::Reload(self.label.clone()));
        self.guard_connected()?;
        {
            let mut cursor = self.cursor.lock().unwrap_or_else(PoisonError::into_inner);
            *cursor = 0;
        }
        let inner = self.state.inner.read().await;
        Ok(inner
            .pages
            .get(&self.label)
            .map(|pages| pages.iter().flatten().cloned().collect())
            .unwrap_or_default())
    }

    fn live_query(&self) -> Arc<dyn LiveQueryHandle> {
        self.live_query.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    struct CountingCallback {
        fired: AtomicUsize,
    }

    impl CountingCallback {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                fired: AtomicUsize::new(0),
            })
        }

        fn count(&self) -> usize {
            self.fired.load(Ordering::SeqCst)
        }
    }

    impl LiveQueryCallback for CountingCallback {
        fn on_update(&self) {
            self.fired.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn inbox() -> LabelScope {
        LabelScope::new("INBOX")
    }

    #[tokio::test]
    async fn resolve_session_requires_login() {
        let engine = InMemoryEngine::<String>::new();
        assert!(engine.resolve_session(UserId::new(1)).await.is_none());

        engine.log_in(UserId::new(1)).await;
        let session = engine.resolve_session(UserId::new(1)).await.unwrap();
        assert_eq!(session.user_id(), UserId::new(1));

        engine.log_out(UserId::new(1)).await;
        assert!(engine.resolve_session(UserId::new(1)).await.is_none());
    }

    #[tokio::test]
    async fn paginator_walks_scripted_pages() {
        let engine = InMemoryEngine::new();
        engine.log_in(UserId::new(1)).await;
        engine
            .set_pages(
                inbox(),
                vec![vec!["a".to_string(), "b".to_string()], vec!["c".to_string()]],
            )
            .await;

        let session = engine.resolve_session(UserId::new(1)).await.unwrap();
        let paginator = engine
            .create_paginator(&session, &inbox(), CountingCallback::new())
            .await
            .unwrap();

        assert_eq!(paginator.current_page().await.unwrap(), vec!["a", "b"]);
        assert_eq!(paginator.next_page().await.unwrap(), vec!["c"]);
        // past the last page the engine serves empty pages
        assert!(paginator.next_page().await.unwrap().is_empty());

        // reload resets the cursor and returns everything
        assert_eq!(paginator.reload().await.unwrap(), vec!["a", "b", "c"]);
        assert_eq!(paginator.current_page().await.unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn disconnect_is_idempotent_and_blocks_fetches() {
        let engine = InMemoryEngine::new();
        engine.log_in(UserId::new(1)).await;
        engine.set_pages(inbox(), vec![vec!["a".to_string()]]).await;

        let session = engine.resolve_session(UserId::new(1)).await.unwrap();
        let paginator = engine
            .create_paginator(&session, &inbox(), CountingCallback::new())
            .await
            .unwrap();

        paginator.live_query().disconnect();
        paginator.live_query().disconnect();

        let disconnects = engine
            .calls()
            .into_iter()
            .filter(|call| matches!(call, EngineCall::Disconnect(_)))
            .count();
        assert_eq!(disconnects, 1);

        assert!(matches!(
            paginator.current_page().await,
            Err(EngineError::PaginatorDisconnected)
        ));
    }

    #[tokio::test]
    async fn fire_update_reaches_only_connected_callbacks() {
        let engine = InMemoryEngine::new();
        engine.log_in(UserId::new(1)).await;
        engine.set_pages(inbox(), vec![vec!["a".to_string()]]).await;
        let session = engine.resolve_session(UserId::new(1)).await.unwrap();

        let first = CountingCallback::new();
        let second = CountingCallback::new();
        let first_callback: Arc<dyn LiveQueryCallback> = first.clone();
        let stale = engine
            .create_paginator(&session, &inbox(), first_callback)
            .await
            .unwrap();
        let second_callback: Arc<dyn LiveQueryCallback> = second.clone();
        let _live = engine
            .create_paginator(&session, &inbox(), second_callback)
            .await
            .unwrap();

        assert_eq!(engine.fire_update(&inbox()).await, 2);

        stale.live_query().disconnect();
        assert_eq!(engine.fire_update(&inbox()).await, 1);
        assert_eq!(engine.active_live_queries(&inbox()).await, 1);

        assert_eq!(first.count(), 1);
        assert_eq!(second.count(), 2);
    }

    #[tokio::test]
    async fn injected_failures_fire_once() {
        let engine = InMemoryEngine::<String>::new();
        engine.log_in(UserId::new(1)).await;
        let session = engine.resolve_session(UserId::new(1)).await.unwrap();

        engine.fail_next_switch("link down").await;
        assert!(matches!(
            engine.switch_mailbox(&session, &inbox()).await,
            Err(EngineError::MailboxSwitch(message)) if message == "link down"
        ));
        assert!(engine.switch_mailbox(&session, &inbox()).await.is_ok());

        engine.fail_next_create("out of cursors").await;
        assert!(matches!(
            engine
                .create_paginator(&session, &inbox(), CountingCallback::new())
                .await
                .map(|_| ()),
            Err(EngineError::PaginatorCreate(message)) if message == "out of cursors"
        ));
    }

    #[tokio::test]
    async fn stale_session_handles_are_rejected() {
        let engine = InMemoryEngine::<String>::new();
        engine.log_in(UserId::new(1)).await;
        let session = engine.resolve_session(UserId::new(1)).await.unwrap();
        engine.log_out(UserId::new(1)).await;

        assert!(matches!(
            engine.switch_mailbox(&session, &inbox()).await,
            Err(EngineError::MailboxSwitch(_))
        ));
        assert!(matches!(
            engine
                .create_paginator(&session, &inbox(), CountingCallback::new())
                .await
                .map(|_| ()),
            Err(EngineError::PaginatorCreate(_))
        ));
    }

    #[tokio::test]
    async fn call_log_preserves_order() {
        let engine = InMemoryEngine::new();
        engine.log_in(UserId::new(1)).await;
        engine.set_pages(inbox(), vec![vec!["a".to_string()]]).await;

        let session = engine.resolve_session(UserId::new(1)).await.unwrap();
        engine.switch_mailbox(&session, &inbox()).await.unwrap();
        let paginator = engine
            .create_paginator(&session, &inbox(), CountingCallback::new())
            .await
            .unwrap();
        paginator.current_page().await.unwrap();

        assert_eq!(
            engine.calls(),
            vec![
                EngineCall::ResolveSession(UserId::new(1)),
                EngineCall::SwitchMailbox(UserId::new(1), inbox()),
                EngineCall::CreatePaginator(UserId::new(1), inbox()),
                EngineCall::CurrentPage(inbox()),
            ]
        );
    }
}
