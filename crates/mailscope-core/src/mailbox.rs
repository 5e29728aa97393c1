//! Mailbox switch gate.
//!
//! Before any paginator operation, the engine's active query context must
//! point at the requested label. The gate issues the switch unconditionally
//! on every request: the engine is authoritative and external actors can
//! move its cursor between our calls, so a locally cached "current label"
//! would be a guess. The switch is idempotent on the engine side.

use mailscope_engine::{EngineResult, EngineSession, LabelScope, MailEngine};
use tracing::trace;

/// Points the engine's mailbox context at `label` for the session's user.
///
/// Stateless: the gate retains nothing; the engine's context is the only
/// record of the active label.
///
/// # Errors
///
/// Returns an error if the engine rejects the switch, e.g. because the
/// session has been invalidated.
pub async fn align_context<E>(
    engine: &E,
    session: &EngineSession,
    label: &LabelScope,
) -> EngineResult<()>
where
    E: MailEngine + ?Sized,
{
    trace!(user = %session.user_id(), label = %label, "switching mailbox context");
    engine.switch_mailbox(session, label).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mailscope_engine::{EngineCall, EngineError, InMemoryEngine, UserId};

    use super::*;

    #[tokio::test]
    async fn issues_switch_for_requested_label() {
        let engine = InMemoryEngine::<String>::new();
        engine.log_in(UserId::new(1)).await;
        let session = engine.resolve_session(UserId::new(1)).await.unwrap();

        align_context(&engine, &session, &LabelScope::new("ARCHIVE"))
            .await
            .unwrap();

        assert!(engine.calls().contains(&EngineCall::SwitchMailbox(
            UserId::new(1),
            LabelScope::new("ARCHIVE")
        )));
    }

    #[tokio::test]
    async fn switches_again_even_for_the_same_label() {
        let engine = InMemoryEngine::<String>::new();
        engine.log_in(UserId::new(1)).await;
        let session = engine.resolve_session(UserId::new(1)).await.unwrap();
        let inbox = LabelScope::new("INBOX");

        align_context(&engine, &session, &inbox).await.unwrap();
        align_context(&engine, &session, &inbox).await.unwrap();

        let switches = engine
            .calls()
            .into_iter()
            .filter(|call| matches!(call, EngineCall::SwitchMailbox(_, _)))
            .count();
        assert_eq!(switches, 2);
    }

    #[tokio::test]
    async fn propagates_engine_failures() {
        let engine = InMemoryEngine::<String>::new();
        engine.log_in(UserId::new(1)).await;
        let session = engine.resolve_session(UserId::new(1)).await.unwrap();
        engine.fail_next_switch("context lost").await;

        let result = align_context(&engine, &session, &LabelScope::new("INBOX")).await;
        assert!(matches!(result, Err(EngineError::MailboxSwitch(_))));
    }
}
