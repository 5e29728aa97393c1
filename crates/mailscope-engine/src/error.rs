//! Error types for the engine boundary.

use thiserror::Error;

/// Errors surfaced by the mailbox engine.
///
/// Each variant wraps the diagnostic detail the engine reported for the
/// failing operation. Session absence is not an error: `resolve_session`
/// returns `None` for a logged-out user.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Switching the engine's mailbox context failed.
    #[error("mailbox switch failed: {0}")]
    MailboxSwitch(String),

    /// Creating a paginator for a label failed.
    #[error("paginator creation failed: {0}")]
    PaginatorCreate(String),

    /// Fetching a page from a paginator failed.
    #[error("page fetch failed: {0}")]
    PageFetch(String),

    /// A page was requested from a paginator whose live query has been
    /// disconnected.
    #[error("paginator is disconnected")]
    PaginatorDisconnected,
}

/// Result type alias using [`EngineError`].
pub type EngineResult<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_detail() {
        let err = EngineError::MailboxSwitch("context lost".to_string());
        assert_eq!(format!("{err}"), "mailbox switch failed: context lost");
    }

    #[test]
    fn disconnected_display() {
        let err = EngineError::PaginatorDisconnected;
        assert_eq!(format!("{err}"), "paginator is disconnected");
    }
}
