//! Core engine identifiers.
//!
//! Types for users and label scopes. Both are opaque to the cache layer:
//! the engine mints them, the cache only compares and hashes them.

/// Identifier for a mail account/user known to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl UserId {
    /// Creates a new user identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for a mailbox label/folder scoping a query.
///
/// Labels are engine-assigned strings (e.g. `"INBOX"`, `"ARCHIVE"`, or a
/// provider-specific id). The cache layer uses them as cache keys and never
/// interprets their content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LabelScope(pub String);

impl LabelScope {
    /// Creates a new label scope from a string.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LabelScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LabelScope {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}
