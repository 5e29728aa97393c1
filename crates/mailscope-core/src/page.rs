//! Page request vocabulary.
//!
//! A [`PageKey`] routes a page request: which label scope, which page. It is
//! pure routing data with no behavior beyond equality and hashing.

use mailscope_engine::LabelScope;

/// Which page to load from a label-scoped paginator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageToLoad {
    /// The page at the paginator's current cursor.
    First,
    /// The page following the paginator's current cursor.
    Next,
    /// The complete current result set, discarding partial cursor state.
    All,
}

/// Routing key for a page request.
///
/// Two keys are equal iff label and mode match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageKey {
    /// Label scoping the query.
    pub label: LabelScope,
    /// Which page to load.
    pub mode: PageToLoad,
}

impl PageKey {
    /// Creates a page key.
    #[must_use]
    pub const fn new(label: LabelScope, mode: PageToLoad) -> Self {
        Self { label, mode }
    }

    /// Key requesting the first page of a label.
    #[must_use]
    pub fn first(label: impl Into<LabelScope>) -> Self {
        Self::new(label.into(), PageToLoad::First)
    }

    /// Key requesting the next page of a label.
    #[must_use]
    pub fn next(label: impl Into<LabelScope>) -> Self {
        Self::new(label.into(), PageToLoad::Next)
    }

    /// Key requesting the complete result set of a label.
    #[must_use]
    pub fn all(label: impl Into<LabelScope>) -> Self {
        Self::new(label.into(), PageToLoad::All)
    }
}
