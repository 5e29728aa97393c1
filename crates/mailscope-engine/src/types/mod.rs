//! Engine type definitions.

mod identifiers;

pub use identifiers::{LabelScope, UserId};
