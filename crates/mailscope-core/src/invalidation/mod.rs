//! Invalidation domains and the tracker republishing engine change signals.

mod domain;
mod tracker;

pub use domain::{DataDomain, DomainSet, PagerKind};
pub use tracker::{InvalidationEvent, InvalidationTracker};
