//! # mailscope-engine
//!
//! The engine boundary for mailscope. The mailbox/session engine is an
//! external collaborator (a native library behind generated bindings in the
//! shipping app); this crate pins down the contract the cache layer consumes:
//!
//! - **Sessions**: [`MailEngine::resolve_session`] resolves a per-user
//!   session or reports the logged-out state.
//! - **Mailbox context**: [`MailEngine::switch_mailbox`] re-points the
//!   engine's active query context at a label (idempotent).
//! - **Paginators**: [`MailEngine::create_paginator`] builds a label-scoped
//!   cursor ([`Paginator`]) with a registered live-query callback.
//! - **Live queries**: [`LiveQueryHandle`] / [`LiveQueryCallback`] carry the
//!   engine's push notifications; disconnect is idempotent.
//!
//! [`InMemoryEngine`] is a deterministic, scriptable implementation of the
//! contract used by tests and development builds. It records every call so
//! tests can assert ordering (switch-before-create, single creation per
//! label, and so on).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
pub mod memory;
pub mod model;
mod paginator;
mod session;
pub mod types;

pub use error::{EngineError, EngineResult};
pub use memory::{EngineCall, InMemoryEngine};
pub use model::{ConversationSummary, MessageSummary};
pub use paginator::{LiveQueryCallback, LiveQueryHandle, Paginator};
pub use session::{EngineSession, MailEngine};
pub use types::{LabelScope, UserId};
