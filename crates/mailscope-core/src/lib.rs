//! # mailscope-core
//!
//! Label-scoped paginated live-query cache over the mailscope engine
//! boundary. The engine exposes a callback-driven, cursor-based query
//! primitive; this crate turns it into a stable pagination service:
//!
//! - **Page protocol** ([`PageKey`], [`PageToLoad`]): the request
//!   vocabulary — which label, which page.
//! - **Mailbox switch gate** ([`mailbox`]): re-points the engine's query
//!   context at the requested label before every paginator operation.
//! - **Paginator lease registry** ([`PaginatorRegistry`]): owns at most one
//!   live paginator per user and label scope, reusing it across requests
//!   and replacing it when the label changes.
//! - **Invalidation tracker** ([`InvalidationTracker`]): republishes engine
//!   change signals as a multicast stream of [`InvalidationEvent`]s tagged
//!   with the affected [`DataDomain`]s.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use mailscope_core::{InvalidationTracker, PageKey, PagerConfig, PagerKind, PaginatorRegistry};
//! use mailscope_engine::UserId;
//!
//! # async fn run(engine: Arc<impl mailscope_engine::MailEngine>) -> mailscope_core::Result<()> {
//! let tracker = InvalidationTracker::new(PagerConfig::default().invalidation_capacity);
//! let conversations = PaginatorRegistry::new(engine, PagerKind::Conversations, tracker.clone());
//!
//! // consumers watch one stream for staleness, re-querying as they see fit
//! let mut invalidations = tracker.subscribe();
//!
//! let user = UserId::new(1);
//! let inbox_page = conversations.get_page(user, &PageKey::first("INBOX")).await?;
//! match inbox_page {
//!     Some(items) => println!("{} conversations", items.len()),
//!     None => println!("logged out; try again later"),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod bridge;
mod config;
mod error;
pub mod invalidation;
pub mod mailbox;
mod page;
pub mod pager;

pub use config::PagerConfig;
pub use error::{Error, Result};
pub use invalidation::{DataDomain, DomainSet, InvalidationEvent, InvalidationTracker, PagerKind};
pub use page::{PageKey, PageToLoad};
pub use pager::PaginatorRegistry;
