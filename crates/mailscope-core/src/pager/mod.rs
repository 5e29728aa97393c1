//! Paginator lease registry and leases.

mod lease;
mod registry;

pub(crate) use lease::LeaseState;
pub use registry::PaginatorRegistry;
