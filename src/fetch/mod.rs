//! # Assay Fetch Capability
//!
//! The one contract between the resolver and the outside world: given a
//! dataset uuid, return its assay name and hints. Everything else the
//! resolver needs arrives in the [`EntityRef`](crate::EntityRef) itself.
//!
//! ## Implementations
//!
//! | Implementation | Module | Description |
//! |----------------|--------|-------------|
//! | `MemoryCatalog` | `memory` | In-memory map, for tests and embedding |
//! | any `Fn(&str) -> Result<AssayDescriptor>` | - | Ad-hoc closures over a host client |
//!
//! The REST client that talks to the real assay-type service belongs to the
//! host. Whatever it returns, errors included, reaches the caller of
//! [`Resolver::resolve`](crate::Resolver::resolve) unchanged.

pub mod memory;

use crate::model::AssayDescriptor;
use crate::Result;

pub use memory::MemoryCatalog;

/// Fetch assay metadata for a dataset uuid.
///
/// Calls are blocking from the resolver's point of view. The resolver never
/// retries, times out, or swallows a failure.
pub trait AssayFetch {
    fn fetch_assay(&self, uuid: &str) -> Result<AssayDescriptor>;
}

impl<F> AssayFetch for F
where
    F: Fn(&str) -> Result<AssayDescriptor>,
{
    fn fetch_assay(&self, uuid: &str) -> Result<AssayDescriptor> {
        self(uuid)
    }
}

/// A fetch capability for callers that know no lookup will be needed.
/// Every call fails with `NotFound`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFetch;

impl AssayFetch for NoFetch {
    fn fetch_assay(&self, uuid: &str) -> Result<AssayDescriptor> {
        Err(crate::Error::NotFound(format!("assay for {uuid} (no fetch capability)")))
    }
}
