//! In-memory assay catalog.
//!
//! This is the reference implementation of `AssayFetch`.
//! It uses a HashMap protected by a RwLock, and counts every fetch so tests
//! can assert how often the resolver reached outside.
//!
//! Clones share the same catalog and counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;

use super::AssayFetch;
use crate::model::AssayDescriptor;
use crate::{Error, Result};

// ============================================================================
// MemoryCatalog
// ============================================================================

/// In-memory uuid → assay catalog.
#[derive(Clone, Default)]
pub struct MemoryCatalog {
    inner: Arc<CatalogInner>,
}

#[derive(Default)]
struct CatalogInner {
    assays: RwLock<HashMap<String, AssayDescriptor>>,
    /// uuid → number of fetches, hits and misses alike
    fetches: RwLock<HashMap<String, u64>>,
    total_fetches: AtomicU64,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the descriptor for `uuid`.
    pub fn insert(&self, uuid: impl Into<String>, assay: AssayDescriptor) {
        self.inner.assays.write().insert(uuid.into(), assay);
    }

    pub fn with_assay(self, uuid: impl Into<String>, assay: AssayDescriptor) -> Self {
        self.insert(uuid, assay);
        self
    }

    pub fn remove(&self, uuid: &str) -> Option<AssayDescriptor> {
        self.inner.assays.write().remove(uuid)
    }

    pub fn len(&self) -> usize {
        self.inner.assays.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.assays.read().is_empty()
    }

    /// Total fetches served since creation (or the last `reset_counters`).
    pub fn fetch_count(&self) -> u64 {
        self.inner.total_fetches.load(Ordering::Relaxed)
    }

    /// Fetches for one uuid.
    pub fn fetches_for(&self, uuid: &str) -> u64 {
        self.inner.fetches.read().get(uuid).copied().unwrap_or(0)
    }

    /// Every uuid fetched at least once, sorted.
    pub fn fetched_uuids(&self) -> Vec<String> {
        let mut uuids: Vec<String> = self.inner.fetches.read().keys().cloned().collect();
        uuids.sort();
        uuids
    }

    pub fn reset_counters(&self) {
        self.inner.fetches.write().clear();
        self.inner.total_fetches.store(0, Ordering::Relaxed);
    }
}

impl std::fmt::Debug for MemoryCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCatalog")
            .field("assays", &self.len())
            .field("fetches", &self.fetch_count())
            .finish()
    }
}

// ============================================================================
// AssayFetch impl
// ============================================================================

impl AssayFetch for MemoryCatalog {
    fn fetch_assay(&self, uuid: &str) -> Result<AssayDescriptor> {
        self.inner.total_fetches.fetch_add(1, Ordering::Relaxed);
        *self.inner.fetches.write().entry(uuid.to_string()).or_insert(0) += 1;

        self.inner
            .assays
            .read()
            .get(uuid)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("assay for dataset {uuid}")))
    }
}
