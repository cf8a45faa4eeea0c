//! Ancestor assay lookups, memoized for one resolution.
//!
//! An `AncestorResolver` lives exactly as long as one call to
//! [`Resolver::resolve`](crate::Resolver::resolve). The lineage walk and the
//! decision tree share it, so an ancestor they both ask about is fetched once.
//! Nothing is cached across resolutions; that is the fetch capability's call.

use hashbrown::hash_map::EntryRef;
use hashbrown::HashMap;
use tracing::{debug, trace};

use crate::fetch::AssayFetch;
use crate::model::AssayDescriptor;
use crate::Result;

pub struct AncestorResolver<'f, F: AssayFetch + ?Sized> {
    fetch: &'f F,
    memo: HashMap<String, AssayDescriptor>,
    fetches: usize,
}

impl<'f, F: AssayFetch + ?Sized> AncestorResolver<'f, F> {
    pub fn new(fetch: &'f F) -> Self {
        Self { fetch, memo: HashMap::new(), fetches: 0 }
    }

    /// Assay metadata for `uuid`, fetched on first request.
    ///
    /// A failed fetch is returned as-is and not remembered.
    pub fn resolve(&mut self, uuid: &str) -> Result<&AssayDescriptor> {
        // The key is only copied into the memo on a miss.
        match self.memo.entry_ref(uuid) {
            EntryRef::Occupied(hit) => {
                trace!(uuid, "ancestor memo hit");
                Ok(hit.into_mut())
            }
            EntryRef::Vacant(slot) => {
                debug!(uuid, "fetching ancestor assay");
                let assay = self.fetch.fetch_assay(uuid)?;
                self.fetches += 1;
                trace!(uuid, assay = ?assay.assay_name, "ancestor assay fetched");
                Ok(slot.insert(assay))
            }
        }
    }

    /// Seed the memo with metadata already in hand, so it is never fetched.
    pub fn seed(&mut self, uuid: impl Into<String>, assay: AssayDescriptor) {
        self.memo.entry(uuid.into()).or_insert(assay);
    }

    pub fn is_cached(&self, uuid: &str) -> bool {
        self.memo.contains_key(uuid)
    }

    /// Successful fetches issued so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemoryCatalog;
    use crate::Error;

    #[test]
    fn test_fetches_once_per_uuid() {
        let catalog = MemoryCatalog::new().with_assay("p", AssayDescriptor::new("NanoDESI"));
        let mut ancestors = AncestorResolver::new(&catalog);

        assert!(ancestors.resolve("p").unwrap().is_assay("NanoDESI"));
        assert!(ancestors.resolve("p").unwrap().is_assay("NanoDESI"));

        assert_eq!(catalog.fetches_for("p"), 1);
        assert_eq!(ancestors.fetch_count(), 1);
        assert!(ancestors.is_cached("p"));
    }

    #[test]
    fn test_failure_propagates_and_is_not_cached() {
        let catalog = MemoryCatalog::new();
        let mut ancestors = AncestorResolver::new(&catalog);

        assert!(matches!(ancestors.resolve("gone"), Err(Error::NotFound(_))));
        assert!(!ancestors.is_cached("gone"));

        catalog.insert("gone", AssayDescriptor::new("seqFish"));
        assert!(ancestors.resolve("gone").unwrap().is_assay("seqFish"));
        assert_eq!(catalog.fetches_for("gone"), 2);
    }

    #[test]
    fn test_memo_hits_return_the_stored_descriptor() {
        let catalog = MemoryCatalog::new().with_assay("p", AssayDescriptor::new("MALDI-IMS"));
        let mut ancestors = AncestorResolver::new(&catalog);
        let uuid = String::from("p");

        let first = ancestors.resolve(&uuid).unwrap().clone();
        for _ in 0..3 {
            assert_eq!(ancestors.resolve(uuid.as_str()).unwrap(), &first);
        }
        assert_eq!(ancestors.fetch_count(), 1);
        assert_eq!(catalog.fetch_count(), 1);
    }

    #[test]
    fn test_seeded_entries_skip_fetch() {
        let catalog = MemoryCatalog::new();
        let mut ancestors = AncestorResolver::new(&catalog);
        ancestors.seed("p", AssayDescriptor::new("MALDI-IMS"));

        assert!(ancestors.resolve("p").unwrap().is_assay("MALDI-IMS"));
        assert_eq!(catalog.fetch_count(), 0);
    }

    #[test]
    fn test_fetch_error_is_unchanged() {
        let fetch = |uuid: &str| -> Result<AssayDescriptor> {
            Err(Error::Fetch(format!("503 from assay service for {uuid}")))
        };
        let mut ancestors = AncestorResolver::new(&fetch);
        match ancestors.resolve("p") {
            Err(Error::Fetch(msg)) => assert_eq!(msg, "503 from assay service for p"),
            other => panic!("expected fetch error, got {other:?}"),
        }
    }
}
