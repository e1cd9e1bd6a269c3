//! Session-external import cache.
//!
//! Holds parsed ancestor documents across composition sessions (for
//! example across a whole project build) so shared parents are parsed
//! once. The cache is passed to the resolver explicitly; it is never
//! global. Entries are never invalidated automatically: a caller that
//! edits documents between sessions must [`clear`](ImportCache::clear) or
//! [`remove`](ImportCache::remove) them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use speclink_model::SpecDocument;

use crate::location::Location;

/// Statistics about cache usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<Location, Arc<SpecDocument>>,
    hits: usize,
    misses: usize,
}

/// Parsed documents keyed by normalized location.
///
/// Safe to share by reference between sessions running on different
/// threads.
#[derive(Debug, Default)]
pub struct ImportCache {
    inner: Mutex<CacheInner>,
}

impl ImportCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Look up a document, counting the hit or miss.
    pub fn get(&self, location: &Location) -> Option<Arc<SpecDocument>> {
        let mut inner = self.lock();
        match inner.entries.get(location).cloned() {
            Some(doc) => {
                inner.hits += 1;
                Some(doc)
            }
            None => {
                inner.misses += 1;
                None
            }
        }
    }

    /// Store a parsed document, replacing any previous entry.
    pub fn insert(&self, location: Location, document: Arc<SpecDocument>) {
        self.lock().entries.insert(location, document);
    }

    /// Seed the cache with a document, e.g. one already held in memory.
    pub fn preload(&self, location: impl Into<String>, document: SpecDocument) {
        self.insert(Location::new(location), Arc::new(document));
    }

    /// Check presence without touching the statistics.
    pub fn contains(&self, location: &Location) -> bool {
        self.lock().entries.contains_key(location)
    }

    /// Remove one entry. Returns whether it was present.
    pub fn remove(&self, location: &Location) -> bool {
        self.lock().entries.remove(location).is_some()
    }

    /// Drop all entries and reset the statistics.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.hits = 0;
        inner.misses = 0;
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return cache usage statistics.
    pub fn statistics(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            entries: inner.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_then_hit() {
        let cache = ImportCache::new();
        let loc = Location::new("/specs/base.yaml");

        assert!(cache.get(&loc).is_none());
        cache.insert(loc.clone(), Arc::new(SpecDocument::new("base")));
        let doc = cache.get(&loc).unwrap();
        assert_eq!(doc.metadata.id.as_deref(), Some("base"));

        let stats = cache.statistics();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn contains_does_not_count() {
        let cache = ImportCache::new();
        cache.preload("/a.yaml", SpecDocument::new("a"));
        assert!(cache.contains(&Location::new("/a.yaml")));
        assert!(!cache.contains(&Location::new("/b.yaml")));
        assert_eq!(cache.statistics(), CacheStats { hits: 0, misses: 0, entries: 1 });
    }

    #[test]
    fn remove_and_clear() {
        let cache = ImportCache::new();
        cache.preload("/a.yaml", SpecDocument::new("a"));
        cache.preload("/b.yaml", SpecDocument::new("b"));
        assert_eq!(cache.len(), 2);

        assert!(cache.remove(&Location::new("/a.yaml")));
        assert!(!cache.remove(&Location::new("/a.yaml")));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.statistics(), CacheStats::default());
    }

    #[test]
    fn shared_across_threads() {
        let cache = Arc::new(ImportCache::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    cache.preload(format!("/doc{i}.yaml"), SpecDocument::new(format!("d{i}")));
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(cache.len(), 4);
    }
}
