//! Mapper cache keyed by record type.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::errors::{MapperError, SynthesisError};

/// Entry in the mapper cache.
struct CachedMapper {
    record: &'static str,
    mapper: Arc<dyn Any + Send + Sync>,
}

impl CachedMapper {
    fn downcast<M: Any + Clone>(&self) -> Result<M, SynthesisError> {
        self.mapper.downcast_ref::<M>().cloned().ok_or_else(|| {
            SynthesisError::new(self.record, "cached mapper has an unexpected type")
        })
    }
}

/// Snapshot of cache activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that found no entry.
    pub misses: u64,
    /// Mappers synthesized and stored.
    pub syntheses: u64,
    /// Entries currently cached.
    pub entries: usize,
}

/// Concurrent store of compiled mappers, one per record type.
///
/// Entries are only ever added. A miss synthesizes under the entry's shard
/// lock, so each record type is synthesized at most once.
#[derive(Default)]
pub struct MapperCache {
    entries: DashMap<TypeId, CachedMapper>,
    hits: AtomicU64,
    misses: AtomicU64,
    syntheses: AtomicU64,
}

impl MapperCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the mapper stored under `key` without creating one.
    pub fn get<M: Any + Clone>(&self, key: TypeId) -> Option<M> {
        let entry = self.entries.get(&key)?;
        let mapper = entry.downcast::<M>().ok()?;
        self.hits.fetch_add(1, Ordering::Relaxed);
        Some(mapper)
    }

    /// Gets the mapper stored under `key`, synthesizing and storing it on a miss.
    ///
    /// Returns the mapper and whether this call synthesized it. A failed
    /// synthesis stores nothing.
    pub fn get_or_try_insert_with<M, F>(
        &self,
        key: TypeId,
        record: &'static str,
        synthesize: F,
    ) -> Result<(M, bool), MapperError>
    where
        M: Any + Clone + Send + Sync,
        F: FnOnce() -> Result<M, MapperError>,
    {
        if let Some(entry) = self.entries.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok((entry.downcast::<M>()?, false));
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let mut created = false;
        let entry = self.entries.entry(key).or_try_insert_with(|| {
            let mapper = synthesize()?;
            created = true;
            Ok::<_, MapperError>(CachedMapper {
                record,
                mapper: Arc::new(mapper),
            })
        })?;
        if created {
            self.syntheses.fetch_add(1, Ordering::Relaxed);
        }

        Ok((entry.downcast::<M>()?, created))
    }

    /// Returns true if a mapper is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: TypeId) -> bool {
        self.entries.contains_key(&key)
    }

    /// Returns the record names of all cached mappers, sorted.
    #[must_use]
    pub fn record_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.iter().map(|entry| entry.record).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of cached mappers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a snapshot of cache activity.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            syntheses: self.syntheses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}

impl std::fmt::Debug for MapperCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapperCache")
            .field("records", &self.record_names())
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Debug, Clone, PartialEq)]
    struct Fake(u32);

    struct KeyA;
    struct KeyB;

    #[test]
    fn test_miss_then_hit() {
        let cache = MapperCache::new();
        let key = TypeId::of::<KeyA>();

        assert_eq!(cache.get::<Fake>(key), None);

        let (mapper, created) = cache
            .get_or_try_insert_with(key, "KeyA", || Ok(Fake(1)))
            .unwrap();
        assert_eq!(mapper, Fake(1));
        assert!(created);

        let (mapper, created) = cache
            .get_or_try_insert_with(key, "KeyA", || Ok(Fake(2)))
            .unwrap();
        assert_eq!(mapper, Fake(1));
        assert!(!created);

        assert_eq!(cache.get::<Fake>(key), Some(Fake(1)));
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 2,
                misses: 1,
                syntheses: 1,
                entries: 1,
            }
        );
    }

    #[test]
    fn test_failed_synthesis_stores_nothing() {
        let cache = MapperCache::new();
        let key = TypeId::of::<KeyA>();

        let result = cache.get_or_try_insert_with::<Fake, _>(key, "KeyA", || {
            Err(SynthesisError::new("KeyA", "boom").into())
        });
        assert!(result.is_err());
        assert!(!cache.contains(key));

        let (mapper, created) = cache
            .get_or_try_insert_with(key, "KeyA", || Ok(Fake(3)))
            .unwrap();
        assert_eq!(mapper, Fake(3));
        assert!(created);
    }

    #[test]
    fn test_existing_entry_is_never_overwritten() {
        let cache = MapperCache::new();
        let key = TypeId::of::<KeyA>();
        let calls = AtomicUsize::new(0);

        for value in 0..3 {
            cache
                .get_or_try_insert_with(key, "KeyA", || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Fake(value))
                })
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.get::<Fake>(key), Some(Fake(0)));
    }

    #[test]
    fn test_record_names_sorted() {
        let cache = MapperCache::new();
        cache
            .get_or_try_insert_with(TypeId::of::<KeyB>(), "KeyB", || Ok(Fake(1)))
            .unwrap();
        cache
            .get_or_try_insert_with(TypeId::of::<KeyA>(), "KeyA", || Ok(Fake(1)))
            .unwrap();

        assert_eq!(cache.record_names(), vec!["KeyA", "KeyB"]);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_wrong_mapper_type_is_reported() {
        let cache = MapperCache::new();
        let key = TypeId::of::<KeyA>();
        cache
            .get_or_try_insert_with(key, "KeyA", || Ok(Fake(1)))
            .unwrap();

        assert_eq!(cache.get::<String>(key), None);
        assert!(cache
            .get_or_try_insert_with(key, "KeyA", || Ok(String::new()))
            .is_err());
    }
}
