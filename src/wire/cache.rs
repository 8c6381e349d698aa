//! Process-wide cache of resolved type names.
//!
//! Resolving a name through the [`TypeResolver`](crate::metadata::typesystem::TypeResolver) is
//! the slow path of a type table, and the same names recur across sessions. The [`NameCache`]
//! remembers every successful resolution for the lifetime of the process.
//!
//! # Concurrency
//!
//! The cache holds an immutable `HashMap` snapshot behind an [`ArcSwap`]:
//!
//! - **Readers** load the current snapshot without blocking and never observe a partially
//!   built map.
//! - **Writers** copy the snapshot, add their entry and publish the copy with a
//!   compare-and-swap loop (`rcu`). A writer that loses the race retries against the newer
//!   snapshot, so no entry is ever lost.
//! - When two threads publish the same name concurrently, the first publication wins and
//!   both receive the winning descriptor.
//!
//! Entries are never removed.
//!
//! # Shared Caches
//!
//! [`NameCache::for_resolver`] hands out one process-wide cache per resolver. Every table built
//! on the same resolver shares it, while tables on different catalogs never see each other's
//! names.

use std::{
    collections::HashMap,
    sync::{Arc, OnceLock, Weak},
};

use arc_swap::ArcSwap;
use dashmap::DashMap;
use log::debug;

use crate::metadata::typesystem::{TypeRc, TypeResolver};

/// Shared caches keyed by the address of their resolver
static SHARED: OnceLock<DashMap<usize, SharedCache>> = OnceLock::new();

struct SharedCache {
    /// Resolver the cache belongs to; dead once the resolver is dropped
    resolver: Weak<dyn TypeResolver>,
    cache: Arc<NameCache>,
}

impl SharedCache {
    fn new(resolver: &Arc<dyn TypeResolver>) -> Self {
        debug!("created shared name cache for resolver {:p}", Arc::as_ptr(resolver));
        SharedCache {
            resolver: Arc::downgrade(resolver),
            cache: Arc::new(NameCache::new()),
        }
    }
}

/// Append-only, concurrently readable map from canonical type name to descriptor
pub struct NameCache {
    /// Current immutable snapshot
    snapshot: ArcSwap<HashMap<String, TypeRc>>,
}

impl NameCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        NameCache {
            snapshot: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    /// The process-wide cache of `resolver`, shared by all tables configured with
    /// `shared_cache` on that resolver
    ///
    /// ## Arguments
    /// * 'resolver' - The resolver whose results the cache holds
    #[must_use]
    pub fn for_resolver(resolver: &Arc<dyn TypeResolver>) -> Arc<NameCache> {
        let shared = SHARED.get_or_init(DashMap::new);
        // The weak reference pins the allocation, so a present key always names this resolver
        let key = Arc::as_ptr(resolver).cast::<()>() as usize;

        if !shared.contains_key(&key) {
            shared.retain(|_, entry| entry.resolver.strong_count() > 0);
        }

        shared
            .entry(key)
            .or_insert_with(|| SharedCache::new(resolver))
            .cache
            .clone()
    }

    /// Look up a previously resolved name
    ///
    /// ## Arguments
    /// * 'name' - The name exactly as it appeared in the name handle
    #[must_use]
    pub fn get(&self, name: &str) -> Option<TypeRc> {
        self.snapshot.load().get(name).cloned()
    }

    /// Publish a resolution and return the descriptor cached for `name`
    ///
    /// If another thread published `name` first, its descriptor is kept and returned.
    ///
    /// ## Arguments
    /// * 'name'     - The name that was resolved
    /// * 'resolved' - The descriptor the resolver returned
    pub fn publish(&self, name: &str, resolved: TypeRc) -> TypeRc {
        self.snapshot.rcu(|current| {
            if current.contains_key(name) {
                return Arc::clone(current);
            }

            let mut next = HashMap::clone(current);
            next.insert(name.to_string(), resolved.clone());
            Arc::new(next)
        });

        match self.get(name) {
            Some(winner) => {
                debug!("published {} to name cache", name);
                winner
            }
            None => resolved,
        }
    }

    /// Number of cached names
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot.load().len()
    }

    /// Returns `true` if nothing has been cached yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshot.load().is_empty()
    }

    /// Returns `true` if `name` has been cached
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.snapshot.load().contains_key(name)
    }

    /// A consistent snapshot of the whole cache
    #[must_use]
    pub fn snapshot(&self) -> Arc<HashMap<String, TypeRc>> {
        self.snapshot.load_full()
    }
}

impl Default for NameCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NameCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameCache").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::typesystem::{TypeCatalog, TypeResolver, WellKnownType};

    #[test]
    fn test_publish_and_get() {
        let catalog = TypeCatalog::default();
        let string = catalog.well_known(WellKnownType::String).unwrap();
        let cache = NameCache::new();

        assert!(cache.is_empty());
        assert!(cache.get("System.String").is_none());

        let published = cache.publish("System.String", string.clone());
        assert!(Arc::ptr_eq(&published, &string));
        assert!(cache.contains("System.String"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_first_publication_wins() {
        let catalog = TypeCatalog::default();
        let string = catalog.well_known(WellKnownType::String).unwrap();
        let object = catalog.well_known(WellKnownType::Object).unwrap();
        let cache = NameCache::new();

        cache.publish("Name", string.clone());
        let winner = cache.publish("Name", object);
        assert!(Arc::ptr_eq(&winner, &string));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_snapshot_is_stable() {
        let catalog = TypeCatalog::default();
        let cache = NameCache::new();
        cache.publish("A", catalog.well_known(WellKnownType::Int32).unwrap());

        let before = cache.snapshot();
        cache.publish("B", catalog.well_known(WellKnownType::Int64).unwrap());

        assert_eq!(before.len(), 1);
        assert_eq!(cache.snapshot().len(), 2);
    }

    #[test]
    fn test_concurrent_publish_loses_nothing() {
        let catalog = TypeCatalog::default();
        let int = catalog.well_known(WellKnownType::Int32).unwrap();
        let cache = NameCache::new();

        std::thread::scope(|scope| {
            for thread in 0..8 {
                let cache = &cache;
                let int = int.clone();
                scope.spawn(move || {
                    for i in 0..50 {
                        cache.publish(&format!("T{}-{}", thread, i), int.clone());
                    }
                });
            }
        });

        assert_eq!(cache.len(), 400);
    }

    #[test]
    fn test_shared_cache_per_resolver() {
        let first: Arc<dyn TypeResolver> = Arc::new(TypeCatalog::default());
        let second: Arc<dyn TypeResolver> = Arc::new(TypeCatalog::default());

        let cache = NameCache::for_resolver(&first);
        assert!(Arc::ptr_eq(&cache, &NameCache::for_resolver(&first)));
        assert!(!Arc::ptr_eq(&cache, &NameCache::for_resolver(&second)));

        cache.publish("System.Int32", first.well_known(WellKnownType::Int32).unwrap());
        assert!(NameCache::for_resolver(&second).is_empty());
    }

    #[test]
    fn test_shared_cache_dies_with_resolver() {
        let resolver: Arc<dyn TypeResolver> = Arc::new(TypeCatalog::default());
        let cache = NameCache::for_resolver(&resolver);
        cache.publish("System.Int32", resolver.well_known(WellKnownType::Int32).unwrap());

        let weak = Arc::downgrade(&resolver);
        drop(resolver);
        assert_eq!(weak.strong_count(), 0);

        let replacement: Arc<dyn TypeResolver> = Arc::new(TypeCatalog::default());
        assert!(NameCache::for_resolver(&replacement).is_empty());
    }
}
