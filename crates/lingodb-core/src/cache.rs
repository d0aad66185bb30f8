//! Process-wide cache of resolved resource sets.
//!
//! One [`ResourceManager`] caches the resolved dictionaries of a single
//! resource set, one entry per requested locale. The concurrency contract:
//!
//! - a given (set, locale) pair is loaded **at most once concurrently**:
//!   callers racing on an uncached pair block behind a single load
//! - callers of *different* pairs never block each other; the lock that
//!   serializes a load is scoped to that pair's cell, not the manager
//!
//! Edits do not invalidate anything implicitly. The only invalidation is
//! [`ResourceManagerRegistry::invalidate_all`], the administrative "reload"
//! broadcast that drops every cached entry of every registered manager.

use crate::error::Result;
use crate::resolver::LocaleFallbackResolver;
use dashmap::DashMap;
use lingodb_commons::locale;
use lingodb_commons::models::{ResourceRow, ResourceValue};
use lingodb_store::ResourceStore;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// A resolved, immutable dictionary for one (resource set, locale) pair.
pub type ResolvedSet = Arc<HashMap<String, ResourceValue>>;

/// Caching front end over the resolver for one resource set.
pub struct ResourceManager {
    resource_set: String,
    resolver: Arc<LocaleFallbackResolver>,
    store: Arc<ResourceStore>,
    auto_add_missing: bool,

    /// Per-locale cache cells. The `OnceCell` is the load barrier: the
    /// first caller initializes it, concurrent callers of the same locale
    /// block inside `get_or_try_init`, and other locales use other cells.
    sets: DashMap<String, Arc<OnceCell<ResolvedSet>>>,

    /// Serializes the missing-resource write path. Two threads can discover
    /// the same missing key at the same time; the store write must happen
    /// once.
    add_lock: Mutex<()>,
}

impl ResourceManager {
    pub fn new(
        resource_set: impl Into<String>,
        resolver: Arc<LocaleFallbackResolver>,
        store: Arc<ResourceStore>,
        auto_add_missing: bool,
    ) -> Self {
        Self {
            resource_set: resource_set.into(),
            resolver,
            store,
            auto_add_missing,
            sets: DashMap::new(),
            add_lock: Mutex::new(()),
        }
    }

    pub fn resource_set(&self) -> &str {
        &self.resource_set
    }

    /// The resolved dictionary for a locale, loading it on first use.
    ///
    /// A failed load leaves the cell empty so the next caller retries.
    pub fn get_resource_set(&self, locale_id: &str) -> Result<ResolvedSet> {
        let locale_id = locale::normalize(locale_id);
        let cell = self.sets.entry(locale_id.clone()).or_default().clone();
        let set = cell.get_or_try_init(|| {
            log::debug!(
                "loading resource set {:?} for locale {:?}",
                self.resource_set,
                locale_id
            );
            self.resolver
                .resolve_set(&self.resource_set, &locale_id)
                .map(Arc::new)
        })?;
        Ok(Arc::clone(set))
    }

    /// Resolves one value through the cached set. On a miss with auto-add
    /// enabled, writes an invariant row whose value is the id itself and
    /// returns that value.
    pub fn get_value(&self, resource_id: &str, locale_id: &str) -> Result<Option<ResourceValue>> {
        let set = self.get_resource_set(locale_id)?;
        if let Some(value) = set.get(resource_id) {
            return Ok(Some(value.clone()));
        }
        if self.auto_add_missing {
            return Ok(self
                .add_missing_resource(resource_id)?
                .map(ResourceValue::Text));
        }
        Ok(None)
    }

    /// Text-only convenience over [`ResourceManager::get_value`].
    pub fn get_string(&self, resource_id: &str, locale_id: &str) -> Result<Option<String>> {
        Ok(self
            .get_value(resource_id, locale_id)?
            .map(ResourceValue::into_text_lossy))
    }

    /// Writes the invariant row for a missing resource, id as value.
    ///
    /// Serialized behind `add_lock` with a re-check: the racing thread that
    /// loses the lock finds the row already present and returns its value
    /// instead of writing a duplicate. The cached set stays stale until the
    /// next reload, by design of the invalidation contract.
    fn add_missing_resource(&self, resource_id: &str) -> Result<Option<String>> {
        let _guard = self.add_lock.lock();

        if let Some(existing) = self.store.get_row(resource_id, &self.resource_set, "")? {
            return Ok(existing.value);
        }

        self.store.upsert_row(ResourceRow::new_text(
            resource_id,
            "",
            &self.resource_set,
            resource_id,
        ))?;
        log::debug!(
            "auto-added missing resource {:?} to set {:?}",
            resource_id,
            self.resource_set
        );
        Ok(Some(resource_id.to_string()))
    }

    /// Drops every cached locale of this set; the next request reloads.
    pub fn invalidate(&self) {
        self.sets.clear();
    }

    /// Number of locales currently cached, for tests and diagnostics.
    pub fn cached_locales(&self) -> usize {
        self.sets
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }
}

/// Explicit registry of the live [`ResourceManager`] instances.
///
/// Owned by the application context and injected where needed. The
/// "reload" broadcast reaches exactly the managers registered here, so
/// there is no hidden global provider list.
pub struct ResourceManagerRegistry {
    resolver: Arc<LocaleFallbackResolver>,
    store: Arc<ResourceStore>,
    auto_add_missing: bool,
    managers: DashMap<String, Arc<ResourceManager>>,
}

impl ResourceManagerRegistry {
    pub fn new(
        resolver: Arc<LocaleFallbackResolver>,
        store: Arc<ResourceStore>,
        auto_add_missing: bool,
    ) -> Self {
        Self {
            resolver,
            store,
            auto_add_missing,
            managers: DashMap::new(),
        }
    }

    /// The manager for a resource set, creating and registering it on first
    /// use. One manager exists per set per registry.
    pub fn get_or_create(&self, resource_set: &str) -> Arc<ResourceManager> {
        self.managers
            .entry(resource_set.to_string())
            .or_insert_with(|| {
                Arc::new(ResourceManager::new(
                    resource_set,
                    Arc::clone(&self.resolver),
                    Arc::clone(&self.store),
                    self.auto_add_missing,
                ))
            })
            .clone()
    }

    /// Drops every cached entry across all registered managers. This is the
    /// only invalidation granularity: the admin UI triggers it after bulk
    /// edits.
    pub fn invalidate_all(&self) {
        let mut dropped = 0usize;
        for entry in self.managers.iter() {
            dropped += entry.value().cached_locales();
            entry.value().invalidate();
        }
        log::info!(
            "invalidated {} cached resource set(s) across {} manager(s)",
            dropped,
            self.managers.len()
        );
    }

    /// Number of registered managers.
    pub fn len(&self) -> usize {
        self.managers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingodb_commons::ConverterRegistry;
    use lingodb_store::storage::{Operation, Partition, StorageBackend};
    use lingodb_store::{InMemoryBackend, StoreError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;

    /// Backend wrapper that counts scans, the observable unit of a cache
    /// load (one resolve_set = one scan).
    struct CountingBackend {
        inner: InMemoryBackend,
        scans: AtomicUsize,
    }

    impl CountingBackend {
        fn new() -> Self {
            Self {
                inner: InMemoryBackend::new(),
                scans: AtomicUsize::new(0),
            }
        }

        fn scan_count(&self) -> usize {
            self.scans.load(Ordering::SeqCst)
        }
    }

    impl StorageBackend for CountingBackend {
        fn get(
            &self,
            partition: &Partition,
            key: &[u8],
        ) -> std::result::Result<Option<Vec<u8>>, StoreError> {
            self.inner.get(partition, key)
        }

        fn put(&self, partition: &Partition, key: &[u8], value: &[u8]) -> std::result::Result<(), StoreError> {
            self.inner.put(partition, key, value)
        }

        fn delete(&self, partition: &Partition, key: &[u8]) -> std::result::Result<(), StoreError> {
            self.inner.delete(partition, key)
        }

        fn batch(&self, operations: Vec<Operation>) -> std::result::Result<(), StoreError> {
            self.inner.batch(operations)
        }

        fn scan(
            &self,
            partition: &Partition,
            prefix: Option<&[u8]>,
            limit: Option<usize>,
        ) -> std::result::Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
            self.scans.fetch_add(1, Ordering::SeqCst);
            self.inner.scan(partition, prefix, limit)
        }

        fn partition_exists(&self, partition: &Partition) -> bool {
            self.inner.partition_exists(partition)
        }

        fn create_partition(&self, partition: &Partition) -> std::result::Result<(), StoreError> {
            self.inner.create_partition(partition)
        }

        fn drop_partition(&self, partition: &Partition) -> std::result::Result<(), StoreError> {
            self.inner.drop_partition(partition)
        }

        fn list_partitions(&self) -> std::result::Result<Vec<Partition>, StoreError> {
            self.inner.list_partitions()
        }
    }

    fn registry_over(
        backend: Arc<CountingBackend>,
        auto_add: bool,
    ) -> ResourceManagerRegistry {
        let store = Arc::new(ResourceStore::new(backend, "localizations"));
        store.ensure_table().unwrap();
        store
            .upsert_row(ResourceRow::new_text("Today", "", "Resources", "Today is great"))
            .unwrap();
        store
            .upsert_row(ResourceRow::new_text("Today", "de", "Resources", "Heute"))
            .unwrap();
        let resolver = Arc::new(LocaleFallbackResolver::new(
            Arc::clone(&store),
            Arc::new(ConverterRegistry::new()),
        ));
        ResourceManagerRegistry::new(resolver, store, auto_add)
    }

    #[test]
    fn test_concurrent_requests_trigger_exactly_one_load() {
        let backend = Arc::new(CountingBackend::new());
        let registry = Arc::new(registry_over(Arc::clone(&backend), false));

        let threads = 16;
        let barrier = Arc::new(Barrier::new(threads));
        let mut handles = Vec::new();
        for _ in 0..threads {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            handles.push(thread::spawn(move || {
                barrier.wait();
                for _ in 0..50 {
                    let value = registry
                        .get_or_create("Resources")
                        .get_string("Today", "de-de")
                        .unwrap();
                    assert_eq!(value.as_deref(), Some("Heute"));
                }
            }));
        }
        for handle in handles {
            handle.join().expect("thread panicked");
        }

        // 16 threads x 50 lookups, one underlying store load
        assert_eq!(backend.scan_count(), 1);
    }

    #[test]
    fn test_locales_are_cached_independently() {
        let backend = Arc::new(CountingBackend::new());
        let registry = registry_over(Arc::clone(&backend), false);
        let manager = registry.get_or_create("Resources");

        manager.get_resource_set("de-de").unwrap();
        assert_eq!(backend.scan_count(), 1);

        // loading de-de does not imply de or invariant are cached
        manager.get_resource_set("de").unwrap();
        manager.get_resource_set("").unwrap();
        assert_eq!(backend.scan_count(), 3);
        assert_eq!(manager.cached_locales(), 3);

        // repeat requests stay cached
        manager.get_resource_set("de-de").unwrap();
        assert_eq!(backend.scan_count(), 3);
    }

    #[test]
    fn test_invalidate_all_forces_reload() {
        let backend = Arc::new(CountingBackend::new());
        let registry = registry_over(Arc::clone(&backend), false);
        let manager = registry.get_or_create("Resources");

        assert_eq!(
            manager.get_string("Today", "de").unwrap().as_deref(),
            Some("Heute")
        );
        assert_eq!(backend.scan_count(), 1);

        registry.invalidate_all();
        assert_eq!(manager.cached_locales(), 0);

        assert_eq!(
            manager.get_string("Today", "de").unwrap().as_deref(),
            Some("Heute")
        );
        assert_eq!(backend.scan_count(), 2);
    }

    #[test]
    fn test_auto_add_writes_invariant_row_once() {
        let backend = Arc::new(CountingBackend::new());
        let registry = Arc::new(registry_over(Arc::clone(&backend), true));

        let threads = 8;
        let barrier = Arc::new(Barrier::new(threads));
        let mut handles = Vec::new();
        for _ in 0..threads {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            handles.push(thread::spawn(move || {
                barrier.wait();
                registry
                    .get_or_create("Resources")
                    .get_string("BrandNew", "de")
                    .unwrap()
            }));
        }
        for handle in handles {
            // every racer gets the id-as-value result
            assert_eq!(handle.join().unwrap().as_deref(), Some("BrandNew"));
        }

        // exactly one invariant row was written
        let manager = registry.get_or_create("Resources");
        registry.invalidate_all();
        let set = manager.get_resource_set("").unwrap();
        assert_eq!(
            set.get("BrandNew"),
            Some(&ResourceValue::Text("BrandNew".to_string()))
        );
    }

    #[test]
    fn test_auto_add_double_check_returns_racer_value() {
        let backend = Arc::new(CountingBackend::new());
        let registry = registry_over(Arc::clone(&backend), true);
        let manager = registry.get_or_create("Resources");

        // warm the cache, then write the row behind the cache's back;
        // the double-check must return the stored value, not overwrite it
        manager.get_resource_set("").unwrap();
        let store = Arc::new(ResourceStore::new(
            Arc::clone(&backend) as Arc<dyn StorageBackend>,
            "localizations",
        ));
        store
            .upsert_row(ResourceRow::new_text("Sneaky", "", "Resources", "already here"))
            .unwrap();

        assert_eq!(
            manager.get_string("Sneaky", "").unwrap().as_deref(),
            Some("already here")
        );
    }

    #[test]
    fn test_miss_without_auto_add_is_none() {
        let backend = Arc::new(CountingBackend::new());
        let registry = registry_over(backend, false);
        let manager = registry.get_or_create("Resources");
        assert!(manager.get_value("Missing", "de").unwrap().is_none());
    }
}
