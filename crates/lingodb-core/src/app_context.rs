//! Application context: the explicitly-owned bundle of shared resources.
//!
//! Everything process-wide lives here and nowhere else: the store, the
//! resolver, the cache registry, the admin service and the converters.
//! The context is constructed once in `main` and injected into the HTTP
//! layer behind an `Arc`; there is no global singleton to reach for.

use crate::admin::AdminService;
use crate::cache::ResourceManagerRegistry;
use crate::error::Result;
use crate::resolver::LocaleFallbackResolver;
use crate::resx::ResxConverter;
use crate::translate::TranslationService;
use lingodb_commons::{ConverterRegistry, LocalizationConfig};
use lingodb_store::{ResourceStore, StorageBackend};
use std::sync::Arc;

/// Shared resources of a running LingoDB instance.
pub struct AppContext {
    config: LocalizationConfig,
    store: Arc<ResourceStore>,
    resolver: Arc<LocaleFallbackResolver>,
    registry: Arc<ResourceManagerRegistry>,
    admin: AdminService,
    resx: ResxConverter,
    translator: TranslationService,
}

impl AppContext {
    /// Wires the full stack over a storage backend. Ensures the resource
    /// table partition exists so a fresh backend is immediately usable.
    pub fn new(
        config: LocalizationConfig,
        backend: Arc<dyn StorageBackend>,
        converters: ConverterRegistry,
    ) -> Result<Self> {
        let store = Arc::new(ResourceStore::new(backend, &config.resource_table));
        store.ensure_table()?;

        let converters = Arc::new(converters);
        let resolver = Arc::new(LocaleFallbackResolver::new(
            Arc::clone(&store),
            Arc::clone(&converters),
        ));
        let registry = Arc::new(ResourceManagerRegistry::new(
            Arc::clone(&resolver),
            Arc::clone(&store),
            config.add_missing_resources,
        ));
        let admin = AdminService::new(
            Arc::clone(&store),
            Arc::clone(&registry),
            config.clone(),
        );
        let resx = ResxConverter::new(Arc::clone(&store), config.resx_base_folder.clone());
        let translator = TranslationService::new(config.clone())?;

        Ok(Self {
            config,
            store,
            resolver,
            registry,
            admin,
            resx,
            translator,
        })
    }

    pub fn config(&self) -> &LocalizationConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<ResourceStore> {
        &self.store
    }

    pub fn resolver(&self) -> &Arc<LocaleFallbackResolver> {
        &self.resolver
    }

    pub fn registry(&self) -> &Arc<ResourceManagerRegistry> {
        &self.registry
    }

    pub fn admin(&self) -> &AdminService {
        &self.admin
    }

    pub fn resx(&self) -> &ResxConverter {
        &self.resx
    }

    pub fn translator(&self) -> &TranslationService {
        &self.translator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingodb_store::InMemoryBackend;

    #[test]
    fn test_context_wires_a_usable_stack() {
        let ctx = AppContext::new(
            LocalizationConfig::default(),
            Arc::new(InMemoryBackend::new()),
            ConverterRegistry::new(),
        )
        .unwrap();

        assert!(ctx.store().table_exists());
        ctx.admin()
            .update_resource_string("Today", "Resources", "de", "Heute", None)
            .unwrap();
        let value = ctx
            .registry()
            .get_or_create("Resources")
            .get_string("Today", "de-at")
            .unwrap();
        assert_eq!(value.as_deref(), Some("Heute"));
    }
}
