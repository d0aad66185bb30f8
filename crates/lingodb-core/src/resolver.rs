//! Locale fallback resolution.
//!
//! The resolution contract: a requested locale falls back through at most
//! three tiers (exact tag, language-only prefix, invariant) and the most
//! specific tier that has a row wins. For whole sets the resolver runs one
//! ordered query instead of a lookup per id: rows arrive sorted by
//! `(resource_id ASC, locale_id DESC)`, so within each id group the first
//! row is the most specific match and the rest are skipped. Each id appears
//! in the output exactly once.

use crate::error::Result;
use lingodb_commons::models::{ResourceValue, ResourceType};
use lingodb_commons::{locale, ConverterRegistry};
use lingodb_store::ResourceStore;
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves values for a requested locale across the fallback chain.
pub struct LocaleFallbackResolver {
    store: Arc<ResourceStore>,
    converters: Arc<ConverterRegistry>,
}

impl LocaleFallbackResolver {
    pub fn new(store: Arc<ResourceStore>, converters: Arc<ConverterRegistry>) -> Self {
        Self { store, converters }
    }

    /// Resolves a single value: exact locale, then language prefix, then
    /// invariant. `Ok(None)` when no tier has a row.
    pub fn resolve(
        &self,
        resource_id: &str,
        resource_set: &str,
        locale_id: &str,
    ) -> Result<Option<ResourceValue>> {
        for tier in locale::fallback_chain(locale_id) {
            if let Some(row) = self.store.get_row(resource_id, resource_set, &tier)? {
                return Ok(Some(row.decode()));
            }
        }
        Ok(None)
    }

    /// Resolves a whole set for one locale: one merged dictionary with each
    /// resource id exactly once, most specific locale tier winning.
    ///
    /// Decode failures degrade to empty values (a corrupt row must not take
    /// the merged set down); registered value converters run on textual
    /// values after decoding.
    pub fn resolve_set(
        &self,
        resource_set: &str,
        locale_id: &str,
    ) -> Result<HashMap<String, ResourceValue>> {
        let rows = self
            .store
            .get_rows_for_fallback_chain(resource_set, locale_id)?;

        let mut resolved = HashMap::new();
        let mut last_resource_id: Option<&str> = None;
        for row in &rows {
            // Ordered scan: only the first row per id is the winner.
            if last_resource_id == Some(row.resource_id.as_str()) {
                continue;
            }
            last_resource_id = Some(row.resource_id.as_str());

            let mut value = row.decode();
            if row.resource_type != ResourceType::Serialized && !self.converters.is_empty() {
                if let ResourceValue::Text(text) = &value {
                    value = ResourceValue::Text(self.converters.apply(
                        row.value_type,
                        text,
                        &row.resource_id,
                    ));
                }
            }
            resolved.insert(row.resource_id.clone(), value);
        }

        log::debug!(
            "resolve_set {:?} locale {:?}: {} ids from {} rows",
            resource_set,
            locale_id,
            resolved.len(),
            rows.len()
        );
        Ok(resolved)
    }

    /// Resolves a set to text-only values, the form the JavaScript and resx
    /// consumers want. Non-text payloads are dropped.
    pub fn resolve_set_strings(
        &self,
        resource_set: &str,
        locale_id: &str,
    ) -> Result<HashMap<String, String>> {
        Ok(self
            .resolve_set(resource_set, locale_id)?
            .into_iter()
            .filter_map(|(id, value)| match value {
                ResourceValue::Text(text) => Some((id, text)),
                _ => None,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingodb_commons::models::ResourceRow;
    use lingodb_commons::ResourceSetValueConverter;
    use lingodb_store::InMemoryBackend;

    fn seeded_resolver() -> LocaleFallbackResolver {
        let store = Arc::new(ResourceStore::new(
            Arc::new(InMemoryBackend::new()),
            "localizations",
        ));
        store.ensure_table().unwrap();
        for (id, locale, value) in [
            ("Today", "", "Today is great"),
            ("Today", "de", "Heute"),
            ("Yesterday", "", "Yesterday"),
            ("Yesterday", "de-de", "Gestern"),
        ] {
            store
                .upsert_row(ResourceRow::new_text(id, locale, "Resources", value))
                .unwrap();
        }
        LocaleFallbackResolver::new(store, Arc::new(ConverterRegistry::new()))
    }

    fn text(value: &ResourceValue) -> &str {
        value.as_text().expect("expected a text value")
    }

    #[test]
    fn test_resolve_exact_match() {
        let resolver = seeded_resolver();
        let value = resolver.resolve("Today", "Resources", "de").unwrap().unwrap();
        assert_eq!(text(&value), "Heute");
    }

    #[test]
    fn test_resolve_language_prefix_fallback() {
        let resolver = seeded_resolver();
        // no de-de row for Today, the de row wins
        let value = resolver.resolve("Today", "Resources", "de-de").unwrap().unwrap();
        assert_eq!(text(&value), "Heute");
    }

    #[test]
    fn test_resolve_invariant_fallback() {
        let resolver = seeded_resolver();
        let value = resolver.resolve("Today", "Resources", "es-mx").unwrap().unwrap();
        assert_eq!(text(&value), "Today is great");
    }

    #[test]
    fn test_resolve_miss_is_none() {
        let resolver = seeded_resolver();
        assert!(resolver.resolve("Missing", "Resources", "de").unwrap().is_none());
    }

    #[test]
    fn test_resolve_set_most_specific_tier_wins() {
        let resolver = seeded_resolver();
        let set = resolver.resolve_set("Resources", "de-de").unwrap();

        assert_eq!(set.len(), 2);
        // de row beats invariant for Today; de-de exact beats invariant for Yesterday
        assert_eq!(text(&set["Today"]), "Heute");
        assert_eq!(text(&set["Yesterday"]), "Gestern");

        // for plain de, the de-de row is off the chain
        let set = resolver.resolve_set("Resources", "de").unwrap();
        assert_eq!(text(&set["Yesterday"]), "Yesterday");
    }

    #[test]
    fn test_resolve_set_invariant_only() {
        let resolver = seeded_resolver();
        let set = resolver.resolve_set("Resources", "").unwrap();
        assert_eq!(text(&set["Today"]), "Today is great");
        assert_eq!(text(&set["Yesterday"]), "Yesterday");
    }

    #[test]
    fn test_resolve_set_each_id_once() {
        let resolver = seeded_resolver();
        let set = resolver.resolve_set("Resources", "de-de").unwrap();
        let mut ids: Vec<&str> = set.keys().map(String::as_str).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["Today", "Yesterday"]);
    }

    #[test]
    fn test_resolve_set_decodes_winner() {
        // The decoded value must actually be used, including for serialized
        // payloads that override an invariant text row.
        let store = Arc::new(ResourceStore::new(
            Arc::new(InMemoryBackend::new()),
            "localizations",
        ));
        store.ensure_table().unwrap();
        store
            .upsert_row(ResourceRow::new_text("Limits", "", "Resources", "none"))
            .unwrap();
        let mut row = ResourceRow::new_text("Limits", "de", "Resources", "");
        row.resource_type = ResourceType::Serialized;
        row.value = Some(r#"{"max":3}"#.to_string());
        store.upsert_row(row).unwrap();

        let resolver =
            LocaleFallbackResolver::new(store, Arc::new(ConverterRegistry::new()));
        let set = resolver.resolve_set("Resources", "de").unwrap();
        assert_eq!(
            set["Limits"],
            ResourceValue::Json(serde_json::json!({"max": 3}))
        );
    }

    struct Suffixing;

    impl ResourceSetValueConverter for Suffixing {
        fn value_type(&self) -> i32 {
            7
        }

        fn convert(&self, value: &str, _resource_id: &str) -> String {
            format!("{value}!")
        }
    }

    #[test]
    fn test_resolve_set_applies_value_converters() {
        let store = Arc::new(ResourceStore::new(
            Arc::new(InMemoryBackend::new()),
            "localizations",
        ));
        store.ensure_table().unwrap();
        let mut row = ResourceRow::new_text("Greeting", "", "Resources", "hello");
        row.value_type = 7;
        store.upsert_row(row).unwrap();

        let mut converters = ConverterRegistry::new();
        converters.register(Arc::new(Suffixing));
        let resolver = LocaleFallbackResolver::new(store, Arc::new(converters));

        let set = resolver.resolve_set("Resources", "").unwrap();
        assert_eq!(text(&set["Greeting"]), "hello!");
    }
}
