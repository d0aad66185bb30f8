//! Administrative operations over the resource store.
//!
//! `AdminService` is orchestration only: it translates editor intents into
//! store calls, shapes data for the admin grid, and gates the schema-level
//! operations behind configuration. It never invalidates caches implicitly;
//! the editor triggers an explicit [`AdminService::reload`] after bulk
//! edits.

use crate::cache::ResourceManagerRegistry;
use crate::error::{LingoError, Result};
use lingodb_commons::models::{ResourceListingFilter, ResourceRow};
use lingodb_commons::{locale, LocalizationConfig};
use lingodb_store::{ResourceStore, UpsertOutcome};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// One cell of the admin grid: a resource value in one locale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicResourceItem {
    pub resource_id: String,
    pub locale_id: String,
    pub resource_set: String,
    pub value: Option<String>,
}

/// One grid row: every locale variant of a resource id, padded so each
/// locale of the set has a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridResource {
    pub resource_id: String,
    pub resources: Vec<BasicResourceItem>,
}

/// The full editor grid for one resource set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceGrid {
    pub resource_set: String,
    pub locales: Vec<String>,
    pub resources: Vec<GridResource>,
}

/// Locale listing entry with a human-readable name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocaleInfo {
    pub locale_id: String,
    pub display_name: String,
}

/// Orchestrates admin edits against the store and the cache registry.
pub struct AdminService {
    store: Arc<ResourceStore>,
    registry: Arc<ResourceManagerRegistry>,
    config: LocalizationConfig,
}

impl AdminService {
    pub fn new(
        store: Arc<ResourceStore>,
        registry: Arc<ResourceManagerRegistry>,
        config: LocalizationConfig,
    ) -> Self {
        Self {
            store,
            registry,
            config,
        }
    }

    // ===== Edits =====

    /// Upserts a single string resource. An empty value means "remove this
    /// locale's override": the row is deleted instead.
    pub fn update_resource_string(
        &self,
        resource_id: &str,
        resource_set: &str,
        locale_id: &str,
        value: &str,
        comment: Option<&str>,
    ) -> Result<()> {
        if value.is_empty() {
            self.store
                .delete_row(resource_id, resource_set, Some(locale_id))?;
            return Ok(());
        }
        let mut row = ResourceRow::new_text(resource_id, locale_id, resource_set, value);
        row.comment = comment.map(str::to_string);
        self.store.upsert_row(row)?;
        Ok(())
    }

    /// Rewrites only the comment of an existing row.
    pub fn update_comment(
        &self,
        resource_id: &str,
        resource_set: &str,
        locale_id: &str,
        comment: &str,
    ) -> Result<()> {
        let mut row = self
            .store
            .get_row(resource_id, resource_set, locale_id)?
            .ok_or_else(|| {
                LingoError::NotFound(format!(
                    "resource {resource_id:?} ({locale_id:?}) in set {resource_set:?}"
                ))
            })?;
        row.comment = Some(comment.to_string());
        self.store.upsert_row(row)?;
        Ok(())
    }

    /// Upserts a full row (file resources, serialized values, value types).
    pub fn upsert_resource(&self, row: ResourceRow) -> Result<UpsertOutcome> {
        Ok(self.store.upsert_row(row)?)
    }

    /// Deletes one locale variant, or all variants when no locale is given.
    pub fn delete_resource(
        &self,
        resource_id: &str,
        resource_set: &str,
        locale_id: Option<&str>,
    ) -> Result<bool> {
        Ok(self.store.delete_row(resource_id, resource_set, locale_id)?)
    }

    pub fn rename_resource(
        &self,
        resource_id: &str,
        new_resource_id: &str,
        resource_set: &str,
    ) -> Result<()> {
        self.store
            .rename_resource_id(resource_id, new_resource_id, resource_set)?;
        Ok(())
    }

    pub fn rename_property(
        &self,
        property: &str,
        new_property: &str,
        resource_set: &str,
    ) -> Result<()> {
        self.store
            .rename_property(property, new_property, resource_set)?;
        Ok(())
    }

    pub fn delete_resource_set(&self, resource_set: &str) -> Result<()> {
        self.store.delete_resource_set(resource_set)?;
        Ok(())
    }

    pub fn rename_resource_set(&self, old_name: &str, new_name: &str) -> Result<()> {
        self.store.rename_resource_set(old_name, new_name)?;
        Ok(())
    }

    /// Drops every cached resolved set in every registered manager. Always
    /// succeeds.
    pub fn reload(&self) {
        self.registry.invalidate_all();
    }

    // ===== Schema operations (config-gated) =====

    pub fn create_table(&self) -> Result<()> {
        self.ensure_schema_operations_allowed()?;
        self.store.create_table()?;
        Ok(())
    }

    pub fn table_exists(&self) -> bool {
        self.store.table_exists()
    }

    pub fn create_backup(&self) -> Result<()> {
        self.ensure_schema_operations_allowed()?;
        self.store.create_backup()?;
        Ok(())
    }

    pub fn restore_backup(&self) -> Result<()> {
        self.ensure_schema_operations_allowed()?;
        self.store.restore_backup()?;
        Ok(())
    }

    fn ensure_schema_operations_allowed(&self) -> Result<()> {
        if !self.config.allow_schema_operations {
            return Err(LingoError::PermissionDenied(
                "schema operations are disabled by configuration".to_string(),
            ));
        }
        Ok(())
    }

    // ===== Listings =====

    pub fn resource_sets(&self, filter: ResourceListingFilter) -> Result<Vec<String>> {
        Ok(self.store.list_resource_sets(filter)?)
    }

    pub fn resource_ids(
        &self,
        resource_set: &str,
    ) -> Result<Vec<lingodb_commons::models::ResourceIdItem>> {
        Ok(self.store.list_resource_ids(resource_set)?)
    }

    /// Locales of a set with display names, for the locale picker.
    pub fn locales(&self, resource_set: &str) -> Result<Vec<LocaleInfo>> {
        Ok(self
            .store
            .list_locales(resource_set)?
            .into_iter()
            .map(|locale_id| LocaleInfo {
                display_name: locale::display_name(&locale_id),
                locale_id,
            })
            .collect())
    }

    /// All locale variants of one id, padded with empty rows for every
    /// locale present in the set.
    pub fn resource_items(
        &self,
        resource_id: &str,
        resource_set: &str,
    ) -> Result<Vec<ResourceRow>> {
        Ok(self.store.get_resource_items(resource_id, resource_set, true)?)
    }

    /// `(locale, value)` pairs of one id, padded the same way.
    pub fn resource_strings(
        &self,
        resource_id: &str,
        resource_set: &str,
    ) -> Result<Vec<(String, String)>> {
        Ok(self
            .store
            .get_resource_strings(resource_id, resource_set, true)?)
    }

    /// The exact stored string for one (id, set, locale), no fallback.
    pub fn resource_string(
        &self,
        resource_id: &str,
        resource_set: &str,
        locale_id: &str,
    ) -> Result<Option<String>> {
        Ok(self
            .store
            .get_resource_string(resource_id, resource_set, locale_id)?)
    }

    pub fn resource_item(
        &self,
        resource_id: &str,
        resource_set: &str,
        locale_id: &str,
    ) -> Result<Option<ResourceRow>> {
        Ok(self.store.get_row(resource_id, resource_set, locale_id)?)
    }

    /// Reshapes a whole set for the editor grid: one row per resource id,
    /// one cell per locale of the set, missing cells padded with empty
    /// values, everything ordered by `(resource_id, locale_id)`.
    pub fn resource_grid(&self, resource_set: &str) -> Result<ResourceGrid> {
        let rows = self
            .store
            .get_all_rows(Some(resource_set), ResourceListingFilter::All)?;

        let locales: BTreeSet<String> = rows.iter().map(|r| r.locale_id.clone()).collect();
        let mut by_id: BTreeMap<String, BTreeMap<String, BasicResourceItem>> = BTreeMap::new();
        for row in rows {
            by_id.entry(row.resource_id.clone()).or_default().insert(
                row.locale_id.clone(),
                BasicResourceItem {
                    resource_id: row.resource_id,
                    locale_id: row.locale_id,
                    resource_set: row.resource_set,
                    value: row.value,
                },
            );
        }

        let resources = by_id
            .into_iter()
            .map(|(resource_id, cells)| GridResource {
                resources: locales
                    .iter()
                    .map(|locale_id| {
                        cells.get(locale_id).cloned().unwrap_or_else(|| {
                            BasicResourceItem {
                                resource_id: resource_id.clone(),
                                locale_id: locale_id.clone(),
                                resource_set: resource_set.to_string(),
                                value: None,
                            }
                        })
                    })
                    .collect(),
                resource_id,
            })
            .collect();

        Ok(ResourceGrid {
            resource_set: resource_set.to_string(),
            locales: locales.into_iter().collect(),
            resources,
        })
    }
}
