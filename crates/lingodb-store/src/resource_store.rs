//! Typed CRUD over the localization resource table.
//!
//! `ResourceStore` owns the mapping between [`ResourceRow`] values and the
//! backend's key/value representation. The `(resource_set, resource_id,
//! locale_id)` uniqueness invariant is structural: that tuple *is* the row
//! key, so a second write to the same combination replaces the first.
//!
//! Two semantics here are easy to miss:
//!
//! - Deleting a resource without naming a locale (or naming the invariant
//!   locale) cascades to every locale variant of that id within the set.
//!   Deleting a specific locale removes exactly that variant.
//! - [`ResourceStore::get_rows_for_fallback_chain`] is the resolver's single
//!   normalized query: all rows of a set whose locale is in the requested
//!   fallback chain, ordered by `(resource_id ASC, locale_id DESC)` so a
//!   streaming scan sees each id's most specific locale first.

use crate::key_encoding::{
    parse_row_key, row_key, set_id_prefix, set_prefix, validate_component,
};
use crate::storage::{Operation, Partition, Result, StorageBackend, StoreError};
use chrono::Utc;
use lingodb_commons::locale;
use lingodb_commons::models::{ResourceIdItem, ResourceListingFilter, ResourceRow};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Outcome of an upsert: whether the row existed before the write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Typed resource CRUD over a [`StorageBackend`] partition.
pub struct ResourceStore {
    backend: Arc<dyn StorageBackend>,
    partition: Partition,
    backup_partition: Partition,
}

impl ResourceStore {
    /// Creates a store over the named resource table. Does not create the
    /// partition; call [`ResourceStore::ensure_table`] or
    /// [`ResourceStore::create_table`] first.
    pub fn new(backend: Arc<dyn StorageBackend>, table_name: &str) -> Self {
        Self {
            partition: Partition::new(table_name),
            backup_partition: Partition::new(format!("{table_name}_backup")),
            backend,
        }
    }

    /// The partition this store reads and writes.
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    // ===== Table lifecycle =====

    /// True when the resource table partition exists.
    pub fn table_exists(&self) -> bool {
        self.backend.partition_exists(&self.partition)
    }

    /// Creates the resource table, erroring when it already exists. This is
    /// the explicit admin operation; startup code uses
    /// [`ResourceStore::ensure_table`] instead.
    pub fn create_table(&self) -> Result<()> {
        if self.table_exists() {
            return Err(StoreError::AlreadyExists(format!(
                "resource table {} exists already",
                self.partition
            )));
        }
        self.backend.create_partition(&self.partition)
    }

    /// Creates the resource table when absent; no-op otherwise.
    pub fn ensure_table(&self) -> Result<()> {
        self.backend.create_partition(&self.partition)
    }

    // ===== Reads =====

    /// Exact-match lookup of one row. No locale fallback.
    pub fn get_row(
        &self,
        resource_id: &str,
        resource_set: &str,
        locale_id: &str,
    ) -> Result<Option<ResourceRow>> {
        self.validate_key(resource_id, resource_set)?;
        let locale_id = locale::normalize(locale_id);
        let key = row_key(resource_set, resource_id, &locale_id);
        match self.backend.get(&self.partition, &key)? {
            Some(bytes) => Ok(Some(self.decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// The textual value of an exact row, when present.
    pub fn get_resource_string(
        &self,
        resource_id: &str,
        resource_set: &str,
        locale_id: &str,
    ) -> Result<Option<String>> {
        Ok(self
            .get_row(resource_id, resource_set, locale_id)?
            .and_then(|row| row.value))
    }

    /// True when the exact row exists.
    pub fn resource_exists(
        &self,
        resource_id: &str,
        resource_set: &str,
        locale_id: &str,
    ) -> Result<bool> {
        Ok(self.get_row(resource_id, resource_set, locale_id)?.is_some())
    }

    /// All rows of a set for exactly one locale. The empty string returns
    /// exactly the invariant rows, not a merged view.
    pub fn get_rows_for_set_and_locale(
        &self,
        resource_set: &str,
        locale_id: &str,
    ) -> Result<Vec<ResourceRow>> {
        validate_component("resource set", resource_set)?;
        let locale_id = locale::normalize(locale_id);
        let rows = self.scan_set(resource_set)?;
        Ok(rows
            .into_iter()
            .filter(|row| row.locale_id == locale_id)
            .collect())
    }

    /// The resolver's normalized query: every row of the set whose locale is
    /// on the fallback chain of `locale_id` (exact, language prefix,
    /// invariant), in one scan, ordered by `(resource_id ASC, locale_id
    /// DESC)`.
    pub fn get_rows_for_fallback_chain(
        &self,
        resource_set: &str,
        locale_id: &str,
    ) -> Result<Vec<ResourceRow>> {
        validate_component("resource set", resource_set)?;
        let chain = locale::fallback_chain(locale_id);
        let mut rows: Vec<ResourceRow> = self
            .scan_set(resource_set)?
            .into_iter()
            .filter(|row| chain.iter().any(|tier| *tier == row.locale_id))
            .collect();
        rows.sort_by(|a, b| {
            a.resource_id
                .cmp(&b.resource_id)
                .then_with(|| b.locale_id.cmp(&a.locale_id))
        });
        Ok(rows)
    }

    /// All locale variants of one resource id, ordered by locale. When
    /// `for_all_set_locales` is set, locales present elsewhere in the set
    /// but missing for this id are padded with empty rows; the admin grid
    /// wants one cell per (id, locale).
    pub fn get_resource_items(
        &self,
        resource_id: &str,
        resource_set: &str,
        for_all_set_locales: bool,
    ) -> Result<Vec<ResourceRow>> {
        self.validate_key(resource_id, resource_set)?;
        let prefix = set_id_prefix(resource_set, resource_id);
        let mut items = self.scan_prefix(&prefix)?;

        if for_all_set_locales {
            let present: BTreeSet<String> =
                items.iter().map(|row| row.locale_id.clone()).collect();
            for locale_id in self.list_locales(resource_set)? {
                if !present.contains(&locale_id) {
                    items.push(ResourceRow::new_text(resource_id, locale_id, resource_set, ""));
                }
            }
        }
        items.sort_by(|a, b| a.locale_id.cmp(&b.locale_id));
        Ok(items)
    }

    /// `(locale_id, value)` pairs for every locale variant of one id.
    pub fn get_resource_strings(
        &self,
        resource_id: &str,
        resource_set: &str,
        for_all_set_locales: bool,
    ) -> Result<Vec<(String, String)>> {
        let items =
            self.get_resource_items(resource_id, resource_set, for_all_set_locales)?;
        Ok(items
            .into_iter()
            .map(|row| (row.locale_id, row.value.unwrap_or_default()))
            .collect())
    }

    /// Distinct resource ids of a set with a has-any-value flag, ordered.
    pub fn list_resource_ids(&self, resource_set: &str) -> Result<Vec<ResourceIdItem>> {
        validate_component("resource set", resource_set)?;
        let mut by_id: BTreeMap<String, bool> = BTreeMap::new();
        for row in self.scan_set(resource_set)? {
            let has_value = row.has_value();
            by_id
                .entry(row.resource_id)
                .and_modify(|v| *v |= has_value)
                .or_insert(has_value);
        }
        Ok(by_id
            .into_iter()
            .map(|(resource_id, has_value)| ResourceIdItem {
                resource_id,
                has_value,
            })
            .collect())
    }

    /// Distinct resource-set names passing the filter, ordered.
    pub fn list_resource_sets(
        &self,
        filter: ResourceListingFilter,
    ) -> Result<Vec<String>> {
        let mut sets = BTreeSet::new();
        for (key, _) in self.backend.scan(&self.partition, None, None)? {
            let (set, _, _) = parse_row_key(&key)?;
            if filter.matches(&set) {
                sets.insert(set);
            }
        }
        Ok(sets.into_iter().collect())
    }

    /// Distinct locale tags present in a set, ordered (invariant first).
    pub fn list_locales(&self, resource_set: &str) -> Result<Vec<String>> {
        validate_component("resource set", resource_set)?;
        let mut locales = BTreeSet::new();
        for row in self.scan_set(resource_set)? {
            locales.insert(row.locale_id);
        }
        Ok(locales.into_iter().collect())
    }

    /// Every row, optionally restricted to one set, passing the listing
    /// filter, ordered by `(resource_set, locale_id, resource_id)`. This is
    /// the admin grid's backing query.
    pub fn get_all_rows(
        &self,
        resource_set: Option<&str>,
        filter: ResourceListingFilter,
    ) -> Result<Vec<ResourceRow>> {
        let mut rows = match resource_set {
            Some(set) => {
                validate_component("resource set", set)?;
                self.scan_set(set)?
            }
            None => {
                let mut all = Vec::new();
                for (_, value) in self.backend.scan(&self.partition, None, None)? {
                    all.push(self.decode(&value)?);
                }
                all
            }
        };
        rows.retain(|row| filter.matches(&row.resource_set));
        rows.sort_by(|a, b| {
            a.resource_set
                .cmp(&b.resource_set)
                .then_with(|| a.locale_id.cmp(&b.locale_id))
                .then_with(|| a.resource_id.cmp(&b.resource_id))
        });
        Ok(rows)
    }

    // ===== Writes =====

    /// Inserts or replaces the row for the row's key tuple. The whole row is
    /// rewritten and `updated` is stamped with the current UTC time.
    pub fn upsert_row(&self, mut row: ResourceRow) -> Result<UpsertOutcome> {
        self.validate_key(&row.resource_id, &row.resource_set)?;
        validate_component("locale id", &row.locale_id)?;
        row.locale_id = locale::normalize(&row.locale_id);
        if !locale::is_valid_locale(&row.locale_id) {
            return Err(StoreError::InvalidInput(format!(
                "invalid locale id: {:?}",
                row.locale_id
            )));
        }
        row.updated = Utc::now();

        let key = row_key(&row.resource_set, &row.resource_id, &row.locale_id);
        let outcome = if self.backend.get(&self.partition, &key)?.is_some() {
            UpsertOutcome::Updated
        } else {
            UpsertOutcome::Inserted
        };
        let value = self.encode(&row)?;
        self.backend.put(&self.partition, &key, &value)?;
        log::debug!(
            "upsert {:?}/{:?}/{:?}: {:?}",
            row.resource_set,
            row.resource_id,
            row.locale_id,
            outcome
        );
        Ok(outcome)
    }

    /// Deletes resource rows. With a non-empty locale, exactly that variant
    /// is removed; with `None` or the invariant locale, every locale variant
    /// of the id within the set is removed (cascade). Returns whether any
    /// row was deleted.
    pub fn delete_row(
        &self,
        resource_id: &str,
        resource_set: &str,
        locale_id: Option<&str>,
    ) -> Result<bool> {
        self.validate_key(resource_id, resource_set)?;
        match locale_id.map(locale::normalize).filter(|l| !l.is_empty()) {
            Some(locale_id) => {
                let key = row_key(resource_set, resource_id, &locale_id);
                let existed = self.backend.get(&self.partition, &key)?.is_some();
                self.backend.delete(&self.partition, &key)?;
                Ok(existed)
            }
            None => {
                let prefix = set_id_prefix(resource_set, resource_id);
                let entries = self.backend.scan(&self.partition, Some(&prefix), None)?;
                if entries.is_empty() {
                    return Ok(false);
                }
                let ops = entries
                    .into_iter()
                    .map(|(key, _)| Operation::Delete {
                        partition: self.partition.clone(),
                        key,
                    })
                    .collect();
                self.backend.batch(ops)?;
                Ok(true)
            }
        }
    }

    /// Renames a resource id across all its locale variants. Errors with
    /// `NotFound` when the id has no rows, `AlreadyExists` when the target
    /// id already carries a conflicting variant.
    pub fn rename_resource_id(
        &self,
        resource_id: &str,
        new_resource_id: &str,
        resource_set: &str,
    ) -> Result<()> {
        self.validate_key(resource_id, resource_set)?;
        self.validate_key(new_resource_id, resource_set)?;

        let prefix = set_id_prefix(resource_set, resource_id);
        let entries = self.backend.scan(&self.partition, Some(&prefix), None)?;
        if entries.is_empty() {
            return Err(StoreError::NotFound(format!(
                "invalid resource id: {resource_id:?}"
            )));
        }

        let mut ops = Vec::with_capacity(entries.len() * 2);
        for (key, value) in entries {
            let mut row = self.decode(&value)?;
            row.resource_id = new_resource_id.to_string();
            let new_key = row_key(resource_set, new_resource_id, &row.locale_id);
            if self.backend.get(&self.partition, &new_key)?.is_some() {
                return Err(StoreError::AlreadyExists(format!(
                    "resource id {new_resource_id:?} already exists for locale {:?}",
                    row.locale_id
                )));
            }
            ops.push(Operation::Delete {
                partition: self.partition.clone(),
                key,
            });
            ops.push(Operation::Put {
                partition: self.partition.clone(),
                key: new_key,
                value: self.encode(&row)?,
            });
        }
        self.backend.batch(ops)
    }

    /// Renames every id sharing a dotted prefix: `property.`-prefixed ids
    /// become `new_property.`-prefixed. Zero matches is not an error.
    pub fn rename_property(
        &self,
        property: &str,
        new_property: &str,
        resource_set: &str,
    ) -> Result<()> {
        self.validate_key(property, resource_set)?;
        self.validate_key(new_property, resource_set)?;

        let old_prefix = format!("{property}.");
        let new_prefix = format!("{new_property}.");

        let mut ops = Vec::new();
        for (key, value) in self
            .backend
            .scan(&self.partition, Some(&set_prefix(resource_set)), None)?
        {
            let mut row = self.decode(&value)?;
            let Some(rest) = row.resource_id.strip_prefix(&old_prefix) else {
                continue;
            };
            row.resource_id = format!("{new_prefix}{rest}");
            ops.push(Operation::Delete {
                partition: self.partition.clone(),
                key,
            });
            ops.push(Operation::Put {
                partition: self.partition.clone(),
                key: row_key(resource_set, &row.resource_id, &row.locale_id),
                value: self.encode(&row)?,
            });
        }
        if ops.is_empty() {
            return Ok(());
        }
        self.backend.batch(ops)
    }

    /// Deletes every row of a set. Errors with `NotFound` when the set has
    /// no rows.
    pub fn delete_resource_set(&self, resource_set: &str) -> Result<()> {
        validate_component("resource set", resource_set)?;
        let entries = self
            .backend
            .scan(&self.partition, Some(&set_prefix(resource_set)), None)?;
        if entries.is_empty() {
            return Err(StoreError::NotFound(format!(
                "no matching resource set: {resource_set:?}"
            )));
        }
        let ops = entries
            .into_iter()
            .map(|(key, _)| Operation::Delete {
                partition: self.partition.clone(),
                key,
            })
            .collect();
        self.backend.batch(ops)
    }

    /// Moves every row of a set under a new set name. Errors with `NotFound`
    /// when the old set is empty and `AlreadyExists` on key collisions in
    /// the target set.
    pub fn rename_resource_set(&self, old_name: &str, new_name: &str) -> Result<()> {
        validate_component("resource set", old_name)?;
        validate_component("resource set", new_name)?;
        if new_name.is_empty() {
            return Err(StoreError::InvalidInput(
                "new resource set name must not be empty".to_string(),
            ));
        }

        let entries = self
            .backend
            .scan(&self.partition, Some(&set_prefix(old_name)), None)?;
        if entries.is_empty() {
            return Err(StoreError::NotFound(format!(
                "no matching resource set: {old_name:?}"
            )));
        }

        let mut ops = Vec::with_capacity(entries.len() * 2);
        for (key, value) in entries {
            let mut row = self.decode(&value)?;
            row.resource_set = new_name.to_string();
            let new_key = row_key(new_name, &row.resource_id, &row.locale_id);
            if self.backend.get(&self.partition, &new_key)?.is_some() {
                return Err(StoreError::AlreadyExists(format!(
                    "resource {:?} ({:?}) already exists in set {new_name:?}",
                    row.resource_id, row.locale_id
                )));
            }
            ops.push(Operation::Delete {
                partition: self.partition.clone(),
                key,
            });
            ops.push(Operation::Put {
                partition: self.partition.clone(),
                key: new_key,
                value: self.encode(&row)?,
            });
        }
        self.backend.batch(ops)
    }

    /// Bulk-writes a `resource id → value` map for one (set, locale),
    /// atomically. With `delete_first`, rows of that (set, locale) absent
    /// from the map are removed, which is the resx import contract.
    pub fn generate_resources(
        &self,
        resources: &[(String, String)],
        locale_id: &str,
        resource_set: &str,
        delete_first: bool,
    ) -> Result<()> {
        validate_component("resource set", resource_set)?;
        if resource_set.is_empty() {
            return Err(StoreError::InvalidInput(
                "resource set must not be empty".to_string(),
            ));
        }
        let locale_id = locale::normalize(locale_id);
        if !locale::is_valid_locale(&locale_id) {
            return Err(StoreError::InvalidInput(format!(
                "invalid locale id: {locale_id:?}"
            )));
        }

        let mut ops = Vec::new();
        if delete_first {
            for row in self.get_rows_for_set_and_locale(resource_set, &locale_id)? {
                ops.push(Operation::Delete {
                    partition: self.partition.clone(),
                    key: row_key(resource_set, &row.resource_id, &row.locale_id),
                });
            }
        }
        for (resource_id, value) in resources {
            self.validate_key(resource_id, resource_set)?;
            let mut row =
                ResourceRow::new_text(resource_id, &locale_id, resource_set, value);
            row.updated = Utc::now();
            ops.push(Operation::Put {
                partition: self.partition.clone(),
                key: row_key(resource_set, resource_id, &locale_id),
                value: self.encode(&row)?,
            });
        }
        if ops.is_empty() {
            return Ok(());
        }
        self.backend.batch(ops)
    }

    /// Upserts many rows in one atomic batch. Rows are validated and
    /// normalized the same way [`ResourceStore::upsert_row`] does; `updated`
    /// is stamped on every row.
    pub fn batch_upsert(&self, rows: Vec<ResourceRow>) -> Result<()> {
        let mut ops = Vec::with_capacity(rows.len());
        for mut row in rows {
            self.validate_key(&row.resource_id, &row.resource_set)?;
            validate_component("locale id", &row.locale_id)?;
            row.locale_id = locale::normalize(&row.locale_id);
            if !locale::is_valid_locale(&row.locale_id) {
                return Err(StoreError::InvalidInput(format!(
                    "invalid locale id: {:?}",
                    row.locale_id
                )));
            }
            row.updated = Utc::now();
            ops.push(Operation::Put {
                partition: self.partition.clone(),
                key: row_key(&row.resource_set, &row.resource_id, &row.locale_id),
                value: self.encode(&row)?,
            });
        }
        if ops.is_empty() {
            return Ok(());
        }
        self.backend.batch(ops)
    }

    // ===== Backup =====

    /// Snapshots the live table into the backup partition, replacing any
    /// previous backup.
    pub fn create_backup(&self) -> Result<()> {
        let entries = self.backend.scan(&self.partition, None, None)?;
        self.backend.drop_partition(&self.backup_partition)?;
        self.backend.create_partition(&self.backup_partition)?;
        let ops: Vec<Operation> = entries
            .into_iter()
            .map(|(key, value)| Operation::Put {
                partition: self.backup_partition.clone(),
                key,
                value,
            })
            .collect();
        if ops.is_empty() {
            return Ok(());
        }
        self.backend.batch(ops)
    }

    /// Replaces the live table with the backup contents, atomically. Errors
    /// with `NotFound` when no backup exists.
    pub fn restore_backup(&self) -> Result<()> {
        if !self.backend.partition_exists(&self.backup_partition) {
            return Err(StoreError::NotFound(format!(
                "no backup partition: {}",
                self.backup_partition
            )));
        }
        let mut ops: Vec<Operation> = self
            .backend
            .scan(&self.partition, None, None)?
            .into_iter()
            .map(|(key, _)| Operation::Delete {
                partition: self.partition.clone(),
                key,
            })
            .collect();
        for (key, value) in self.backend.scan(&self.backup_partition, None, None)? {
            ops.push(Operation::Put {
                partition: self.partition.clone(),
                key,
                value,
            });
        }
        if ops.is_empty() {
            return Ok(());
        }
        self.backend.batch(ops)
    }

    // ===== Helpers =====

    fn validate_key(&self, resource_id: &str, resource_set: &str) -> Result<()> {
        if resource_id.is_empty() {
            return Err(StoreError::InvalidInput(
                "resource id must not be empty".to_string(),
            ));
        }
        if resource_set.is_empty() {
            return Err(StoreError::InvalidInput(
                "resource set must not be empty".to_string(),
            ));
        }
        validate_component("resource id", resource_id)?;
        validate_component("resource set", resource_set)?;
        Ok(())
    }

    fn scan_set(&self, resource_set: &str) -> Result<Vec<ResourceRow>> {
        self.scan_prefix(&set_prefix(resource_set))
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<ResourceRow>> {
        let mut rows = Vec::new();
        for (_, value) in self.backend.scan(&self.partition, Some(prefix), None)? {
            rows.push(self.decode(&value)?);
        }
        Ok(rows)
    }

    fn encode(&self, row: &ResourceRow) -> Result<Vec<u8>> {
        serde_json::to_vec(row).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<ResourceRow> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}
