//! Storage backend abstraction for pluggable storage implementations.
//!
//! LingoDB treats the actual database engine as an external collaborator:
//! everything the resource store needs is a partitioned key/value table with
//! ordered prefix scans and atomic batches. Different backends map the
//! [`Partition`] concept to their native grouping:
//!
//! - SQL database: table
//! - RocksDB-style engine: column family
//! - In-memory: a named `BTreeMap`
//!
//! Scans return entries in ascending key order; the resource key encoding
//! (see [`crate::key_encoding`]) relies on that to get `ORDER BY
//! resource_id, locale_id` semantics out of a plain prefix scan.

use std::fmt;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Partition (table, column family, namespace) not found
    PartitionNotFound(String),

    /// Generic I/O error from the underlying storage
    Io(String),

    /// Row (de)serialization error
    Serialization(String),

    /// Invalid caller input (empty key component, malformed locale tag)
    InvalidInput(String),

    /// A row or partition the operation requires does not exist
    NotFound(String),

    /// A partition or row the operation would create already exists
    AlreadyExists(String),

    /// Other errors
    Other(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::PartitionNotFound(p) => write!(f, "Partition not found: {}", p),
            StoreError::Io(msg) => write!(f, "I/O error: {}", msg),
            StoreError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            StoreError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            StoreError::NotFound(msg) => write!(f, "Not found: {}", msg),
            StoreError::AlreadyExists(msg) => write!(f, "Already exists: {}", msg),
            StoreError::Other(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// A logical partition of data within a storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Partition {
    name: String,
}

impl Partition {
    /// Creates a new partition handle with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the partition name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl From<&str> for Partition {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Partition {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// A single operation in an atomic batch.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Insert or update a key-value pair
    Put {
        partition: Partition,
        key: Vec<u8>,
        value: Vec<u8>,
    },

    /// Delete a key
    Delete { partition: Partition, key: Vec<u8> },
}

/// Trait for pluggable storage backend implementations.
///
/// Implementations must be thread-safe (`Send + Sync`); the resource store
/// is shared across request-handling threads behind an `Arc`.
///
/// ## Error handling
///
/// - `get`/`delete` on an absent key are not errors (`Ok(None)` / `Ok(())`)
/// - operations on a missing partition return `PartitionNotFound`
/// - `batch` is all-or-nothing; a failed batch must leave the store unchanged
pub trait StorageBackend: Send + Sync {
    /// Retrieves a value by key. `Ok(None)` when the key does not exist.
    fn get(&self, partition: &Partition, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Stores a key-value pair, replacing any existing value.
    fn put(&self, partition: &Partition, key: &[u8], value: &[u8]) -> Result<()>;

    /// Deletes a key. Idempotent: `Ok(())` even when the key is absent.
    fn delete(&self, partition: &Partition, key: &[u8]) -> Result<()>;

    /// Executes multiple operations atomically.
    fn batch(&self, operations: Vec<Operation>) -> Result<()>;

    /// Scans a partition in ascending key order.
    ///
    /// - `prefix`: when set, only keys starting with these bytes are returned
    /// - `limit`: when set, at most this many entries are returned
    fn scan(
        &self,
        partition: &Partition,
        prefix: Option<&[u8]>,
        limit: Option<usize>,
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>>;

    /// Checks whether a partition exists.
    fn partition_exists(&self, partition: &Partition) -> bool;

    /// Creates a partition. Idempotent: `Ok(())` when it already exists.
    fn create_partition(&self, partition: &Partition) -> Result<()>;

    /// Deletes a partition and all its data. Idempotent.
    fn drop_partition(&self, partition: &Partition) -> Result<()>;

    /// Lists all partitions in the backend.
    fn list_partitions(&self) -> Result<Vec<Partition>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_creation() {
        let p1 = Partition::new("localizations");
        assert_eq!(p1.name(), "localizations");

        let p2 = Partition::from("localizations_backup");
        assert_eq!(p2.name(), "localizations_backup");
    }

    #[test]
    fn test_error_display() {
        let err = StoreError::PartitionNotFound("localizations".to_string());
        assert_eq!(err.to_string(), "Partition not found: localizations");

        let err = StoreError::InvalidInput("empty resource id".to_string());
        assert_eq!(err.to_string(), "Invalid input: empty resource id");
    }
}
