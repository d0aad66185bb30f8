//! In-memory storage backend.
//!
//! Each partition is a `BTreeMap`, which gives the ascending-key scans the
//! [`StorageBackend`] contract requires for free. Used by the test suites
//! and by embedded deployments that do not need durability.

use crate::storage::{Operation, Partition, Result, StorageBackend, StoreError};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

type PartitionMap = BTreeMap<Vec<u8>, Vec<u8>>;

/// Thread-safe in-memory backend.
#[derive(Default)]
pub struct InMemoryBackend {
    partitions: RwLock<HashMap<String, PartitionMap>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in a partition, for tests and diagnostics.
    pub fn len(&self, partition: &Partition) -> usize {
        self.partitions
            .read()
            .get(partition.name())
            .map_or(0, |p| p.len())
    }

    pub fn is_empty(&self, partition: &Partition) -> bool {
        self.len(partition) == 0
    }
}

impl StorageBackend for InMemoryBackend {
    fn get(&self, partition: &Partition, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let partitions = self.partitions.read();
        let map = partitions
            .get(partition.name())
            .ok_or_else(|| StoreError::PartitionNotFound(partition.name().to_string()))?;
        Ok(map.get(key).cloned())
    }

    fn put(&self, partition: &Partition, key: &[u8], value: &[u8]) -> Result<()> {
        let mut partitions = self.partitions.write();
        let map = partitions
            .get_mut(partition.name())
            .ok_or_else(|| StoreError::PartitionNotFound(partition.name().to_string()))?;
        map.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, partition: &Partition, key: &[u8]) -> Result<()> {
        let mut partitions = self.partitions.write();
        let map = partitions
            .get_mut(partition.name())
            .ok_or_else(|| StoreError::PartitionNotFound(partition.name().to_string()))?;
        map.remove(key);
        Ok(())
    }

    fn batch(&self, operations: Vec<Operation>) -> Result<()> {
        // One write lock across the whole batch makes it atomic; validate
        // every target partition before touching any data so a bad
        // operation leaves the store unchanged.
        let mut partitions = self.partitions.write();
        for op in &operations {
            let name = match op {
                Operation::Put { partition, .. } | Operation::Delete { partition, .. } => {
                    partition.name()
                }
            };
            if !partitions.contains_key(name) {
                return Err(StoreError::PartitionNotFound(name.to_string()));
            }
        }
        for op in operations {
            match op {
                Operation::Put {
                    partition,
                    key,
                    value,
                } => {
                    partitions
                        .get_mut(partition.name())
                        .expect("partition checked above")
                        .insert(key, value);
                }
                Operation::Delete { partition, key } => {
                    partitions
                        .get_mut(partition.name())
                        .expect("partition checked above")
                        .remove(&key);
                }
            }
        }
        Ok(())
    }

    fn scan(
        &self,
        partition: &Partition,
        prefix: Option<&[u8]>,
        limit: Option<usize>,
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let partitions = self.partitions.read();
        let map = partitions
            .get(partition.name())
            .ok_or_else(|| StoreError::PartitionNotFound(partition.name().to_string()))?;

        let limit = limit.unwrap_or(usize::MAX);
        let results = match prefix {
            Some(prefix) => map
                .range(prefix.to_vec()..)
                .take_while(|(k, _)| k.starts_with(prefix))
                .take(limit)
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            None => map
                .iter()
                .take(limit)
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        };
        Ok(results)
    }

    fn partition_exists(&self, partition: &Partition) -> bool {
        self.partitions.read().contains_key(partition.name())
    }

    fn create_partition(&self, partition: &Partition) -> Result<()> {
        self.partitions
            .write()
            .entry(partition.name().to_string())
            .or_default();
        Ok(())
    }

    fn drop_partition(&self, partition: &Partition) -> Result<()> {
        self.partitions.write().remove(partition.name());
        Ok(())
    }

    fn list_partitions(&self) -> Result<Vec<Partition>> {
        let mut names: Vec<String> = self.partitions.read().keys().cloned().collect();
        names.sort();
        Ok(names.into_iter().map(Partition::new).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend_with(partition: &Partition) -> InMemoryBackend {
        let backend = InMemoryBackend::new();
        backend.create_partition(partition).unwrap();
        backend
    }

    #[test]
    fn test_put_get_delete() {
        let partition = Partition::new("test");
        let backend = backend_with(&partition);

        backend.put(&partition, b"k1", b"v1").unwrap();
        assert_eq!(backend.get(&partition, b"k1").unwrap(), Some(b"v1".to_vec()));

        backend.delete(&partition, b"k1").unwrap();
        assert_eq!(backend.get(&partition, b"k1").unwrap(), None);

        // delete is idempotent
        backend.delete(&partition, b"k1").unwrap();
    }

    #[test]
    fn test_missing_partition_errors() {
        let backend = InMemoryBackend::new();
        let partition = Partition::new("missing");
        assert!(matches!(
            backend.get(&partition, b"k"),
            Err(StoreError::PartitionNotFound(_))
        ));
    }

    #[test]
    fn test_scan_is_ordered_and_prefix_bounded() {
        let partition = Partition::new("test");
        let backend = backend_with(&partition);

        backend.put(&partition, b"b\x001", b"3").unwrap();
        backend.put(&partition, b"a\x002", b"2").unwrap();
        backend.put(&partition, b"a\x001", b"1").unwrap();

        let all = backend.scan(&partition, None, None).unwrap();
        let keys: Vec<&[u8]> = all.iter().map(|(k, _)| k.as_slice()).collect();
        assert_eq!(keys, vec![b"a\x001" as &[u8], b"a\x002", b"b\x001"]);

        let a_only = backend.scan(&partition, Some(b"a\x00"), None).unwrap();
        assert_eq!(a_only.len(), 2);

        let limited = backend.scan(&partition, None, Some(1)).unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn test_batch_is_atomic_on_bad_partition() {
        let partition = Partition::new("test");
        let backend = backend_with(&partition);
        backend.put(&partition, b"keep", b"v").unwrap();

        let result = backend.batch(vec![
            Operation::Delete {
                partition: partition.clone(),
                key: b"keep".to_vec(),
            },
            Operation::Put {
                partition: Partition::new("missing"),
                key: b"k".to_vec(),
                value: b"v".to_vec(),
            },
        ]);
        assert!(result.is_err());
        // The failed batch must not have applied its first operation
        assert_eq!(backend.get(&partition, b"keep").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn test_partition_lifecycle() {
        let backend = InMemoryBackend::new();
        let partition = Partition::new("p1");

        assert!(!backend.partition_exists(&partition));
        backend.create_partition(&partition).unwrap();
        assert!(backend.partition_exists(&partition));

        // create is idempotent and preserves data
        backend.put(&partition, b"k", b"v").unwrap();
        backend.create_partition(&partition).unwrap();
        assert_eq!(backend.get(&partition, b"k").unwrap(), Some(b"v".to_vec()));

        backend.drop_partition(&partition).unwrap();
        assert!(!backend.partition_exists(&partition));
    }
}
