//! Durable storage for localization resources.
//!
//! Two layers live here:
//!
//! - [`StorageBackend`]: a pluggable, partitioned, ordered key/value store.
//!   The relational database of a production deployment sits behind this
//!   trait; the crate ships [`InMemoryBackend`] for tests and embedded use.
//! - [`ResourceStore`]: typed CRUD over resource rows with the semantics
//!   the resolver and admin layers rely on: key uniqueness by construction,
//!   cascading invariant deletes, bulk renames, backup/restore and the
//!   ordered fallback-chain query.
//!
//! No locale-fallback logic lives in this crate; the store only answers
//! exact queries and ordered scans.

pub mod in_memory;
pub mod key_encoding;
pub mod resource_store;
pub mod storage;

pub use in_memory::InMemoryBackend;
pub use resource_store::{ResourceStore, UpsertOutcome};
pub use storage::{Operation, Partition, Result, StorageBackend, StoreError};
