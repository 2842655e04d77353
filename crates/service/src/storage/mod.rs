//! Storage abstractions for service layer
//!
//! A store persists one whole collection at a time: no partial reads,
//! no partial writes. Reads fail open to an empty collection; writes
//! report their failure to the caller.

use async_trait::async_trait;

use crate::errors::StoreError;

pub mod json_list_store;
pub mod memory;

pub use json_list_store::JsonListStore;
pub use memory::MemoryListStore;

/// Whole-collection persistence for an ordered list of records.
#[async_trait]
pub trait CollectionStore<T: Send + Sync>: Send + Sync {
    /// Current persisted collection; empty when the backing data is missing or corrupt.
    async fn read(&self) -> Vec<T>;
    /// Like `read`, but reports unreadable or corrupt data instead of hiding it.
    /// A backing file that does not exist yet is an empty collection, not an error.
    async fn try_read(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.read().await)
    }
    /// Replace the persisted collection with `items`.
    async fn write(&self, items: &[T]) -> Result<(), StoreError>;
    /// Reset to an empty collection.
    async fn clear(&self) -> Result<(), StoreError> {
        self.write(&[]).await
    }
}
