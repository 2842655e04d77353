use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::CollectionStore;
use crate::errors::StoreError;

/// In-memory collection store for tests and ephemeral runs.
///
/// `set_fail_writes(true)` makes every subsequent `write` fail, which lets
/// callers exercise the error path without touching the filesystem.
pub struct MemoryListStore<T> {
    items: RwLock<Vec<T>>,
    fail_writes: AtomicBool,
}

impl<T> Default for MemoryListStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MemoryListStore<T> {
    pub fn new() -> Self {
        Self { items: RwLock::new(Vec::new()), fail_writes: AtomicBool::new(false) }
    }

    pub fn with_items(items: Vec<T>) -> Self {
        Self { items: RwLock::new(items), fail_writes: AtomicBool::new(false) }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl<T> CollectionStore<T> for MemoryListStore<T>
where
    T: Clone + Send + Sync,
{
    async fn read(&self) -> Vec<T> {
        self.items.read().await.clone()
    }

    async fn write(&self, items: &[T]) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".into()));
        }
        *self.items.write().await = items.to_vec();
        Ok(())
    }
}
