use std::{marker::PhantomData, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tracing::{debug, error, warn};

use super::CollectionStore;
use crate::errors::StoreError;

/// JSON file-backed ordered collection.
///
/// The file holds a single JSON array. Every `read` goes back to disk;
/// nothing is cached between calls. `write` serializes to a sibling
/// temp file and renames it over the target, so readers see either the
/// old or the new document, never a torn one.
pub struct JsonListStore<T> {
    file_path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonListStore<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    /// Initialize the store from a path. Creates the file with an empty array if missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, StoreError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| StoreError::io(parent, e))?;
        }

        let store = Self { file_path, _marker: PhantomData };
        if fs::metadata(&store.file_path).await.is_err() {
            store.persist(&[]).await?;
        }
        Ok(Arc::new(store))
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .file_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.file_path.with_file_name(name)
    }

    async fn persist(&self, items: &[T]) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(items)?;
        let tmp = self.temp_path();
        fs::write(&tmp, data).await.map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &self.file_path)
            .await
            .map_err(|e| StoreError::io(&self.file_path, e))?;
        Ok(())
    }
}

#[async_trait]
impl<T> CollectionStore<T> for JsonListStore<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    async fn read(&self) -> Vec<T> {
        self.try_read().await.unwrap_or_else(|e| {
            warn!(path = %self.file_path.display(), error = %e, "cannot load collection; using empty");
            Vec::new()
        })
    }

    async fn try_read(&self) -> Result<Vec<T>, StoreError> {
        let bytes = match fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.file_path, e)),
        };
        let items = serde_json::from_slice::<Vec<T>>(&bytes)?;
        debug!(path = %self.file_path.display(), count = items.len(), "collection loaded");
        Ok(items)
    }

    async fn write(&self, items: &[T]) -> Result<(), StoreError> {
        self.persist(items).await.map_err(|e| {
            error!(path = %self.file_path.display(), error = %e, "failed to write collection");
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_file() -> PathBuf {
        std::env::temp_dir().join(format!("json_list_store_{}.json", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn json_list_store_persists_in_order() -> Result<(), anyhow::Error> {
        let tmp = temp_file();
        let store = JsonListStore::<String>::new(&tmp).await?;

        // initially empty
        assert!(store.read().await.is_empty());

        store.write(&["b".to_string(), "a".to_string(), "c".to_string()]).await?;
        assert_eq!(store.read().await, vec!["b", "a", "c"]);

        // reload from disk
        let reloaded = JsonListStore::<String>::new(&tmp).await?;
        assert_eq!(reloaded.read().await, vec!["b", "a", "c"]);
        assert!(fs::metadata(reloaded.temp_path()).await.is_err());

        reloaded.clear().await?;
        assert!(store.read().await.is_empty());

        let _ = fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn missing_or_corrupt_file_reads_as_empty() -> Result<(), anyhow::Error> {
        let tmp = temp_file();
        let store = JsonListStore::<String>::new(&tmp).await?;

        fs::write(&tmp, b"{ not json").await?;
        assert!(store.read().await.is_empty());

        fs::remove_file(&tmp).await?;
        assert!(store.read().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn try_read_surfaces_corruption() -> Result<(), anyhow::Error> {
        let tmp = temp_file();
        let store = JsonListStore::<String>::new(&tmp).await?;

        fs::write(&tmp, b"{ not json").await?;
        assert!(matches!(store.try_read().await, Err(StoreError::Serialization(_))));

        fs::remove_file(&tmp).await?;
        assert!(store.try_read().await?.is_empty());

        let dir = std::env::temp_dir().join(format!("json_list_store_dir_{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).await?;
        let as_dir = JsonListStore::<String> { file_path: dir.clone(), _marker: PhantomData };
        assert!(matches!(as_dir.try_read().await, Err(StoreError::Io { .. })));
        let _ = fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn new_keeps_existing_content() -> Result<(), anyhow::Error> {
        let tmp = temp_file();
        fs::write(&tmp, br#"["kept"]"#).await?;
        let store = JsonListStore::<String>::new(&tmp).await?;
        assert_eq!(store.read().await, vec!["kept"]);
        let _ = fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn write_into_missing_directory_fails() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir().join(format!("json_list_store_dir_{}", Uuid::new_v4()));
        let store = JsonListStore::<String>::new(dir.join("items.json")).await?;
        fs::remove_dir_all(&dir).await?;
        let err = store.write(&["x".to_string()]).await.unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        Ok(())
    }
}
