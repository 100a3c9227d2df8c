//! Local filesystem object store provider.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use stela_core::error::{AppError, ErrorKind};
use stela_core::result::AppResult;
use stela_core::traits::storage::{ByteStream, ObjectStore};

/// Local filesystem object store.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    /// Root directory for all stored objects.
    root: PathBuf,
    /// Base URL under which objects are publicly served.
    public_url_base: String,
}

impl LocalObjectStore {
    /// Create a new local object store rooted at the given path.
    pub async fn new(root_path: &str, public_url_base: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self {
            root,
            public_url_base: public_url_base.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve an object key to an absolute path within the root.
    fn resolve(&self, key: &str) -> PathBuf {
        let clean = key.trim_start_matches('/');
        self.root.join(clean)
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.root.exists() && self.root.is_dir())
    }

    async fn put(&self, key: &str, data: Bytes) -> AppResult<()> {
        let full_path = self.resolve(key);
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write object: {key}"),
                e,
            )
        })?;

        debug!(key, bytes = data.len(), "Wrote object");
        Ok(())
    }

    async fn put_stream(&self, key: &str, mut stream: ByteStream) -> AppResult<u64> {
        let full_path = self.resolve(key);
        self.ensure_parent(&full_path).await?;

        let mut file = fs::File::create(&full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create object: {key}"),
                e,
            )
        })?;

        let mut total_bytes = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| AppError::with_source(ErrorKind::Storage, "Stream read error", e))?;
            total_bytes += chunk.len() as u64;
            file.write_all(&chunk).await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to write chunk", e)
            })?;
        }

        file.flush()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to flush object", e))?;

        debug!(key, bytes = total_bytes, "Wrote object from stream");
        Ok(total_bytes)
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let full_path = self.resolve(key);
        match fs::remove_file(&full_path).await {
            Ok(()) => {
                debug!(key, "Deleted object");
                Ok(())
            }
            // Idempotent: a missing object counts as already deleted.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete object: {key}"),
                e,
            )),
        }
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let full_path = self.resolve(key);
        Ok(full_path.is_file())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_url_base, key.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> (tempfile::TempDir, LocalObjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(
            dir.path().to_str().unwrap(),
            "http://localhost:8080/objects/",
        )
        .await
        .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_put_exists_delete() {
        let (_dir, store) = store().await;

        let data = Bytes::from_static(b"glTF binary bytes");
        store.put("monuments/a/models/b/x.glb", data).await.unwrap();
        assert!(store.exists("monuments/a/models/b/x.glb").await.unwrap());

        store.delete("monuments/a/models/b/x.glb").await.unwrap();
        assert!(!store.exists("monuments/a/models/b/x.glb").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (_dir, store) = store().await;
        store.delete("never/existed.glb").await.unwrap();
        store.delete("never/existed.glb").await.unwrap();
    }

    #[tokio::test]
    async fn test_put_stream() {
        let (_dir, store) = store().await;

        let chunks: Vec<Result<Bytes, std::io::Error>> =
            vec![Ok(Bytes::from_static(b"part1")), Ok(Bytes::from_static(b"part2"))];
        let stream: ByteStream = Box::pin(futures::stream::iter(chunks));

        let written = store.put_stream("streamed.obj", stream).await.unwrap();
        assert_eq!(written, 10);
        assert!(store.exists("streamed.obj").await.unwrap());
    }

    #[tokio::test]
    async fn test_public_url_join() {
        let (_dir, store) = store().await;
        assert_eq!(
            store.public_url("monuments/m/models/v/x.glb"),
            "http://localhost:8080/objects/monuments/m/models/v/x.glb"
        );
    }
}
