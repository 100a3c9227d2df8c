//! Shared test support: in-memory persistence and a fault-injecting
//! object store for exercising partial-failure paths.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;

use stela_core::error::AppError;
use stela_core::result::AppResult;
use stela_core::traits::storage::{ByteStream, ObjectStore};
use stela_core::types::{ModelVersionId, MonumentId};
use stela_entity::model_version::{ModelVersion, NewModelVersion};
use stela_entity::monument::Monument;
use stela_entity::orphan::OrphanedObject;
use stela_entity::repository::{ModelVersionRepository, MonumentRegistry, OrphanQueue};
use stela_storage::providers::local::LocalObjectStore;

#[derive(Default)]
struct Inner {
    monuments: HashMap<MonumentId, Monument>,
    // seq gives a deterministic newest-first order even when two uploads
    // land on the same timestamp.
    versions: Vec<(u64, ModelVersion)>,
    orphans: Vec<OrphanedObject>,
    next_seq: u64,
}

/// In-memory implementation of the persistence contracts. One mutex over
/// the whole state makes every operation atomic from a reader's point of
/// view, mirroring what the transactional repository guarantees.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    fail_next_create: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a monument fixture.
    pub fn add_monument(&self, name: &str) -> Monument {
        let monument = Monument {
            id: MonumentId::new(),
            name: name.to_string(),
            active_model_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.inner
            .lock()
            .unwrap()
            .monuments
            .insert(monument.id, monument.clone());
        monument
    }

    /// Read back a monument, mirror column included.
    pub fn monument(&self, id: MonumentId) -> Option<Monument> {
        self.inner.lock().unwrap().monuments.get(&id).cloned()
    }

    /// Make the next `create` call fail with a database error.
    pub fn fail_next_create(&self) {
        self.fail_next_create.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ModelVersionRepository for MemoryStore {
    async fn create(&self, version: &NewModelVersion) -> AppResult<ModelVersion> {
        if self.fail_next_create.swap(false, Ordering::SeqCst) {
            return Err(AppError::database("injected create failure"));
        }

        let mut inner = self.inner.lock().unwrap();
        if !inner.monuments.contains_key(&version.monument_id) {
            return Err(AppError::not_found(format!(
                "Monument {} not found",
                version.monument_id
            )));
        }

        let record = ModelVersion {
            id: version.id,
            monument_id: version.monument_id,
            object_key: version.object_key.clone(),
            url: version.url.clone(),
            original_filename: version.original_filename.clone(),
            content_type: version.content_type.clone(),
            file_size_bytes: version.file_size_bytes,
            uploaded_by: version.uploaded_by,
            uploaded_at: Utc::now(),
            is_active: false,
        };

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.versions.push((seq, record.clone()));
        Ok(record)
    }

    async fn find_by_id(
        &self,
        monument_id: MonumentId,
        version_id: ModelVersionId,
    ) -> AppResult<Option<ModelVersion>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .versions
            .iter()
            .find(|(_, v)| v.id == version_id && v.monument_id == monument_id)
            .map(|(_, v)| v.clone()))
    }

    async fn list_by_monument(&self, monument_id: MonumentId) -> AppResult<Vec<ModelVersion>> {
        let inner = self.inner.lock().unwrap();
        let mut matching: Vec<_> = inner
            .versions
            .iter()
            .filter(|(_, v)| v.monument_id == monument_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(matching.into_iter().map(|(_, v)| v).collect())
    }

    async fn find_active(&self, monument_id: MonumentId) -> AppResult<Option<ModelVersion>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .versions
            .iter()
            .find(|(_, v)| v.monument_id == monument_id && v.is_active)
            .map(|(_, v)| v.clone()))
    }

    async fn set_active(
        &self,
        monument_id: MonumentId,
        version_id: ModelVersionId,
    ) -> AppResult<ModelVersion> {
        let mut inner = self.inner.lock().unwrap();

        if !inner.monuments.contains_key(&monument_id) {
            return Err(AppError::not_found(format!(
                "Monument {monument_id} not found"
            )));
        }

        let target_url = inner
            .versions
            .iter()
            .find(|(_, v)| v.id == version_id && v.monument_id == monument_id)
            .map(|(_, v)| v.url.clone())
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Model version {version_id} not found for monument {monument_id}"
                ))
            })?;

        for (_, v) in inner.versions.iter_mut() {
            if v.monument_id == monument_id {
                v.is_active = v.id == version_id;
            }
        }

        let monument = inner.monuments.get_mut(&monument_id).unwrap();
        monument.active_model_url = Some(target_url);
        monument.updated_at = Utc::now();

        let version = inner
            .versions
            .iter()
            .find(|(_, v)| v.id == version_id)
            .map(|(_, v)| v.clone())
            .unwrap();
        Ok(version)
    }

    async fn delete(
        &self,
        monument_id: MonumentId,
        version_id: ModelVersionId,
    ) -> AppResult<bool> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.versions.len();
        inner.versions.retain(|(_, v)| {
            !(v.id == version_id && v.monument_id == monument_id && !v.is_active)
        });
        Ok(inner.versions.len() < before)
    }
}

#[async_trait]
impl MonumentRegistry for MemoryStore {
    async fn find_by_id(&self, id: MonumentId) -> AppResult<Option<Monument>> {
        Ok(self.monument(id))
    }

    async fn exists(&self, id: MonumentId) -> AppResult<bool> {
        Ok(self.inner.lock().unwrap().monuments.contains_key(&id))
    }
}

#[async_trait]
impl OrphanQueue for MemoryStore {
    async fn enqueue(&self, object_key: &str) -> AppResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.orphans.iter().any(|o| o.object_key == object_key) {
            inner.orphans.push(OrphanedObject {
                object_key: object_key.to_string(),
                recorded_at: Utc::now(),
                attempts: 0,
            });
        }
        Ok(())
    }

    async fn pending(&self, limit: u32) -> AppResult<Vec<OrphanedObject>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.orphans.iter().take(limit as usize).cloned().collect())
    }

    async fn remove(&self, object_key: &str) -> AppResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.orphans.retain(|o| o.object_key != object_key);
        Ok(())
    }

    async fn mark_attempt(&self, object_key: &str) -> AppResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(orphan) = inner.orphans.iter_mut().find(|o| o.object_key == object_key) {
            orphan.attempts += 1;
        }
        Ok(())
    }
}

/// Object store wrapper with failure injection and call counting.
#[derive(Debug)]
pub struct FlakyObjectStore {
    inner: LocalObjectStore,
    pub fail_puts: AtomicBool,
    pub fail_deletes: AtomicBool,
    pub put_count: AtomicUsize,
}

impl FlakyObjectStore {
    pub async fn new(root: &Path) -> Self {
        let inner = LocalObjectStore::new(
            root.to_str().unwrap(),
            "http://localhost:8080/objects",
        )
        .await
        .unwrap();
        Self {
            inner,
            fail_puts: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
            put_count: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ObjectStore for FlakyObjectStore {
    fn provider_type(&self) -> &str {
        "flaky"
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }

    async fn put(&self, key: &str, data: Bytes) -> AppResult<()> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(AppError::storage("injected put failure"));
        }
        self.put_count.fetch_add(1, Ordering::SeqCst);
        self.inner.put(key, data).await
    }

    async fn put_stream(&self, key: &str, stream: ByteStream) -> AppResult<u64> {
        self.inner.put_stream(key, stream).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::storage("injected delete failure"));
        }
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.inner.exists(key).await
    }

    fn public_url(&self, key: &str) -> String {
        self.inner.public_url(key)
    }
}

/// Count regular files under a directory tree.
pub fn count_files(dir: &Path) -> usize {
    let mut count = 0;
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                count += count_files(&path);
            } else {
                count += 1;
            }
        }
    }
    count
}
