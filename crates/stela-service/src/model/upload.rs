//! Upload pipeline — validates, stores, and registers new model versions.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use stela_core::config::storage::StorageConfig;
use stela_core::error::AppError;
use stela_core::result::AppResult;
use stela_core::traits::storage::ObjectStore;
use stela_core::types::{ModelVersionId, MonumentId};
use stela_entity::model_version::model::extension_of;
use stela_entity::model_version::{ModelFormat, ModelVersion, NewModelVersion};
use stela_entity::repository::{ModelVersionRepository, MonumentRegistry, OrphanQueue};
use stela_storage::key::model_object_key;

use crate::context::RequestContext;
use crate::locks::MonumentLocks;
use crate::model::activation::ActivationService;

/// Upload parameters for a single model asset.
#[derive(Debug, Clone)]
pub struct UploadParams {
    /// User-supplied file name.
    pub file_name: String,
    /// Declared MIME type (if any).
    pub content_type: Option<String>,
    /// File content bytes.
    pub data: Bytes,
}

/// Handles model asset uploads.
#[derive(Clone)]
pub struct UploadService {
    /// Model version repository.
    versions: Arc<dyn ModelVersionRepository>,
    /// Monument registry (read-only).
    registry: Arc<dyn MonumentRegistry>,
    /// Object store.
    store: Arc<dyn ObjectStore>,
    /// Leaked-object queue for failed rollback deletes.
    orphans: Arc<dyn OrphanQueue>,
    /// Activation coordinator, for first-version auto-activation.
    activation: ActivationService,
    /// Per-monument lock table.
    locks: MonumentLocks,
    /// Upload policy configuration.
    config: StorageConfig,
}

impl std::fmt::Debug for UploadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadService").finish()
    }
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        versions: Arc<dyn ModelVersionRepository>,
        registry: Arc<dyn MonumentRegistry>,
        store: Arc<dyn ObjectStore>,
        orphans: Arc<dyn OrphanQueue>,
        activation: ActivationService,
        locks: MonumentLocks,
        config: StorageConfig,
    ) -> Self {
        Self {
            versions,
            registry,
            store,
            orphans,
            activation,
            locks,
            config,
        }
    }

    /// Upload a new model version for a monument.
    ///
    /// Validation happens before any I/O. The object is written under a
    /// fresh key, then the record is registered inactive; if this is the
    /// monument's first version it is auto-activated so the monument is
    /// never left with versions but nothing serving. Any failure after the
    /// object write rolls the object back, so a failed upload is never
    /// visible in a subsequent listing.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        monument_id: MonumentId,
        params: UploadParams,
    ) -> AppResult<ModelVersion> {
        self.validate(&params)?;

        if !self.registry.exists(monument_id).await? {
            return Err(AppError::not_found(format!(
                "Monument {monument_id} not found"
            )));
        }

        let version_id = ModelVersionId::new();
        let object_key = model_object_key(monument_id, version_id, &params.file_name);
        let url = self.store.public_url(&object_key);

        let size_bytes = params.data.len() as i64;
        self.store.put(&object_key, params.data.clone()).await?;

        let record = NewModelVersion {
            id: version_id,
            monument_id,
            object_key,
            url,
            original_filename: params.file_name.clone(),
            content_type: params.content_type.clone(),
            file_size_bytes: size_bytes,
            uploaded_by: ctx.actor_id,
        };

        // The commit sequence runs on its own task so a caller that gives
        // up mid-request cannot strand a stored object without a record
        // (or a first version without activation).
        let versions = Arc::clone(&self.versions);
        let store = Arc::clone(&self.store);
        let orphans = Arc::clone(&self.orphans);
        let activation = self.activation.clone();
        let lock = self.locks.for_monument(monument_id);

        let commit = tokio::spawn(async move {
            let _guard = lock.lock().await;

            let created = match versions.create(&record).await {
                Ok(created) => created,
                Err(err) => {
                    rollback_object(&*store, &*orphans, &record.object_key).await;
                    return Err(err);
                }
            };

            match activation
                .activate_first_upload(monument_id, created)
                .await
            {
                Ok(version) => Ok(version),
                Err(err) => {
                    // The half-registered version must not stay listable.
                    if let Err(cleanup_err) = versions.delete(monument_id, record.id).await {
                        warn!(
                            version_id = %record.id,
                            error = %cleanup_err,
                            "Failed to remove record after activation failure"
                        );
                    }
                    rollback_object(&*store, &*orphans, &record.object_key).await;
                    Err(err)
                }
            }
        });

        let version = commit
            .await
            .map_err(|e| AppError::internal(format!("Upload commit task failed: {e}")))??;

        info!(
            actor_id = %ctx.actor_id,
            monument_id = %monument_id,
            version_id = %version.id,
            name = %version.original_filename,
            size = version.file_size_bytes,
            active = version.is_active,
            "Model version uploaded"
        );

        Ok(version)
    }

    /// Policy validation: extension allow-list, content-type plausibility,
    /// and size cap. Runs before any storage or repository I/O.
    fn validate(&self, params: &UploadParams) -> AppResult<()> {
        if params.data.is_empty() {
            return Err(AppError::validation("Uploaded file is empty"));
        }

        if params.data.len() as u64 > self.config.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File exceeds maximum upload size of {} bytes",
                self.config.max_upload_size_bytes
            )));
        }

        let ext = extension_of(&params.file_name).ok_or_else(|| {
            AppError::validation(format!(
                "File '{}' has no extension; accepted: {}",
                params.file_name,
                self.config.allowed_extensions.join(", ")
            ))
        })?;

        if !self.config.accepts_extension(&ext) {
            return Err(AppError::validation(format!(
                "File format '.{ext}' is not accepted; accepted: {}",
                self.config.allowed_extensions.join(", ")
            )));
        }

        if let (Some(format), Some(declared)) =
            (ModelFormat::from_extension(&ext), params.content_type.as_deref())
        {
            if !format.accepts_content_type(declared) {
                return Err(AppError::validation(format!(
                    "Content type '{declared}' does not match a '.{ext}' asset"
                )));
            }
        }

        Ok(())
    }
}

/// Best-effort removal of an object whose upload did not commit. If even
/// the delete fails the key lands in the orphan queue for the sweep.
async fn rollback_object(store: &dyn ObjectStore, orphans: &dyn OrphanQueue, key: &str) {
    if let Err(err) = store.delete(key).await {
        warn!(key, error = %err, "Rollback delete failed; queueing orphan");
        if let Err(queue_err) = orphans.enqueue(key).await {
            warn!(key, error = %queue_err, "Failed to queue orphaned object");
        }
    }
}
