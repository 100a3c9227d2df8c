//! Deletion guard — removes versions while protecting the served one.

use std::sync::Arc;

use tracing::{info, warn};

use stela_core::error::AppError;
use stela_core::result::AppResult;
use stela_core::traits::storage::ObjectStore;
use stela_core::types::{ModelVersionId, MonumentId};
use stela_entity::repository::{ModelVersionRepository, OrphanQueue};

use crate::context::RequestContext;
use crate::locks::MonumentLocks;

/// Deletes model versions and their stored objects.
#[derive(Clone)]
pub struct DeletionService {
    /// Model version repository.
    versions: Arc<dyn ModelVersionRepository>,
    /// Object store.
    store: Arc<dyn ObjectStore>,
    /// Leaked-object queue.
    orphans: Arc<dyn OrphanQueue>,
    /// Per-monument lock table.
    locks: MonumentLocks,
}

impl std::fmt::Debug for DeletionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeletionService").finish()
    }
}

impl DeletionService {
    /// Creates a new deletion service.
    pub fn new(
        versions: Arc<dyn ModelVersionRepository>,
        store: Arc<dyn ObjectStore>,
        orphans: Arc<dyn OrphanQueue>,
        locks: MonumentLocks,
    ) -> Self {
        Self {
            versions,
            store,
            orphans,
            locks,
        }
    }

    /// Delete an inactive model version and its stored object.
    ///
    /// The currently served version is refused outright — a caller must
    /// activate another version first. The metadata record goes first and
    /// the object second: if the object delete then fails, the result is a
    /// leaked unreferenced blob (queued for the sweep), never a listable
    /// record pointing at missing content.
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        monument_id: MonumentId,
        version_id: ModelVersionId,
    ) -> AppResult<()> {
        let versions = Arc::clone(&self.versions);
        let store = Arc::clone(&self.store);
        let orphans = Arc::clone(&self.orphans);
        let lock = self.locks.for_monument(monument_id);

        // Shielded from caller cancellation: once the record is gone the
        // object delete (or its orphan entry) must still happen.
        let task = tokio::spawn(async move {
            let _guard = lock.lock().await;

            let version = versions
                .find_by_id(monument_id, version_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!(
                        "Model version {version_id} not found for monument {monument_id}"
                    ))
                })?;

            if version.is_active {
                return Err(AppError::active_version_protected(format!(
                    "Model version {version_id} is currently served for monument \
                     {monument_id}; activate another version before deleting it"
                )));
            }

            let deleted = versions.delete(monument_id, version_id).await?;
            if !deleted {
                // The guarded DELETE refused the row; find out why.
                return match versions.find_by_id(monument_id, version_id).await? {
                    Some(v) if v.is_active => Err(AppError::active_version_protected(format!(
                        "Model version {version_id} became active concurrently"
                    ))),
                    _ => Err(AppError::not_found(format!(
                        "Model version {version_id} not found for monument {monument_id}"
                    ))),
                };
            }

            if let Err(err) = store.delete(&version.object_key).await {
                warn!(
                    key = %version.object_key,
                    error = %err,
                    "Object delete failed after record removal; queueing orphan"
                );
                orphans.enqueue(&version.object_key).await?;
            }

            Ok::<_, AppError>(version)
        });

        let version = task
            .await
            .map_err(|e| AppError::internal(format!("Delete task failed: {e}")))??;

        info!(
            actor_id = %ctx.actor_id,
            monument_id = %monument_id,
            version_id = %version_id,
            key = %version.object_key,
            "Model version deleted"
        );

        Ok(())
    }
}
