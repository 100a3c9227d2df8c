//! Lifecycle facade — the contract the external CRUD layer consumes.

use std::sync::Arc;

use stela_core::config::storage::StorageConfig;
use stela_core::error::AppError;
use stela_core::result::AppResult;
use stela_core::traits::storage::ObjectStore;
use stela_core::types::{ModelVersionId, MonumentId};
use stela_entity::model_version::ModelVersion;
use stela_entity::repository::{ModelVersionRepository, MonumentRegistry, OrphanQueue};

use crate::context::RequestContext;
use crate::locks::MonumentLocks;
use crate::model::activation::ActivationService;
use crate::model::deletion::DeletionService;
use crate::model::upload::{UploadParams, UploadService};

/// Facade over the lifecycle services.
///
/// Performs no business logic of its own beyond dispatch; authorization is
/// the caller's concern and the actor identity passes through opaquely.
/// Every mutation is atomic end to end, so a caller that reconciles by
/// re-reading the list after a failure always observes a consistent state.
#[derive(Clone)]
pub struct ModelLifecycleService {
    registry: Arc<dyn MonumentRegistry>,
    versions: Arc<dyn ModelVersionRepository>,
    upload: UploadService,
    activation: ActivationService,
    deletion: DeletionService,
}

impl std::fmt::Debug for ModelLifecycleService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelLifecycleService").finish()
    }
}

impl ModelLifecycleService {
    /// Wire the lifecycle services over the given infrastructure seams.
    pub fn new(
        registry: Arc<dyn MonumentRegistry>,
        versions: Arc<dyn ModelVersionRepository>,
        store: Arc<dyn ObjectStore>,
        orphans: Arc<dyn OrphanQueue>,
        config: StorageConfig,
    ) -> Self {
        let locks = MonumentLocks::new();
        let activation = ActivationService::new(Arc::clone(&versions), locks.clone());
        let upload = UploadService::new(
            Arc::clone(&versions),
            Arc::clone(&registry),
            Arc::clone(&store),
            Arc::clone(&orphans),
            activation.clone(),
            locks.clone(),
            config,
        );
        let deletion = DeletionService::new(
            Arc::clone(&versions),
            Arc::clone(&store),
            Arc::clone(&orphans),
            locks,
        );

        Self {
            registry,
            versions,
            upload,
            activation,
            deletion,
        }
    }

    /// List all model versions of a monument, newest upload first.
    pub async fn list_versions(&self, monument_id: MonumentId) -> AppResult<Vec<ModelVersion>> {
        if !self.registry.exists(monument_id).await? {
            return Err(AppError::not_found(format!(
                "Monument {monument_id} not found"
            )));
        }
        self.versions.list_by_monument(monument_id).await
    }

    /// Upload a new model version.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        monument_id: MonumentId,
        params: UploadParams,
    ) -> AppResult<ModelVersion> {
        self.upload.upload(ctx, monument_id, params).await
    }

    /// Make a version the served one for its monument.
    pub async fn activate(
        &self,
        ctx: &RequestContext,
        monument_id: MonumentId,
        version_id: ModelVersionId,
    ) -> AppResult<()> {
        self.activation.activate(ctx, monument_id, version_id).await
    }

    /// Delete an inactive version and its stored object.
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        monument_id: MonumentId,
        version_id: ModelVersionId,
    ) -> AppResult<()> {
        self.deletion.delete(ctx, monument_id, version_id).await
    }
}
