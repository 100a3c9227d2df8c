//! Activation coordinator — swaps which model version is served.

use std::sync::Arc;

use tracing::info;

use stela_core::result::AppResult;
use stela_core::types::{ModelVersionId, MonumentId};
use stela_entity::model_version::ModelVersion;
use stela_entity::repository::ModelVersionRepository;

use crate::context::RequestContext;
use crate::locks::MonumentLocks;

/// Coordinates the single-active-version swap for a monument.
///
/// The repository's `set_active` already commits the whole swap (flag
/// flip + mirror update) atomically; the per-monument lock on top
/// linearizes swaps with deletions and first-upload auto-activation
/// without holding a database transaction across unrelated awaits.
#[derive(Clone)]
pub struct ActivationService {
    /// Model version repository.
    versions: Arc<dyn ModelVersionRepository>,
    /// Per-monument lock table.
    locks: MonumentLocks,
}

impl std::fmt::Debug for ActivationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivationService").finish()
    }
}

impl ActivationService {
    /// Creates a new activation service.
    pub fn new(versions: Arc<dyn ModelVersionRepository>, locks: MonumentLocks) -> Self {
        Self { versions, locks }
    }

    /// Make the given version the one served for its monument.
    ///
    /// Idempotent: activating the already-active version succeeds with no
    /// observable change. No reader ever sees zero or two active versions
    /// for the monument.
    pub async fn activate(
        &self,
        ctx: &RequestContext,
        monument_id: MonumentId,
        version_id: ModelVersionId,
    ) -> AppResult<()> {
        let lock = self.locks.for_monument(monument_id);
        let _guard = lock.lock().await;

        let version = self.versions.set_active(monument_id, version_id).await?;

        info!(
            actor_id = %ctx.actor_id,
            monument_id = %monument_id,
            version_id = %version_id,
            url = %version.url,
            "Model version activated"
        );
        Ok(())
    }

    /// Activate a freshly uploaded version only if its monument has no
    /// active version yet (the monument's very first upload).
    ///
    /// The caller must already hold the monument lock. Returns the version
    /// as it now stands: activated, or untouched because another version
    /// is already serving.
    pub(crate) async fn activate_first_upload(
        &self,
        monument_id: MonumentId,
        version: ModelVersion,
    ) -> AppResult<ModelVersion> {
        if self.versions.find_active(monument_id).await?.is_some() {
            return Ok(version);
        }

        let activated = self.versions.set_active(monument_id, version.id).await?;
        info!(
            monument_id = %monument_id,
            version_id = %activated.id,
            "First model version auto-activated"
        );
        Ok(activated)
    }
}
