//! Persistence contracts for the lifecycle services.
//!
//! The traits are defined here next to the entities they persist and
//! implemented by `stela-database` against PostgreSQL. The service layer
//! only ever sees these traits, which keeps the lifecycle logic free of
//! SQL and lets tests substitute in-memory implementations.

use async_trait::async_trait;

use stela_core::result::AppResult;
use stela_core::types::{ModelVersionId, MonumentId};

use crate::model_version::{ModelVersion, NewModelVersion};
use crate::monument::Monument;
use crate::orphan::OrphanedObject;

/// Persistence for [`ModelVersion`] records, scoped by monument.
#[async_trait]
pub trait ModelVersionRepository: Send + Sync + 'static {
    /// Register a new version record with `is_active = false`.
    async fn create(&self, version: &NewModelVersion) -> AppResult<ModelVersion>;

    /// Find a version by id under the given monument.
    async fn find_by_id(
        &self,
        monument_id: MonumentId,
        version_id: ModelVersionId,
    ) -> AppResult<Option<ModelVersion>>;

    /// List all versions of a monument, newest upload first.
    async fn list_by_monument(&self, monument_id: MonumentId) -> AppResult<Vec<ModelVersion>>;

    /// Find the currently active version of a monument, if any.
    async fn find_active(&self, monument_id: MonumentId) -> AppResult<Option<ModelVersion>>;

    /// Atomically make the given version the single active one for its
    /// monument: deactivate the previous active version (if any), activate
    /// the requested one, and update the monument's `active_model_url`
    /// mirror, all as one indivisible step from the point of view of any
    /// reader. Activating an already-active version is a no-op that still
    /// succeeds. Fails with a not-found error if the version does not
    /// belong to the monument.
    async fn set_active(
        &self,
        monument_id: MonumentId,
        version_id: ModelVersionId,
    ) -> AppResult<ModelVersion>;

    /// Delete a version record, refusing to touch the active one. Returns
    /// `true` if a row was removed, `false` if no inactive version with
    /// that id exists under the monument.
    async fn delete(
        &self,
        monument_id: MonumentId,
        version_id: ModelVersionId,
    ) -> AppResult<bool>;
}

/// Read access to the monument registry owned by the surrounding product.
///
/// The `active_model_url` mirror column is written exclusively by
/// [`ModelVersionRepository::set_active`]; nothing else may touch it.
#[async_trait]
pub trait MonumentRegistry: Send + Sync + 'static {
    /// Find a monument by id.
    async fn find_by_id(&self, id: MonumentId) -> AppResult<Option<Monument>>;

    /// Check whether a monument exists.
    async fn exists(&self, id: MonumentId) -> AppResult<bool>;
}

/// Queue of leaked object keys awaiting out-of-band deletion retry.
#[async_trait]
pub trait OrphanQueue: Send + Sync + 'static {
    /// Record a leaked object key. Recording the same key twice is a no-op.
    async fn enqueue(&self, object_key: &str) -> AppResult<()>;

    /// Fetch up to `limit` pending entries, oldest first.
    async fn pending(&self, limit: u32) -> AppResult<Vec<OrphanedObject>>;

    /// Remove an entry after its object was successfully deleted.
    /// Removing an absent entry succeeds as a no-op.
    async fn remove(&self, object_key: &str) -> AppResult<()>;

    /// Bump the attempt counter after a failed deletion retry.
    async fn mark_attempt(&self, object_key: &str) -> AppResult<()>;
}
