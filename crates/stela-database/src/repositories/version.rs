//! Model version repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use stela_core::error::{AppError, ErrorKind};
use stela_core::result::AppResult;
use stela_core::types::{ModelVersionId, MonumentId};
use stela_entity::model_version::{ModelVersion, NewModelVersion};
use stela_entity::repository::ModelVersionRepository;

/// PostgreSQL-backed [`ModelVersionRepository`].
///
/// The single-active-version rule is enforced twice: the activation swap
/// runs in one transaction serialized per monument by a row lock, and the
/// schema carries a partial unique index on `(monument_id) WHERE is_active`
/// as a backstop. A violation of that index means an invariant was broken
/// outside this repository and surfaces as a consistency error.
#[derive(Debug, Clone)]
pub struct PgModelVersionRepository {
    pool: PgPool,
}

impl PgModelVersionRepository {
    /// Create a new model version repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ModelVersionRepository for PgModelVersionRepository {
    async fn create(&self, version: &NewModelVersion) -> AppResult<ModelVersion> {
        sqlx::query_as::<_, ModelVersion>(
            "INSERT INTO model_versions \
             (id, monument_id, object_key, url, original_filename, content_type, file_size_bytes, uploaded_by, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE) RETURNING *",
        )
        .bind(version.id)
        .bind(version.monument_id)
        .bind(&version.object_key)
        .bind(&version.url)
        .bind(&version.original_filename)
        .bind(&version.content_type)
        .bind(version.file_size_bytes)
        .bind(version.uploaded_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("model_versions_monument_id_fkey") =>
            {
                AppError::not_found(format!("Monument {} not found", version.monument_id))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create model version", e),
        })
    }

    async fn find_by_id(
        &self,
        monument_id: MonumentId,
        version_id: ModelVersionId,
    ) -> AppResult<Option<ModelVersion>> {
        sqlx::query_as::<_, ModelVersion>(
            "SELECT * FROM model_versions WHERE id = $1 AND monument_id = $2",
        )
        .bind(version_id)
        .bind(monument_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find model version", e))
    }

    async fn list_by_monument(&self, monument_id: MonumentId) -> AppResult<Vec<ModelVersion>> {
        sqlx::query_as::<_, ModelVersion>(
            "SELECT * FROM model_versions WHERE monument_id = $1 ORDER BY uploaded_at DESC, id DESC",
        )
        .bind(monument_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list model versions", e))
    }

    async fn find_active(&self, monument_id: MonumentId) -> AppResult<Option<ModelVersion>> {
        sqlx::query_as::<_, ModelVersion>(
            "SELECT * FROM model_versions WHERE monument_id = $1 AND is_active",
        )
        .bind(monument_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find active version", e)
        })
    }

    async fn set_active(
        &self,
        monument_id: MonumentId,
        version_id: ModelVersionId,
    ) -> AppResult<ModelVersion> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        // The monument row lock serializes concurrent swaps per monument;
        // swaps for different monuments proceed in parallel.
        let locked: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM monuments WHERE id = $1 FOR UPDATE")
                .bind(monument_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to lock monument", e)
                })?;
        locked.ok_or_else(|| AppError::not_found(format!("Monument {monument_id} not found")))?;

        let version = sqlx::query_as::<_, ModelVersion>(
            "SELECT * FROM model_versions WHERE id = $1 AND monument_id = $2 FOR UPDATE",
        )
        .bind(version_id)
        .bind(monument_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find model version", e))?
        .ok_or_else(|| {
            AppError::not_found(format!(
                "Model version {version_id} not found for monument {monument_id}"
            ))
        })?;

        if !version.is_active {
            sqlx::query(
                "UPDATE model_versions SET is_active = FALSE WHERE monument_id = $1 AND is_active",
            )
            .bind(monument_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to deactivate version", e)
            })?;

            sqlx::query("UPDATE model_versions SET is_active = TRUE WHERE id = $1")
                .bind(version_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| match e {
                    sqlx::Error::Database(ref db_err)
                        if db_err.constraint() == Some("model_versions_one_active_idx") =>
                    {
                        AppError::consistency(format!(
                            "Monument {monument_id} already has an active version"
                        ))
                    }
                    _ => AppError::with_source(
                        ErrorKind::Database,
                        "Failed to activate version",
                        e,
                    ),
                })?;
        }

        // The mirror column commits in the same transaction as the flag
        // swap; it is written here and nowhere else.
        sqlx::query("UPDATE monuments SET active_model_url = $2, updated_at = NOW() WHERE id = $1")
            .bind(monument_id)
            .bind(&version.url)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update active model URL", e)
            })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit activation", e)
        })?;

        Ok(ModelVersion {
            is_active: true,
            ..version
        })
    }

    async fn delete(
        &self,
        monument_id: MonumentId,
        version_id: ModelVersionId,
    ) -> AppResult<bool> {
        // The is_active guard means even a racing activation elsewhere
        // cannot delete the served version out from under its monument.
        let result = sqlx::query(
            "DELETE FROM model_versions WHERE id = $1 AND monument_id = $2 AND is_active = FALSE",
        )
        .bind(version_id)
        .bind(monument_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete model version", e)
        })?;
        Ok(result.rows_affected() > 0)
    }
}
