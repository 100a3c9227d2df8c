//! Monument registry implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use stela_core::error::{AppError, ErrorKind};
use stela_core::result::AppResult;
use stela_core::types::MonumentId;
use stela_entity::monument::Monument;
use stela_entity::repository::MonumentRegistry;

/// PostgreSQL-backed [`MonumentRegistry`].
///
/// Monument records are administered by the surrounding product; this
/// repository only reads them (plus a `create` used by seeds and tests).
/// The `active_model_url` column is maintained by the activation swap in
/// the version repository.
#[derive(Debug, Clone)]
pub struct PgMonumentRegistry {
    pool: PgPool,
}

impl PgMonumentRegistry {
    /// Create a new monument registry.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a monument record. Used by seeds and test fixtures.
    pub async fn create(&self, name: &str) -> AppResult<Monument> {
        sqlx::query_as::<_, Monument>(
            "INSERT INTO monuments (name) VALUES ($1) RETURNING *",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create monument", e))
    }
}

#[async_trait]
impl MonumentRegistry for PgMonumentRegistry {
    async fn find_by_id(&self, id: MonumentId) -> AppResult<Option<Monument>> {
        sqlx::query_as::<_, Monument>("SELECT * FROM monuments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find monument", e))
    }

    async fn exists(&self, id: MonumentId) -> AppResult<bool> {
        let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM monuments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to check monument", e)
            })?;
        Ok(found.is_some())
    }
}
