//! Orphaned object queue implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use stela_core::error::{AppError, ErrorKind};
use stela_core::result::AppResult;
use stela_entity::orphan::OrphanedObject;
use stela_entity::repository::OrphanQueue;

/// PostgreSQL-backed [`OrphanQueue`].
#[derive(Debug, Clone)]
pub struct PgOrphanedObjectQueue {
    pool: PgPool,
}

impl PgOrphanedObjectQueue {
    /// Create a new orphan queue.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrphanQueue for PgOrphanedObjectQueue {
    async fn enqueue(&self, object_key: &str) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO orphaned_objects (object_key) VALUES ($1) \
             ON CONFLICT (object_key) DO NOTHING",
        )
        .bind(object_key)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record orphaned object", e)
        })?;
        Ok(())
    }

    async fn pending(&self, limit: u32) -> AppResult<Vec<OrphanedObject>> {
        sqlx::query_as::<_, OrphanedObject>(
            "SELECT * FROM orphaned_objects ORDER BY recorded_at ASC LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list orphaned objects", e)
        })
    }

    async fn remove(&self, object_key: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM orphaned_objects WHERE object_key = $1")
            .bind(object_key)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to remove orphaned object", e)
            })?;
        Ok(())
    }

    async fn mark_attempt(&self, object_key: &str) -> AppResult<()> {
        sqlx::query("UPDATE orphaned_objects SET attempts = attempts + 1 WHERE object_key = $1")
            .bind(object_key)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update orphan attempts", e)
            })?;
        Ok(())
    }
}
