//! Orphaned object entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored object whose deletion failed after its metadata record was
/// already removed (or whose upload was rolled back but the rollback
/// delete failed). Entries are retried by the background sweep until the
/// object is gone; both the object delete and the row removal are
/// idempotent.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrphanedObject {
    /// Key of the leaked object in the object store.
    pub object_key: String,
    /// When the leak was recorded.
    pub recorded_at: DateTime<Utc>,
    /// How many sweep attempts have failed so far.
    pub attempts: i32,
}
