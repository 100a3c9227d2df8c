//! Model version entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use stela_core::types::{ActorId, ModelVersionId, MonumentId};

/// One uploaded 3D model version of a monument.
///
/// Identity, object key, and URL are immutable after creation — a
/// replacement asset is a new version, never an in-place overwrite. The
/// only mutable field is `is_active`, flipped by the activation swap.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ModelVersion {
    /// Unique version identifier.
    pub id: ModelVersionId,
    /// The monument this version belongs to.
    pub monument_id: MonumentId,
    /// Key of this version's content in the object store.
    pub object_key: String,
    /// Publicly retrievable URL of the stored object.
    pub url: String,
    /// User-supplied file name, advisory only.
    pub original_filename: String,
    /// Declared MIME type at upload time (if any).
    pub content_type: Option<String>,
    /// Size in bytes recorded at upload time.
    pub file_size_bytes: i64,
    /// Actor who uploaded this version.
    pub uploaded_by: ActorId,
    /// When this version was uploaded.
    pub uploaded_at: DateTime<Utc>,
    /// Whether this is the version currently served to end users.
    pub is_active: bool,
}

impl ModelVersion {
    /// Get the file extension of the original filename (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.original_filename)
    }
}

/// Data required to register a new model version record.
///
/// The id is generated up front so the object key can embed it before the
/// record exists; `uploaded_at` is assigned by the repository and
/// `is_active` always starts false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewModelVersion {
    /// Pre-generated version identifier.
    pub id: ModelVersionId,
    /// The owning monument.
    pub monument_id: MonumentId,
    /// Object store key.
    pub object_key: String,
    /// Publicly retrievable URL.
    pub url: String,
    /// User-supplied file name.
    pub original_filename: String,
    /// Declared MIME type.
    pub content_type: Option<String>,
    /// Size in bytes.
    pub file_size_bytes: i64,
    /// Uploading actor.
    pub uploaded_by: ActorId,
}

/// Extract the lowercase extension of a file name, if it has one.
pub fn extension_of(filename: &str) -> Option<String> {
    filename
        .rsplit('.')
        .next()
        .filter(|ext| *ext != filename && !ext.is_empty())
        .map(|ext| ext.to_lowercase())
}
