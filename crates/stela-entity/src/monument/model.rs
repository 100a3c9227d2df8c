//! Monument entity model.
//!
//! Monuments are owned by the surrounding content-management product; this
//! crate only reads them and maintains the denormalized `active_model_url`
//! mirror column through the activation swap.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use stela_core::types::MonumentId;

/// A physical monument for which 3D model versions are published.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Monument {
    /// Unique monument identifier.
    pub id: MonumentId,
    /// Display name.
    pub name: String,
    /// URL of the currently served model version, mirrored from the active
    /// version for fast reads. Absent when the monument has no versions.
    pub active_model_url: Option<String>,
    /// When the monument was created.
    pub created_at: DateTime<Utc>,
    /// When the monument was last updated.
    pub updated_at: DateTime<Utc>,
}
