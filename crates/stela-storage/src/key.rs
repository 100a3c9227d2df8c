//! Object key derivation for stored model assets.
//!
//! Keys embed the monument id and the pre-generated version id, so every
//! upload writes to a fresh key and nothing can overwrite or resurrect a
//! previously stored object.

use stela_core::types::{ModelVersionId, MonumentId};

/// Derive the object key for a model version upload.
pub fn model_object_key(
    monument_id: MonumentId,
    version_id: ModelVersionId,
    filename: &str,
) -> String {
    format!(
        "monuments/{monument_id}/models/{version_id}/{}",
        sanitize_filename(filename)
    )
}

/// Reduce a user-supplied file name to a storage-safe single path segment.
///
/// Path separators are stripped (only the final segment survives), anything
/// outside `[A-Za-z0-9._-]` becomes `_`, and leading dots are dropped so a
/// name can never traverse upward or hide as a dotfile.
pub fn sanitize_filename(name: &str) -> String {
    let last_segment = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(name);

    let cleaned: String = last_segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "model".to_string()
    } else {
        cleaned
    }
}
