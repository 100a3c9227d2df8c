//! Model version lifecycle handlers.

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use stela_core::error::AppError;
use stela_core::types::{ModelVersionId, MonumentId};
use stela_entity::model_version::ModelVersion;
use stela_service::RequestContext;
use stela_service::model::upload::UploadParams;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::ActorIdentity;
use crate::state::AppState;

/// GET /api/monuments/{monument_id}/models
pub async fn list_versions(
    State(state): State<AppState>,
    Path(monument_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ModelVersion>>>, ApiError> {
    let versions = state
        .lifecycle
        .list_versions(MonumentId::from_uuid(monument_id))
        .await?;
    Ok(Json(ApiResponse::ok(versions)))
}

/// POST /api/monuments/{monument_id}/models (multipart, field `file`)
pub async fn upload_version(
    State(state): State<AppState>,
    actor: ActorIdentity,
    Path(monument_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<ModelVersion>>), ApiError> {
    let mut params: Option<UploadParams> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError(AppError::validation(format!("Malformed multipart body: {e}")))
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError(AppError::validation("Upload field has no filename")))?;
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(|e| {
            ApiError(AppError::validation(format!("Failed to read upload body: {e}")))
        })?;

        params = Some(UploadParams {
            file_name,
            content_type,
            data,
        });
    }

    let params = params
        .ok_or_else(|| ApiError(AppError::validation("Multipart field 'file' is required")))?;

    let ctx = RequestContext::new(actor.0);
    let version = state
        .lifecycle
        .upload(&ctx, MonumentId::from_uuid(monument_id), params)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(version))))
}

/// POST /api/monuments/{monument_id}/models/{version_id}/activate
pub async fn activate_version(
    State(state): State<AppState>,
    actor: ActorIdentity,
    Path((monument_id, version_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let ctx = RequestContext::new(actor.0);
    state
        .lifecycle
        .activate(
            &ctx,
            MonumentId::from_uuid(monument_id),
            ModelVersionId::from_uuid(version_id),
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/monuments/{monument_id}/models/{version_id}
pub async fn delete_version(
    State(state): State<AppState>,
    actor: ActorIdentity,
    Path((monument_id, version_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let ctx = RequestContext::new(actor.0);
    state
        .lifecycle
        .delete(
            &ctx,
            MonumentId::from_uuid(monument_id),
            ModelVersionId::from_uuid(version_id),
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
