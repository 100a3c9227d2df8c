//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use stela_core::error::AppError;
use stela_core::types::ActorId;

use crate::error::ApiError;

/// Header carrying the opaque actor identity supplied by the external
/// identity layer (an authenticating gateway in front of this service).
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Extracts the acting identity from the `x-actor-id` header.
///
/// Authentication itself happens upstream; this service only attaches the
/// identity to mutations for audit attribution.
#[derive(Debug, Clone, Copy)]
pub struct ActorIdentity(pub ActorId);

impl<S> FromRequestParts<S> for ActorIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ApiError(AppError::validation(format!(
                    "Missing {ACTOR_HEADER} header"
                )))
            })?;

        let actor_id = raw.parse::<ActorId>().map_err(|_| {
            ApiError(AppError::validation(format!(
                "Invalid {ACTOR_HEADER} header: not a UUID"
            )))
        })?;

        Ok(Self(actor_id))
    }
}
