//! Request context carrying the acting identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stela_core::types::ActorId;

/// Context for the current request.
///
/// The actor identity arrives from the external identity provider and is
/// attached to uploads for audit display; no authorization decisions are
/// made here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Opaque identity of whoever invoked the operation.
    pub actor_id: ActorId,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context for the given actor.
    pub fn new(actor_id: ActorId) -> Self {
        Self {
            actor_id,
            request_time: Utc::now(),
        }
    }
}
