//! Application state shared across all handlers.

use std::sync::Arc;

use stela_core::config::AppConfig;
use stela_core::traits::storage::ObjectStore;
use stela_service::ModelLifecycleService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// cheap to clone across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Model version lifecycle facade.
    pub lifecycle: ModelLifecycleService,
    /// Object store, for health probing.
    pub store: Arc<dyn ObjectStore>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish()
    }
}
