//! Stela Server — Monument 3D-Model Publishing Platform
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use stela_core::config::AppConfig;
use stela_core::error::AppError;
use stela_database::connection::DatabasePool;
use stela_database::repositories::monument::PgMonumentRegistry;
use stela_database::repositories::orphan::PgOrphanedObjectQueue;
use stela_database::repositories::version::PgModelVersionRepository;
use stela_entity::repository::{ModelVersionRepository, MonumentRegistry, OrphanQueue};
use stela_service::ModelLifecycleService;
use stela_worker::SweepScheduler;

#[tokio::main]
async fn main() {
    let env = std::env::var("STELA_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Stela v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = DatabasePool::connect(&config.database).await?;
    stela_database::migration::run_migrations(db.pool()).await?;

    // ── Step 2: Object store ─────────────────────────────────────
    tracing::info!(provider = %config.storage.provider, "Initializing object store");
    let store = stela_storage::build_object_store(&config.storage).await?;

    // ── Step 3: Repositories ─────────────────────────────────────
    let versions: Arc<dyn ModelVersionRepository> =
        Arc::new(PgModelVersionRepository::new(db.pool().clone()));
    let registry: Arc<dyn MonumentRegistry> =
        Arc::new(PgMonumentRegistry::new(db.pool().clone()));
    let orphans: Arc<dyn OrphanQueue> =
        Arc::new(PgOrphanedObjectQueue::new(db.pool().clone()));

    // ── Step 4: Lifecycle services ───────────────────────────────
    let lifecycle = ModelLifecycleService::new(
        registry,
        versions,
        Arc::clone(&store),
        Arc::clone(&orphans),
        config.storage.clone(),
    );

    // ── Step 5: Reconciliation worker ────────────────────────────
    let mut sweeper = if config.worker.enabled {
        let scheduler =
            SweepScheduler::new(Arc::clone(&store), Arc::clone(&orphans), config.worker.clone())
                .await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Orphan sweep worker disabled by configuration");
        None
    };

    // ── Step 6: HTTP API ─────────────────────────────────────────
    let state = stela_api::AppState {
        config: Arc::new(config),
        lifecycle,
        store,
    };

    stela_api::serve(state).await?;

    if let Some(scheduler) = sweeper.as_mut() {
        scheduler.shutdown().await?;
    }

    tracing::info!("Stela server stopped");
    Ok(())
}
