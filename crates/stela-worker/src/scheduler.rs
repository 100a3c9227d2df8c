//! Cron scheduler for periodic reconciliation tasks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use stela_core::config::worker::WorkerConfig;
use stela_core::error::AppError;
use stela_core::traits::storage::ObjectStore;
use stela_entity::repository::OrphanQueue;

use crate::jobs::orphan_sweep::sweep_orphans;

/// Cron-based scheduler for the orphaned-object sweep.
pub struct SweepScheduler {
    /// The underlying job scheduler.
    scheduler: JobScheduler,
    /// Object store to delete leaked objects from.
    store: Arc<dyn ObjectStore>,
    /// Orphan queue.
    orphans: Arc<dyn OrphanQueue>,
    /// Worker configuration.
    config: WorkerConfig,
}

impl std::fmt::Debug for SweepScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SweepScheduler").finish()
    }
}

impl SweepScheduler {
    /// Create a new sweep scheduler.
    pub async fn new(
        store: Arc<dyn ObjectStore>,
        orphans: Arc<dyn OrphanQueue>,
        config: WorkerConfig,
    ) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            store,
            orphans,
            config,
        })
    }

    /// Register the orphan sweep task and start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        let store = Arc::clone(&self.store);
        let orphans = Arc::clone(&self.orphans);
        let batch_size = self.config.orphan_sweep_batch_size;

        let job = CronJob::new_async(
            self.config.orphan_sweep_schedule.as_str(),
            move |_uuid, _lock| {
                let store = Arc::clone(&store);
                let orphans = Arc::clone(&orphans);
                Box::pin(async move {
                    if let Err(err) = sweep_orphans(store, orphans, batch_size).await {
                        tracing::error!(error = %err, "Orphan sweep run failed");
                    }
                })
            },
        )
        .map_err(|e| AppError::internal(format!("Failed to create sweep job: {e}")))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to register sweep job: {e}")))?;

        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!(
            schedule = %self.config.orphan_sweep_schedule,
            "Orphan sweep scheduler started"
        );
        Ok(())
    }

    /// Shut the scheduler down.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Orphan sweep scheduler shut down");
        Ok(())
    }
}
