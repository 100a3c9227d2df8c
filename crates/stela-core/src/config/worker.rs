//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background reconciliation worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the orphan sweep worker is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron schedule for the orphaned-object sweep.
    #[serde(default = "default_sweep_schedule")]
    pub orphan_sweep_schedule: String,
    /// Maximum orphan entries processed per sweep run.
    #[serde(default = "default_sweep_batch")]
    pub orphan_sweep_batch_size: u32,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            orphan_sweep_schedule: default_sweep_schedule(),
            orphan_sweep_batch_size: default_sweep_batch(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_sweep_schedule() -> String {
    // Every 10 minutes.
    "0 */10 * * * *".to_string()
}

fn default_sweep_batch() -> u32 {
    100
}
