//! Per-monument mutual exclusion.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use stela_core::types::MonumentId;

/// Lock table serializing active-version mutations per monument.
///
/// Activation, deletion, and first-upload auto-activation for the *same*
/// monument must be linearizable; operations on different monuments never
/// contend. Lock entries are created on first use and kept for the process
/// lifetime — one mutex per monument ever touched is a negligible
/// footprint.
#[derive(Debug, Clone, Default)]
pub struct MonumentLocks {
    locks: Arc<DashMap<MonumentId, Arc<Mutex<()>>>>,
}

impl MonumentLocks {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get (or create) the mutex for a monument.
    pub fn for_monument(&self, id: MonumentId) -> Arc<Mutex<()>> {
        self.locks.entry(id).or_default().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_same_monument_same_lock() {
        let locks = MonumentLocks::new();
        let id = MonumentId::new();
        let a = locks.for_monument(id);
        let b = locks.for_monument(id);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn test_different_monuments_do_not_contend() {
        let locks = MonumentLocks::new();
        let a = locks.for_monument(MonumentId::new());
        let b = locks.for_monument(MonumentId::new());
        let _ga = a.lock().await;
        // Would deadlock if the lock were shared.
        let _gb = b.lock().await;
    }
}
