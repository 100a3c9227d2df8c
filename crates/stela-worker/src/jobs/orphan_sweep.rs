//! Orphaned object sweep.

use std::sync::Arc;

use tracing::{debug, info, warn};

use stela_core::result::AppResult;
use stela_core::traits::storage::ObjectStore;
use stela_entity::repository::OrphanQueue;

/// Outcome of one sweep run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Entries whose object was confirmed gone.
    pub reclaimed: u64,
    /// Entries whose delete failed again.
    pub failed: u64,
}

/// Retry deletion of every pending orphaned object, oldest first.
///
/// Deleting an already-absent object is a no-op success, so entries left
/// by a crashed previous run are simply confirmed and pruned here.
pub async fn sweep_orphans(
    store: Arc<dyn ObjectStore>,
    orphans: Arc<dyn OrphanQueue>,
    batch_size: u32,
) -> AppResult<SweepStats> {
    let pending = orphans.pending(batch_size).await?;
    if pending.is_empty() {
        debug!("No orphaned objects pending");
        return Ok(SweepStats::default());
    }

    let mut stats = SweepStats::default();
    for orphan in pending {
        match store.delete(&orphan.object_key).await {
            Ok(()) => {
                orphans.remove(&orphan.object_key).await?;
                stats.reclaimed += 1;
            }
            Err(err) => {
                warn!(
                    key = %orphan.object_key,
                    attempts = orphan.attempts + 1,
                    error = %err,
                    "Orphaned object delete failed again"
                );
                orphans.mark_attempt(&orphan.object_key).await?;
                stats.failed += 1;
            }
        }
    }

    info!(
        reclaimed = stats.reclaimed,
        failed = stats.failed,
        "Orphan sweep completed"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use bytes::Bytes;
    use chrono::Utc;

    use stela_core::error::AppError;
    use stela_core::traits::storage::ByteStream;
    use stela_entity::orphan::OrphanedObject;

    #[derive(Debug, Default)]
    struct MemStore {
        objects: Mutex<HashSet<String>>,
        failing: Mutex<HashSet<String>>,
    }

    #[async_trait]
    impl ObjectStore for MemStore {
        fn provider_type(&self) -> &str {
            "memory"
        }

        async fn health_check(&self) -> stela_core::AppResult<bool> {
            Ok(true)
        }

        async fn put(&self, key: &str, _data: Bytes) -> stela_core::AppResult<()> {
            self.objects.lock().unwrap().insert(key.to_string());
            Ok(())
        }

        async fn put_stream(
            &self,
            _key: &str,
            _stream: ByteStream,
        ) -> stela_core::AppResult<u64> {
            Ok(0)
        }

        async fn delete(&self, key: &str) -> stela_core::AppResult<()> {
            if self.failing.lock().unwrap().contains(key) {
                return Err(AppError::storage("store unreachable"));
            }
            self.objects.lock().unwrap().remove(key);
            Ok(())
        }

        async fn exists(&self, key: &str) -> stela_core::AppResult<bool> {
            Ok(self.objects.lock().unwrap().contains(key))
        }

        fn public_url(&self, key: &str) -> String {
            format!("mem://{key}")
        }
    }

    #[derive(Default)]
    struct MemQueue {
        entries: Mutex<Vec<OrphanedObject>>,
    }

    #[async_trait]
    impl OrphanQueue for MemQueue {
        async fn enqueue(&self, object_key: &str) -> stela_core::AppResult<()> {
            let mut entries = self.entries.lock().unwrap();
            if !entries.iter().any(|o| o.object_key == object_key) {
                entries.push(OrphanedObject {
                    object_key: object_key.to_string(),
                    recorded_at: Utc::now(),
                    attempts: 0,
                });
            }
            Ok(())
        }

        async fn pending(&self, limit: u32) -> stela_core::AppResult<Vec<OrphanedObject>> {
            let entries = self.entries.lock().unwrap();
            Ok(entries.iter().take(limit as usize).cloned().collect())
        }

        async fn remove(&self, object_key: &str) -> stela_core::AppResult<()> {
            self.entries
                .lock()
                .unwrap()
                .retain(|o| o.object_key != object_key);
            Ok(())
        }

        async fn mark_attempt(&self, object_key: &str) -> stela_core::AppResult<()> {
            if let Some(orphan) = self
                .entries
                .lock()
                .unwrap()
                .iter_mut()
                .find(|o| o.object_key == object_key)
            {
                orphan.attempts += 1;
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_sweep_reclaims_deletable_and_counts_failures() {
        let store = Arc::new(MemStore::default());
        store.put("keep-failing", Bytes::new()).await.unwrap();
        store.put("reclaimable", Bytes::new()).await.unwrap();
        store.failing.lock().unwrap().insert("keep-failing".to_string());

        let queue = Arc::new(MemQueue::default());
        queue.enqueue("reclaimable").await.unwrap();
        queue.enqueue("keep-failing").await.unwrap();

        let stats = sweep_orphans(store.clone(), queue.clone(), 10).await.unwrap();
        assert_eq!(stats, SweepStats { reclaimed: 1, failed: 1 });

        assert!(!store.exists("reclaimable").await.unwrap());
        let remaining = queue.pending(10).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].object_key, "keep-failing");
        assert_eq!(remaining[0].attempts, 1);
    }

    #[tokio::test]
    async fn test_sweep_of_absent_object_is_reclaimed() {
        // The object never made it to the store (or a previous run already
        // deleted it); the idempotent delete still prunes the entry.
        let store = Arc::new(MemStore::default());
        let queue = Arc::new(MemQueue::default());
        queue.enqueue("already-gone").await.unwrap();

        let stats = sweep_orphans(store, queue.clone(), 10).await.unwrap();
        assert_eq!(stats.reclaimed, 1);
        assert!(queue.pending(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sweep_with_empty_queue_is_a_no_op() {
        let store = Arc::new(MemStore::default());
        let queue = Arc::new(MemQueue::default());

        let stats = sweep_orphans(store, queue, 10).await.unwrap();
        assert_eq!(stats, SweepStats::default());
    }

    #[tokio::test]
    async fn test_sweep_respects_batch_size() {
        let store = Arc::new(MemStore::default());
        let queue = Arc::new(MemQueue::default());
        for i in 0..5 {
            queue.enqueue(&format!("orphan-{i}")).await.unwrap();
        }

        let stats = sweep_orphans(store, queue.clone(), 2).await.unwrap();
        assert_eq!(stats.reclaimed, 2);
        assert_eq!(queue.pending(10).await.unwrap().len(), 3);
    }
}
