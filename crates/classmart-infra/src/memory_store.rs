//! In-memory persistence gateway.
//!
//! Implements both `DocumentGateway` and `PositionGateway` against process
//! memory. Used for local development, previews, and as the reference
//! backend in tests. Batches are validated and applied under a single write
//! lock, so a bulk update is all-or-nothing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use classmart_core::gateway::{DocumentGateway, PositionGateway};
use classmart_types::document::SaveReceipt;
use classmart_types::error::GatewayError;
use classmart_types::ordering::{OrderedItem, PositionUpdate, ReorderBatch};
use tokio::sync::RwLock;
use uuid::Uuid;

/// The stored version of an autosaved document.
#[derive(Debug, Clone)]
pub struct StoredDocument<T> {
    /// Assigned on first save and stable afterwards.
    pub record_id: String,
    /// Incremented by every accepted save.
    pub revision: u64,
    pub value: T,
}

/// Single-document, single-list store held in memory.
#[derive(Debug)]
pub struct MemoryStore<T> {
    document: RwLock<Option<StoredDocument<T>>>,
    positions: RwLock<HashMap<String, u32>>,
    offline: AtomicBool,
    bulk_updates: AtomicU64,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            document: RwLock::new(None),
            positions: RwLock::new(HashMap::new()),
            offline: AtomicBool::new(false),
            bulk_updates: AtomicU64::new(0),
        }
    }
}

impl<T: Clone + Send + Sync> MemoryStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed stored positions from a loaded list.
    pub async fn seed_positions<P>(&self, items: &[OrderedItem<P>]) {
        let mut positions = self.positions.write().await;
        positions.clear();
        positions.extend(items.iter().map(|item| (item.id.clone(), item.position)));
    }

    /// Simulate an outage: every call fails with `GatewayError::Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn document(&self) -> Option<StoredDocument<T>> {
        self.document.read().await.clone()
    }

    /// Stored positions, in position order.
    pub async fn positions(&self) -> Vec<PositionUpdate> {
        let positions = self.positions.read().await;
        let mut ordered: Vec<PositionUpdate> = positions
            .iter()
            .map(|(id, position)| PositionUpdate {
                id: id.clone(),
                position: *position,
            })
            .collect();
        ordered.sort_by_key(|update| update.position);
        ordered
    }

    /// Number of accepted bulk updates.
    pub fn bulk_update_count(&self) -> u64 {
        self.bulk_updates.load(Ordering::SeqCst)
    }

    fn ensure_online(&self) -> Result<(), GatewayError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(GatewayError::Unavailable)
        } else {
            Ok(())
        }
    }
}

impl<T: Clone + Send + Sync> DocumentGateway<T> for MemoryStore<T> {
    async fn save(&self, record: T) -> Result<SaveReceipt, GatewayError> {
        self.ensure_online()?;

        let mut document = self.document.write().await;
        let stored = match document.take() {
            Some(previous) => StoredDocument {
                record_id: previous.record_id,
                revision: previous.revision + 1,
                value: record,
            },
            None => StoredDocument {
                record_id: Uuid::now_v7().to_string(),
                revision: 1,
                value: record,
            },
        };
        let receipt = SaveReceipt {
            record_id: Some(stored.record_id.clone()),
        };
        tracing::debug!(record_id = %stored.record_id, revision = stored.revision, "document stored");
        *document = Some(stored);
        Ok(receipt)
    }
}

impl<T: Clone + Send + Sync> PositionGateway for MemoryStore<T> {
    async fn bulk_update_positions(&self, batch: &ReorderBatch) -> Result<(), GatewayError> {
        self.ensure_online()?;

        if !batch.is_contiguous() {
            return Err(GatewayError::Rejected(
                "positions must be a contiguous permutation starting at 0".to_string(),
            ));
        }

        let mut positions = self.positions.write().await;
        *positions = batch
            .updates
            .iter()
            .map(|update| (update.id.clone(), update.position))
            .collect();
        self.bulk_updates.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(items = batch.len(), "positions stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use classmart_core::autosave::AutosaveController;
    use classmart_core::notify::{NotificationBus, SilentNotifier};
    use classmart_core::reorder::{ReorderManager, ReorderOutcome};
    use classmart_types::config::{AutosaveConfig, ReorderConfig};
    use classmart_types::notification::NotificationKind;
    use classmart_types::ordering::MoveOperation;

    use crate::notify::TracingNotifier;

    fn lessons() -> Vec<OrderedItem<String>> {
        ["intro", "ownership", "async"]
            .iter()
            .enumerate()
            .map(|(i, id)| OrderedItem::new(*id, i as u32, format!("Lesson {i}")))
            .collect()
    }

    fn ids(updates: &[PositionUpdate]) -> Vec<&str> {
        updates.iter().map(|u| u.id.as_str()).collect()
    }

    #[tokio::test]
    async fn save_assigns_stable_record_id() {
        let store = MemoryStore::<String>::new();

        let first = store.save("v1".to_string()).await.unwrap();
        let second = store.save("v2".to_string()).await.unwrap();

        assert!(first.record_id.is_some());
        assert_eq!(first.record_id, second.record_id);

        let stored = store.document().await.unwrap();
        assert_eq!(stored.revision, 2);
        assert_eq!(stored.value, "v2");
    }

    #[tokio::test]
    async fn offline_store_rejects_everything() {
        let store = MemoryStore::<String>::new();
        store.set_offline(true);

        assert_eq!(
            store.save("lost".to_string()).await,
            Err(GatewayError::Unavailable)
        );
        assert_eq!(
            store.bulk_update_positions(&ReorderBatch::default()).await,
            Err(GatewayError::Unavailable)
        );
        assert!(store.document().await.is_none());
    }

    #[tokio::test]
    async fn non_contiguous_batch_is_rejected_atomically() {
        let store = MemoryStore::<String>::new();
        store.seed_positions(&lessons()).await;

        let batch = ReorderBatch {
            updates: vec![
                PositionUpdate {
                    id: "async".to_string(),
                    position: 0,
                },
                PositionUpdate {
                    id: "intro".to_string(),
                    position: 0,
                },
            ],
        };
        let result = store.bulk_update_positions(&batch).await;

        assert!(matches!(result, Err(GatewayError::Rejected(_))));
        assert_eq!(ids(&store.positions().await), vec!["intro", "ownership", "async"]);
        assert_eq!(store.bulk_update_count(), 0);
    }

    // -------------------------------------------------------------------
    // End to end with the engine
    // -------------------------------------------------------------------

    #[tokio::test]
    async fn reorder_manager_persists_into_store() {
        let store = Arc::new(MemoryStore::<String>::new());
        store.seed_positions(&lessons()).await;
        let bus = NotificationBus::new(8);
        let mut notifications = bus.subscribe();
        let manager = ReorderManager::new(
            lessons(),
            Arc::clone(&store),
            bus.clone(),
            ReorderConfig::default(),
        );

        let outcome = manager
            .move_item(MoveOperation::new(0, Some(2)))
            .settled()
            .await;

        assert_eq!(outcome, ReorderOutcome::Committed);
        assert_eq!(ids(&store.positions().await), vec!["ownership", "async", "intro"]);
        assert_eq!(
            notifications.recv().await.unwrap().kind,
            NotificationKind::Success
        );

        // Re-submitting the committed order changes nothing.
        assert!(manager.persist_current_order().settled().await.is_committed());
        assert_eq!(ids(&store.positions().await), vec!["ownership", "async", "intro"]);
        assert_eq!(store.bulk_update_count(), 2);
    }

    #[tokio::test]
    async fn reorder_manager_rolls_back_when_store_is_offline() {
        let store = Arc::new(MemoryStore::<String>::new());
        store.seed_positions(&lessons()).await;
        store.set_offline(true);
        let manager = ReorderManager::new(
            lessons(),
            Arc::clone(&store),
            TracingNotifier::scoped("course-lessons"),
            ReorderConfig::default(),
        );

        let outcome = manager
            .move_item(MoveOperation::new(2, Some(0)))
            .settled()
            .await;

        assert_eq!(
            outcome,
            ReorderOutcome::RolledBack {
                error: GatewayError::Unavailable
            }
        );
        assert_eq!(manager.items(), lessons());
        assert_eq!(ids(&store.positions().await), vec!["intro", "ownership", "async"]);
    }

    #[tokio::test(start_paused = true)]
    async fn autosave_controller_writes_latest_draft() {
        let store = Arc::new(MemoryStore::<String>::new());
        let mut controller = AutosaveController::start(
            "A".to_string(),
            Arc::clone(&store),
            SilentNotifier,
            AutosaveConfig::default(),
        );

        controller.on_change("AB".to_string());
        tokio::time::sleep(Duration::from_millis(200)).await;
        controller.on_change("ABC".to_string());
        tokio::time::sleep(Duration::from_millis(1_500)).await;

        let stored = store.document().await.unwrap();
        assert_eq!(stored.value, "ABC");
        assert_eq!(stored.revision, 1);
        assert_eq!(
            controller.status().last_record_id.as_deref(),
            Some(stored.record_id.as_str())
        );
        controller.dispose();
    }
}
