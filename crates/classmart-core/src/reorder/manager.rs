//! Optimistic reorder manager.
//!
//! Each move instruction is one gesture:
//!
//! 1. **Idle** -- the list reflects the last-known-good order.
//! 2. **Move requested** -- no-op moves stop here with no state change.
//! 3. **Optimistically applied** -- the spliced, reindexed list is published
//!    synchronously, before any network round trip.
//! 4. **Persisting** -- the full `ReorderBatch` goes to the gateway on a
//!    spawned task. Dispatched persistence is never cancelled.
//! 5. **Committed** or **Rolled back** -- success promotes the gesture's
//!    order to last-known-good; failure restores the snapshot captured at
//!    step 2 of *this* gesture.
//!
//! A second gesture arriving while the first is persisting is applied on top
//! of the optimistic list, and its rollback target is that optimistic list.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use classmart_types::config::ReorderConfig;
use classmart_types::error::GatewayError;
use classmart_types::ordering::{MoveOperation, OrderedItem, ReorderBatch};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::ordering::{apply_move, normalize_positions, resolve_move};
use crate::gateway::PositionGateway;
use crate::notify::Notifier;

// ---------------------------------------------------------------------------
// Outcome and ticket
// ---------------------------------------------------------------------------

/// How a gesture settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// The move was a no-op; nothing was applied or persisted.
    Unchanged,
    /// The gateway accepted the new order.
    Committed,
    /// The gateway failed; the list was restored to the gesture's snapshot.
    RolledBack { error: GatewayError },
}

impl ReorderOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, ReorderOutcome::Committed)
    }
}

/// Handle to one gesture's persistence.
///
/// Dropping the ticket does not cancel persistence; the spawned task still
/// commits or rolls back.
#[must_use = "a ticket can be ignored, but the gesture outcome is only observable through it"]
#[derive(Debug)]
pub struct ReorderTicket {
    gesture: Option<u64>,
    handle: Option<JoinHandle<ReorderOutcome>>,
}

impl ReorderTicket {
    fn unchanged() -> Self {
        Self {
            gesture: None,
            handle: None,
        }
    }

    /// Whether the request was a no-op (nothing applied, nothing sent).
    pub fn is_noop(&self) -> bool {
        self.handle.is_none()
    }

    /// Sequence number of the gesture, `None` for no-ops.
    pub fn gesture(&self) -> Option<u64> {
        self.gesture
    }

    /// Wait for the gesture to commit or roll back.
    pub async fn settled(self) -> ReorderOutcome {
        let Some(handle) = self.handle else {
            return ReorderOutcome::Unchanged;
        };
        match handle.await {
            Ok(outcome) => outcome,
            Err(err) => {
                // Only reachable if the gateway or notifier panicked; the
                // list is left as the task last published it.
                tracing::error!(gesture = ?self.gesture, error = %err, "reorder task aborted");
                ReorderOutcome::RolledBack {
                    error: GatewayError::Remote(format!("reorder task aborted: {err}")),
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ReorderManager
// ---------------------------------------------------------------------------

/// The backend-confirmed order and the gesture that confirmed it.
struct Confirmed<P> {
    /// `0` for the initial load; a reset takes a fresh sequence number.
    gesture: u64,
    items: Vec<OrderedItem<P>>,
}

/// Holds one unit of `in_flight` until dropped, even if the task unwinds.
struct InFlight(Arc<AtomicU32>);

impl InFlight {
    fn enter(counter: &Arc<AtomicU32>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

struct ReorderState<P, G, N> {
    items: watch::Sender<Vec<OrderedItem<P>>>,
    last_known_good: Mutex<Confirmed<P>>,
    in_flight: Arc<AtomicU32>,
    next_gesture: AtomicU64,
    gateway: G,
    notifier: N,
    config: ReorderConfig,
}

/// Owner of one client-visible ordered list.
///
/// The view layer holds a single manager per list for as long as the list is
/// on screen. Cloning produces another handle to the same list.
pub struct ReorderManager<P, G, N> {
    state: Arc<ReorderState<P, G, N>>,
}

impl<P, G, N> Clone for ReorderManager<P, G, N> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<P, G, N> ReorderManager<P, G, N>
where
    P: Clone + Send + Sync + 'static,
    G: PositionGateway + 'static,
    N: Notifier + 'static,
{
    /// Create a manager seeded with `items`.
    ///
    /// Incoming positions are normalized (stable sort, then reindex), and the
    /// result is the initial last-known-good order.
    pub fn new(items: Vec<OrderedItem<P>>, gateway: G, notifier: N, config: ReorderConfig) -> Self {
        let items = normalize_positions(items);
        let (sender, _) = watch::channel(items.clone());
        Self {
            state: Arc::new(ReorderState {
                items: sender,
                last_known_good: Mutex::new(Confirmed { gesture: 0, items }),
                in_flight: Arc::new(AtomicU32::new(0)),
                next_gesture: AtomicU64::new(1),
                gateway,
                notifier,
                config,
            }),
        }
    }

    /// The list as currently visible, including optimistic changes.
    pub fn items(&self) -> Vec<OrderedItem<P>> {
        self.state.items.borrow().clone()
    }

    /// Receive every change to the visible list (optimistic updates and
    /// rollbacks alike).
    pub fn subscribe(&self) -> watch::Receiver<Vec<OrderedItem<P>>> {
        self.state.items.subscribe()
    }

    /// The most recent order confirmed by the backend (or the initial load).
    pub fn last_known_good(&self) -> Vec<OrderedItem<P>> {
        self.state
            .last_known_good
            .lock()
            .expect("reorder last-known-good lock poisoned")
            .items
            .clone()
    }

    /// Number of gestures awaiting the gateway.
    pub fn in_flight(&self) -> u32 {
        self.state.in_flight.load(Ordering::SeqCst)
    }

    /// Apply a move optimistically and persist the resulting order.
    ///
    /// The visible list is updated before this returns. No-op moves (no
    /// destination, destination equal to source, source outside the list)
    /// return a ticket that settles as `Unchanged` without touching the
    /// gateway.
    pub fn move_item(&self, op: MoveOperation) -> ReorderTicket {
        let mut plan = None;
        self.state.items.send_if_modified(|list| {
            let Some((source, destination)) = resolve_move(&op, list.len()) else {
                return false;
            };
            let snapshot = list.clone();
            *list = apply_move(&snapshot, source, destination);
            plan = Some((snapshot, list.clone()));
            true
        });

        let Some((snapshot, applied)) = plan else {
            tracing::debug!(
                source = op.source_index,
                destination = ?op.destination_index,
                "ignoring no-op move"
            );
            return ReorderTicket::unchanged();
        };

        self.dispatch(snapshot, applied)
    }

    /// Persist the visible order again as a full batch.
    ///
    /// Re-submitting an already-committed order is idempotent: it succeeds
    /// and leaves positions unchanged.
    pub fn persist_current_order(&self) -> ReorderTicket {
        let current = self.items();
        self.dispatch(current.clone(), current)
    }

    /// Replace the list wholesale, e.g. after the view reloads it from the
    /// backend. The new list becomes last-known-good.
    ///
    /// Gestures still in flight keep their own snapshots and may roll back
    /// over the reset list if they fail. Their commits no longer replace
    /// last-known-good.
    pub fn reset(&self, items: Vec<OrderedItem<P>>) {
        let items = normalize_positions(items);
        let gesture = self.state.next_gesture.fetch_add(1, Ordering::SeqCst);
        *self
            .state
            .last_known_good
            .lock()
            .expect("reorder last-known-good lock poisoned") = Confirmed {
            gesture,
            items: items.clone(),
        };
        self.state.items.send_replace(items);
    }

    fn dispatch(&self, snapshot: Vec<OrderedItem<P>>, applied: Vec<OrderedItem<P>>) -> ReorderTicket {
        let gesture = self.state.next_gesture.fetch_add(1, Ordering::SeqCst);
        let in_flight = InFlight::enter(&self.state.in_flight);
        tracing::debug!(gesture, items = applied.len(), "reorder applied optimistically");

        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(state.persist(gesture, snapshot, applied, in_flight));
        ReorderTicket {
            gesture: Some(gesture),
            handle: Some(handle),
        }
    }
}

impl<P, G, N> ReorderState<P, G, N>
where
    P: Clone + Send + Sync + 'static,
    G: PositionGateway + 'static,
    N: Notifier + 'static,
{
    async fn persist(
        self: Arc<Self>,
        gesture: u64,
        snapshot: Vec<OrderedItem<P>>,
        applied: Vec<OrderedItem<P>>,
        _in_flight: InFlight,
    ) -> ReorderOutcome {
        let batch = ReorderBatch::from_items(&applied);
        let result = self.gateway.bulk_update_positions(&batch).await;

        match result {
            Ok(()) => {
                let mut confirmed = self
                    .last_known_good
                    .lock()
                    .expect("reorder last-known-good lock poisoned");
                // Commits can land out of order; an older gesture never
                // replaces a newer confirmation.
                if gesture > confirmed.gesture {
                    *confirmed = Confirmed {
                        gesture,
                        items: applied,
                    };
                } else {
                    tracing::debug!(gesture, newer = confirmed.gesture, "stale commit ignored");
                }
                drop(confirmed);
                tracing::info!(gesture, items = batch.len(), "reorder committed");
                self.notifier.notify_success(&self.config.success_message);
                ReorderOutcome::Committed
            }
            Err(error) => {
                self.items.send_replace(snapshot);
                tracing::warn!(gesture, error = %error, "reorder failed, rolled back");
                let detail = error.to_string();
                self.notifier
                    .notify_failure(&self.config.failure_message, Some(&detail));
                ReorderOutcome::RolledBack { error }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
