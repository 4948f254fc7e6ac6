//! Debounced + periodic autosave controller.
//!
//! Three triggers feed one save path:
//! - **Debounce**: every change re-arms a timer; only the last change inside
//!   the window results in a save (trailing edge).
//! - **Interval**: a background task saves every `interval` regardless of
//!   activity, using whatever value is current at tick time.
//! - **Manual**: `save_now` cancels a pending debounce and saves immediately.
//!
//! Attempts from different triggers may overlap. Each one sends the full
//! value current at its own dispatch, so the last successful write wins and
//! no merge is needed.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use classmart_types::config::AutosaveConfig;
use classmart_types::document::{SaveAttempt, SaveReceipt, SaveStatus, SaveTrigger};
use classmart_types::error::GatewayError;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::gateway::DocumentGateway;
use crate::notify::Notifier;

struct AutosaveShared<T, G, N> {
    document: watch::Sender<T>,
    status: watch::Sender<SaveStatus>,
    gateway: G,
    notifier: N,
    config: AutosaveConfig,
}

/// Owner of one autosaved document.
///
/// Created when the editing view mounts and disposed (explicitly or on drop)
/// when it unmounts. Must be started inside a tokio runtime.
pub struct AutosaveController<T, G, N> {
    shared: Arc<AutosaveShared<T, G, N>>,
    /// Cancels the interval task and any armed debounce.
    shutdown: CancellationToken,
    /// Cancels only the currently armed debounce.
    pending: Option<CancellationToken>,
}

impl<T, G, N> AutosaveController<T, G, N>
where
    T: Clone + Send + Sync + 'static,
    G: DocumentGateway<T> + 'static,
    N: Notifier + 'static,
{
    /// Seed the document and start the interval timer.
    ///
    /// The first interval save happens one full `interval` after start.
    pub fn start(initial: T, gateway: G, notifier: N, config: AutosaveConfig) -> Self {
        let (document, _) = watch::channel(initial);
        let (status, _) = watch::channel(SaveStatus::default());
        let shared = Arc::new(AutosaveShared {
            document,
            status,
            gateway,
            notifier,
            config,
        });

        let shutdown = CancellationToken::new();
        tokio::spawn(Arc::clone(&shared).run_interval(shutdown.child_token()));

        Self {
            shared,
            shutdown,
            pending: None,
        }
    }

    /// Replace the document and re-arm the debounce timer.
    pub fn on_change(&mut self, value: T) {
        self.shared.document.send_replace(value);
        self.arm_debounce();
    }

    /// Modify the document in place and re-arm the debounce timer.
    pub fn update(&mut self, edit: impl FnOnce(&mut T)) {
        self.shared.document.send_modify(edit);
        self.arm_debounce();
    }

    /// Cancel any pending debounced save, then save immediately.
    ///
    /// Returns whether the save succeeded. Failures are also recorded in the
    /// status and reported through the notifier.
    pub async fn save_now(&mut self) -> bool {
        self.cancel_pending();
        self.shared.perform_save(SaveTrigger::Manual).await.is_ok()
    }

    /// Current document value.
    pub fn document(&self) -> T {
        self.shared.document.borrow().clone()
    }

    pub fn subscribe_document(&self) -> watch::Receiver<T> {
        self.shared.document.subscribe()
    }

    /// Snapshot of `last_saved`, `is_saving` and `error`.
    pub fn status(&self) -> SaveStatus {
        self.shared.status.borrow().clone()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<SaveStatus> {
        self.shared.status.subscribe()
    }

    /// Whether a debounced save is armed and has not fired yet.
    pub fn has_pending_save(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|token| !token.is_cancelled())
    }

    /// Stop the interval timer and drop any pending debounce.
    ///
    /// Saves already dispatched to the gateway still settle. Idempotent.
    pub fn dispose(&mut self) {
        if self.shutdown.is_cancelled() {
            return;
        }
        self.shutdown.cancel();
        self.pending = None;
        tracing::debug!("autosave controller disposed");
    }

    fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }

    fn arm_debounce(&mut self) {
        self.cancel_pending();
        if self.shutdown.is_cancelled() {
            return;
        }

        let token = self.shutdown.child_token();
        self.pending = Some(token.clone());
        let shared = Arc::clone(&self.shared);
        // Measured from the change, not from when the task first runs.
        let deadline = Instant::now() + shared.config.debounce();

        tokio::spawn(async move {
            // Cancellation wins even when the deadline has already passed.
            tokio::select! {
                biased;
                _ = token.cancelled() => return,
                _ = tokio::time::sleep_until(deadline) => {}
            }
            // Fired: from here on the save is no longer cancellable.
            token.cancel();
            let _ = shared.perform_save(SaveTrigger::Debounce).await;
        });
    }
}

impl<T, G, N> Drop for AutosaveController<T, G, N> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl<T, G, N> AutosaveShared<T, G, N>
where
    T: Clone + Send + Sync + 'static,
    G: DocumentGateway<T> + 'static,
    N: Notifier + 'static,
{
    async fn run_interval(self: Arc<Self>, shutdown: CancellationToken) {
        // interval_at panics on a zero period.
        let period = self.config.interval().max(Duration::from_millis(1));
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    let _ = self.perform_save(SaveTrigger::Interval).await;
                }
            }
        }
    }

    async fn perform_save(&self, trigger: SaveTrigger) -> Result<SaveReceipt, GatewayError> {
        let attempt = SaveAttempt {
            triggered_at: Utc::now(),
            trigger,
            value: self.document.borrow().clone(),
        };
        self.status.send_modify(SaveStatus::begin_attempt);
        tracing::debug!(%trigger, "dispatching save");

        let result = self.gateway.save(attempt.value).await;

        match &result {
            Ok(receipt) => {
                self.status
                    .send_modify(|status| status.record_success(Utc::now(), receipt));
                tracing::info!(
                    %trigger,
                    record_id = ?receipt.record_id,
                    latency_ms = (Utc::now() - attempt.triggered_at).num_milliseconds(),
                    "document saved"
                );
                self.notifier.notify_success(&self.config.success_message);
            }
            Err(error) => {
                let detail = error.to_string();
                self.status
                    .send_modify(|status| status.record_failure(detail.clone()));
                tracing::warn!(%trigger, error = %error, "document save failed");
                self.notifier
                    .notify_failure(&self.config.failure_message, Some(&detail));
            }
        }
        result
    }
}
