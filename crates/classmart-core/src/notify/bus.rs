//! Broadcast bus distributing `Notification` events to UI subscribers.
//!
//! Built on `tokio::sync::broadcast`, the bus supports any number of
//! concurrent subscribers (toast layer, status bar, test harnesses). Publishing
//! with no active subscribers is a no-op.

use classmart_types::notification::Notification;
use tokio::sync::broadcast;

use super::port::Notifier;

/// Multi-consumer notification channel.
///
/// Cloning the bus clones the sender, so the autosave controller and the
/// reorder manager can share one bus.
pub struct NotificationBus {
    sender: broadcast::Sender<Notification>,
}

impl NotificationBus {
    /// Create a new bus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create a new subscriber that will receive all future notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    /// Publish a notification to all current subscribers.
    ///
    /// If there are no subscribers, the notification is silently dropped.
    pub fn publish(&self, notification: Notification) {
        let _ = self.sender.send(notification);
    }
}

impl Notifier for NotificationBus {
    fn notify_success(&self, message: &str) {
        self.publish(Notification::success(message));
    }

    fn notify_failure(&self, message: &str, detail: Option<&str>) {
        self.publish(Notification::failure(message, detail.map(str::to_string)));
    }
}

impl Clone for NotificationBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl std::fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationBus")
            .field("receiver_count", &self.sender.receiver_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classmart_types::notification::NotificationKind;

    #[tokio::test]
    async fn success_is_delivered_to_subscriber() {
        let bus = NotificationBus::new(16);
        let mut rx = bus.subscribe();

        bus.notify_success("Changes saved");

        let received = rx.recv().await.unwrap();
        assert_eq!(received.kind, NotificationKind::Success);
        assert_eq!(received.message, "Changes saved");
        assert!(received.detail.is_none());
    }

    #[tokio::test]
    async fn failure_carries_detail() {
        let bus = NotificationBus::new(16);
        let mut rx = bus.subscribe();

        bus.notify_failure("Failed to update order", Some("remote error: 503"));

        let received = rx.recv().await.unwrap();
        assert!(received.is_failure());
        assert_eq!(received.detail.as_deref(), Some("remote error: 503"));
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = NotificationBus::new(16);
        bus.notify_success("nobody listening");
        bus.notify_failure("still nobody", None);
    }

    #[test]
    fn clone_shares_channel() {
        let bus = NotificationBus::new(16);
        let bus2 = bus.clone();
        let mut rx = bus.subscribe();

        bus2.notify_success("from clone");

        assert_eq!(rx.try_recv().unwrap().message, "from clone");
    }

    #[test]
    fn debug_impl() {
        let bus = NotificationBus::new(16);
        let _rx = bus.subscribe();
        let debug = format!("{bus:?}");
        assert!(debug.contains("NotificationBus"));
        assert!(debug.contains("receiver_count"));
    }
}
