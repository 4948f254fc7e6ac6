//! Notification port trait.

use std::sync::Arc;

/// Fire-and-forget sink for user feedback.
///
/// Implementations must not block; the engine calls them from inside its
/// persistence tasks.
pub trait Notifier: Send + Sync {
    fn notify_success(&self, message: &str);

    fn notify_failure(&self, message: &str, detail: Option<&str>);
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify_success(&self, _message: &str) {}

    fn notify_failure(&self, _message: &str, _detail: Option<&str>) {}
}

impl<N: Notifier> Notifier for Arc<N> {
    fn notify_success(&self, message: &str) {
        (**self).notify_success(message);
    }

    fn notify_failure(&self, message: &str, detail: Option<&str>) {
        (**self).notify_failure(message, detail);
    }
}
