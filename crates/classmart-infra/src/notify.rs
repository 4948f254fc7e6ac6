//! Notifier that writes user feedback to the tracing log.
//!
//! Used by headless hosts (server-side rendering, batch jobs) where there is
//! no toast layer to show messages.

use classmart_core::notify::Notifier;

#[derive(Debug, Clone, Default)]
pub struct TracingNotifier {
    /// Name of the view or list the messages belong to.
    scope: Option<String>,
}

impl TracingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scoped(scope: impl Into<String>) -> Self {
        Self {
            scope: Some(scope.into()),
        }
    }
}

impl Notifier for TracingNotifier {
    fn notify_success(&self, message: &str) {
        tracing::info!(scope = self.scope.as_deref(), "{message}");
    }

    fn notify_failure(&self, message: &str, detail: Option<&str>) {
        tracing::warn!(scope = self.scope.as_deref(), detail, "{message}");
    }
}
