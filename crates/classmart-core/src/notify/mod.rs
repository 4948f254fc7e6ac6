//! Notification port and in-process adapters.
//!
//! The engine reports every settled save and reorder through a `Notifier`.
//! `NotificationBus` fans notifications out to UI subscribers over a
//! `tokio::sync::broadcast` channel; `SilentNotifier` drops them.

pub mod bus;
pub mod port;

pub use bus::NotificationBus;
pub use port::{Notifier, SilentNotifier};
