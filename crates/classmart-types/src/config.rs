//! Sync engine configuration types.
//!
//! `SyncConfig` represents the `sync.toml` file that controls autosave timing
//! and the notification messages shown by both subsystems.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration for the sync engine.
///
/// All fields have sensible defaults, so an empty file is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub autosave: AutosaveConfig,

    #[serde(default)]
    pub reorder: ReorderConfig,
}

/// Timing and messages for the autosave controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutosaveConfig {
    /// Period of the unconditional interval save, in milliseconds.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Quiet period after the last change before a save fires, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_autosave_success")]
    pub success_message: String,

    #[serde(default = "default_autosave_failure")]
    pub failure_message: String,
}

fn default_interval_ms() -> u64 {
    30_000
}

fn default_debounce_ms() -> u64 {
    1_000
}

fn default_autosave_success() -> String {
    "Changes saved".to_string()
}

fn default_autosave_failure() -> String {
    "Failed to save changes".to_string()
}

impl AutosaveConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            debounce_ms: default_debounce_ms(),
            success_message: default_autosave_success(),
            failure_message: default_autosave_failure(),
        }
    }
}

/// Messages for the reorder manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderConfig {
    #[serde(default = "default_reorder_success")]
    pub success_message: String,

    #[serde(default = "default_reorder_failure")]
    pub failure_message: String,
}

fn default_reorder_success() -> String {
    "Order updated".to_string()
}

fn default_reorder_failure() -> String {
    "Failed to update order".to_string()
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self {
            success_message: default_reorder_success(),
            failure_message: default_reorder_failure(),
        }
    }
}
