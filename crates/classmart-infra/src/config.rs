//! Sync configuration loader.
//!
//! Reads `sync.toml` from the application's config directory and
//! deserializes it into [`SyncConfig`]. Falls back to sensible defaults when
//! the file is missing or malformed.

use std::path::Path;

use classmart_types::config::{AutosaveConfig, SyncConfig};
use classmart_types::error::ConfigError;

/// Shortest accepted debounce window.
const MIN_DEBOUNCE_MS: u64 = 50;

/// Shortest accepted autosave interval.
const MIN_INTERVAL_MS: u64 = 1_000;

/// Parse a `sync.toml` document.
pub fn parse_sync_config(content: &str) -> Result<SyncConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Load sync configuration from `{config_dir}/sync.toml`.
///
/// - If the file does not exist, returns [`SyncConfig::default()`].
/// - If the file cannot be read or parsed, logs a warning and returns the default.
/// - Otherwise returns the parsed config with autosave timing floors applied.
pub async fn load_sync_config(config_dir: &Path) -> SyncConfig {
    let config_path = config_dir.join("sync.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No sync.toml found at {}, using defaults", config_path.display());
            return SyncConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return SyncConfig::default();
        }
    };

    match parse_sync_config(&content) {
        Ok(mut config) => {
            config.autosave = resolve_autosave_config(config.autosave);
            config
        }
        Err(err) => {
            tracing::warn!("Invalid {}: {err}, using defaults", config_path.display());
            SyncConfig::default()
        }
    }
}

/// Enforce timing floors on autosave configuration.
///
/// The debounce window is at least 50 ms and the interval at least 1 s and
/// never shorter than the debounce window.
pub fn resolve_autosave_config(mut config: AutosaveConfig) -> AutosaveConfig {
    config.debounce_ms = config.debounce_ms.max(MIN_DEBOUNCE_MS);
    config.interval_ms = config.interval_ms.max(MIN_INTERVAL_MS).max(config.debounce_ms);
    config
}
