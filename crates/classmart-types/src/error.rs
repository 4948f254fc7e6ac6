use thiserror::Error;

/// Errors reported by a persistence gateway.
///
/// Every variant is a transient failure from the engine's point of view: the
/// autosave controller records it and waits for the next trigger, the reorder
/// manager rolls back the gesture. Nothing here is fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("persistence backend unavailable")]
    Unavailable,

    #[error("remote error: {0}")]
    Remote(String),

    #[error("request rejected: {0}")]
    Rejected(String),

    /// The backend applied only part of a batch. Treated exactly like a total
    /// failure by callers.
    #[error("partial update: {applied} of {total} positions applied")]
    PartialApplication { applied: usize, total: usize },
}

/// Errors from loading sync configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),
}
