//! Error types for the orrery core.
//!
//! Nothing here is fatal: callers log these and carry on rendering.

/// Failure to apply a rotation snapshot to the orbit model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot has {got} values but the model has {expected} bodies")]
    LengthMismatch { expected: usize, got: usize },
}

/// Failure to encode or decode a sync frame.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("empty frame")]
    Empty,
    #[error("unknown channel tag: {0:#04x}")]
    UnknownChannel(u8),
    #[error("payload codec error: {0}")]
    Payload(#[from] postcard::Error),
}

/// Failure to load an [`OrreryConfig`](crate::config::OrreryConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("move_send_interval must be at least 1")]
    ZeroSendInterval,
}
