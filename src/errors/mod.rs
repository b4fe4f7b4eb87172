use thiserror::Error;

/// Typed error hierarchy for groupsync.
///
/// Use at module boundaries (config loading, transport calls, media staging, the event queue).
/// Internal/leaf functions can continue using `anyhow::Result`; the `Internal` variant
/// allows seamless conversion via the `?` operator.
#[derive(Debug, Error)]
pub enum GroupSyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {message}")]
    Transport { message: String, retryable: bool },

    #[error("Media download failed: {0}")]
    Download(String),

    #[error("Event queue error: {0}")]
    Queue(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl GroupSyncError {
    /// Whether the failure looks transient. Informational only: mirroring never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { retryable, .. } => *retryable,
            Self::Queue(_) | Self::Internal(_) => true,
            Self::Config(_) | Self::Download(_) => false,
        }
    }

    pub(crate) fn transport(message: impl Into<String>, retryable: bool) -> Self {
        Self::Transport {
            message: message.into(),
            retryable,
        }
    }
}
