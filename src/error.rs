//! Error types for the relay core

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    /// The envelope sender failed the allow-pattern check. Blocks the whole
    /// transaction, not individual recipients.
    #[error("Sender address not allowed: {0}")]
    SenderDenied(String),

    /// The cloud provider rejected or failed the send call.
    #[error("Backend error: {0}")]
    Backend(String),

    /// Startup configuration could not be applied.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The outbound request could not be assembled.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

pub type RelayResult<T> = Result<T, RelayError>;
