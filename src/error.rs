//! Error types for the Payplug gateway client.

use thiserror::Error;

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors surfaced by gateway operations. None of them are retried internally.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The processor rejected the request (bad credentials, invalid field, unknown id).
    /// `body` is the full response; only its display is shortened.
    #[error("payment processor rejected the request (HTTP {status}): {}", excerpt(.body))]
    Remote { status: u16, body: String },

    /// An inbound notification could not be verified against the processor.
    #[error("notification verification failed: {0}")]
    Verification(String),

    /// Refund issuance was rejected; `diagnostic` is the processor's response body.
    #[error("refund action cannot be performed (HTTP {status})")]
    Refund {
        status: u16,
        diagnostic: serde_json::Value,
    },

    /// The caller passed a value the client cannot map.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Network-level failure talking to the processor.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The processor answered with a body of an unexpected shape.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

const DISPLAY_LIMIT: usize = 2000;

fn excerpt(body: &str) -> String {
    body.chars().take(DISPLAY_LIMIT).collect()
}
