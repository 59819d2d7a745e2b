//! Decode error types
//!
//! Errors raised while turning raw feed payloads into typed snapshots.

use thiserror::Error;

/// Errors that can occur while decoding a snapshot payload
#[derive(Error, Debug)]
pub enum DecodeError {
    /// A parameter name outside the closed four-value set
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    /// The raw payload does not match the expected shape
    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),
}

/// Result type alias for decode operations
pub type DecodeResult<T> = Result<T, DecodeError>;
