//! Feed error types
//!
//! Defines all errors that can occur in the live feed subscriber.

use thiserror::Error;

/// Errors that can occur in the live feed subscriber
#[derive(Error, Debug)]
pub enum FeedError {
    /// The live source cannot be reached
    ///
    /// Never silent: connection loss is reported to subscribers as a
    /// distinct event rather than starving their callbacks.
    #[error("Feed unreachable at {url}: {reason}")]
    ConnectionUnavailable { url: String, reason: String },

    /// The underlying transport failed mid-connection
    #[error("Transport error: {0}")]
    Transport(String),

    /// The source sent a frame that does not match the protocol
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// A topic name outside the closed set
    #[error("Unknown topic: {0}")]
    UnknownTopic(String),

    /// The client has been closed
    #[error("Feed client is closed")]
    Closed,
}

/// Result type alias for feed operations
pub type FeedResult<T> = Result<T, FeedError>;
