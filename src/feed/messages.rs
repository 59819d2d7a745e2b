//! Feed wire messages
//!
//! Defines the topics and JSON frames exchanged with the upstream
//! real-time source. The crate is the subscriber side: it sends
//! `ClientFrame`s and receives `ServerFrame`s.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use super::error::FeedError;

/// A named channel identifying which dataset a subscription observes
///
/// The topic set is closed; an unknown topic name is rejected at parse.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    /// Current readings, one per parameter
    Sensors,
    /// Hourly forecast series, one per parameter
    Predictions,
}

impl Topic {
    /// Get all topics for iteration
    pub fn all() -> &'static [Topic] {
        &[Topic::Sensors, Topic::Predictions]
    }

    /// Wire name of this topic
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Sensors => "sensors",
            Topic::Predictions => "predictions",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sensors" => Ok(Topic::Sensors),
            "predictions" => Ok(Topic::Predictions),
            other => Err(FeedError::UnknownTopic(other.to_string())),
        }
    }
}

/// Frames sent from the subscriber to the source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Start receiving snapshots for topics
    Subscribe {
        /// Topics to subscribe to
        topics: Vec<Topic>,
    },
    /// Stop receiving snapshots for topics
    Unsubscribe {
        /// Topics to unsubscribe from
        topics: Vec<Topic>,
    },
    /// Keepalive
    Ping,
}

/// Frames sent from the source to the subscriber
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    /// The full current value published at a topic
    ///
    /// Replaces any prior value the subscriber held; the payload is decoded
    /// and validated before it reaches any callback.
    Snapshot {
        /// Topic this snapshot was published on
        topic: Topic,
        /// Raw payload, validated by `model::decode`
        payload: Value,
    },
    /// Subscription confirmed
    Subscribed {
        /// Topics successfully subscribed to
        topics: Vec<Topic>,
    },
    /// Unsubscription confirmed
    Unsubscribed {
        /// Topics successfully unsubscribed from
        topics: Vec<Topic>,
    },
    /// Keepalive response
    Pong,
    /// Error reported by the source
    Error {
        /// Error description
        message: String,
    },
}
