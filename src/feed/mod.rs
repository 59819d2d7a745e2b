//! Live feed subscription
//!
//! Connects to the upstream real-time source and delivers typed snapshot
//! callbacks per topic.
//!
//! ## Architecture
//!
//! - **FeedClient**: owns one connection and its background run loop,
//!   multiplexing topic subscriptions with per-topic reference counting
//! - **Transport**: trait seam over the concrete connector (WebSocket in
//!   production, channel doubles in tests)
//! - **Messages**: the JSON frames exchanged with the source
//!
//! ## Example
//!
//! ```rust,no_run
//! use monsoon::config::FeedConfig;
//! use monsoon::feed::{FeedClient, FeedEvent, Topic, WsTransport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FeedClient::spawn(FeedConfig::default(), Box::new(WsTransport::new()));
//!
//!     let subscription = client.subscribe(Topic::Sensors, |event| {
//!         if let FeedEvent::Snapshot(snapshot) = event {
//!             println!("latest: {:?}", snapshot);
//!         }
//!     })?;
//!
//!     // ... later
//!     subscription.cancel();
//!     client.close().await;
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod messages;
mod transport;

pub use client::{FeedClient, FeedEvent, FeedStatus, Subscription};
pub use error::{FeedError, FeedResult};
pub use messages::{ClientFrame, ServerFrame, Topic};
pub use transport::{FeedConnection, FeedTransport, WsTransport};
