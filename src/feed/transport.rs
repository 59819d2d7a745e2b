//! Feed transport
//!
//! The seam between subscription logic and the concrete connector.
//! Production uses `WsTransport` over tokio-tungstenite; tests plug in
//! channel-backed doubles.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use super::error::{FeedError, FeedResult};
use super::messages::{ClientFrame, ServerFrame};

/// Opens connections to the upstream real-time source
#[async_trait]
pub trait FeedTransport: Send + Sync + 'static {
    /// Open a fresh connection
    ///
    /// Failure to reach the source is `FeedError::ConnectionUnavailable`;
    /// the client retries with backoff.
    async fn connect(&self, url: &str) -> FeedResult<Box<dyn FeedConnection>>;
}

/// One live connection to the source
#[async_trait]
pub trait FeedConnection: Send {
    /// Send a frame to the source
    async fn send(&mut self, frame: ClientFrame) -> FeedResult<()>;

    /// Receive the next frame
    ///
    /// `None` means the source closed the connection.
    async fn recv(&mut self) -> Option<FeedResult<ServerFrame>>;
}

/// WebSocket transport over tokio-tungstenite
#[derive(Debug, Default)]
pub struct WsTransport;

impl WsTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FeedTransport for WsTransport {
    async fn connect(&self, url: &str) -> FeedResult<Box<dyn FeedConnection>> {
        let (stream, _response) =
            connect_async(url)
                .await
                .map_err(|e| FeedError::ConnectionUnavailable {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;

        tracing::debug!(url = %url, "Feed connection established");
        Ok(Box::new(WsConnection { stream }))
    }
}

/// A live WebSocket connection
struct WsConnection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl FeedConnection for WsConnection {
    async fn send(&mut self, frame: ClientFrame) -> FeedResult<()> {
        let text =
            serde_json::to_string(&frame).map_err(|e| FeedError::Protocol(e.to_string()))?;
        self.stream
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| FeedError::Transport(e.to_string()))
    }

    async fn recv(&mut self) -> Option<FeedResult<ServerFrame>> {
        while let Some(result) = self.stream.next().await {
            match result {
                Ok(Message::Text(text)) => {
                    return Some(
                        serde_json::from_str(text.as_str())
                            .map_err(|e| FeedError::Protocol(format!("bad frame: {}", e))),
                    );
                }
                Ok(Message::Binary(_)) => {
                    // The feed protocol is text-only
                    tracing::warn!("Ignoring binary frame from feed");
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) | Ok(Message::Frame(_)) => {
                    // Keepalives are handled by the websocket layer
                }
                Ok(Message::Close(_)) => return None,
                Err(e) => return Some(Err(FeedError::Transport(e.to_string()))),
            }
        }
        None
    }
}
