//! Live feed client
//!
//! `FeedClient` owns one connection to the upstream source and multiplexes
//! topic subscriptions over it. Subscriptions are reference-counted per
//! topic: the wire Subscribe goes out on the first subscriber and the wire
//! Unsubscribe when the last one cancels.
//!
//! The client is an explicitly constructed object with an explicit
//! lifecycle: `spawn` at startup, `close` at shutdown. Connection loss is
//! never silent - subscribers receive `FeedEvent::ConnectionLost`, the run
//! loop retries with exponential backoff, and `FeedEvent::Restored` follows
//! a successful resubscribe.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use uuid::Uuid;

use super::error::{FeedError, FeedResult};
use super::messages::{ClientFrame, ServerFrame, Topic};
use super::transport::{FeedConnection, FeedTransport};
use crate::config::FeedConfig;
use crate::model::{decode_snapshot, Snapshot};

/// An event delivered to a subscription callback
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// A new snapshot was published on the subscribed topic
    Snapshot(Snapshot),
    /// The source became unreachable; delivery is paused until `Restored`
    ConnectionLost {
        /// Description of the failure
        reason: String,
    },
    /// The connection came back and the topic was resubscribed
    Restored,
}

/// Health of the feed connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStatus {
    /// First connection attempt in progress
    Connecting,
    /// Connected and delivering snapshots
    Connected,
    /// Connection lost; waiting to retry
    Backoff {
        /// Consecutive failed attempts
        attempt: u32,
    },
    /// The client was closed
    Closed,
}

type Callback = Box<dyn Fn(FeedEvent) + Send + Sync>;

/// A registered subscriber
///
/// The cancelled flag is checked immediately before every callback
/// invocation, so no event is delivered after `Subscription::cancel`
/// returns, even if a dispatch was already in flight.
struct SubscriberEntry {
    cancelled: AtomicBool,
    callback: Callback,
}

enum Command {
    Subscribe {
        topic: Topic,
        id: Uuid,
        entry: Arc<SubscriberEntry>,
    },
    Cancel {
        topic: Topic,
        id: Uuid,
    },
    Shutdown,
}

/// Handle to an active subscription
///
/// Cancelling (explicitly or by drop) stops callback delivery for this
/// subscription only; other subscriptions are unaffected.
pub struct Subscription {
    topic: Topic,
    id: Uuid,
    entry: Arc<SubscriberEntry>,
    command_tx: mpsc::UnboundedSender<Command>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.topic)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl Subscription {
    /// The topic this subscription observes
    pub fn topic(&self) -> Topic {
        self.topic
    }

    /// Stop receiving callbacks
    ///
    /// Idempotent: calling more than once is a no-op.
    pub fn cancel(&self) {
        if !self.entry.cancelled.swap(true, Ordering::SeqCst) {
            let _ = self.command_tx.send(Command::Cancel {
                topic: self.topic,
                id: self.id,
            });
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Client for the upstream real-time feed
pub struct FeedClient {
    command_tx: mpsc::UnboundedSender<Command>,
    status_rx: watch::Receiver<FeedStatus>,
}

impl FeedClient {
    /// Construct a client and start its background run loop
    ///
    /// Returns immediately; the first connection attempt happens on the
    /// spawned task.
    pub fn spawn(config: FeedConfig, transport: Box<dyn FeedTransport>) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(FeedStatus::Connecting);

        let run_loop = RunLoop {
            config,
            transport,
            command_rx,
            status_tx,
            subscribers: HashMap::new(),
            outage: None,
        };
        tokio::spawn(run_loop.run());

        Self {
            command_tx,
            status_rx,
        }
    }

    /// Subscribe to a topic
    ///
    /// Returns immediately; `on_update` fires on the client's run loop for
    /// every event on the topic. Delivery is at-least-once, last-value-wins:
    /// no buffering, no dedup.
    pub fn subscribe(
        &self,
        topic: Topic,
        on_update: impl Fn(FeedEvent) + Send + Sync + 'static,
    ) -> FeedResult<Subscription> {
        let id = Uuid::new_v4();
        let entry = Arc::new(SubscriberEntry {
            cancelled: AtomicBool::new(false),
            callback: Box::new(on_update),
        });

        self.command_tx
            .send(Command::Subscribe {
                topic,
                id,
                entry: Arc::clone(&entry),
            })
            .map_err(|_| FeedError::Closed)?;

        Ok(Subscription {
            topic,
            id,
            entry,
            command_tx: self.command_tx.clone(),
        })
    }

    /// Current connection health
    pub fn status(&self) -> FeedStatus {
        self.status_rx.borrow().clone()
    }

    /// Watch connection health changes
    pub fn status_watch(&self) -> watch::Receiver<FeedStatus> {
        self.status_rx.clone()
    }

    /// Close the client, ending all subscriptions
    ///
    /// Waits for the run loop to finish; afterwards `subscribe` fails with
    /// `FeedError::Closed`.
    pub async fn close(&self) {
        let _ = self.command_tx.send(Command::Shutdown);
        let mut status = self.status_rx.clone();
        let _ = status.wait_for(|s| *s == FeedStatus::Closed).await;
    }
}

/// Outcome of a connection phase
enum Flow {
    /// Shut down the client
    Shutdown,
    /// Connection lost; retry
    Lost(String),
}

/// The background task driving one client
///
/// Owns the subscriber registry exclusively; all mutation arrives over the
/// command channel, so dispatch needs no locks.
struct RunLoop {
    config: FeedConfig,
    transport: Box<dyn FeedTransport>,
    command_rx: mpsc::UnboundedReceiver<Command>,
    status_tx: watch::Sender<FeedStatus>,
    subscribers: HashMap<Topic, HashMap<Uuid, Arc<SubscriberEntry>>>,
    /// Reason for the current outage, if one is in progress
    outage: Option<String>,
}

impl RunLoop {
    async fn run(mut self) {
        let mut attempt: u32 = 0;

        loop {
            match self.transport.connect(&self.config.url).await {
                Ok(conn) => {
                    attempt = 0;
                    self.set_status(FeedStatus::Connected);
                    match self.serve_connection(conn).await {
                        Flow::Shutdown => break,
                        Flow::Lost(reason) => self.report_lost(&reason),
                    }
                }
                Err(e) => {
                    tracing::warn!(url = %self.config.url, error = %e, "Feed connect failed");
                    self.report_lost(&e.to_string());
                }
            }

            attempt += 1;
            self.set_status(FeedStatus::Backoff { attempt });
            let delay = backoff_delay(&self.config, attempt);
            tracing::debug!(attempt, delay_ms = delay.as_millis() as u64, "Feed retry scheduled");

            if let Flow::Shutdown = self.wait_for_retry(delay).await {
                break;
            }
        }

        // Refuse further subscribes before the closed status is visible
        self.command_rx.close();
        self.set_status(FeedStatus::Closed);
        tracing::info!("Feed client closed");
    }

    /// Drive one live connection until it drops or the client shuts down
    async fn serve_connection(&mut self, mut conn: Box<dyn FeedConnection>) -> Flow {
        // Resubscribe every topic that still has subscribers
        let topics = self.active_topics();
        if !topics.is_empty() {
            if let Err(e) = conn.send(ClientFrame::Subscribe { topics }).await {
                return Flow::Lost(e.to_string());
            }
        }

        if self.outage.take().is_some() {
            self.dispatch_all(FeedEvent::Restored);
        }

        loop {
            tokio::select! {
                command = self.command_rx.recv() => {
                    match command {
                        None | Some(Command::Shutdown) => return Flow::Shutdown,
                        Some(Command::Subscribe { topic, id, entry }) => {
                            if let Err(e) = self.register(&mut conn, topic, id, entry).await {
                                return Flow::Lost(e.to_string());
                            }
                        }
                        Some(Command::Cancel { topic, id }) => {
                            if let Err(e) = self.deregister(&mut conn, topic, id).await {
                                return Flow::Lost(e.to_string());
                            }
                        }
                    }
                }
                frame = conn.recv() => {
                    match frame {
                        None => return Flow::Lost("connection closed by source".to_string()),
                        Some(Err(e)) => return Flow::Lost(e.to_string()),
                        Some(Ok(frame)) => self.handle_frame(frame),
                    }
                }
            }
        }
    }

    /// Add a subscriber; first subscriber for a topic subscribes on the wire
    async fn register(
        &mut self,
        conn: &mut Box<dyn FeedConnection>,
        topic: Topic,
        id: Uuid,
        entry: Arc<SubscriberEntry>,
    ) -> FeedResult<()> {
        let first = self
            .subscribers
            .get(&topic)
            .map(|subs| subs.is_empty())
            .unwrap_or(true);

        self.subscribers.entry(topic).or_default().insert(id, entry);
        tracing::debug!(topic = %topic, subscriber = %id, "Subscribed");

        if first {
            conn.send(ClientFrame::Subscribe {
                topics: vec![topic],
            })
            .await?;
        }
        Ok(())
    }

    /// Remove a subscriber; last one out unsubscribes on the wire
    async fn deregister(
        &mut self,
        conn: &mut Box<dyn FeedConnection>,
        topic: Topic,
        id: Uuid,
    ) -> FeedResult<()> {
        let empty = match self.subscribers.get_mut(&topic) {
            Some(subs) => {
                subs.remove(&id);
                subs.is_empty()
            }
            None => return Ok(()),
        };
        tracing::debug!(topic = %topic, subscriber = %id, "Unsubscribed");

        if empty {
            self.subscribers.remove(&topic);
            conn.send(ClientFrame::Unsubscribe {
                topics: vec![topic],
            })
            .await?;
        }
        Ok(())
    }

    fn handle_frame(&mut self, frame: ServerFrame) {
        match frame {
            ServerFrame::Snapshot { topic, payload } => match decode_snapshot(topic, &payload) {
                Ok(snapshot) => self.dispatch(topic, FeedEvent::Snapshot(snapshot)),
                Err(e) => {
                    // Rejected at the boundary, never delivered half-formed
                    tracing::warn!(topic = %topic, error = %e, "Dropping malformed snapshot");
                }
            },
            ServerFrame::Subscribed { topics } => {
                tracing::debug!(topics = ?topics, "Source confirmed subscription");
            }
            ServerFrame::Unsubscribed { topics } => {
                tracing::debug!(topics = ?topics, "Source confirmed unsubscription");
            }
            ServerFrame::Pong => {
                tracing::trace!("Feed pong");
            }
            ServerFrame::Error { message } => {
                tracing::warn!(message = %message, "Feed reported error");
            }
        }
    }

    /// Deliver an event to every live subscriber of a topic
    fn dispatch(&self, topic: Topic, event: FeedEvent) {
        if let Some(subs) = self.subscribers.get(&topic) {
            for entry in subs.values() {
                if !entry.cancelled.load(Ordering::SeqCst) {
                    (entry.callback)(event.clone());
                }
            }
        }
    }

    /// Deliver an event to every live subscriber of every topic
    fn dispatch_all(&self, event: FeedEvent) {
        for subs in self.subscribers.values() {
            for entry in subs.values() {
                if !entry.cancelled.load(Ordering::SeqCst) {
                    (entry.callback)(event.clone());
                }
            }
        }
    }

    /// Surface a connection loss once per outage, not once per retry
    fn report_lost(&mut self, reason: &str) {
        if self.outage.is_none() {
            self.outage = Some(reason.to_string());
            self.dispatch_all(FeedEvent::ConnectionLost {
                reason: reason.to_string(),
            });
        }
    }

    /// Sleep out a backoff delay while still servicing registry commands
    async fn wait_for_retry(&mut self, delay: Duration) -> Flow {
        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                _ = &mut sleep => return Flow::Lost("retrying".to_string()),
                command = self.command_rx.recv() => {
                    match command {
                        None | Some(Command::Shutdown) => return Flow::Shutdown,
                        Some(Command::Subscribe { topic, id, entry }) => {
                            // A subscriber joining mid-outage learns about it
                            // right away instead of starving silently
                            if let Some(reason) = &self.outage {
                                if !entry.cancelled.load(Ordering::SeqCst) {
                                    (entry.callback)(FeedEvent::ConnectionLost {
                                        reason: reason.clone(),
                                    });
                                }
                            }
                            self.subscribers.entry(topic).or_default().insert(id, entry);
                        }
                        Some(Command::Cancel { topic, id }) => {
                            if let Some(subs) = self.subscribers.get_mut(&topic) {
                                subs.remove(&id);
                                if subs.is_empty() {
                                    self.subscribers.remove(&topic);
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    fn active_topics(&self) -> Vec<Topic> {
        let mut topics: Vec<Topic> = self
            .subscribers
            .iter()
            .filter(|(_, subs)| !subs.is_empty())
            .map(|(topic, _)| *topic)
            .collect();
        topics.sort_by_key(|t| t.as_str());
        topics
    }

    fn set_status(&self, status: FeedStatus) {
        let _ = self.status_tx.send(status);
    }
}

/// Exponential backoff, doubling from the configured initial delay up to
/// the configured cap
fn backoff_delay(config: &FeedConfig, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(16);
    let delay_ms = config
        .reconnect_initial_ms
        .saturating_mul(1u64 << exponent)
        .min(config.reconnect_max_ms);
    Duration::from_millis(delay_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Parameter;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicU32;
    use std::sync::Mutex;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(2);

    /// Connection double: the test injects server frames and observes
    /// client frames over channels.
    struct TestConnection {
        outbound: mpsc::UnboundedSender<ClientFrame>,
        inbound: mpsc::UnboundedReceiver<FeedResult<ServerFrame>>,
    }

    #[async_trait]
    impl FeedConnection for TestConnection {
        async fn send(&mut self, frame: ClientFrame) -> FeedResult<()> {
            self.outbound
                .send(frame)
                .map_err(|_| FeedError::Transport("test sink closed".to_string()))
        }

        async fn recv(&mut self) -> Option<FeedResult<ServerFrame>> {
            self.inbound.recv().await
        }
    }

    /// Transport double handing out scripted connections; once the script
    /// is exhausted every connect fails.
    struct TestTransport {
        connections: Mutex<VecDeque<TestConnection>>,
        attempts: Arc<AtomicU32>,
    }

    #[async_trait]
    impl FeedTransport for TestTransport {
        async fn connect(&self, url: &str) -> FeedResult<Box<dyn FeedConnection>> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            match self.connections.lock().unwrap().pop_front() {
                Some(conn) => Ok(Box::new(conn)),
                None => Err(FeedError::ConnectionUnavailable {
                    url: url.to_string(),
                    reason: "connection refused".to_string(),
                }),
            }
        }
    }

    struct ConnHandle {
        server_tx: mpsc::UnboundedSender<FeedResult<ServerFrame>>,
        client_rx: mpsc::UnboundedReceiver<ClientFrame>,
    }

    fn scripted_transport(count: usize) -> (Box<TestTransport>, Vec<ConnHandle>, Arc<AtomicU32>) {
        let mut connections = VecDeque::new();
        let mut handles = Vec::new();
        for _ in 0..count {
            let (server_tx, inbound) = mpsc::unbounded_channel();
            let (outbound, client_rx) = mpsc::unbounded_channel();
            connections.push_back(TestConnection { outbound, inbound });
            handles.push(ConnHandle {
                server_tx,
                client_rx,
            });
        }
        let attempts = Arc::new(AtomicU32::new(0));
        let transport = Box::new(TestTransport {
            connections: Mutex::new(connections),
            attempts: Arc::clone(&attempts),
        });
        (transport, handles, attempts)
    }

    fn test_config() -> FeedConfig {
        FeedConfig {
            url: "ws://test.invalid/feed".to_string(),
            reconnect_initial_ms: 10,
            reconnect_max_ms: 50,
        }
    }

    fn sensors_frame(rainfall: f64) -> ServerFrame {
        ServerFrame::Snapshot {
            topic: Topic::Sensors,
            payload: json!({
                "rainfall": {
                    "value": rainfall,
                    "unit": "mm",
                    "trend": "up",
                    "lastUpdated": "2026-08-27T06:30:00Z"
                }
            }),
        }
    }

    /// Collects delivered events through a channel so tests can await them
    fn capturing_callback() -> (
        impl Fn(FeedEvent) + Send + Sync + 'static,
        mpsc::UnboundedReceiver<FeedEvent>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        (move |event| { let _ = tx.send(event); }, rx)
    }

    async fn expect_subscribe(handle: &mut ConnHandle, expected: &[Topic]) {
        let frame = timeout(WAIT, handle.client_rx.recv())
            .await
            .expect("timed out waiting for wire frame")
            .expect("connection dropped");
        match frame {
            ClientFrame::Subscribe { topics } => assert_eq!(topics, expected),
            other => panic!("Expected Subscribe, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_snapshot_delivered_to_subscriber() {
        let (transport, mut handles, _) = scripted_transport(1);
        let client = FeedClient::spawn(test_config(), transport);
        let mut conn = handles.remove(0);

        let (callback, mut events) = capturing_callback();
        let _sub = client.subscribe(Topic::Sensors, callback).unwrap();

        expect_subscribe(&mut conn, &[Topic::Sensors]).await;
        conn.server_tx.send(Ok(sensors_frame(2.5))).unwrap();

        let event = timeout(WAIT, events.recv()).await.unwrap().unwrap();
        match event {
            FeedEvent::Snapshot(Snapshot::Sensors(snapshot)) => {
                let reading = snapshot.reading(Parameter::Rainfall).unwrap();
                assert_eq!(reading.value, 2.5);
            }
            other => panic!("Expected sensor snapshot, got {:?}", other),
        }

        client.close().await;
    }

    #[tokio::test]
    async fn test_cancel_before_update_means_zero_callbacks() {
        let (transport, mut handles, _) = scripted_transport(1);
        let client = FeedClient::spawn(test_config(), transport);
        let mut conn = handles.remove(0);

        let (callback, mut events) = capturing_callback();
        let sub = client.subscribe(Topic::Sensors, callback).unwrap();
        expect_subscribe(&mut conn, &[Topic::Sensors]).await;

        sub.cancel();
        sub.cancel(); // idempotent

        // Updates arriving after disposal must never reach the callback.
        conn.server_tx.send(Ok(sensors_frame(2.5))).unwrap();
        conn.server_tx.send(Ok(sensors_frame(7.0))).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(events.try_recv().is_err());
        client.close().await;
    }

    #[tokio::test]
    async fn test_duplicate_subscriptions_share_one_wire_subscribe() {
        let (transport, mut handles, _) = scripted_transport(1);
        let client = FeedClient::spawn(test_config(), transport);
        let mut conn = handles.remove(0);

        let (cb_a, mut events_a) = capturing_callback();
        let (cb_b, mut events_b) = capturing_callback();
        let sub_a = client.subscribe(Topic::Sensors, cb_a).unwrap();
        let sub_b = client.subscribe(Topic::Sensors, cb_b).unwrap();

        // Only the first subscriber hits the wire
        expect_subscribe(&mut conn, &[Topic::Sensors]).await;

        conn.server_tx.send(Ok(sensors_frame(3.0))).unwrap();
        assert!(timeout(WAIT, events_a.recv()).await.unwrap().is_some());
        assert!(timeout(WAIT, events_b.recv()).await.unwrap().is_some());

        // Cancelling one leaves the other live, no wire unsubscribe yet
        sub_a.cancel();
        conn.server_tx.send(Ok(sensors_frame(4.0))).unwrap();
        assert!(timeout(WAIT, events_b.recv()).await.unwrap().is_some());
        assert!(events_a.try_recv().is_err());

        // Last cancel unsubscribes on the wire
        sub_b.cancel();
        let frame = timeout(WAIT, conn.client_rx.recv()).await.unwrap().unwrap();
        assert_eq!(
            frame,
            ClientFrame::Unsubscribe {
                topics: vec![Topic::Sensors]
            }
        );

        client.close().await;
    }

    #[tokio::test]
    async fn test_connection_failure_is_surfaced_and_retried() {
        let (transport, _handles, attempts) = scripted_transport(0);
        let client = FeedClient::spawn(test_config(), transport);

        let (callback, mut events) = capturing_callback();
        let _sub = client.subscribe(Topic::Sensors, callback).unwrap();

        let event = timeout(WAIT, events.recv()).await.unwrap().unwrap();
        assert!(matches!(event, FeedEvent::ConnectionLost { ref reason } if reason.contains("refused")));

        // Backoff keeps retrying; the outage is reported once, not per retry
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(attempts.load(Ordering::SeqCst) >= 2);
        assert!(events.try_recv().is_err());
        assert!(matches!(client.status(), FeedStatus::Backoff { .. }));

        client.close().await;
    }

    #[tokio::test]
    async fn test_reconnect_resubscribes_and_restores() {
        let (transport, mut handles, _) = scripted_transport(2);
        let client = FeedClient::spawn(test_config(), transport);
        let mut second = handles.remove(1);
        let mut first = handles.remove(0);

        let (callback, mut events) = capturing_callback();
        let _sub = client.subscribe(Topic::Sensors, callback).unwrap();
        expect_subscribe(&mut first, &[Topic::Sensors]).await;

        // Kill the first connection
        drop(first.server_tx);

        let event = timeout(WAIT, events.recv()).await.unwrap().unwrap();
        assert!(matches!(event, FeedEvent::ConnectionLost { .. }));

        // The run loop reconnects and resubscribes the active topic
        expect_subscribe(&mut second, &[Topic::Sensors]).await;
        let event = timeout(WAIT, events.recv()).await.unwrap().unwrap();
        assert!(matches!(event, FeedEvent::Restored));

        // Delivery resumes on the new connection
        second.server_tx.send(Ok(sensors_frame(9.5))).unwrap();
        let event = timeout(WAIT, events.recv()).await.unwrap().unwrap();
        assert!(matches!(event, FeedEvent::Snapshot(_)));

        client.close().await;
    }

    #[tokio::test]
    async fn test_malformed_snapshot_is_dropped() {
        let (transport, mut handles, _) = scripted_transport(1);
        let client = FeedClient::spawn(test_config(), transport);
        let mut conn = handles.remove(0);

        let (callback, mut events) = capturing_callback();
        let _sub = client.subscribe(Topic::Sensors, callback).unwrap();
        expect_subscribe(&mut conn, &[Topic::Sensors]).await;

        // Shape mismatch and out-of-enum parameter both rejected
        conn.server_tx
            .send(Ok(ServerFrame::Snapshot {
                topic: Topic::Sensors,
                payload: json!({ "rainfall": "wet" }),
            }))
            .unwrap();
        conn.server_tx
            .send(Ok(ServerFrame::Snapshot {
                topic: Topic::Sensors,
                payload: json!({ "temperature": { "value": 31.0 } }),
            }))
            .unwrap();
        conn.server_tx.send(Ok(sensors_frame(1.0))).unwrap();

        // Only the well-formed snapshot arrives
        let event = timeout(WAIT, events.recv()).await.unwrap().unwrap();
        match event {
            FeedEvent::Snapshot(Snapshot::Sensors(snapshot)) => {
                assert_eq!(snapshot.reading(Parameter::Rainfall).unwrap().value, 1.0);
            }
            other => panic!("Expected sensor snapshot, got {:?}", other),
        }
        assert!(events.try_recv().is_err());

        client.close().await;
    }

    #[tokio::test]
    async fn test_subscribe_after_close_fails() {
        let (transport, _handles, _) = scripted_transport(1);
        let client = FeedClient::spawn(test_config(), transport);
        client.close().await;

        let result = client.subscribe(Topic::Sensors, |_| {});
        assert!(matches!(result.unwrap_err(), FeedError::Closed));
    }

    #[tokio::test]
    async fn test_status_lifecycle() {
        let (transport, mut handles, _) = scripted_transport(1);
        let client = FeedClient::spawn(test_config(), transport);
        let mut conn = handles.remove(0);

        let (callback, _events) = capturing_callback();
        let _sub = client.subscribe(Topic::Sensors, callback).unwrap();
        expect_subscribe(&mut conn, &[Topic::Sensors]).await;
        assert_eq!(client.status(), FeedStatus::Connected);

        let mut watch = client.status_watch();
        client.close().await;
        // close() awaits the run loop, so the final status is visible
        assert_eq!(*watch.borrow_and_update(), FeedStatus::Closed);
    }

    #[test]
    fn test_backoff_delay_doubles_to_cap() {
        let config = FeedConfig {
            url: String::new(),
            reconnect_initial_ms: 100,
            reconnect_max_ms: 1000,
        };

        assert_eq!(backoff_delay(&config, 1), Duration::from_millis(100));
        assert_eq!(backoff_delay(&config, 2), Duration::from_millis(200));
        assert_eq!(backoff_delay(&config, 4), Duration::from_millis(800));
        assert_eq!(backoff_delay(&config, 5), Duration::from_millis(1000));
        assert_eq!(backoff_delay(&config, 40), Duration::from_millis(1000));
    }
}
