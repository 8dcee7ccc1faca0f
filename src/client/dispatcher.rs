//! Request correlation and inbound dispatch
//!
//! The dispatcher owns the request-id space for a connection, matches inbound
//! responses to pending waiters, and fans decoded notifications out to
//! subscribers in arrival order. Protocol violations from the peer are counted
//! and logged, never silently dropped.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::core::error::{McpError, McpResult};
use crate::protocol::codec::{self, ServerNotification};
use crate::protocol::types::{
    error_codes, JsonRpcError, JsonRpcMessage, JsonRpcNotification, JsonRpcRequest, RequestId,
};
use crate::transport::traits::{Transport, TransportEvent};

/// Counters describing dispatcher activity since the connection opened
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatcherStats {
    /// Requests transmitted to the peer
    pub requests_sent: u64,
    /// Responses matched to a pending waiter
    pub responses_received: u64,
    /// Notifications decoded and fanned out
    pub notifications_received: u64,
    /// Inbound frames or payloads that failed to decode
    pub decode_errors: u64,
    /// Responses whose id was already resolved
    pub duplicate_responses: u64,
}

#[derive(Default)]
struct StatCounters {
    requests_sent: AtomicU64,
    responses_received: AtomicU64,
    notifications_received: AtomicU64,
    decode_errors: AtomicU64,
    duplicate_responses: AtomicU64,
}

impl StatCounters {
    fn snapshot(&self) -> DispatcherStats {
        DispatcherStats {
            requests_sent: self.requests_sent.load(Ordering::Relaxed),
            responses_received: self.responses_received.load(Ordering::Relaxed),
            notifications_received: self.notifications_received.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            duplicate_responses: self.duplicate_responses.load(Ordering::Relaxed),
        }
    }
}

type Waiter = oneshot::Sender<McpResult<serde_json::Value>>;

struct Inner {
    transport: Arc<dyn Transport>,
    // Keys are the canonical JSON text of the request id
    pending: Mutex<HashMap<String, Waiter>>,
    completed: Mutex<HashSet<String>>,
    subscribers: Mutex<HashMap<String, Vec<mpsc::UnboundedSender<ServerNotification>>>>,
    catch_all: Mutex<Vec<mpsc::UnboundedSender<ServerNotification>>>,
    next_id: AtomicI64,
    closed: AtomicBool,
    stats: StatCounters,
}

fn id_key(id: &RequestId) -> String {
    id.to_string()
}

impl Inner {
    async fn fail_all_pending(&self, reason: &str) {
        let mut pending = self.pending.lock().await;
        let mut completed = self.completed.lock().await;
        for (key, waiter) in pending.drain() {
            completed.insert(key);
            let _ = waiter.send(Err(McpError::transport_closed(reason)));
        }
    }

    async fn fan_out(&self, notification: ServerNotification) {
        let method = notification.method();

        let mut subscribers = self.subscribers.lock().await;
        if let Some(senders) = subscribers.get_mut(method) {
            senders.retain(|tx| tx.send(notification.clone()).is_ok());
        }

        let mut catch_all = self.catch_all.lock().await;
        catch_all.retain(|tx| tx.send(notification.clone()).is_ok());
    }

    async fn resolve_response(&self, id: &RequestId, outcome: McpResult<serde_json::Value>) {
        let key = id_key(id);
        let waiter = self.pending.lock().await.remove(&key);
        match waiter {
            Some(waiter) => {
                self.completed.lock().await.insert(key);
                self.stats.responses_received.fetch_add(1, Ordering::Relaxed);
                let _ = waiter.send(outcome);
            }
            None => {
                if self.completed.lock().await.contains(&key) {
                    self.stats
                        .duplicate_responses
                        .fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(id = %key, "response for an already-resolved request id");
                } else {
                    tracing::warn!(id = %key, "response for an unknown request id");
                }
            }
        }
    }
}

/// Correlates outbound requests with inbound responses over one transport
pub struct RequestDispatcher {
    inner: Arc<Inner>,
    event_task: Mutex<Option<JoinHandle<()>>>,
}

impl RequestDispatcher {
    /// Create a dispatcher over a started transport and its event stream
    pub fn new(
        transport: Arc<dyn Transport>,
        events: mpsc::UnboundedReceiver<TransportEvent>,
    ) -> Self {
        let inner = Arc::new(Inner {
            transport,
            pending: Mutex::new(HashMap::new()),
            completed: Mutex::new(HashSet::new()),
            subscribers: Mutex::new(HashMap::new()),
            catch_all: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            closed: AtomicBool::new(false),
            stats: StatCounters::default(),
        });

        let task = tokio::spawn(Self::event_loop(Arc::clone(&inner), events));

        Self {
            inner,
            event_task: Mutex::new(Some(task)),
        }
    }

    /// Allocate the next request id; ids are never reused on a connection
    pub fn next_request_id(&self) -> RequestId {
        serde_json::Value::from(self.inner.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Send a request with a freshly allocated id and await its response
    pub async fn send_request(
        &self,
        method: &str,
        params: Option<serde_json::Value>,
        deadline: Duration,
    ) -> McpResult<serde_json::Value> {
        let id = self.next_request_id();
        self.send_request_with_id(id, method, params, deadline).await
    }

    /// Send a request under a caller-supplied id and await its response
    ///
    /// The id is checked against both in-flight and already-completed requests
    /// before anything is transmitted.
    pub async fn send_request_with_id(
        &self,
        id: RequestId,
        method: &str,
        params: Option<serde_json::Value>,
        deadline: Duration,
    ) -> McpResult<serde_json::Value> {
        if self.inner.closed.load(Ordering::SeqCst) {
            return Err(McpError::transport_closed("dispatcher is closed"));
        }

        let key = id_key(&id);
        // The generator must never re-issue an id the caller has burned
        if let Some(n) = id.as_i64() {
            self.inner
                .next_id
                .fetch_max(n.saturating_add(1), Ordering::SeqCst);
        }

        let request = JsonRpcRequest::new(id, method.to_string(), params)?;
        let frame = serde_json::to_string(&request)?;

        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.inner.pending.lock().await;
            if pending.contains_key(&key) || self.inner.completed.lock().await.contains(&key) {
                return Err(McpError::duplicate_id(format!(
                    "request id {key} was already used on this connection"
                )));
            }
            pending.insert(key.clone(), tx);
        }

        if let Err(e) = self.inner.transport.send(frame).await {
            self.inner.pending.lock().await.remove(&key);
            return Err(e);
        }
        self.inner.stats.requests_sent.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(method, id = %key, "request sent");

        match tokio::time::timeout(deadline, rx).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(McpError::transport_closed(
                "dispatcher dropped the pending request",
            )),
            Err(_) => {
                // Expired waiters are removed so a late response is flagged as such
                self.inner.pending.lock().await.remove(&key);
                self.inner.completed.lock().await.insert(key);
                Err(McpError::timeout(format!(
                    "no response to `{method}` within {deadline:?}"
                )))
            }
        }
    }

    /// Send a notification; no response is expected
    pub async fn send_notification(
        &self,
        method: &str,
        params: Option<serde_json::Value>,
    ) -> McpResult<()> {
        if self.inner.closed.load(Ordering::SeqCst) {
            return Err(McpError::transport_closed("dispatcher is closed"));
        }
        let notification = JsonRpcNotification::new(method.to_string(), params)?;
        let frame = serde_json::to_string(&notification)?;
        self.inner.transport.send(frame).await
    }

    /// Cancel a pending request locally and tell the peer, best effort
    pub async fn cancel(&self, id: &RequestId, reason: Option<String>) -> McpResult<()> {
        let key = id_key(id);
        let waiter = self.inner.pending.lock().await.remove(&key);
        let Some(waiter) = waiter else {
            return Err(McpError::internal(format!(
                "no pending request with id {key}"
            )));
        };
        self.inner.completed.lock().await.insert(key.clone());

        let detail = reason.clone().unwrap_or_else(|| "cancelled by caller".to_string());
        let _ = waiter.send(Err(McpError::cancelled(detail)));

        let params = crate::protocol::messages::CancelledParams {
            request_id: id.clone(),
            reason,
        };
        let notify = self
            .send_notification(
                crate::protocol::methods::CANCELLED,
                Some(serde_json::to_value(params)?),
            )
            .await;
        if let Err(e) = notify {
            tracing::debug!(id = %key, error = %e, "could not deliver cancellation to peer");
        }
        Ok(())
    }

    /// Receive every notification for one method
    pub async fn subscribe(&self, method: &str) -> mpsc::UnboundedReceiver<ServerNotification> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner
            .subscribers
            .lock()
            .await
            .entry(method.to_string())
            .or_default()
            .push(tx);
        rx
    }

    /// Receive every notification regardless of method
    pub async fn subscribe_all(&self) -> mpsc::UnboundedReceiver<ServerNotification> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.catch_all.lock().await.push(tx);
        rx
    }

    /// Counters since the connection opened
    pub fn stats(&self) -> DispatcherStats {
        self.inner.stats.snapshot()
    }

    /// Whether the underlying connection has gone away
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Shut down: close the transport and fail whatever is still pending
    pub async fn close(&self) -> McpResult<()> {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.inner.fail_all_pending("connection closed").await;
        let result = self.inner.transport.close().await;
        if let Some(task) = self.event_task.lock().await.take() {
            let _ = task.await;
        }
        result
    }

    /// Inbound event loop; one instance per connection
    async fn event_loop(inner: Arc<Inner>, mut events: mpsc::UnboundedReceiver<TransportEvent>) {
        while let Some(event) = events.recv().await {
            match event {
                TransportEvent::Message(JsonRpcMessage::Response(response)) => {
                    inner
                        .resolve_response(&response.id, Ok(response.result))
                        .await;
                }
                TransportEvent::Message(JsonRpcMessage::Error(JsonRpcError {
                    id, error, ..
                })) => {
                    let outcome = Err(McpError::protocol(format!(
                        "peer returned error {}: {}",
                        error.code, error.message
                    )));
                    inner.resolve_response(&id, outcome).await;
                }
                TransportEvent::Message(JsonRpcMessage::Notification(notification)) => {
                    match codec::decode_notification(&notification) {
                        Ok(decoded) => {
                            inner
                                .stats
                                .notifications_received
                                .fetch_add(1, Ordering::Relaxed);
                            inner.fan_out(decoded).await;
                        }
                        Err(e) => {
                            inner.stats.decode_errors.fetch_add(1, Ordering::Relaxed);
                            tracing::warn!(
                                method = %notification.method,
                                error = %e,
                                "undeliverable notification"
                            );
                        }
                    }
                }
                TransportEvent::Message(JsonRpcMessage::Request(request)) => {
                    // Server-to-client requests are not served by this client
                    tracing::warn!(method = %request.method, "unsupported request from peer");
                    let reply = JsonRpcError::error(
                        request.id,
                        error_codes::METHOD_NOT_FOUND,
                        format!("method `{}` is not supported", request.method),
                        None,
                    );
                    if let Ok(frame) = serde_json::to_string(&reply) {
                        let _ = inner.transport.send(frame).await;
                    }
                }
                TransportEvent::DecodeError { line, error } => {
                    inner.stats.decode_errors.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(%error, line = %line, "unparseable inbound frame");
                }
                TransportEvent::Closed => {
                    tracing::debug!("transport closed, failing pending requests");
                    inner.closed.store(true, Ordering::SeqCst);
                    inner.fail_all_pending("connection closed by peer").await;
                    break;
                }
            }
        }
    }
}
