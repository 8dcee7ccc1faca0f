//! Shared test support: an in-memory transport with a scriptable peer

// Not every test binary touches every helper
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use mcp_conduit::core::error::{McpError, McpResult};
use mcp_conduit::protocol::types::{JsonRpcMessage, JsonRpcRequest};
use mcp_conduit::transport::traits::{Transport, TransportEvent};
use mcp_conduit::prelude::async_trait;

/// Optional scripted peer: given an outbound request, produce the reply frame
pub type Responder = Arc<dyn Fn(&JsonRpcRequest) -> Option<JsonRpcMessage> + Send + Sync>;

/// Transport that records outbound frames and replays scripted events
pub struct FakeTransport {
    sent: Arc<Mutex<Vec<String>>>,
    events_tx: mpsc::UnboundedSender<TransportEvent>,
    events_rx: Option<mpsc::UnboundedReceiver<TransportEvent>>,
    closed: Arc<AtomicBool>,
    fail_next_send: Arc<AtomicBool>,
    responder: Option<Responder>,
}

/// Handle for poking a [`FakeTransport`] after it has been moved into a client
#[derive(Clone)]
pub struct FakeHandle {
    sent: Arc<Mutex<Vec<String>>>,
    events_tx: mpsc::UnboundedSender<TransportEvent>,
    fail_next_send: Arc<AtomicBool>,
}

impl FakeTransport {
    pub fn new() -> (Self, FakeHandle) {
        Self::with_responder_opt(None)
    }

    pub fn with_responder(responder: Responder) -> (Self, FakeHandle) {
        Self::with_responder_opt(Some(responder))
    }

    fn with_responder_opt(responder: Option<Responder>) -> (Self, FakeHandle) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let sent = Arc::new(Mutex::new(Vec::new()));
        let fail_next_send = Arc::new(AtomicBool::new(false));
        let handle = FakeHandle {
            sent: Arc::clone(&sent),
            events_tx: events_tx.clone(),
            fail_next_send: Arc::clone(&fail_next_send),
        };
        let transport = Self {
            sent,
            events_tx,
            events_rx: Some(events_rx),
            closed: Arc::new(AtomicBool::new(false)),
            fail_next_send,
            responder,
        };
        (transport, handle)
    }
}

impl FakeHandle {
    /// Frames the client has transmitted, in order
    pub fn sent_frames(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    /// Whether any transmitted frame invokes the given method
    pub fn sent_method(&self, method: &str) -> bool {
        self.sent_frames().iter().any(|frame| {
            serde_json::from_str::<serde_json::Value>(frame)
                .ok()
                .and_then(|v| v.get("method").and_then(|m| m.as_str()).map(String::from))
                .is_some_and(|m| m == method)
        })
    }

    /// Deliver a frame as if the peer had sent it
    pub fn inject(&self, message: JsonRpcMessage) {
        let _ = self.events_tx.send(TransportEvent::Message(message));
    }

    /// Deliver an unparseable line as if the peer had sent it
    pub fn inject_garbage(&self, line: &str) {
        let _ = self.events_tx.send(TransportEvent::DecodeError {
            line: line.to_string(),
            error: "expected value".to_string(),
        });
    }

    /// Simulate the peer going away
    pub fn inject_closed(&self) {
        let _ = self.events_tx.send(TransportEvent::Closed);
    }

    /// Make the next `send` fail as if the pipe had broken mid-write
    pub fn fail_next_send(&self) {
        self.fail_next_send.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn start(&mut self) -> McpResult<()> {
        Ok(())
    }

    async fn send(&self, frame: String) -> McpResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(McpError::transport_closed("fake transport is closed"));
        }
        if self.fail_next_send.swap(false, Ordering::SeqCst) {
            return Err(McpError::Io("injected write failure".to_string()));
        }
        self.sent.lock().unwrap().push(frame.clone());

        if let Some(responder) = &self.responder {
            if let Ok(JsonRpcMessage::Request(request)) = serde_json::from_str(&frame) {
                if let Some(reply) = responder(&request) {
                    let _ = self.events_tx.send(TransportEvent::Message(reply));
                }
            }
        }
        Ok(())
    }

    fn events(&mut self) -> Option<mpsc::UnboundedReceiver<TransportEvent>> {
        self.events_rx.take()
    }

    async fn close(&self) -> McpResult<()> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            let _ = self.events_tx.send(TransportEvent::Closed);
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        !self.closed.load(Ordering::SeqCst)
    }

    fn connection_info(&self) -> String {
        "fake".to_string()
    }
}
