//! Transport abstraction
//!
//! A transport moves opaque frames to the peer and surfaces inbound traffic as
//! an event stream. Request correlation lives above the transport, so every
//! implementation stays a dumb pipe that tests can swap for an in-memory fake.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::core::error::McpResult;
use crate::protocol::types::JsonRpcMessage;

/// Something that happened on the inbound side of a transport
#[derive(Debug)]
pub enum TransportEvent {
    /// A frame arrived and parsed as a JSON-RPC message
    Message(JsonRpcMessage),
    /// A frame arrived but could not be parsed; the transport keeps reading
    DecodeError {
        /// The raw line that failed to parse
        line: String,
        /// What went wrong
        error: String,
    },
    /// The peer went away; no further events will follow
    Closed,
}

/// Connection state of a transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not yet started
    Disconnected,
    /// Started and able to carry frames
    Connected,
    /// Closed, either deliberately or by peer death
    Closed,
}

/// A bidirectional frame pipe to a protocol peer
#[async_trait]
pub trait Transport: Send + Sync {
    /// Establish the connection and begin reading inbound frames
    async fn start(&mut self) -> McpResult<()>;

    /// Send one already-encoded frame to the peer
    async fn send(&self, frame: String) -> McpResult<()>;

    /// Take the inbound event stream
    ///
    /// Yields the receiver exactly once; later calls return `None`.
    fn events(&mut self) -> Option<mpsc::UnboundedReceiver<TransportEvent>>;

    /// Shut the connection down; safe to call more than once
    async fn close(&self) -> McpResult<()>;

    /// Whether the transport can currently carry frames
    fn is_connected(&self) -> bool;

    /// Human-readable description for logs
    fn connection_info(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_state_transitions_are_distinct() {
        assert_ne!(ConnectionState::Disconnected, ConnectionState::Connected);
        assert_ne!(ConnectionState::Connected, ConnectionState::Closed);
    }

    #[test]
    fn test_transport_event_debug_formatting() {
        let event = TransportEvent::DecodeError {
            line: "not json".to_string(),
            error: "expected value".to_string(),
        };
        let text = format!("{event:?}");
        assert!(text.contains("not json"));
    }
}
