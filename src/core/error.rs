//! Error types for the MCP client SDK
//!
//! This module defines every error kind a protocol operation can surface,
//! providing structured error handling with detailed context.

use thiserror::Error;

/// The main error type for the SDK
#[derive(Error, Debug, Clone)]
pub enum McpError {
    /// Malformed or unknown wire payload, or a declared constraint was violated
    #[error("Schema violation: {0}")]
    Schema(String),

    /// Handshake not complete, or protocol version negotiation failed
    #[error("Negotiation failure: {0}")]
    Negotiation(String),

    /// No response arrived before the deadline
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The channel or subprocess went away while work was pending
    #[error("Transport closed: {0}")]
    TransportClosed(String),

    /// The subprocess could not be started
    #[error("Launch failure: {0}")]
    Launch(String),

    /// Request identifier collision, caused by the caller or the peer
    #[error("Duplicate request id: {0}")]
    DuplicateId(String),

    /// The pending request was cancelled locally
    #[error("Cancellation requested: {0}")]
    Cancelled(String),

    /// Protocol-level errors (unexpected responses, error objects from the peer)
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors from the standard library
    #[error("I/O error: {0}")]
    Io(String),

    /// Internal errors that shouldn't normally occur
    #[error("Internal error: {0}")]
    Internal(String),
}

// Manual From implementations for types that don't implement Clone
impl From<serde_json::Error> for McpError {
    fn from(err: serde_json::Error) -> Self {
        McpError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for McpError {
    fn from(err: std::io::Error) -> Self {
        McpError::Io(err.to_string())
    }
}

/// Result type alias for protocol operations
pub type McpResult<T> = Result<T, McpError>;

impl McpError {
    /// Create a new schema violation error
    pub fn schema<S: Into<String>>(message: S) -> Self {
        Self::Schema(message.into())
    }

    /// Create a new negotiation failure
    pub fn negotiation<S: Into<String>>(message: S) -> Self {
        Self::Negotiation(message.into())
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    /// Create a new transport-closed error
    pub fn transport_closed<S: Into<String>>(message: S) -> Self {
        Self::TransportClosed(message.into())
    }

    /// Create a new launch failure
    pub fn launch<S: Into<String>>(message: S) -> Self {
        Self::Launch(message.into())
    }

    /// Create a new duplicate-id error
    pub fn duplicate_id<S: Into<String>>(message: S) -> Self {
        Self::DuplicateId(message.into())
    }

    /// Create a new cancellation error
    pub fn cancelled<S: Into<String>>(message: S) -> Self {
        Self::Cancelled(message.into())
    }

    /// Create a new protocol error
    pub fn protocol<S: Into<String>>(message: S) -> Self {
        Self::Protocol(message.into())
    }

    /// Create a new serialization error from serde_json::Error
    pub fn serialization(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error is recoverable within the same connection
    pub fn is_recoverable(&self) -> bool {
        match self {
            McpError::Schema(_) => true,
            McpError::Negotiation(_) => false,
            McpError::Timeout(_) => true,
            McpError::TransportClosed(_) => false,
            McpError::Launch(_) => false,
            McpError::DuplicateId(_) => true,
            McpError::Cancelled(_) => true,
            McpError::Protocol(_) => false,
            McpError::Serialization(_) => true,
            McpError::Io(_) => false,
            McpError::Internal(_) => false,
        }
    }

    /// Get the error category for logging/metrics
    pub fn category(&self) -> &'static str {
        match self {
            McpError::Schema(_) => "schema",
            McpError::Negotiation(_) => "negotiation",
            McpError::Timeout(_) => "timeout",
            McpError::TransportClosed(_) => "transport",
            McpError::Launch(_) => "launch",
            McpError::DuplicateId(_) => "duplicate_id",
            McpError::Cancelled(_) => "cancelled",
            McpError::Protocol(_) => "protocol",
            McpError::Serialization(_) => "serialization",
            McpError::Io(_) => "io",
            McpError::Internal(_) => "internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = McpError::launch("executable not found");
        assert_eq!(error.to_string(), "Launch failure: executable not found");
        assert_eq!(error.category(), "launch");
        assert!(!error.is_recoverable());
    }

    #[test]
    fn test_error_recovery() {
        assert!(McpError::timeout("no reply").is_recoverable());
        assert!(McpError::schema("bad payload").is_recoverable());
        assert!(!McpError::transport_closed("child exited").is_recoverable());
        assert!(!McpError::negotiation("version mismatch").is_recoverable());
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(McpError::duplicate_id("id 4").category(), "duplicate_id");
        assert_eq!(McpError::cancelled("caller gave up").category(), "cancelled");
        assert_eq!(McpError::protocol("unexpected frame").category(), "protocol");
    }

    #[test]
    fn test_from_serde_error() {
        let err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let mcp: McpError = err.into();
        assert_eq!(mcp.category(), "serialization");
    }
}
