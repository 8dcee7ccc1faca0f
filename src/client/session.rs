//! Handshake session state
//!
//! Tracks where the connection is in its lifecycle and gates catalogue
//! requests until the handshake has completed. `Closed` is absorbing.

use tokio::sync::RwLock;

use crate::core::error::{McpError, McpResult};

/// Lifecycle state of a client session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Connected, handshake not yet attempted
    Uninitialized,
    /// `initialize` is in flight
    Initializing,
    /// Handshake complete; catalogue requests allowed
    Ready,
    /// Shut down; every operation fails fast
    Closed,
}

/// Concurrency-safe session state holder
pub struct Session {
    state: RwLock<SessionState>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(SessionState::Uninitialized),
        }
    }

    /// Current state
    pub async fn state(&self) -> SessionState {
        *self.state.read().await
    }

    /// Enter `Initializing`; only legal from `Uninitialized`
    pub async fn begin_initialize(&self) -> McpResult<()> {
        let mut state = self.state.write().await;
        match *state {
            SessionState::Uninitialized => {
                *state = SessionState::Initializing;
                Ok(())
            }
            SessionState::Closed => Err(McpError::transport_closed("session is closed")),
            SessionState::Initializing | SessionState::Ready => Err(McpError::negotiation(
                "initialize already attempted on this session",
            )),
        }
    }

    /// Return to `Uninitialized` after a failed handshake
    pub async fn abort_initialize(&self) {
        let mut state = self.state.write().await;
        if *state == SessionState::Initializing {
            *state = SessionState::Uninitialized;
        }
    }

    /// Enter `Ready` once the handshake has completed
    pub async fn mark_ready(&self) -> McpResult<()> {
        let mut state = self.state.write().await;
        match *state {
            SessionState::Initializing => {
                *state = SessionState::Ready;
                Ok(())
            }
            SessionState::Closed => Err(McpError::transport_closed("session is closed")),
            _ => Err(McpError::internal("mark_ready outside a handshake")),
        }
    }

    /// Fail unless the session is `Ready`
    ///
    /// Gating happens locally; nothing reaches the wire when this fails.
    pub async fn ensure_ready(&self) -> McpResult<()> {
        match *self.state.read().await {
            SessionState::Ready => Ok(()),
            SessionState::Closed => Err(McpError::transport_closed("session is closed")),
            SessionState::Uninitialized | SessionState::Initializing => Err(
                McpError::negotiation("session not initialized; call initialize() first"),
            ),
        }
    }

    /// Enter `Closed`; there is no way back out
    pub async fn close(&self) {
        *self.state.write().await = SessionState::Closed;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
