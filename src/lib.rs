// Copyright (c) 2025 MCP Rust Contributors
// SPDX-License-Identifier: MIT

//! # mcp-conduit
//!
//! A client SDK for the [Model Context Protocol (MCP)](https://modelcontextprotocol.io/)
//! that talks to a server subprocess over stdin/stdout using newline-delimited
//! JSON-RPC frames.
//!
//! The crate is organized around four layers:
//!
//! - [`protocol`]: the wire-level data model and variant dispatch
//! - [`transport`]: the supervised subprocess pipe behind a [`transport::Transport`] trait
//! - [`client`]: the session state machine, request correlation, and the [`client::McpClient`] facade
//! - [`core`]: shared error types
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mcp_conduit::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> McpResult<()> {
//!     let client = McpClient::new("my-app", "1.0.0");
//!     client.connect_with_stdio("my-mcp-server", ["--flag"]).await?;
//!     client.initialize().await?;
//!
//!     let tools = client.list_tools(None).await?;
//!     for tool in &tools.tools {
//!         println!("{}", tool.name);
//!     }
//!
//!     client.close().await
//! }
//! ```

pub mod client;
pub mod core;
pub mod protocol;
pub mod transport;

// Re-export commonly used types for convenience
pub use crate::core::error::{McpError, McpResult};
pub use crate::protocol::types::*;

/// Prelude module for convenient imports
///
/// Re-exports the most commonly used types and traits for easy access.
/// Use `use mcp_conduit::prelude::*;` to import everything you need.
pub mod prelude {
    // Core types
    pub use crate::core::error::{McpError, McpResult};

    // Protocol types and messages
    pub use crate::protocol::codec::ServerNotification;
    pub use crate::protocol::messages::*;
    pub use crate::protocol::methods;
    pub use crate::protocol::types::*;

    // Client
    pub use crate::client::{ClientConfig, DispatcherStats, McpClient, SessionState};

    // Transport layer
    pub use crate::transport::{StdioConfig, StdioTransport, Transport, TransportEvent};

    // Essential external types
    pub use async_trait::async_trait;
    pub use serde_json::{Value, json};
    pub use std::collections::HashMap;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Basic smoke test to ensure all modules are accessible
        let _error = McpError::Protocol("test".to_string());
        assert_eq!(LATEST_PROTOCOL_VERSION, "2025-06-18");
    }
}
