//! Core abstractions for the MCP client SDK
//!
//! This module contains the fundamental building blocks shared by the rest of
//! the crate, most importantly the error taxonomy.

pub mod error;

// Re-export commonly used items
pub use error::{McpError, McpResult};
