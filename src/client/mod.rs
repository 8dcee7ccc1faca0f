//! Client-side building blocks
//!
//! The session guard, the request dispatcher, and the high-level facade.

pub mod dispatcher;
pub mod mcp_client;
pub mod session;

// Re-export commonly used items
pub use dispatcher::{DispatcherStats, RequestDispatcher};
pub use mcp_client::{ClientConfig, McpClient};
pub use session::{Session, SessionState};
