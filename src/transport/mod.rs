//! Transports for talking to protocol servers
//!
//! The only production transport is a supervised subprocess speaking
//! newline-delimited JSON-RPC over stdin/stdout; the [`Transport`] trait keeps
//! everything above it transport-agnostic.

pub mod env;
pub mod stdio;
pub mod traits;

// Re-export commonly used items
pub use env::{default_environment, default_environment_from};
pub use stdio::{StdioConfig, StdioTransport};
pub use traits::{ConnectionState, Transport, TransportEvent};
