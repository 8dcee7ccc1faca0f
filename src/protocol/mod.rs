//! Wire-level protocol model
//!
//! Types, method catalogue payloads, method name constants, and the
//! frame/variant dispatch codec.

pub mod codec;
pub mod messages;
pub mod methods;
pub mod types;

// Re-export commonly used items
pub use codec::{decode_notification, decode_result, encode_params, ServerNotification};
pub use messages::*;
pub use types::*;
