//! Variant dispatch between wire frames and typed payloads
//!
//! All method-string discriminant logic lives here: inbound notifications are
//! classified into [`ServerNotification`], and result/params conversion funnels
//! every serde failure into a schema error that names the offending method.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::error::{McpError, McpResult};
use crate::protocol::messages::{
    CancelledParams, LoggingMessageParams, ProgressParams, ResourceUpdatedParams,
};
use crate::protocol::methods;
use crate::protocol::types::JsonRpcNotification;

/// A notification received from the server, decoded into its typed payload
#[derive(Debug, Clone, PartialEq)]
pub enum ServerNotification {
    /// `notifications/cancelled`
    Cancelled(CancelledParams),
    /// `notifications/progress`
    Progress(ProgressParams),
    /// `notifications/resources/updated`
    ResourceUpdated(ResourceUpdatedParams),
    /// `notifications/resources/list_changed`
    ResourceListChanged,
    /// `notifications/prompts/list_changed`
    PromptListChanged,
    /// `notifications/tools/list_changed`
    ToolListChanged,
    /// `notifications/roots/list_changed`
    RootsListChanged,
    /// `notifications/message`
    LoggingMessage(LoggingMessageParams),
}

impl ServerNotification {
    /// The wire method name of this notification
    pub fn method(&self) -> &'static str {
        match self {
            ServerNotification::Cancelled(_) => methods::CANCELLED,
            ServerNotification::Progress(_) => methods::PROGRESS,
            ServerNotification::ResourceUpdated(_) => methods::RESOURCES_UPDATED,
            ServerNotification::ResourceListChanged => methods::RESOURCES_LIST_CHANGED,
            ServerNotification::PromptListChanged => methods::PROMPTS_LIST_CHANGED,
            ServerNotification::ToolListChanged => methods::TOOLS_LIST_CHANGED,
            ServerNotification::RootsListChanged => methods::ROOTS_LIST_CHANGED,
            ServerNotification::LoggingMessage(_) => methods::LOGGING_MESSAGE,
        }
    }
}

/// Decode an inbound notification frame into its typed payload
///
/// Unknown methods and malformed payloads both fail with a schema error so the
/// caller can count and log them instead of dropping frames silently.
pub fn decode_notification(notification: &JsonRpcNotification) -> McpResult<ServerNotification> {
    let params = notification.params.clone().unwrap_or(serde_json::Value::Null);

    match notification.method.as_str() {
        methods::CANCELLED => Ok(ServerNotification::Cancelled(decode_params(
            methods::CANCELLED,
            params,
        )?)),
        methods::PROGRESS => Ok(ServerNotification::Progress(decode_params(
            methods::PROGRESS,
            params,
        )?)),
        methods::RESOURCES_UPDATED => Ok(ServerNotification::ResourceUpdated(decode_params(
            methods::RESOURCES_UPDATED,
            params,
        )?)),
        methods::RESOURCES_LIST_CHANGED => Ok(ServerNotification::ResourceListChanged),
        methods::PROMPTS_LIST_CHANGED => Ok(ServerNotification::PromptListChanged),
        methods::TOOLS_LIST_CHANGED => Ok(ServerNotification::ToolListChanged),
        methods::ROOTS_LIST_CHANGED => Ok(ServerNotification::RootsListChanged),
        methods::LOGGING_MESSAGE => Ok(ServerNotification::LoggingMessage(decode_params(
            methods::LOGGING_MESSAGE,
            params,
        )?)),
        other => Err(McpError::schema(format!(
            "unknown notification method `{other}`"
        ))),
    }
}

/// Decode a result payload for the given method
pub fn decode_result<T: DeserializeOwned>(
    method: &str,
    result: serde_json::Value,
) -> McpResult<T> {
    serde_json::from_value(result)
        .map_err(|e| McpError::schema(format!("malformed `{method}` result: {e}")))
}

/// Encode request params for the given method
pub fn encode_params<T: Serialize>(method: &str, params: &T) -> McpResult<serde_json::Value> {
    serde_json::to_value(params)
        .map_err(|e| McpError::schema(format!("unencodable `{method}` params: {e}")))
}

fn decode_params<T: DeserializeOwned>(method: &str, params: serde_json::Value) -> McpResult<T> {
    serde_json::from_value(params)
        .map_err(|e| McpError::schema(format!("malformed `{method}` params: {e}")))
}
