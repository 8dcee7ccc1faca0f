//! Core protocol types for the 2025-06-18 MCP specification
//!
//! This module contains the wire-level data model shared by every method in
//! the catalogue: implementation info, capabilities, content blocks, resource
//! payloads, sampling types, logging levels, and the JSON-RPC envelopes.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::core::error::{McpError, McpResult};

// ============================================================================
// Core Protocol Constants
// ============================================================================

/// Newest protocol revision this client speaks
pub const LATEST_PROTOCOL_VERSION: &str = "2025-06-18";

/// Every protocol revision this client accepts from a peer
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2025-06-18", "2025-03-26", "2024-11-05"];

pub const JSONRPC_VERSION: &str = "2.0";

// ============================================================================
// Type Aliases
// ============================================================================

/// Progress token for associating notifications with requests
pub type ProgressToken = serde_json::Value; // string | number

/// Cursor for pagination
pub type Cursor = String;

/// Request ID for JSON-RPC correlation
pub type RequestId = serde_json::Value; // string | number

// ============================================================================
// Implementation Info
// ============================================================================

/// Information about an MCP implementation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Implementation {
    /// Identifier of the implementation
    pub name: String,
    /// Version of the implementation
    pub version: String,
    /// Human-readable display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Implementation {
    /// Create a new implementation with name and version
    pub fn new<S: Into<String>>(name: S, version: S) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            title: None,
        }
    }
}

// Directional aliases
pub type ClientInfo = Implementation;
pub type ServerInfo = Implementation;

// ============================================================================
// Capabilities
// ============================================================================

/// Capabilities a client declares during the handshake
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ClientCapabilities {
    /// Roots listing capabilities
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roots: Option<RootsCapability>,
    /// Sampling capabilities
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling: Option<SamplingCapability>,
    /// Experimental capabilities
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experimental: Option<HashMap<String, serde_json::Value>>,
}

/// Capabilities a server declares during the handshake
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ServerCapabilities {
    /// Prompt-related capabilities
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompts: Option<PromptsCapability>,
    /// Resource-related capabilities
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourcesCapability>,
    /// Tool-related capabilities
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
    /// Logging capabilities
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingCapability>,
    /// Experimental capabilities
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experimental: Option<HashMap<String, serde_json::Value>>,
}

/// Roots capability for clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RootsCapability {
    /// Whether the client emits notifications when the roots list changes
    #[serde(rename = "listChanged", skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

/// Sampling capability marker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SamplingCapability {
    /// Additional properties
    #[serde(flatten)]
    pub additional_properties: HashMap<String, serde_json::Value>,
}

/// Prompt-related server capabilities
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PromptsCapability {
    /// Whether the server emits prompt list change notifications
    #[serde(rename = "listChanged", skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

/// Resource-related server capabilities
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ResourcesCapability {
    /// Whether the server supports resource subscriptions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscribe: Option<bool>,
    /// Whether the server emits resource list change notifications
    #[serde(rename = "listChanged", skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

/// Tool-related server capabilities
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ToolsCapability {
    /// Whether the server emits tool list change notifications
    #[serde(rename = "listChanged", skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

/// Logging capability marker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LoggingCapability {
    /// Additional properties
    #[serde(flatten)]
    pub additional_properties: HashMap<String, serde_json::Value>,
}

// ============================================================================
// Roles and Annotations
// ============================================================================

/// The sender or intended audience of a message or piece of data
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Optional annotations telling the client how an object should be used or displayed
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct Annotations {
    /// Who the intended audience of this object is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<Vec<Role>>,
    /// How important this data is, from 0 (optional) to 1 (required)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
}

impl Annotations {
    /// Create annotations with a priority, rejecting values outside [0, 1]
    pub fn with_priority(priority: f64) -> McpResult<Self> {
        check_priority(priority).map_err(McpError::schema)?;
        Ok(Self {
            audience: None,
            priority: Some(priority),
        })
    }

    /// Create annotations for an audience
    pub fn for_audience(audience: Vec<Role>) -> Self {
        Self {
            audience: Some(audience),
            priority: None,
        }
    }
}

fn check_priority(priority: f64) -> Result<(), String> {
    if (0.0..=1.0).contains(&priority) {
        Ok(())
    } else {
        Err(format!("priority {priority} outside the range [0, 1]"))
    }
}

// Out-of-range priorities are a decode error, not something to clamp
impl<'de> Deserialize<'de> for Annotations {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            audience: Option<Vec<Role>>,
            priority: Option<f64>,
        }

        let raw = Raw::deserialize(deserializer)?;
        if let Some(priority) = raw.priority {
            check_priority(priority).map_err(D::Error::custom)?;
        }
        Ok(Self {
            audience: raw.audience,
            priority: raw.priority,
        })
    }
}

// ============================================================================
// Content Types
// ============================================================================

/// A single content block in a tool result, prompt message, or sampling reply
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Content {
    /// Plain text
    #[serde(rename = "text")]
    Text {
        /// The text content
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        annotations: Option<Annotations>,
    },
    /// Base64-encoded image data
    #[serde(rename = "image")]
    Image {
        /// Base64-encoded image data
        data: String,
        /// MIME type of the image
        #[serde(rename = "mimeType")]
        mime_type: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        annotations: Option<Annotations>,
    },
    /// The contents of a resource, embedded into the message
    #[serde(rename = "resource")]
    Resource {
        /// The embedded resource payload
        resource: ResourceContents,
        #[serde(skip_serializing_if = "Option::is_none")]
        annotations: Option<Annotations>,
    },
}

impl Content {
    /// Create a text content block
    pub fn text<S: Into<String>>(text: S) -> Self {
        Content::Text {
            text: text.into(),
            annotations: None,
        }
    }

    /// Create an image content block
    pub fn image<S: Into<String>>(data: S, mime_type: S) -> Self {
        Content::Image {
            data: data.into(),
            mime_type: mime_type.into(),
            annotations: None,
        }
    }

    /// Create an embedded-resource content block
    pub fn resource(resource: ResourceContents) -> Self {
        Content::Resource {
            resource,
            annotations: None,
        }
    }
}

/// The contents of a specific resource, as text or binary data
///
/// The wire format carries no explicit discriminant: a payload with a `text`
/// field is textual and a payload with a `blob` field is binary. A payload
/// with both or neither is malformed.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ResourceContents {
    /// Textual resource contents
    Text {
        /// URI of the resource
        uri: String,
        /// MIME type of the resource
        #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
        /// The text of the resource
        text: String,
    },
    /// Binary resource contents
    Blob {
        /// URI of the resource
        uri: String,
        /// MIME type of the resource
        #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
        /// Base64-encoded binary data
        blob: String,
    },
}

impl ResourceContents {
    /// Create textual resource contents
    pub fn text<S: Into<String>>(uri: S, text: S) -> Self {
        ResourceContents::Text {
            uri: uri.into(),
            mime_type: None,
            text: text.into(),
        }
    }

    /// Create binary resource contents
    pub fn blob<S: Into<String>>(uri: S, blob: S) -> Self {
        ResourceContents::Blob {
            uri: uri.into(),
            mime_type: None,
            blob: blob.into(),
        }
    }

    /// URI of the underlying resource
    pub fn uri(&self) -> &str {
        match self {
            ResourceContents::Text { uri, .. } | ResourceContents::Blob { uri, .. } => uri,
        }
    }
}

impl<'de> Deserialize<'de> for ResourceContents {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            uri: String,
            #[serde(rename = "mimeType")]
            mime_type: Option<String>,
            text: Option<String>,
            blob: Option<String>,
        }

        let raw = Raw::deserialize(deserializer)?;
        match (raw.text, raw.blob) {
            (Some(text), None) => Ok(ResourceContents::Text {
                uri: raw.uri,
                mime_type: raw.mime_type,
                text,
            }),
            (None, Some(blob)) => Ok(ResourceContents::Blob {
                uri: raw.uri,
                mime_type: raw.mime_type,
                blob,
            }),
            (Some(_), Some(_)) => Err(D::Error::custom(
                "resource contents carry both `text` and `blob`",
            )),
            (None, None) => Err(D::Error::custom(
                "resource contents carry neither `text` nor `blob`",
            )),
        }
    }
}

// ============================================================================
// Resources, Roots, Tools, Prompts
// ============================================================================

/// A resource the server is capable of reading
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    /// URI of the resource
    pub uri: String,
    /// Identifier of the resource
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description of what the resource represents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// MIME type of the resource
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Display annotations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}

/// A template description for parameterized resources
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceTemplate {
    /// URI template (RFC 6570) for constructing resource URIs
    #[serde(rename = "uriTemplate")]
    pub uri_template: String,
    /// Identifier of the template
    pub name: String,
    /// Description of what the template is for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// MIME type of all resources matching the template, if uniform
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Display annotations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}

/// A root directory or file the client grants the server access to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Root {
    /// URI of the root, `file://` scheme in current revisions
    pub uri: String,
    /// Display name for the root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A tool the server exposes for invocation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    /// Identifier of the tool
    pub name: String,
    /// Description of what the tool does
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema describing the tool's arguments
    #[serde(rename = "inputSchema")]
    pub input_schema: ToolInputSchema,
}

/// JSON Schema object describing tool arguments
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolInputSchema {
    /// Always "object"
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Property schemas keyed by argument name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<HashMap<String, serde_json::Value>>,
    /// Names of required arguments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl Default for ToolInputSchema {
    fn default() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: None,
            required: None,
        }
    }
}

/// A prompt or prompt template the server offers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prompt {
    /// Identifier of the prompt
    pub name: String,
    /// Description of what the prompt provides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Arguments the prompt accepts for templating
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<PromptArgument>>,
}

/// A single argument a prompt template accepts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptArgument {
    /// Identifier of the argument
    pub name: String,
    /// Description of the argument
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the argument must be provided
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// One message in an instantiated prompt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptMessage {
    /// Who speaks the message
    pub role: Role,
    /// The message body
    pub content: Content,
}

// ============================================================================
// Sampling
// ============================================================================

/// A message in a sampling conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SamplingMessage {
    /// Who speaks the message
    pub role: Role,
    /// The message body, text or image only
    pub content: SamplingContent,
}

impl SamplingMessage {
    /// Create a user text message
    pub fn user_text<S: Into<String>>(text: S) -> Self {
        Self {
            role: Role::User,
            content: SamplingContent::Text { text: text.into() },
        }
    }

    /// Create an assistant text message
    pub fn assistant_text<S: Into<String>>(text: S) -> Self {
        Self {
            role: Role::Assistant,
            content: SamplingContent::Text { text: text.into() },
        }
    }
}

/// Content allowed inside a sampling message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum SamplingContent {
    /// Plain text
    #[serde(rename = "text")]
    Text {
        /// The text content
        text: String,
    },
    /// Base64-encoded image data
    #[serde(rename = "image")]
    Image {
        /// Base64-encoded image data
        data: String,
        /// MIME type of the image
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
}

/// The server's preferences for which model the client should select
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct ModelPreferences {
    /// Ordered hints for model selection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<ModelHint>>,
    /// How much to prioritize cost, from 0 to 1
    #[serde(rename = "costPriority", skip_serializing_if = "Option::is_none")]
    pub cost_priority: Option<f64>,
    /// How much to prioritize latency, from 0 to 1
    #[serde(rename = "speedPriority", skip_serializing_if = "Option::is_none")]
    pub speed_priority: Option<f64>,
    /// How much to prioritize capability, from 0 to 1
    #[serde(
        rename = "intelligencePriority",
        skip_serializing_if = "Option::is_none"
    )]
    pub intelligence_priority: Option<f64>,
}

impl<'de> Deserialize<'de> for ModelPreferences {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            hints: Option<Vec<ModelHint>>,
            #[serde(rename = "costPriority")]
            cost_priority: Option<f64>,
            #[serde(rename = "speedPriority")]
            speed_priority: Option<f64>,
            #[serde(rename = "intelligencePriority")]
            intelligence_priority: Option<f64>,
        }

        let raw = Raw::deserialize(deserializer)?;
        for (label, value) in [
            ("costPriority", raw.cost_priority),
            ("speedPriority", raw.speed_priority),
            ("intelligencePriority", raw.intelligence_priority),
        ] {
            if let Some(v) = value {
                check_priority(v)
                    .map_err(|e| D::Error::custom(format!("{label}: {e}")))?;
            }
        }
        Ok(Self {
            hints: raw.hints,
            cost_priority: raw.cost_priority,
            speed_priority: raw.speed_priority,
            intelligence_priority: raw.intelligence_priority,
        })
    }
}

/// A hint naming a model or model family
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelHint {
    /// Substring-matched model name, e.g. "claude-3" or "sonnet"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// How much server context to include in a sampling request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum IncludeContext {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "thisServer")]
    ThisServer,
    #[serde(rename = "allServers")]
    AllServers,
}

// ============================================================================
// Logging
// ============================================================================

/// Severity of a log message, per RFC 5424
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LoggingLevel {
    Debug,
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Alert,
    Emergency,
}

// ============================================================================
// JSON-RPC Envelopes
// ============================================================================

/// JSON-RPC request message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,
    /// Request ID for correlation
    pub id: RequestId,
    /// Method name being called
    pub method: String,
    /// Method parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl JsonRpcRequest {
    /// Create a new JSON-RPC request
    pub fn new<T: Serialize>(
        id: RequestId,
        method: String,
        params: Option<T>,
    ) -> std::result::Result<Self, serde_json::Error> {
        let params = match params {
            Some(p) => Some(serde_json::to_value(p)?),
            None => None,
        };

        Ok(Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method,
            params,
        })
    }
}

/// Successful JSON-RPC response message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcResponse {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,
    /// Request ID for correlation
    pub id: RequestId,
    /// Result of the method call
    pub result: serde_json::Value,
}

impl JsonRpcResponse {
    /// Create a successful JSON-RPC response
    pub fn success<T: Serialize>(
        id: RequestId,
        result: T,
    ) -> std::result::Result<Self, serde_json::Error> {
        Ok(Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: serde_json::to_value(result)?,
        })
    }
}

/// Failed JSON-RPC response message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcError {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,
    /// Request ID for correlation
    pub id: RequestId,
    /// Error information
    pub error: ErrorObject,
}

impl JsonRpcError {
    /// Create an error JSON-RPC response
    pub fn error(id: RequestId, code: i32, message: String, data: Option<serde_json::Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            error: ErrorObject { code, message, data },
        }
    }
}

/// Error object carried by a failed response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorObject {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
    /// Additional error data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Standard JSON-RPC error codes
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// JSON-RPC notification message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcNotification {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,
    /// Method name being called
    pub method: String,
    /// Method parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl JsonRpcNotification {
    /// Create a new JSON-RPC notification
    pub fn new<T: Serialize>(
        method: String,
        params: Option<T>,
    ) -> std::result::Result<Self, serde_json::Error> {
        let params = match params {
            Some(p) => Some(serde_json::to_value(p)?),
            None => None,
        };

        Ok(Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method,
            params,
        })
    }
}

/// Any inbound or outbound JSON-RPC frame
///
/// Deserialization dispatches on field presence: `method` with an `id` is a
/// request, `method` alone is a notification, `error` is a failed response,
/// `result` is a successful response. A frame carrying both `result` and
/// `error` is malformed.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum JsonRpcMessage {
    Request(JsonRpcRequest),
    Response(JsonRpcResponse),
    Error(JsonRpcError),
    Notification(JsonRpcNotification),
}

impl<'de> Deserialize<'de> for JsonRpcMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let obj = value
            .as_object()
            .ok_or_else(|| D::Error::custom("JSON-RPC frame is not an object"))?;

        let has_method = obj.contains_key("method");
        let has_id = obj.contains_key("id");
        let has_result = obj.contains_key("result");
        let has_error = obj.contains_key("error");

        let message = if has_method && has_id {
            JsonRpcMessage::Request(
                serde_json::from_value(value).map_err(D::Error::custom)?,
            )
        } else if has_method {
            JsonRpcMessage::Notification(
                serde_json::from_value(value).map_err(D::Error::custom)?,
            )
        } else if has_result && has_error {
            return Err(D::Error::custom(
                "response frame carries both `result` and `error`",
            ));
        } else if has_error {
            JsonRpcMessage::Error(serde_json::from_value(value).map_err(D::Error::custom)?)
        } else if has_result {
            JsonRpcMessage::Response(
                serde_json::from_value(value).map_err(D::Error::custom)?,
            )
        } else {
            return Err(D::Error::custom(
                "frame has neither `method`, `result`, nor `error`",
            ));
        };

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_content_tagged_serialization() {
        let content = Content::text("hello");
        let value = serde_json::to_value(&content).unwrap();
        assert_eq!(value, json!({"type": "text", "text": "hello"}));
    }

    #[test]
    fn test_resource_contents_requires_exactly_one_payload() {
        let both = json!({"uri": "file:///x", "text": "a", "blob": "YQ=="});
        assert!(serde_json::from_value::<ResourceContents>(both).is_err());

        let neither = json!({"uri": "file:///x"});
        assert!(serde_json::from_value::<ResourceContents>(neither).is_err());

        let text = json!({"uri": "file:///x", "text": "a"});
        let decoded: ResourceContents = serde_json::from_value(text).unwrap();
        assert_eq!(decoded, ResourceContents::text("file:///x", "a"));
    }

    #[test]
    fn test_annotations_priority_rejected_out_of_range() {
        assert!(serde_json::from_value::<Annotations>(json!({"priority": 1.5})).is_err());
        assert!(serde_json::from_value::<Annotations>(json!({"priority": -0.1})).is_err());
        let ok: Annotations = serde_json::from_value(json!({"priority": 1.0})).unwrap();
        assert_eq!(ok.priority, Some(1.0));
        assert!(Annotations::with_priority(2.0).is_err());
    }

    #[test]
    fn test_model_preferences_priority_bounds() {
        let bad = json!({"speedPriority": 3.0});
        assert!(serde_json::from_value::<ModelPreferences>(bad).is_err());
        let ok: ModelPreferences =
            serde_json::from_value(json!({"costPriority": 0.0, "intelligencePriority": 1.0}))
                .unwrap();
        assert_eq!(ok.cost_priority, Some(0.0));
        assert_eq!(ok.intelligence_priority, Some(1.0));
    }

    #[test]
    fn test_json_rpc_message_dispatch() {
        let request: JsonRpcMessage =
            serde_json::from_value(json!({"jsonrpc": "2.0", "id": 1, "method": "ping"})).unwrap();
        assert!(matches!(request, JsonRpcMessage::Request(_)));

        let notification: JsonRpcMessage = serde_json::from_value(
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        )
        .unwrap();
        assert!(matches!(notification, JsonRpcMessage::Notification(_)));

        let response: JsonRpcMessage =
            serde_json::from_value(json!({"jsonrpc": "2.0", "id": 1, "result": {}})).unwrap();
        assert!(matches!(response, JsonRpcMessage::Response(_)));

        let error: JsonRpcMessage = serde_json::from_value(
            json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32601, "message": "nope"}}),
        )
        .unwrap();
        assert!(matches!(error, JsonRpcMessage::Error(_)));
    }

    #[test]
    fn test_json_rpc_message_result_and_error_is_malformed() {
        let frame = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {},
            "error": {"code": -32603, "message": "boom"}
        });
        assert!(serde_json::from_value::<JsonRpcMessage>(frame).is_err());
    }

    #[test]
    fn test_optional_fields_omitted_when_absent() {
        let resource = Resource {
            uri: "file:///a".to_string(),
            name: None,
            description: None,
            mime_type: None,
            annotations: None,
        };
        let value = serde_json::to_value(&resource).unwrap();
        assert_eq!(value, json!({"uri": "file:///a"}));
    }

    #[test]
    fn test_logging_level_ordering_and_names() {
        assert!(LoggingLevel::Debug < LoggingLevel::Emergency);
        assert_eq!(
            serde_json::to_value(LoggingLevel::Warning).unwrap(),
            json!("warning")
        );
        let level: LoggingLevel = serde_json::from_value(json!("notice")).unwrap();
        assert_eq!(level, LoggingLevel::Notice);
    }
}
