//! Request, result, and notification payloads for the method catalogue
//!
//! One params/result pair per catalogue method, plus the notification payloads.
//! Wire names are camelCase; optional fields are omitted entirely when absent.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::protocol::types::{
    ClientCapabilities, Content, Cursor, IncludeContext, LoggingLevel, ModelPreferences, Prompt,
    ProgressToken, PromptMessage, RequestId, Resource, ResourceContents, ResourceTemplate, Role,
    Root, SamplingContent, SamplingMessage, ServerCapabilities, ServerInfo, Tool,
};

/// Request/response metadata blob, opaque to this crate
pub type Meta = HashMap<String, serde_json::Value>;

// ============================================================================
// initialize
// ============================================================================

/// Parameters for the `initialize` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InitializeParams {
    /// Protocol revision the client wants to speak
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    /// Capabilities the client supports
    pub capabilities: ClientCapabilities,
    /// Name and version of the client implementation
    #[serde(rename = "clientInfo")]
    pub client_info: crate::protocol::types::ClientInfo,
}

/// Result of the `initialize` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InitializeResult {
    /// Protocol revision the server selected
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    /// Capabilities the server supports
    pub capabilities: ServerCapabilities,
    /// Name and version of the server implementation
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
    /// Usage instructions the client may surface to a model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

// ============================================================================
// ping and the empty result
// ============================================================================

/// Parameters for the `ping` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PingParams {
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// Result for requests that return no data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EmptyResult {
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

// ============================================================================
// roots/list
// ============================================================================

/// Parameters for the `roots/list` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ListRootsParams {
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// Result of the `roots/list` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListRootsResult {
    /// The roots currently granted
    pub roots: Vec<Root>,
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

// ============================================================================
// resources/*
// ============================================================================

/// Parameters for the `resources/list` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ListResourcesParams {
    /// Pagination cursor from a previous page's `nextCursor`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Cursor>,
}

/// Result of the `resources/list` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListResourcesResult {
    /// One page of resources
    pub resources: Vec<Resource>,
    /// Cursor for the next page; absent means the listing is complete
    #[serde(rename = "nextCursor", skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<Cursor>,
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// Parameters for the `resources/read` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadResourceParams {
    /// URI of the resource to read
    pub uri: String,
}

/// Result of the `resources/read` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadResourceResult {
    /// The contents of the resource, possibly in multiple parts
    pub contents: Vec<ResourceContents>,
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// Parameters for the `resources/templates/list` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ListResourceTemplatesParams {
    /// Pagination cursor from a previous page's `nextCursor`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Cursor>,
}

/// Result of the `resources/templates/list` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListResourceTemplatesResult {
    /// One page of resource templates
    #[serde(rename = "resourceTemplates")]
    pub resource_templates: Vec<ResourceTemplate>,
    /// Cursor for the next page; absent means the listing is complete
    #[serde(rename = "nextCursor", skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<Cursor>,
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// Parameters for the `resources/subscribe` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscribeResourceParams {
    /// URI of the resource to watch
    pub uri: String,
}

/// Parameters for the `resources/unsubscribe` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnsubscribeResourceParams {
    /// URI of the resource to stop watching
    pub uri: String,
}

// ============================================================================
// completion/complete
// ============================================================================

/// Reference to the prompt or resource being completed against
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum CompletionReference {
    /// Complete an argument of a prompt
    #[serde(rename = "ref/prompt")]
    Prompt {
        /// Name of the prompt
        name: String,
    },
    /// Complete a parameter of a resource template URI
    #[serde(rename = "ref/resource")]
    Resource {
        /// URI or URI template of the resource
        uri: String,
    },
}

/// The argument being completed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionArgument {
    /// Name of the argument
    pub name: String,
    /// The value typed so far
    pub value: String,
}

/// Parameters for the `completion/complete` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompleteParams {
    /// What the completion is for
    #[serde(rename = "ref")]
    pub reference: CompletionReference,
    /// The argument and partial value being completed
    pub argument: CompletionArgument,
}

/// Result of the `completion/complete` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompleteResult {
    /// The completion values
    pub completion: Completion,
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// Completion values for an argument
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Completion {
    /// Candidate values, at most 100
    pub values: Vec<String>,
    /// Total number of candidates, which may exceed the page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,
    /// Whether more candidates exist beyond those returned
    #[serde(rename = "hasMore", skip_serializing_if = "Option::is_none")]
    pub has_more: Option<bool>,
}

// ============================================================================
// tools/*
// ============================================================================

/// Parameters for the `tools/list` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ListToolsParams {
    /// Pagination cursor from a previous page's `nextCursor`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Cursor>,
}

/// Result of the `tools/list` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListToolsResult {
    /// One page of tools
    pub tools: Vec<Tool>,
    /// Cursor for the next page; absent means the listing is complete
    #[serde(rename = "nextCursor", skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<Cursor>,
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// Parameters for the `tools/call` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallToolParams {
    /// Name of the tool to invoke
    pub name: String,
    /// Arguments keyed by parameter name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<HashMap<String, serde_json::Value>>,
}

/// Result of the `tools/call` request
///
/// Tool failures travel inside the result with `isError: true`, not as a
/// JSON-RPC error, so a model can see what went wrong.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallToolResult {
    /// Output of the tool
    pub content: Vec<Content>,
    /// Whether the tool invocation failed
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl CallToolResult {
    /// Whether this result reports a tool failure
    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }
}

// ============================================================================
// prompts/*
// ============================================================================

/// Parameters for the `prompts/list` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ListPromptsParams {
    /// Pagination cursor from a previous page's `nextCursor`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Cursor>,
}

/// Result of the `prompts/list` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListPromptsResult {
    /// One page of prompts
    pub prompts: Vec<Prompt>,
    /// Cursor for the next page; absent means the listing is complete
    #[serde(rename = "nextCursor", skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<Cursor>,
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// Parameters for the `prompts/get` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GetPromptParams {
    /// Name of the prompt to instantiate
    pub name: String,
    /// Template arguments keyed by argument name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<HashMap<String, String>>,
}

/// Result of the `prompts/get` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GetPromptResult {
    /// Description of the instantiated prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The prompt messages in conversation order
    pub messages: Vec<PromptMessage>,
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

// ============================================================================
// messages/create (sampling)
// ============================================================================

/// Parameters for the `messages/create` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateMessageParams {
    /// Conversation so far
    pub messages: Vec<SamplingMessage>,
    /// Maximum tokens to sample
    #[serde(rename = "maxTokens")]
    pub max_tokens: u32,
    /// Server's model selection preferences, advisory only
    #[serde(rename = "modelPreferences", skip_serializing_if = "Option::is_none")]
    pub model_preferences: Option<ModelPreferences>,
    /// System prompt the server wants used
    #[serde(rename = "systemPrompt", skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// How much MCP context to include
    #[serde(rename = "includeContext", skip_serializing_if = "Option::is_none")]
    pub include_context: Option<IncludeContext>,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Sequences that stop sampling
    #[serde(rename = "stopSequences", skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
    /// Provider-specific metadata passthrough
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Result of the `messages/create` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateMessageResult {
    /// Role of the sampled message, assistant in practice
    pub role: Role,
    /// The sampled content
    pub content: SamplingContent,
    /// Name of the model that produced the message
    pub model: String,
    /// Why sampling stopped, e.g. "endTurn", "stopSequence", "maxTokens"
    #[serde(rename = "stopReason", skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

// ============================================================================
// logging/setLevel
// ============================================================================

/// Parameters for the `logging/setLevel` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SetLevelParams {
    /// Minimum severity the server should emit from now on
    pub level: LoggingLevel,
}

// ============================================================================
// Notification payloads
// ============================================================================

/// Payload of `notifications/cancelled`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CancelledParams {
    /// ID of the request being cancelled
    #[serde(rename = "requestId")]
    pub request_id: RequestId,
    /// Optional human-readable reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Payload of `notifications/progress`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressParams {
    /// Token from the originating request's `_meta.progressToken`
    #[serde(rename = "progressToken")]
    pub progress_token: ProgressToken,
    /// Progress so far, monotonically increasing
    pub progress: f64,
    /// Total expected work, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
}

/// Payload of `notifications/resources/updated`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceUpdatedParams {
    /// URI of the resource that changed
    pub uri: String,
}

/// Payload of `notifications/message` (server log output)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingMessageParams {
    /// Severity of the message
    pub level: LoggingLevel,
    /// Arbitrary JSON payload to log
    pub data: serde_json::Value,
    /// Name of the logger that produced the message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logger: Option<String>,
}
