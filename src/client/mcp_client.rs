//! High-level protocol client
//!
//! `McpClient` ties the transport, dispatcher, and session guard together and
//! exposes one typed method per catalogue entry. Connect, initialize, then
//! call; everything before `initialize()` succeeds is rejected locally.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, mpsc};

use crate::client::dispatcher::{DispatcherStats, RequestDispatcher};
use crate::client::session::Session;
use crate::core::error::{McpError, McpResult};
use crate::protocol::codec::{self, ServerNotification};
use crate::protocol::messages::{
    CallToolParams, CallToolResult, CancelledParams, CompleteParams, CompleteResult,
    CompletionArgument, CompletionReference, CreateMessageParams, CreateMessageResult, EmptyResult,
    GetPromptParams, GetPromptResult, InitializeParams, InitializeResult, ListPromptsParams,
    ListPromptsResult, ListResourceTemplatesParams, ListResourceTemplatesResult,
    ListResourcesParams, ListResourcesResult, ListRootsParams, ListRootsResult, ListToolsParams,
    ListToolsResult, PingParams, ReadResourceParams, ReadResourceResult, SetLevelParams,
    SubscribeResourceParams, UnsubscribeResourceParams,
};
use crate::protocol::methods;
use crate::protocol::types::{
    ClientCapabilities, Cursor, Implementation, LoggingLevel, RequestId, ServerCapabilities,
    ServerInfo, LATEST_PROTOCOL_VERSION, SUPPORTED_PROTOCOL_VERSIONS,
};
use crate::transport::stdio::{StdioConfig, StdioTransport};
use crate::transport::traits::Transport;

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Name reported to the server during the handshake
    pub name: String,
    /// Version reported to the server during the handshake
    pub version: String,
    /// Protocol revision offered in `initialize`
    pub protocol_version: String,
    /// Per-request response deadline
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            name: "mcp-conduit".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            protocol_version: LATEST_PROTOCOL_VERSION.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// A client for one server connection
pub struct McpClient {
    config: ClientConfig,
    capabilities: ClientCapabilities,
    session: Session,
    dispatcher: RwLock<Option<Arc<RequestDispatcher>>>,
    server_info: RwLock<Option<ServerInfo>>,
    server_capabilities: RwLock<Option<ServerCapabilities>>,
    instructions: RwLock<Option<String>>,
}

impl McpClient {
    /// Create a client that identifies itself with the given name and version
    pub fn new<S: Into<String>>(name: S, version: S) -> Self {
        Self::with_config(ClientConfig {
            name: name.into(),
            version: version.into(),
            ..Default::default()
        })
    }

    /// Create a client from a full configuration
    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            config,
            capabilities: ClientCapabilities::default(),
            session: Session::new(),
            dispatcher: RwLock::new(None),
            server_info: RwLock::new(None),
            server_capabilities: RwLock::new(None),
            instructions: RwLock::new(None),
        }
    }

    /// Declare the capabilities sent during the handshake
    pub fn set_capabilities(&mut self, capabilities: ClientCapabilities) {
        self.capabilities = capabilities;
    }

    /// Start the transport and attach the dispatcher
    ///
    /// A client drives one connection for its lifetime; a second `connect`
    /// is rejected rather than silently replacing the live transport.
    pub async fn connect<T: Transport + 'static>(&self, mut transport: T) -> McpResult<()> {
        if self.dispatcher.read().await.is_some() {
            return Err(McpError::negotiation("client is already connected"));
        }

        transport.start().await?;
        let events = transport
            .events()
            .ok_or_else(|| McpError::internal("transport event stream already taken"))?;

        tracing::debug!(transport = %transport.connection_info(), "connected");
        let dispatcher = Arc::new(RequestDispatcher::new(Arc::new(transport), events));

        let mut slot = self.dispatcher.write().await;
        if slot.is_some() {
            dispatcher.close().await?;
            return Err(McpError::negotiation("client is already connected"));
        }
        *slot = Some(dispatcher);
        Ok(())
    }

    /// Launch a server subprocess and connect to it
    pub async fn connect_with_stdio<S, I>(&self, command: S, args: I) -> McpResult<()>
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        let config = StdioConfig::new(command).with_args(args);
        self.connect(StdioTransport::new(config)).await
    }

    /// Perform the protocol handshake
    ///
    /// On success the session becomes ready and catalogue methods unlock. On
    /// any failure the session returns to its uninitialized state so the
    /// caller can retry.
    pub async fn initialize(&self) -> McpResult<InitializeResult> {
        self.session.begin_initialize().await?;

        let result = self.perform_handshake().await;
        match result {
            Ok(initialized) => {
                self.session.mark_ready().await?;
                tracing::debug!(
                    server = %initialized.server_info.name,
                    version = %initialized.protocol_version,
                    "session ready"
                );
                Ok(initialized)
            }
            Err(e) => {
                self.session.abort_initialize().await;
                Err(e)
            }
        }
    }

    async fn perform_handshake(&self) -> McpResult<InitializeResult> {
        let dispatcher = self.dispatcher().await?;

        let params = InitializeParams {
            protocol_version: self.config.protocol_version.clone(),
            capabilities: self.capabilities.clone(),
            client_info: Implementation {
                name: self.config.name.clone(),
                version: self.config.version.clone(),
                title: None,
            },
        };

        let value = dispatcher
            .send_request(
                methods::INITIALIZE,
                Some(codec::encode_params(methods::INITIALIZE, &params)?),
                self.config.request_timeout,
            )
            .await?;
        let result: InitializeResult = codec::decode_result(methods::INITIALIZE, value)?;

        if !SUPPORTED_PROTOCOL_VERSIONS.contains(&result.protocol_version.as_str()) {
            return Err(McpError::negotiation(format!(
                "server selected unsupported protocol version `{}`",
                result.protocol_version
            )));
        }

        *self.server_info.write().await = Some(result.server_info.clone());
        *self.server_capabilities.write().await = Some(result.capabilities.clone());
        *self.instructions.write().await = result.instructions.clone();

        // The server may not treat the session as live until it hears this
        dispatcher
            .send_notification(methods::INITIALIZED, None)
            .await?;

        Ok(result)
    }

    // ------------------------------------------------------------------
    // Catalogue methods
    // ------------------------------------------------------------------

    /// `ping`
    pub async fn ping(&self) -> McpResult<EmptyResult> {
        self.request(methods::PING, Some(PingParams::default())).await
    }

    /// `roots/list`
    pub async fn list_roots(&self) -> McpResult<ListRootsResult> {
        self.request(methods::ROOTS_LIST, Some(ListRootsParams::default()))
            .await
    }

    /// `resources/list`
    pub async fn list_resources(&self, cursor: Option<Cursor>) -> McpResult<ListResourcesResult> {
        self.request(methods::RESOURCES_LIST, Some(ListResourcesParams { cursor }))
            .await
    }

    /// `resources/read`
    pub async fn read_resource<S: Into<String>>(&self, uri: S) -> McpResult<ReadResourceResult> {
        self.request(
            methods::RESOURCES_READ,
            Some(ReadResourceParams { uri: uri.into() }),
        )
        .await
    }

    /// `resources/templates/list`
    pub async fn list_resource_templates(
        &self,
        cursor: Option<Cursor>,
    ) -> McpResult<ListResourceTemplatesResult> {
        self.request(
            methods::RESOURCES_TEMPLATES_LIST,
            Some(ListResourceTemplatesParams { cursor }),
        )
        .await
    }

    /// `resources/subscribe`
    pub async fn subscribe_resource<S: Into<String>>(&self, uri: S) -> McpResult<EmptyResult> {
        self.request(
            methods::RESOURCES_SUBSCRIBE,
            Some(SubscribeResourceParams { uri: uri.into() }),
        )
        .await
    }

    /// `resources/unsubscribe`
    pub async fn unsubscribe_resource<S: Into<String>>(&self, uri: S) -> McpResult<EmptyResult> {
        self.request(
            methods::RESOURCES_UNSUBSCRIBE,
            Some(UnsubscribeResourceParams { uri: uri.into() }),
        )
        .await
    }

    /// `completion/complete`
    pub async fn complete(
        &self,
        reference: CompletionReference,
        argument: CompletionArgument,
    ) -> McpResult<CompleteResult> {
        self.request(
            methods::COMPLETION_COMPLETE,
            Some(CompleteParams {
                reference,
                argument,
            }),
        )
        .await
    }

    /// `tools/list`
    pub async fn list_tools(&self, cursor: Option<Cursor>) -> McpResult<ListToolsResult> {
        self.request(methods::TOOLS_LIST, Some(ListToolsParams { cursor }))
            .await
    }

    /// `tools/call`
    pub async fn call_tool<S: Into<String>>(
        &self,
        name: S,
        arguments: Option<std::collections::HashMap<String, serde_json::Value>>,
    ) -> McpResult<CallToolResult> {
        self.request(
            methods::TOOLS_CALL,
            Some(CallToolParams {
                name: name.into(),
                arguments,
            }),
        )
        .await
    }

    /// `prompts/get`
    pub async fn get_prompt<S: Into<String>>(
        &self,
        name: S,
        arguments: Option<std::collections::HashMap<String, String>>,
    ) -> McpResult<GetPromptResult> {
        self.request(
            methods::PROMPTS_GET,
            Some(GetPromptParams {
                name: name.into(),
                arguments,
            }),
        )
        .await
    }

    /// `prompts/list`
    pub async fn list_prompts(&self, cursor: Option<Cursor>) -> McpResult<ListPromptsResult> {
        self.request(methods::PROMPTS_LIST, Some(ListPromptsParams { cursor }))
            .await
    }

    /// `messages/create`
    pub async fn create_message(
        &self,
        params: CreateMessageParams,
    ) -> McpResult<CreateMessageResult> {
        self.request(methods::MESSAGES_CREATE, Some(params)).await
    }

    /// `logging/setLevel`
    pub async fn set_logging_level(&self, level: LoggingLevel) -> McpResult<EmptyResult> {
        self.request(methods::LOGGING_SET_LEVEL, Some(SetLevelParams { level }))
            .await
    }

    // ------------------------------------------------------------------
    // Notifications, cancellation, introspection
    // ------------------------------------------------------------------

    /// Receive every notification for one method
    pub async fn subscribe_notifications(
        &self,
        method: &str,
    ) -> McpResult<mpsc::UnboundedReceiver<ServerNotification>> {
        Ok(self.dispatcher().await?.subscribe(method).await)
    }

    /// Receive every notification regardless of method
    pub async fn subscribe_all_notifications(
        &self,
    ) -> McpResult<mpsc::UnboundedReceiver<ServerNotification>> {
        Ok(self.dispatcher().await?.subscribe_all().await)
    }

    /// Cancel a pending request and notify the peer, best effort
    pub async fn cancel_request(&self, id: &RequestId, reason: Option<String>) -> McpResult<()> {
        self.dispatcher().await?.cancel(id, reason).await
    }

    /// Tell the peer about a cancellation decided elsewhere
    pub async fn notify_cancelled(&self, params: CancelledParams) -> McpResult<()> {
        self.dispatcher()
            .await?
            .send_notification(methods::CANCELLED, Some(serde_json::to_value(params)?))
            .await
    }

    /// Capabilities the server declared during the handshake
    pub async fn server_capabilities(&self) -> Option<ServerCapabilities> {
        self.server_capabilities.read().await.clone()
    }

    /// Identity the server declared during the handshake
    pub async fn server_info(&self) -> Option<ServerInfo> {
        self.server_info.read().await.clone()
    }

    /// Usage instructions the server provided, if any
    pub async fn instructions(&self) -> Option<String> {
        self.instructions.read().await.clone()
    }

    /// Dispatcher counters for this connection
    pub async fn stats(&self) -> McpResult<DispatcherStats> {
        Ok(self.dispatcher().await?.stats())
    }

    /// Shut the session down; pending requests fail with a closed-transport error
    pub async fn close(&self) -> McpResult<()> {
        self.session.close().await;
        if let Some(dispatcher) = self.dispatcher.write().await.take() {
            dispatcher.close().await?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    async fn dispatcher(&self) -> McpResult<Arc<RequestDispatcher>> {
        let dispatcher = self
            .dispatcher
            .read()
            .await
            .clone()
            .ok_or_else(|| McpError::negotiation("client is not connected"))?;

        // The session mirrors transport death; there is no way back to Ready
        if dispatcher.is_closed() {
            self.session.close().await;
            return Err(McpError::transport_closed("connection closed by peer"));
        }
        Ok(dispatcher)
    }

    async fn request<P, R>(&self, method: &str, params: Option<P>) -> McpResult<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        self.session.ensure_ready().await?;
        let dispatcher = self.dispatcher().await?;

        let params = match params {
            Some(p) => Some(codec::encode_params(method, &p)?),
            None => None,
        };
        let value = dispatcher
            .send_request(method, params, self.config.request_timeout)
            .await?;
        codec::decode_result(method, value)
    }
}
