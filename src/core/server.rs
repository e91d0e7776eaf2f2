//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating to the tool registry and the resource service.
//!
//! The tool table lives in `domains/tools/registry.rs` and is shared by every
//! transport: STDIO and TCP go through the [`ServerHandler`] impl below, the
//! HTTP transport through the JSON helpers on [`McpServer`].

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::config::Config;
use super::error::Result;
use crate::domains::minecraft::MinecraftClient;
use crate::domains::{resources::ResourceService, tools::ToolRegistry};

/// Instructions sent to clients on initialize.
pub const SERVER_INSTRUCTIONS: &str = "\
Tools for inspecting and building in a Minecraft world through the server's REST API. \
Call get_coordinate_conventions (or read the file://conventions resource) before building \
to learn the axis, rotation and facing conventions. Run test_server_connection first if \
the server may be offline.";

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Tool table and dispatcher.
    tools: Arc<ToolRegistry>,

    /// Service for handling resource-related requests.
    resources: Arc<ResourceService>,
}

impl std::fmt::Debug for McpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpServer")
            .field("name", &self.config.server.name)
            .field("tools", &self.tools)
            .finish_non_exhaustive()
    }
}

impl McpServer {
    /// Create a server whose tools talk to the configured Minecraft API.
    pub fn new(config: Config) -> Result<Self> {
        let client = MinecraftClient::from_config(&config.minecraft)?;
        Ok(Self::with_client(config, client))
    }

    /// Create a server over an existing client.
    pub fn with_client(config: Config, client: MinecraftClient) -> Self {
        Self {
            config: Arc::new(config),
            tools: Arc::new(ToolRegistry::new(Arc::new(client))),
            resources: Arc::new(ResourceService::new()),
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// The tool registry.
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools as JSON.
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tools
            .tools()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name and return the MCP result as JSON.
    ///
    /// Tool failures are results with `isError: true`; only malformed
    /// requests produce `Err`.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> std::result::Result<serde_json::Value, String> {
        let arguments = match arguments {
            serde_json::Value::Object(map) => Some(map),
            serde_json::Value::Null => None,
            other => return Err(format!("Tool arguments must be an object, got {other}")),
        };

        let result = self.tools.call(name, arguments).await;
        serde_json::to_value(result).map_err(|e| e.to_string())
    }

    /// List all available resources as JSON.
    pub fn list_resources(&self) -> Vec<serde_json::Value> {
        self.resources
            .list_resources()
            .into_iter()
            .map(|r| {
                serde_json::json!({
                    "uri": r.raw.uri,
                    "name": r.raw.name,
                    "title": r.raw.title,
                    "description": r.raw.description,
                    "mimeType": r.raw.mime_type
                })
            })
            .collect()
    }

    /// Read a resource by URI as JSON.
    pub fn read_resource(&self, uri: &str) -> std::result::Result<serde_json::Value, String> {
        match self.resources.read_resource(uri) {
            Ok(result) => Ok(serde_json::json!({
                "contents": result.contents
            })),
            Err(e) => Err(e.to_string()),
        }
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("Listing tools");
        Ok(ListToolsResult {
            tools: self.tools.tools(),
            next_cursor: None,
            meta: None,
        })
    }

    /// Runs the tool until it finishes or the client cancels the request.
    ///
    /// Cancelling drops the in-flight HTTP call; work the Minecraft server
    /// already started keeps running.
    #[instrument(skip(self, request, context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        tokio::select! {
            result = self.tools.call(&request.name, request.arguments) => Ok(result),
            _ = context.ct.cancelled() => {
                warn!("Tool call cancelled by client");
                Err(McpError::internal_error("request cancelled", None))
            }
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListResourcesResult, McpError> {
        info!("Listing resources");
        Ok(ListResourcesResult {
            resources: self.resources.list_resources(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ReadResourceResult, McpError> {
        info!("Reading resource: {}", request.uri);
        self.resources
            .read_resource(&request.uri)
            .map_err(|e| {
                let data = serde_json::json!({ "available": e.available() });
                McpError::resource_not_found(e.to_string(), Some(data))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TimeoutConfig;
    use crate::domains::minecraft::testing::RecordingBackend;
    use serde_json::json;

    fn server_with(backend: &Arc<RecordingBackend>) -> McpServer {
        let client = MinecraftClient::new(backend.clone(), TimeoutConfig::default());
        McpServer::with_client(Config::default(), client)
    }

    #[test]
    fn test_server_info() {
        let server = server_with(&Arc::new(RecordingBackend::new()));
        let info = server.get_info();

        assert_eq!(info.server_info.name, "minecraft-api");
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
        assert!(info.capabilities.prompts.is_none());
        assert!(
            info.instructions
                .unwrap()
                .contains("get_coordinate_conventions")
        );
    }

    #[test]
    fn test_list_tools_json() {
        let server = server_with(&Arc::new(RecordingBackend::new()));
        let tools = server.list_tools();

        assert_eq!(tools.len(), 32);
        assert!(tools.iter().all(|t| t["inputSchema"]["type"] == "object"));
    }

    #[tokio::test]
    async fn test_call_tool_json() {
        let backend = Arc::new(RecordingBackend::new().respond_json(json!({"success": true})));
        let server = server_with(&backend);

        let result = server
            .call_tool("broadcast_message", json!({"message": "hello"}))
            .await
            .unwrap();

        assert_eq!(result["isError"], false);
        assert_eq!(
            result["content"][0]["text"],
            "✅ Successfully broadcast message to all players in chat"
        );
    }

    #[tokio::test]
    async fn test_call_tool_rejects_non_object_arguments() {
        let server = server_with(&Arc::new(RecordingBackend::new()));
        assert!(server.call_tool("get_players", json!([1, 2])).await.is_err());
    }

    #[test]
    fn test_resources_json() {
        let server = server_with(&Arc::new(RecordingBackend::new()));

        let listed = server.list_resources();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["uri"], "file://conventions");

        let read = server.read_resource("file://conventions").unwrap();
        assert_eq!(read["contents"][0]["mimeType"], "text/plain");
        let err = server.read_resource("file://missing").unwrap_err();
        assert_eq!(
            err,
            "Unknown resource 'file://missing'. Available: file://conventions"
        );
    }
}
