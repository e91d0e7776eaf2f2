//! HTTP transport: JSON-RPC over POST.
//!
//! Stateless: every request stands alone and `initialize` is optional, so
//! any HTTP client (curl included) can list and call the Minecraft tools
//! without an MCP SDK.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, instrument, warn};

use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;
use crate::core::server::SERVER_INSTRUCTIONS;

/// Protocol revision reported by `initialize`.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<serde_json::Value>,
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<serde_json::Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Method not found error.
    pub fn method_not_found(id: Option<serde_json::Value>) -> Self {
        Self::error(id, -32601, "Method not found")
    }

    /// Invalid request error.
    pub fn invalid_request(id: Option<serde_json::Value>) -> Self {
        Self::error(id, -32600, "Invalid Request")
    }

    /// Invalid params error.
    pub fn invalid_params(id: Option<serde_json::Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32602, msg)
    }
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The MCP server instance.
    server: McpServer,
}

impl AppState {
    fn new(server: McpServer) -> Self {
        Self { server }
    }
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Run the HTTP transport.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();

        let state = AppState::new(server);

        // Build router
        let rpc_path = self.config.rpc_path.clone();
        let mut app = Router::new()
            .route(&self.config.rpc_path, post(handle_rpc))
            .route("/health", get(health_check))
            .route("/", get(move |State(state): State<AppState>| root_handler(state, rpc_path)))
            .with_state(state);

        // Add CORS if enabled
        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app = app.layer(cors);
        }

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!(
            "Ready - listening on {} (JSON-RPC over HTTP, CORS {})",
            addr, cors_status
        );
        info!("  → JSON-RPC: POST {}", self.config.rpc_path);
        info!("  → Health:   GET /health");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Root handler - describes the server and its endpoints.
async fn root_handler(state: AppState, rpc_path: String) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": state.server.name(),
        "version": state.server.version(),
        "transport": "HTTP",
        "endpoints": {
            "rpc": rpc_path,
            "health": "/health"
        },
        "protocol": "JSON-RPC 2.0",
        "tools": state.server.tools().tool_names(),
        "documentation": format!("Send POST requests to {rpc_path} with JSON-RPC messages")
    }))
}

/// Health check endpoint.
///
/// Only reports that this process is up; use the `test_server_connection`
/// tool to probe the Minecraft server itself.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Handle JSON-RPC requests.
#[instrument(skip_all, fields(method))]
async fn handle_rpc(
    State(state): State<AppState>,
    Json(request): Json<JsonRpcRequest>,
) -> impl IntoResponse {
    tracing::Span::current().record("method", &request.method);
    info!("Received JSON-RPC request: {}", request.method);

    let response = process_request(&state, request).await;

    (StatusCode::OK, Json(response))
}

/// Process a JSON-RPC request and return the response.
async fn process_request(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    if request.jsonrpc != "2.0" {
        return JsonRpcResponse::invalid_request(request.id);
    }

    match request.method.as_str() {
        "initialize" => handle_initialize(state, request),
        "ping" => JsonRpcResponse::success(request.id, serde_json::json!({})),
        "tools/list" => handle_tools_list(state, request),
        "tools/call" => handle_tools_call(state, request).await,
        "resources/list" => handle_resources_list(state, request),
        "resources/read" => handle_resources_read(state, request),

        // Notifications (no response needed for stateless HTTP)
        method if method.starts_with("notifications/") => {
            info!("Received notification: {}", method);
            JsonRpcResponse::success(request.id, serde_json::json!(null))
        }

        _ => {
            warn!("Unknown method: {}", request.method);
            JsonRpcResponse::method_not_found(request.id)
        }
    }
}

fn handle_initialize(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing initialize request");

    let result = serde_json::json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": {},
            "resources": {}
        },
        "serverInfo": {
            "name": state.server.name(),
            "version": state.server.version()
        },
        "instructions": SERVER_INSTRUCTIONS
    });

    JsonRpcResponse::success(request.id, result)
}

fn handle_tools_list(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    JsonRpcResponse::success(
        request.id,
        serde_json::json!({ "tools": state.server.list_tools() }),
    )
}

/// Handle tools/call request.
///
/// A failing tool still answers with a JSON-RPC success whose result has
/// `isError: true`; JSON-RPC errors are reserved for malformed requests.
async fn handle_tools_call(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    let Some(params) = request.params else {
        return JsonRpcResponse::invalid_params(request.id, "Missing params");
    };

    let Some(name) = params.get("name").and_then(|v| v.as_str()) else {
        return JsonRpcResponse::invalid_params(request.id, "Missing tool name");
    };
    info!("Processing tools/call request for {}", name);

    let arguments = params
        .get("arguments")
        .cloned()
        .unwrap_or(serde_json::json!({}));

    match state.server.call_tool(name, arguments).await {
        Ok(result) => JsonRpcResponse::success(request.id, result),
        Err(e) => JsonRpcResponse::invalid_params(request.id, e),
    }
}

fn handle_resources_list(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    JsonRpcResponse::success(
        request.id,
        serde_json::json!({ "resources": state.server.list_resources() }),
    )
}

fn handle_resources_read(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    let Some(uri) = request
        .params
        .as_ref()
        .and_then(|p| p.get("uri"))
        .and_then(|v| v.as_str())
    else {
        return JsonRpcResponse::invalid_params(request.id, "Missing resource URI");
    };
    info!("Processing resources/read request for {}", uri);

    match state.server.read_resource(uri) {
        Ok(result) => JsonRpcResponse::success(request.id, result),
        Err(e) => JsonRpcResponse::invalid_params(request.id, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::core::config::TimeoutConfig;
    use crate::domains::minecraft::MinecraftClient;
    use crate::domains::minecraft::testing::RecordingBackend;
    use serde_json::json;
    use std::sync::Arc;

    fn state_with(backend: RecordingBackend) -> AppState {
        let client = MinecraftClient::new(Arc::new(backend), TimeoutConfig::default());
        AppState::new(McpServer::with_client(Config::default(), client))
    }

    fn rpc(method: &str, params: serde_json::Value) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params: Some(params),
        }
    }

    #[tokio::test]
    async fn test_initialize_advertises_tools_and_resources() {
        let state = state_with(RecordingBackend::new());

        let response = process_request(&state, rpc("initialize", json!({}))).await;

        let result = response.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], "minecraft-api");
        assert!(result["capabilities"].get("prompts").is_none());
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
    }

    #[tokio::test]
    async fn test_requests_do_not_depend_on_initialize() {
        let backend = Arc::new(RecordingBackend::new().respond_json(json!({"success": true})));
        let client = MinecraftClient::new(backend.clone(), TimeoutConfig::default());
        let state = AppState::new(McpServer::with_client(Config::default(), client));

        let response = process_request(
            &state,
            rpc("tools/call", json!({"name": "broadcast_message", "arguments": {"message": "hi"}})),
        )
        .await;
        assert_eq!(response.result.unwrap()["isError"], false);

        let response = process_request(&state, rpc("notifications/initialized", json!({}))).await;
        assert!(response.error.is_none());

        let response = process_request(&state, rpc("tools/list", json!({}))).await;
        assert_eq!(response.result.unwrap()["tools"].as_array().unwrap().len(), 32);
        assert_eq!(backend.request_count(), 1);
    }

    #[tokio::test]
    async fn test_tool_failure_is_a_result_not_an_rpc_error() {
        let state = state_with(RecordingBackend::new());

        let response = process_request(
            &state,
            rpc("tools/call", json!({"name": "send_message_to_player", "arguments": {"message": "hi"}})),
        )
        .await;

        assert!(response.error.is_none());
        assert_eq!(response.result.unwrap()["isError"], true);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_reported_in_result() {
        let state = state_with(RecordingBackend::new());

        let response =
            process_request(&state, rpc("tools/call", json!({"name": "dig_tunnel"}))).await;

        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        assert!(result["content"][0]["text"].as_str().unwrap().contains("dig_tunnel"));
    }

    #[tokio::test]
    async fn test_prompts_are_not_served() {
        let state = state_with(RecordingBackend::new());

        let response = process_request(&state, rpc("prompts/list", json!({}))).await;

        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn test_read_conventions_resource() {
        let state = state_with(RecordingBackend::new());

        let response =
            process_request(&state, rpc("resources/read", json!({"uri": "file://conventions"})))
                .await;

        let text = response.result.unwrap()["contents"][0]["text"].clone();
        assert!(text.as_str().unwrap().contains("coordinate conventions"));
    }

    #[tokio::test]
    async fn test_wrong_jsonrpc_version() {
        let state = state_with(RecordingBackend::new());
        let mut request = rpc("tools/list", json!({}));
        request.jsonrpc = "1.0".to_string();

        let response = process_request(&state, request).await;

        assert_eq!(response.error.unwrap().code, -32600);
    }
}
