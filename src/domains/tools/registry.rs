//! Tool Registry - central registration and dispatch for all tools.
//!
//! The registry is an immutable table built once at startup: each entry
//! pairs the published [`Tool`] metadata with its handler. Every transport
//! lists and calls tools through the same table, so the catalogue and the
//! dispatch map cannot drift apart.

use futures::FutureExt;
use futures::future::BoxFuture;
use rmcp::handler::server::tool::schema_for_type;
use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use super::definitions::{self, NoParams};
use super::error::{ErrorTier, ToolError, ToolResult};
use crate::domains::minecraft::MinecraftClient;

// ============================================================================
// Tool trait
// ============================================================================

/// Structural checks run on parsed parameters before any network call.
pub trait Validate {
    fn validate(&self) -> ToolResult<()> {
        Ok(())
    }
}

/// A tool backed by the Minecraft REST API.
pub trait McTool {
    /// Tool name as registered in MCP.
    const NAME: &'static str;

    /// Tool description shown to clients.
    const DESCRIPTION: &'static str;

    /// Typed arguments; their JSON schema is the published input schema.
    type Params: DeserializeOwned + JsonSchema + Validate + Send + 'static;

    /// Run the tool, producing the text shown to the caller.
    fn execute(
        client: &MinecraftClient,
        params: Self::Params,
    ) -> impl Future<Output = ToolResult> + Send;

    /// Create a Tool model for this tool (metadata).
    fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: Arc::new(schema_for_type::<Self::Params>()),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

type HandlerFn = fn(Arc<MinecraftClient>, JsonObject) -> BoxFuture<'static, ToolResult>;

/// Parse, validate and run one invocation of `T`.
fn dispatch<T: McTool>(client: Arc<MinecraftClient>, arguments: JsonObject) -> BoxFuture<'static, ToolResult> {
    async move {
        let params: T::Params = serde_json::from_value(serde_json::Value::Object(arguments))
            .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;
        params.validate()?;
        T::execute(&client, params).await
    }
    .boxed()
}

// ============================================================================
// Tool Registry
// ============================================================================

/// What a registry entry does when called.
#[derive(Clone, Copy)]
enum Handler {
    Live(HandlerFn),
    /// Retired alias: answers with a fixed pointer to its replacements.
    Deprecated(&'static str),
}

struct Entry {
    tool: Tool,
    handler: Handler,
}

impl Entry {
    fn live<T: McTool>() -> Self {
        Self {
            tool: T::to_tool(),
            handler: Handler::Live(dispatch::<T>),
        }
    }

    fn deprecated(name: &'static str, description: &'static str, message: &'static str) -> Self {
        Self {
            tool: Tool {
                name: name.into(),
                description: Some(description.into()),
                input_schema: Arc::new(schema_for_type::<NoParams>()),
                annotations: None,
                output_schema: None,
                icons: None,
                meta: None,
                title: None,
            },
            handler: Handler::Deprecated(message),
        }
    }
}

/// Tool registry - manages all available tools.
pub struct ToolRegistry {
    client: Arc<MinecraftClient>,
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tool_names())
            .finish_non_exhaustive()
    }
}

impl ToolRegistry {
    /// Create a registry whose handlers talk to `client`.
    pub fn new(client: Arc<MinecraftClient>) -> Self {
        use crate::domains::minecraft::{
            BlockSet, BoxFill, DoorLine, SignPlacement, Staircase, TorchPlacement, WindowPaneWall,
        };
        use definitions::*;

        let entries = vec![
            // World
            Entry::live::<GetPlayersTool>(),
            Entry::live::<GetEntitiesTool>(),
            Entry::live::<SpawnEntityTool>(),
            // Blocks
            Entry::live::<GetBlocksTool>(),
            Entry::live::<SetBlocksTool>(),
            Entry::live::<GetBlocksChunkTool>(),
            Entry::live::<FillBoxTool>(),
            Entry::live::<GetHeightmapTool>(),
            // Messages
            Entry::live::<BroadcastMessageTool>(),
            Entry::live::<SendMessageToPlayerTool>(),
            // Prefabs
            Entry::live::<PlaceNbtStructureTool>(),
            Entry::live::<PlaceDoorLineTool>(),
            Entry::live::<PlaceStairsTool>(),
            Entry::live::<PlaceWindowPaneWallTool>(),
            Entry::live::<PlaceTorchTool>(),
            Entry::live::<PlaceSignTool>(),
            // System
            Entry::live::<TeleportPlayerTool>(),
            Entry::live::<TestServerConnectionTool>(),
            Entry::live::<CoordinateConventionsTool>(),
            // Builds
            Entry::live::<CreateBuildTool>(),
            Entry::deprecated(
                DEPRECATED_ADD_BUILD_TASK,
                DEPRECATED_ADD_BUILD_TASK_DESCRIPTION,
                DEPRECATED_ADD_BUILD_TASK_MESSAGE,
            ),
            Entry::live::<AddSingleBlockTaskTool>(),
            Entry::live::<AddBuildTaskTool<BlockSet>>(),
            Entry::live::<AddBuildTaskTool<BoxFill>>(),
            Entry::live::<AddBuildTaskTool<DoorLine>>(),
            Entry::live::<AddBuildTaskTool<Staircase>>(),
            Entry::live::<AddBuildTaskTool<WindowPaneWall>>(),
            Entry::live::<AddBuildTaskTool<TorchPlacement>>(),
            Entry::live::<AddBuildTaskTool<SignPlacement>>(),
            Entry::live::<ExecuteBuildTool>(),
            Entry::live::<QueryBuildsByLocationTool>(),
            Entry::live::<GetBuildStatusTool>(),
        ];

        let index = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.tool.name.to_string(), i))
            .collect();

        info!("Registered {} tools", entries.len());

        Self {
            client,
            entries,
            index,
        }
    }

    /// Get all tool names, in catalogue order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.tool.name.as_ref()).collect()
    }

    /// Get all tools as Tool models (metadata).
    pub fn tools(&self) -> Vec<Tool> {
        self.entries.iter().map(|e| e.tool.clone()).collect()
    }

    /// Whether `name` resolves to a handler.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    fn resolve(&self, name: &str) -> Option<&Entry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Run a tool and return its typed outcome.
    ///
    /// Handler panics are caught and reported as [`ToolError::Internal`].
    pub async fn invoke(&self, name: &str, arguments: Option<JsonObject>) -> ToolResult {
        let entry = self.resolve(name).ok_or_else(|| ToolError::not_found(name))?;

        match entry.handler {
            Handler::Deprecated(message) => Err(ToolError::Deprecated(message)),
            Handler::Live(handler) => {
                let future = handler(self.client.clone(), arguments.unwrap_or_default());
                match AssertUnwindSafe(future).catch_unwind().await {
                    Ok(outcome) => outcome,
                    Err(panic) => Err(ToolError::internal(panic_message(panic.as_ref()))),
                }
            }
        }
    }

    /// Run a tool and render the outcome as an MCP result.
    ///
    /// Never fails: unknown tools, handler errors and panics all become
    /// results with `is_error` set.
    #[instrument(skip(self, arguments))]
    pub async fn call(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        debug!(?arguments, "Tool call");

        match self.invoke(name, arguments).await {
            Ok(text) => CallToolResult::success(vec![Content::text(text)]),
            Err(e) => {
                match e.tier() {
                    ErrorTier::Internal => error!("Tool {} failed: {}", name, e),
                    ErrorTier::Connectivity => warn!("Tool {} could not reach server: {}", name, e),
                    ErrorTier::Remote | ErrorTier::Validation => info!("Tool {} rejected: {}", name, e),
                }
                CallToolResult::error(vec![Content::text(e.to_string())])
            }
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("tool handler panicked: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("tool handler panicked: {s}")
    } else {
        "tool handler panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::minecraft::testing::RecordingBackend;
    use crate::domains::tools::test_support::{registry_with, text_of};
    use serde_json::json;
    use std::collections::HashSet;

    const EXPECTED: [&str; 32] = [
        "get_players",
        "get_entities",
        "spawn_entity",
        "get_blocks",
        "set_blocks",
        "get_blocks_chunk",
        "fill_box",
        "get_heightmap",
        "broadcast_message",
        "send_message_to_player",
        "place_nbt_structure",
        "place_door_line",
        "place_stairs",
        "place_window_pane_wall",
        "place_torch",
        "place_sign",
        "teleport_player",
        "test_server_connection",
        "get_coordinate_conventions",
        "create_build",
        "add_build_task",
        "add_build_task_single_block_set",
        "add_build_task_block_set",
        "add_build_task_block_fill",
        "add_build_task_prefab_door",
        "add_build_task_prefab_stairs",
        "add_build_task_prefab_window",
        "add_build_task_prefab_torch",
        "add_build_task_prefab_sign",
        "execute_build",
        "query_builds_by_location",
        "get_build_status",
    ];

    #[test]
    fn test_catalogue_matches_expected_names() {
        let backend = Arc::new(RecordingBackend::new());
        let registry = registry_with(&backend);
        let names = registry.tool_names();

        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(unique.len(), names.len(), "duplicate tool names");
        assert_eq!(names.len(), 32);

        let expected: HashSet<&str> = EXPECTED.iter().copied().collect();
        assert_eq!(unique, expected);
    }

    #[test]
    fn test_every_listed_tool_resolves() {
        let backend = Arc::new(RecordingBackend::new());
        let registry = registry_with(&backend);
        for tool in registry.tools() {
            assert!(registry.contains(&tool.name), "{} does not resolve", tool.name);
            assert!(tool.description.is_some());
            assert_eq!(
                tool.input_schema.get("type"),
                Some(&json!("object")),
                "{} schema is not an object",
                tool.name
            );
        }
    }

    #[test]
    fn test_required_fields_published() {
        let backend = Arc::new(RecordingBackend::new());
        let registry = registry_with(&backend);
        let fill = registry
            .tools()
            .into_iter()
            .find(|t| t.name == "fill_box")
            .unwrap();
        let required = fill.input_schema["required"].as_array().unwrap();
        for field in ["x1", "y1", "z1", "x2", "y2", "z2", "block_type"] {
            assert!(required.contains(&json!(field)), "{field} not required");
        }
        assert!(!required.contains(&json!("world")));
    }

    #[test]
    fn test_prefab_block_types_published_as_required() {
        let backend = Arc::new(RecordingBackend::new());
        let registry = registry_with(&backend);
        let tools = registry.tools();
        let required_of = |name: &str| {
            let tool = tools.iter().find(|t| t.name == name).unwrap();
            tool.input_schema["required"].as_array().unwrap().clone()
        };

        for name in [
            "place_door_line",
            "place_window_pane_wall",
            "place_torch",
            "place_sign",
            "add_build_task_prefab_door",
            "add_build_task_prefab_window",
            "add_build_task_prefab_torch",
            "add_build_task_prefab_sign",
        ] {
            assert!(required_of(name).contains(&json!("block_type")), "{name}");
        }
        for name in ["place_stairs", "add_build_task_prefab_stairs"] {
            let required = required_of(name);
            assert!(required.contains(&json!("block_type")), "{name}");
            assert!(required.contains(&json!("stair_type")), "{name}");
        }

        let build_door = required_of("add_build_task_prefab_door");
        assert!(build_door.contains(&json!("build_id")));
        assert!(!build_door.contains(&json!("hinge")));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_error_result() {
        let backend = Arc::new(RecordingBackend::new());
        let registry = registry_with(&backend);

        let result = registry.call("dig_tunnel", None).await;

        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result).contains("Unknown tool"));
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn test_schema_mismatch_is_invalid_arguments() {
        let backend = Arc::new(RecordingBackend::new());
        let registry = registry_with(&backend);
        let args = json!({"x1": 0, "y1": 0}).as_object().cloned();

        let err = registry.invoke("fill_box", args).await.unwrap_err();

        assert!(matches!(err, ToolError::InvalidArguments(_)));
        assert_eq!(err.tier(), ErrorTier::Validation);
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn test_deprecated_alias_lists_replacements() {
        let backend = Arc::new(RecordingBackend::new());
        let registry = registry_with(&backend);
        let args = json!({"build_id": "b", "task_type": "BLOCK_SET"}).as_object().cloned();

        let result = registry.call("add_build_task", args).await;

        assert_eq!(result.is_error, Some(true));
        let text = text_of(&result);
        assert!(text.starts_with("❌ This tool is deprecated."));
        assert!(text.contains("- add_build_task_prefab_sign: For placing signs"));
        assert_eq!(backend.request_count(), 0);
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "tool handler panicked: boom");
    }
}
