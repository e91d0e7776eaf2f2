//! Build queue tools.
//!
//! A build is a named, server-side queue of tasks. Tasks are added one at a
//! time (each tool below wraps one task type), then run together with
//! `execute_build`. Every task tool shares [`BuildTaskParams`]: the build id,
//! the flattened task body, the world and a free-text description.

use schemars::JsonSchema;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::marker::PhantomData;
use tracing::{info, instrument};

use super::common::{InWorld, check_build_id, payload_field, reported_world};
use crate::domains::minecraft::{
    BlockSet, BlockSpec, BoxFill, BuildRecord, BuildTask, DoorLine, LocationMatch, LocationQuery,
    MinecraftClient, SignPlacement, Staircase, TaskRecord, TorchPlacement, WindowPaneWall,
};
use crate::domains::tools::error::{ApiResultExt, ToolError, ToolResult, require_success};
use crate::domains::tools::format::{block_coordinate, field_text, value_text};
use crate::domains::tools::registry::{McTool, Validate};

// ============================================================================
// Deprecated catch-all
// ============================================================================

pub const DEPRECATED_ADD_BUILD_TASK: &str = "add_build_task";

pub const DEPRECATED_ADD_BUILD_TASK_DESCRIPTION: &str =
    "deprecated, use add_build_task_* tools for clearer inputs";

pub const DEPRECATED_ADD_BUILD_TASK_MESSAGE: &str = "❌ This tool is deprecated. Please use one of the following specific tools instead:
- add_build_task_block_set: For setting blocks
- add_build_task_block_fill: For filling areas
- add_build_task_prefab_door: For placing doors
- add_build_task_prefab_stairs: For placing stairs
- add_build_task_prefab_window: For placing windows
- add_build_task_prefab_torch: For placing torches
- add_build_task_prefab_sign: For placing signs";

// ============================================================================
// create_build
// ============================================================================

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateBuildParams {
    /// Build name
    pub name: String,
    /// Build description
    #[serde(default)]
    pub description: Option<String>,
    /// World name (optional, defaults to minecraft:overworld)
    #[serde(default)]
    pub world: Option<String>,
}

impl Validate for CreateBuildParams {
    fn validate(&self) -> ToolResult<()> {
        if self.name.trim().is_empty() {
            return Err(ToolError::validation("name must not be empty"));
        }
        Ok(())
    }
}

pub struct CreateBuildTool;

impl McTool for CreateBuildTool {
    const NAME: &'static str = "create_build";
    const DESCRIPTION: &'static str =
        "Create a new build with metadata for organizing building tasks";
    type Params = CreateBuildParams;

    #[instrument(skip_all, fields(name = %params.name))]
    async fn execute(client: &MinecraftClient, params: CreateBuildParams) -> ToolResult {
        const OP: &str = "create build";
        let world = params.world.as_deref();

        let reply = client
            .create_build(&params.name, params.description.as_deref(), world)
            .await
            .during(OP)?;
        let payload = require_success(reply, OP)?;
        let build: BuildRecord = payload_field(&payload, "build", OP)?;
        info!(build_id = %build.id, "Build created");

        Ok(format!(
            "✅ Successfully created build '{}'\nBuild ID: {}\nDescription: {}\nWorld: {}\nStatus: {}\nCreated: {}",
            build.name,
            build.id,
            build
                .description
                .as_deref()
                .filter(|d| !d.is_empty())
                .unwrap_or("No description"),
            build.world.unwrap_or_else(|| reported_world(&payload, world)),
            build.status.as_deref().unwrap_or("N/A"),
            build.created_at.as_deref().unwrap_or("N/A"),
        ))
    }
}

// ============================================================================
// Task tools
// ============================================================================

/// A task body that can be queued through its own `add_build_task_*` tool.
pub trait TaskBody: DeserializeOwned + JsonSchema + Validate + Send + 'static {
    const TOOL_NAME: &'static str;
    const TOOL_DESCRIPTION: &'static str;

    fn into_task(self) -> BuildTask;
}

impl TaskBody for BlockSet {
    const TOOL_NAME: &'static str = "add_build_task_block_set";
    const TOOL_DESCRIPTION: &'static str = "Add a BLOCK_SET task to a build queue for placing multiple blocks in a 3D array. For single blocks, use add_build_task_single_block_set instead.";

    fn into_task(self) -> BuildTask {
        BuildTask::BlockSet(self)
    }
}

impl TaskBody for BoxFill {
    const TOOL_NAME: &'static str = "add_build_task_block_fill";
    const TOOL_DESCRIPTION: &'static str = "Add a BLOCK_FILL task to a build queue";

    fn into_task(self) -> BuildTask {
        BuildTask::BlockFill(self)
    }
}

impl TaskBody for DoorLine {
    const TOOL_NAME: &'static str = "add_build_task_prefab_door";
    const TOOL_DESCRIPTION: &'static str = "Add a PREFAB_DOOR task to a build queue";

    fn into_task(self) -> BuildTask {
        BuildTask::PrefabDoor(self)
    }
}

impl TaskBody for Staircase {
    const TOOL_NAME: &'static str = "add_build_task_prefab_stairs";
    const TOOL_DESCRIPTION: &'static str = "Add a PREFAB_STAIRS task to a build queue";

    fn into_task(self) -> BuildTask {
        BuildTask::PrefabStairs(self)
    }
}

impl TaskBody for WindowPaneWall {
    const TOOL_NAME: &'static str = "add_build_task_prefab_window";
    const TOOL_DESCRIPTION: &'static str = "Add a PREFAB_WINDOW task to a build queue";

    fn into_task(self) -> BuildTask {
        BuildTask::PrefabWindow(self)
    }
}

impl TaskBody for TorchPlacement {
    const TOOL_NAME: &'static str = "add_build_task_prefab_torch";
    const TOOL_DESCRIPTION: &'static str = "Add a PREFAB_TORCH task to a build queue";

    fn into_task(self) -> BuildTask {
        BuildTask::PrefabTorch(self)
    }
}

impl TaskBody for SignPlacement {
    const TOOL_NAME: &'static str = "add_build_task_prefab_sign";
    const TOOL_DESCRIPTION: &'static str = "Add a PREFAB_SIGN task to a build queue";

    fn into_task(self) -> BuildTask {
        BuildTask::PrefabSign(self)
    }
}

/// Arguments shared by every `add_build_task_*` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BuildTaskParams<B> {
    /// Build UUID
    pub build_id: String,
    #[serde(flatten)]
    pub task: B,
    /// World name (optional, defaults to minecraft:overworld)
    #[serde(default)]
    pub world: Option<String>,
    /// Description of task (optional)
    #[serde(default)]
    pub description: String,
}

impl<B: Validate> Validate for BuildTaskParams<B> {
    fn validate(&self) -> ToolResult<()> {
        check_build_id(&self.build_id)?;
        self.task.validate()
    }
}

/// Queues one task of body type `B`.
pub struct AddBuildTaskTool<B>(PhantomData<B>);

impl<B: TaskBody> McTool for AddBuildTaskTool<B> {
    const NAME: &'static str = B::TOOL_NAME;
    const DESCRIPTION: &'static str = B::TOOL_DESCRIPTION;
    type Params = BuildTaskParams<B>;

    #[instrument(skip_all, fields(build_id = %params.build_id))]
    async fn execute(client: &MinecraftClient, params: BuildTaskParams<B>) -> ToolResult {
        let task = params.task.into_task();
        add_task(
            client,
            &params.build_id,
            &task,
            params.world.as_deref(),
            &params.description,
        )
        .await
    }
}

async fn add_task(
    client: &MinecraftClient,
    build_id: &str,
    task: &BuildTask,
    world: Option<&str>,
    description: &str,
) -> ToolResult {
    const OP: &str = "add build task";

    let reply = client
        .add_build_task(build_id, task, world, description)
        .await
        .during(OP)?;
    let payload = require_success(reply, OP)?;
    let record: TaskRecord = payload_field(&payload, "task", OP)?;

    Ok(format!(
        "✅ Successfully added {} task to build\nTask ID: {}\nBuild ID: {}\nTask Order: {}\nStatus: {}",
        task.task_type(),
        record.id.as_ref().map_or_else(|| "N/A".to_string(), value_text),
        build_id,
        record
            .task_order
            .map_or_else(|| "N/A".to_string(), |order| order.to_string()),
        record.status.as_deref().unwrap_or("N/A"),
    ))
}

// ============================================================================
// add_build_task_single_block_set
// ============================================================================

fn default_block_states() -> String {
    "{}".to_string()
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SingleBlockTaskParams {
    /// Build UUID
    pub build_id: String,
    /// X coordinate (east positive, west negative)
    pub x: i32,
    /// Y coordinate (elevation: -64 to 320, sea level at 63)
    pub y: i32,
    /// Z coordinate (south positive, north negative)
    pub z: i32,
    /// Block identifier (e.g., 'minecraft:stone', 'minecraft:oak_door')
    pub block_name: String,
    /// Optional JSON string of block state properties (e.g., '{"facing": "south", "open": "false"}'). Leave empty or omit for default block states.
    #[serde(default = "default_block_states")]
    pub block_states: String,
    /// World name (optional, defaults to minecraft:overworld)
    #[serde(default)]
    pub world: Option<String>,
    /// Description of task (optional)
    #[serde(default)]
    pub description: String,
}

impl SingleBlockTaskParams {
    /// Parse `block_states`; scalar values become strings, nulls are dropped.
    fn parsed_states(&self) -> ToolResult<Option<BTreeMap<String, String>>> {
        let raw = self.block_states.trim();
        if raw.is_empty() {
            return Ok(None);
        }

        let object = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(object)) => object,
            Ok(_) => {
                return Err(ToolError::validation("block_states must be a JSON object"));
            }
            Err(e) => {
                return Err(ToolError::validation(format!(
                    "Invalid JSON in block_states: {e}"
                )));
            }
        };

        let states: BTreeMap<String, String> = object
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.clone(), value_text(v)))
            .collect();
        Ok((!states.is_empty()).then_some(states))
    }
}

impl Validate for SingleBlockTaskParams {
    fn validate(&self) -> ToolResult<()> {
        check_build_id(&self.build_id)?;
        if self.block_name.trim().is_empty() {
            return Err(ToolError::validation("block_name must not be empty"));
        }
        self.parsed_states().map(|_| ())
    }
}

pub struct AddSingleBlockTaskTool;

impl McTool for AddSingleBlockTaskTool {
    const NAME: &'static str = "add_build_task_single_block_set";
    const DESCRIPTION: &'static str = "Add a task to place a single block with optional block states to a build queue. This is a simpler alternative to add_build_task_block_set when you only need to place one block.";
    type Params = SingleBlockTaskParams;

    #[instrument(skip_all, fields(build_id = %params.build_id, block = %params.block_name))]
    async fn execute(client: &MinecraftClient, params: SingleBlockTaskParams) -> ToolResult {
        let block = BlockSpec {
            block_name: params.block_name.clone(),
            block_states: params.parsed_states()?,
        };
        let task = BuildTask::BlockSet(BlockSet::single(params.x, params.y, params.z, block));

        add_task(
            client,
            &params.build_id,
            &task,
            params.world.as_deref(),
            &params.description,
        )
        .await
    }
}

// ============================================================================
// execute_build
// ============================================================================

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BuildIdParams {
    /// Build UUID
    pub build_id: String,
}

impl Validate for BuildIdParams {
    fn validate(&self) -> ToolResult<()> {
        check_build_id(&self.build_id)
    }
}

impl Validate for LocationQuery {}

/// Starts running every queued task.
///
/// The server accepts the build and works through the queue in the
/// background; `get_build_status` reports progress.
pub struct ExecuteBuildTool;

impl McTool for ExecuteBuildTool {
    const NAME: &'static str = "execute_build";
    const DESCRIPTION: &'static str = "Start executing all queued tasks in a build. Execution continues on the server; use get_build_status to follow progress";
    type Params = BuildIdParams;

    #[instrument(skip_all, fields(build_id = %params.build_id))]
    async fn execute(client: &MinecraftClient, params: BuildIdParams) -> ToolResult {
        const OP: &str = "execute build";

        let reply = client.execute_build(&params.build_id).await.during(OP)?;
        let payload = require_success(reply, OP)?;
        info!("Build execution started");

        Ok(format!(
            "✅ Started execution of build {}\nMessage: {}\nBuild status: {}",
            params.build_id,
            field_text(&payload, "message", "N/A"),
            field_text(&payload, "status", "N/A"),
        ))
    }
}

// ============================================================================
// query_builds_by_location
// ============================================================================

pub struct QueryBuildsByLocationTool;

impl McTool for QueryBuildsByLocationTool {
    const NAME: &'static str = "query_builds_by_location";
    const DESCRIPTION: &'static str = "Find builds that intersect with a specified area";
    type Params = InWorld<LocationQuery>;

    #[instrument(skip_all)]
    async fn execute(client: &MinecraftClient, params: InWorld<LocationQuery>) -> ToolResult {
        const OP: &str = "query builds by location";
        let query = &params.request;

        let reply = client
            .query_builds_by_location(query, params.world.as_deref())
            .await
            .during(OP)?;
        let payload = require_success(reply, OP)?;
        let matches: Vec<LocationMatch> = match payload.get("builds") {
            Some(_) => payload_field(&payload, "builds", OP)?,
            None => Vec::new(),
        };

        let area = format!(
            "{} to {}",
            block_coordinate(query.min_x, query.min_y, query.min_z),
            block_coordinate(query.max_x, query.max_y, query.max_z)
        );

        if matches.is_empty() {
            return Ok(format!("No builds found in area {area}"));
        }

        let mut text = format!("**Found {} builds in area {}:**\n\n", matches.len(), area);
        for LocationMatch {
            build,
            intersecting_tasks,
        } in &matches
        {
            let _ = writeln!(text, "**{}** (ID: {})", build.name, build.id);
            let _ = writeln!(text, "- Status: {}", build.status.as_deref().unwrap_or("N/A"));
            let _ = writeln!(
                text,
                "- Description: {}",
                build.description.as_deref().unwrap_or("N/A")
            );
            let _ = writeln!(text, "- Created: {}", build.created_at.as_deref().unwrap_or("N/A"));
            if let Some(completed) = &build.completed_at {
                let _ = writeln!(text, "- Completed: {completed}");
            }
            let _ = writeln!(text, "- Intersecting Tasks: {}", intersecting_tasks.len());
            let _ = writeln!(text, "- World: {}\n", build.world.as_deref().unwrap_or("N/A"));
        }
        Ok(text)
    }
}

// ============================================================================
// get_build_status
// ============================================================================

fn status_icon(status: Option<&str>) -> &'static str {
    match status {
        Some(s) if s.eq_ignore_ascii_case("completed") => "✅",
        Some(s) if s.eq_ignore_ascii_case("failed") => "❌",
        _ => "⏳",
    }
}

pub struct GetBuildStatusTool;

impl McTool for GetBuildStatusTool {
    const NAME: &'static str = "get_build_status";
    const DESCRIPTION: &'static str = "Get build details, status, and task information";
    type Params = BuildIdParams;

    #[instrument(skip_all, fields(build_id = %params.build_id))]
    async fn execute(client: &MinecraftClient, params: BuildIdParams) -> ToolResult {
        const OP: &str = "get build status";

        let reply = client.get_build_status(&params.build_id).await.during(OP)?;
        let payload = require_success(reply, OP)?;
        let build: BuildRecord = payload_field(&payload, "build", OP)?;
        let tasks: Vec<TaskRecord> = match payload.get("tasks") {
            Some(_) => payload_field(&payload, "tasks", OP)?,
            None => Vec::new(),
        };

        let mut text = format!("**Build Status: {}**\n\n**Build Details:**\n", build.name);
        let _ = writeln!(text, "- ID: {}", build.id);
        let _ = writeln!(text, "- Name: {}", build.name);
        let _ = writeln!(
            text,
            "- Description: {}",
            build.description.as_deref().unwrap_or("N/A")
        );
        let _ = writeln!(text, "- Status: {}", build.status.as_deref().unwrap_or("N/A"));
        let _ = writeln!(text, "- World: {}", build.world.as_deref().unwrap_or("N/A"));
        let _ = writeln!(text, "- Created: {}", build.created_at.as_deref().unwrap_or("N/A"));
        if let Some(completed) = &build.completed_at {
            let _ = writeln!(text, "- Completed: {completed}");
        }

        if tasks.is_empty() {
            text.push_str("\nNo tasks in queue\n");
            return Ok(text);
        }

        let _ = write!(text, "\n**Task Queue ({} tasks):**\n", tasks.len());
        for task in &tasks {
            let status = task.status.as_deref();
            let _ = writeln!(
                text,
                "{} Task {}: {} - {}",
                status_icon(status),
                task.task_order
                    .map_or_else(|| "?".to_string(), |order| order.to_string()),
                task.task_type.as_deref().unwrap_or("UNKNOWN"),
                status.unwrap_or("unknown"),
            );
            if let Some(error) = task.error_message.as_deref().filter(|e| !e.is_empty()) {
                let _ = writeln!(text, "   Error: {error}");
            }
        }
        Ok(text)
    }
}
