//! Prefab tools: structure uploads and parametric doors, stairs, windows,
//! torches and signs.

use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use super::common::{InWorld, reported_world};
use crate::domains::minecraft::{
    DoorLine, MinecraftClient, SignPlacement, Staircase, StructurePlacement, StructureRotation,
    TorchPlacement, WindowPaneWall,
};
use crate::domains::tools::error::{ApiResultExt, ToolError, ToolResult, require_success};
use crate::domains::tools::format::{block_coordinate, coordinate, field_text};
use crate::domains::tools::registry::{McTool, Validate};

/// Lines a sign face can hold.
const SIGN_LINES: usize = 4;

/// Highest standing-sign rotation step.
const MAX_SIGN_ROTATION: u8 = 15;

impl Validate for DoorLine {
    fn validate(&self) -> ToolResult<()> {
        if self.width == 0 {
            return Err(ToolError::validation("width must be at least 1"));
        }
        Ok(())
    }
}

impl Validate for Staircase {}

impl Validate for WindowPaneWall {
    fn validate(&self) -> ToolResult<()> {
        if self.height == 0 {
            return Err(ToolError::validation("height must be at least 1"));
        }
        Ok(())
    }
}

impl Validate for TorchPlacement {}

impl Validate for SignPlacement {
    fn validate(&self) -> ToolResult<()> {
        for (side, lines) in [("front_lines", &self.front_lines), ("back_lines", &self.back_lines)] {
            let count = lines.as_ref().map_or(0, Vec::len);
            if count > SIGN_LINES {
                return Err(ToolError::validation(format!(
                    "{side} holds at most {SIGN_LINES} lines, got {count}"
                )));
            }
        }
        if self.rotation > MAX_SIGN_ROTATION {
            return Err(ToolError::validation(format!(
                "rotation must be between 0 and {MAX_SIGN_ROTATION}, got {}",
                self.rotation
            )));
        }
        Ok(())
    }
}

// ============================================================================
// place_nbt_structure
// ============================================================================

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct NbtStructureParams {
    /// Base64-encoded NBT structure file data
    pub nbt_file_data: String,
    /// Original filename of the NBT structure (for reference)
    pub filename: String,
    /// X coordinate to place structure (east positive, west negative)
    pub x: i32,
    /// Y coordinate to place structure (elevation: -64 to 320, sea level at 63)
    pub y: i32,
    /// Z coordinate to place structure (south positive, north negative)
    pub z: i32,
    /// Structure rotation (optional, defaults to NONE)
    #[serde(default)]
    pub rotation: StructureRotation,
    /// Whether to include entities from the NBT structure (default: true)
    #[serde(default = "default_true")]
    pub include_entities: bool,
    /// Whether to replace existing blocks (default: true)
    #[serde(default = "default_true")]
    pub replace_blocks: bool,
    /// World name (optional, defaults to minecraft:overworld)
    #[serde(default)]
    pub world: Option<String>,
}

impl Validate for NbtStructureParams {
    fn validate(&self) -> ToolResult<()> {
        if self.nbt_file_data.trim().is_empty() {
            return Err(ToolError::validation("nbt_file_data must not be empty"));
        }
        Ok(())
    }
}

/// Uploads a structure file; decoding happens before anything is sent.
pub struct PlaceNbtStructureTool;

impl McTool for PlaceNbtStructureTool {
    const NAME: &'static str = "place_nbt_structure";
    const DESCRIPTION: &'static str =
        "Place an NBT structure file at specified coordinates in the world";
    type Params = NbtStructureParams;

    #[instrument(skip_all, fields(filename = %params.filename))]
    async fn execute(client: &MinecraftClient, params: NbtStructureParams) -> ToolResult {
        const OP: &str = "place NBT structure";
        let world = params.world.as_deref();

        let placement = StructurePlacement {
            data: &params.nbt_file_data,
            filename: &params.filename,
            x: params.x,
            y: params.y,
            z: params.z,
            rotation: params.rotation,
            include_entities: params.include_entities,
            replace_blocks: params.replace_blocks,
        };
        let reply = client.place_nbt_structure(&placement, world).await.during(OP)?;
        let payload = require_success(reply, OP)?;
        info!("Placed structure {}", params.filename);

        Ok(format!(
            "✅ Successfully placed NBT structure at {}\nFilename: {}\nRotation: {}\nWorld: {}",
            block_coordinate(params.x, params.y, params.z),
            params.filename,
            params.rotation,
            reported_world(&payload, world)
        ))
    }
}

// ============================================================================
// place_door_line
// ============================================================================

pub struct PlaceDoorLineTool;

impl McTool for PlaceDoorLineTool {
    const NAME: &'static str = "place_door_line";
    const DESCRIPTION: &'static str = "Place a line of doors with specified width, facing direction, and properties. Can do single doors.";
    type Params = InWorld<DoorLine>;

    #[instrument(skip_all)]
    async fn execute(client: &MinecraftClient, params: InWorld<DoorLine>) -> ToolResult {
        const OP: &str = "place door line";
        let world = params.world.as_deref();
        let door = &params.request;

        let reply = client.place_door_line(door, world).await.during(OP)?;
        let payload = require_success(reply, OP)?;

        Ok(format!(
            "✅ Successfully placed {} door(s) at {} in world {}",
            field_text(&payload, "doors_placed", &door.width.to_string()),
            block_coordinate(door.start_x, door.start_y, door.start_z),
            reported_world(&payload, world)
        ))
    }
}

// ============================================================================
// place_stairs
// ============================================================================

pub struct PlaceStairsTool;

impl McTool for PlaceStairsTool {
    const NAME: &'static str = "place_stairs";
    const DESCRIPTION: &'static str =
        "Build a wide staircase between two points with automatically calculated stair block facing";
    type Params = InWorld<Staircase>;

    #[instrument(skip_all)]
    async fn execute(client: &MinecraftClient, params: InWorld<Staircase>) -> ToolResult {
        const OP: &str = "place stairs";
        let world = params.world.as_deref();
        let stairs = &params.request;

        let reply = client.place_stairs(stairs, world).await.during(OP)?;
        let payload = require_success(reply, OP)?;

        Ok(format!(
            "✅ Successfully built staircase with {} blocks from {} to {} in world {}",
            field_text(&payload, "blocks_placed", "unknown"),
            block_coordinate(stairs.start_x, stairs.start_y, stairs.start_z),
            block_coordinate(stairs.end_x, stairs.end_y, stairs.end_z),
            reported_world(&payload, world)
        ))
    }
}

// ============================================================================
// place_window_pane_wall
// ============================================================================

pub struct PlaceWindowPaneWallTool;

impl McTool for PlaceWindowPaneWallTool {
    const NAME: &'static str = "place_window_pane_wall";
    const DESCRIPTION: &'static str =
        "Create a vertical wall of window panes between two points with automatic connection states";
    type Params = InWorld<WindowPaneWall>;

    #[instrument(skip_all)]
    async fn execute(client: &MinecraftClient, params: InWorld<WindowPaneWall>) -> ToolResult {
        const OP: &str = "place window pane wall";
        let world = params.world.as_deref();
        let wall = &params.request;

        let reply = client.place_window_pane_wall(wall, world).await.during(OP)?;
        let payload = require_success(reply, OP)?;

        let placed = match payload.get("blocks_placed") {
            Some(_) => field_text(&payload, "blocks_placed", "unknown"),
            None => field_text(&payload, "panes_placed", "unknown"),
        };
        Ok(format!(
            "✅ Successfully placed {} pane(s) from {} to {} in world {}",
            placed,
            block_coordinate(wall.start_x, wall.start_y, wall.start_z),
            block_coordinate(wall.end_x, wall.top_y(), wall.end_z),
            reported_world(&payload, world)
        ))
    }
}

// ============================================================================
// place_torch
// ============================================================================

pub struct PlaceTorchTool;

impl McTool for PlaceTorchTool {
    const NAME: &'static str = "place_torch";
    const DESCRIPTION: &'static str = "Place a single torch (ground or wall-mounted) at specified coordinates. For wall torches, facing can be auto-detected or manually specified. Note, wall torches are in the block next to the wall they are attachd to.";
    type Params = InWorld<TorchPlacement>;

    #[instrument(skip_all)]
    async fn execute(client: &MinecraftClient, params: InWorld<TorchPlacement>) -> ToolResult {
        const OP: &str = "place torch";
        let world = params.world.as_deref();
        let torch = &params.request;

        let reply = client.place_torch(torch, world).await.during(OP)?;
        let payload = require_success(reply, OP)?;

        let mut text = format!(
            "✅ Successfully placed {} at {} in world {}",
            field_text(&payload, "block_type", &torch.block_type),
            coordinate(torch.x.into(), torch.y.into(), torch.z.into()),
            reported_world(&payload, world)
        );
        if let Some(facing) = payload.get("facing").and_then(|v| v.as_str()) {
            text.push_str(&format!("\nFacing: {facing}"));
        }
        Ok(text)
    }
}

// ============================================================================
// place_sign
// ============================================================================

pub struct PlaceSignTool;

impl McTool for PlaceSignTool {
    const NAME: &'static str = "place_sign";
    const DESCRIPTION: &'static str = "Place a single sign (wall or standing) with custom text on front and back. Supports glowing text.";
    type Params = InWorld<SignPlacement>;

    #[instrument(skip_all)]
    async fn execute(client: &MinecraftClient, params: InWorld<SignPlacement>) -> ToolResult {
        const OP: &str = "place sign";
        let world = params.world.as_deref();
        let sign = &params.request;

        let reply = client.place_sign(sign, world).await.during(OP)?;
        let payload = require_success(reply, OP)?;

        let mut text = format!(
            "✅ Successfully placed {} at {} in world {}",
            field_text(&payload, "block_type", &sign.block_type),
            coordinate(sign.x.into(), sign.y.into(), sign.z.into()),
            reported_world(&payload, world)
        );
        if let Some(lines) = sign.front_lines.as_ref().filter(|l| !l.is_empty()) {
            text.push_str(&format!("\nText: {}", lines.join(" / ")));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::minecraft::testing::RecordingBackend;
    use crate::domains::tools::test_support::{call, text_of};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_nbt_upload_success() {
        let backend = Arc::new(RecordingBackend::new().respond_json(json!({"success": true})));

        let result = call(
            &backend,
            "place_nbt_structure",
            json!({
                "nbt_file_data": "aGVsbG8=",
                "filename": "tower.nbt",
                "x": 100, "y": 64, "z": -20,
                "rotation": "CLOCKWISE_180"
            }),
        )
        .await;

        assert_eq!(
            text_of(&result),
            "✅ Successfully placed NBT structure at (100, 64, -20)\nFilename: tower.nbt\nRotation: CLOCKWISE_180\nWorld: minecraft:overworld"
        );
        let upload = backend.requests()[0].upload.clone().unwrap();
        assert!(upload.fields.contains(&("include_entities", "true".to_string())));
        assert!(upload.fields.contains(&("replace_blocks", "true".to_string())));
    }

    #[tokio::test]
    async fn test_nbt_bad_base64_never_reaches_server() {
        let backend = Arc::new(RecordingBackend::new());

        let result = call(
            &backend,
            "place_nbt_structure",
            json!({"nbt_file_data": "not base64!", "filename": "x.nbt", "x": 0, "y": 0, "z": 0}),
        )
        .await;

        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result).starts_with("❌ Invalid base64 data"));
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn test_door_line_text() {
        let backend = Arc::new(RecordingBackend::new().respond_json(json!({"success": true})));

        let result = call(
            &backend,
            "place_door_line",
            json!({"start_x": 5, "start_y": 64, "start_z": 5, "width": 2, "facing": "south", "double_doors": true}),
        )
        .await;

        assert_eq!(
            text_of(&result),
            "✅ Successfully placed 2 door(s) at (5, 64, 5) in world minecraft:overworld"
        );
        let body = backend.requests()[0].body.clone().unwrap();
        assert_eq!(body["facing"], "south");
        assert_eq!(body["double_doors"], true);
        assert_eq!(body["block_type"], "minecraft:oak_door");
    }

    #[tokio::test]
    async fn test_zero_width_door_rejected() {
        let backend = Arc::new(RecordingBackend::new());

        let result = call(
            &backend,
            "place_door_line",
            json!({"start_x": 0, "start_y": 64, "start_z": 0, "width": 0, "facing": "north"}),
        )
        .await;

        assert_eq!(result.is_error, Some(true));
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn test_stairs_count_unknown_when_missing() {
        let backend = Arc::new(RecordingBackend::new().respond_json(json!({"success": true})));

        let result = call(
            &backend,
            "place_stairs",
            json!({
                "start_x": 0, "start_y": 64, "start_z": 0,
                "end_x": 0, "end_y": 70, "end_z": 6,
                "staircase_direction": "south"
            }),
        )
        .await;

        assert!(text_of(&result).starts_with(
            "✅ Successfully built staircase with unknown blocks from (0, 64, 0) to (0, 70, 6)"
        ));
    }

    #[tokio::test]
    async fn test_window_wall_reports_top_row() {
        let backend = Arc::new(
            RecordingBackend::new().respond_json(json!({"success": true, "panes_placed": 12})),
        );

        let result = call(
            &backend,
            "place_window_pane_wall",
            json!({"start_x": 0, "start_y": 65, "start_z": 0, "end_x": 3, "end_z": 0, "height": 3}),
        )
        .await;

        assert_eq!(
            text_of(&result),
            "✅ Successfully placed 12 pane(s) from (0, 65, 0) to (3, 67, 0) in world minecraft:overworld"
        );
    }

    #[tokio::test]
    async fn test_torch_reports_facing() {
        let backend = Arc::new(RecordingBackend::new().respond_json(json!({
            "success": true,
            "block_type": "minecraft:wall_torch",
            "facing": "east"
        })));

        let result = call(&backend, "place_torch", json!({"x": 3, "y": 65, "z": -7})).await;

        let text = text_of(&result);
        assert!(text.starts_with("✅ Successfully placed minecraft:wall_torch at (3.0, 65.0, -7.0)"));
        assert!(text.ends_with("\nFacing: east"));
        assert!(backend.requests()[0].body.as_ref().unwrap().get("facing").is_none());
    }

    #[tokio::test]
    async fn test_sign_text_line() {
        let backend = Arc::new(RecordingBackend::new().respond_json(json!({"success": true})));

        let result = call(
            &backend,
            "place_sign",
            json!({"x": 1, "y": 70, "z": 1, "front_lines": ["Welcome", "Home"], "glowing": true}),
        )
        .await;

        let text = text_of(&result);
        assert!(text.contains("✅ Successfully placed minecraft:oak_wall_sign at (1.0, 70.0, 1.0)"));
        assert!(text.ends_with("\nText: Welcome / Home"));
        assert_eq!(backend.requests()[0].body.as_ref().unwrap()["glowing"], true);
    }

    #[test]
    fn test_sign_limits() {
        let mut sign: SignPlacement = serde_json::from_value(json!({"x": 0, "y": 0, "z": 0})).unwrap();
        assert!(sign.validate().is_ok());

        sign.front_lines = Some(vec!["a".into(); 5]);
        assert!(sign.validate().is_err());

        sign.front_lines = None;
        sign.rotation = 16;
        assert!(sign.validate().is_err());
    }
}
