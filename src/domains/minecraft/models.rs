//! Wire models for the Minecraft REST API.
//!
//! Request bodies double as tool parameter fragments: tool params flatten
//! them, so the doc comments here surface as field descriptions in the
//! published JSON schemas. All fields use snake_case on the wire.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The world every request targets unless the caller names another.
pub const DEFAULT_WORLD: &str = "minecraft:overworld";

// ============================================================================
// Enumerations
// ============================================================================

/// Horizontal facing used by prefabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    North,
    South,
    East,
    West,
}

impl Facing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Door hinge side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Hinge {
    #[default]
    Left,
    Right,
}

/// Heightmap flavour computed by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HeightmapType {
    #[default]
    WorldSurface,
    MotionBlocking,
    MotionBlockingNoLeaves,
    OceanFloor,
}

impl HeightmapType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WorldSurface => "WORLD_SURFACE",
            Self::MotionBlocking => "MOTION_BLOCKING",
            Self::MotionBlockingNoLeaves => "MOTION_BLOCKING_NO_LEAVES",
            Self::OceanFloor => "OCEAN_FLOOR",
        }
    }
}

/// Rotation applied to a placed structure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum StructureRotation {
    #[default]
    #[serde(rename = "NONE")]
    NoRotation,
    #[serde(rename = "CLOCKWISE_90")]
    Clockwise90,
    #[serde(rename = "CLOCKWISE_180")]
    Clockwise180,
    #[serde(rename = "COUNTERCLOCKWISE_90")]
    Counterclockwise90,
}

impl StructureRotation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoRotation => "NONE",
            Self::Clockwise90 => "CLOCKWISE_90",
            Self::Clockwise180 => "CLOCKWISE_180",
            Self::Counterclockwise90 => "COUNTERCLOCKWISE_90",
        }
    }
}

impl fmt::Display for StructureRotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Block requests
// ============================================================================

/// One block in a 3D block grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BlockSpec {
    /// Block identifier (e.g., 'minecraft:oak_door')
    #[serde(alias = "blockName")]
    pub block_name: String,

    /// Optional block state properties (e.g., {'facing': 'north', 'open': 'false'})
    #[serde(default, alias = "blockStates", skip_serializing_if = "Option::is_none")]
    pub block_states: Option<BTreeMap<String, String>>,
}

/// A 3D array of blocks indexed `[x][y][z]`; `None` leaves a block unchanged.
pub type BlockGrid = Vec<Vec<Vec<Option<BlockSpec>>>>;

/// Body of a block set request or `BLOCK_SET` task.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BlockSet {
    /// Starting X coordinate (east positive, west negative)
    pub start_x: i32,
    /// Starting Y coordinate (elevation: -64 to 320, sea level at 63)
    pub start_y: i32,
    /// Starting Z coordinate (south positive, north negative)
    pub start_z: i32,
    /// 3D array of block objects (use null for no change). Each block object has block_name and optional block_states.
    pub blocks: BlockGrid,
}

impl BlockSet {
    /// A grid holding exactly one block.
    pub fn single(x: i32, y: i32, z: i32, block: BlockSpec) -> Self {
        Self {
            start_x: x,
            start_y: y,
            start_z: z,
            blocks: vec![vec![vec![Some(block)]]],
        }
    }
}

/// Body of a chunk read request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChunkQuery {
    /// Starting X coordinate (east positive, west negative)
    pub start_x: i32,
    /// Starting Y coordinate (elevation: -64 to 320, sea level at 63)
    pub start_y: i32,
    /// Starting Z coordinate (south positive, north negative)
    pub start_z: i32,
    /// Size in X dimension (max 64)
    #[schemars(range(min = 1, max = 64))]
    pub size_x: u32,
    /// Size in Y dimension (max 64)
    #[schemars(range(min = 1, max = 64))]
    pub size_y: u32,
    /// Size in Z dimension (max 64)
    #[schemars(range(min = 1, max = 64))]
    pub size_z: u32,
}

/// Body of a fill request or `BLOCK_FILL` task.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BoxFill {
    /// First corner X coordinate (east positive, west negative)
    pub x1: i32,
    /// First corner Y coordinate (elevation: -64 to 320, sea level at 63)
    pub y1: i32,
    /// First corner Z coordinate (south positive, north negative)
    pub z1: i32,
    /// Second corner X coordinate (east positive, west negative)
    pub x2: i32,
    /// Second corner Y coordinate (elevation: -64 to 320, sea level at 63)
    pub y2: i32,
    /// Second corner Z coordinate (south positive, north negative)
    pub z2: i32,
    /// Block type identifier (e.g., 'minecraft:stone', 'minecraft:oak_wood'). 'minecraft:air' can be used to clear an area.
    pub block_type: String,
}

/// Body of a heightmap request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HeightmapQuery {
    /// First corner X coordinate (east positive, west negative)
    pub x1: i32,
    /// First corner Z coordinate (south positive, north negative)
    pub z1: i32,
    /// Second corner X coordinate (east positive, west negative)
    pub x2: i32,
    /// Second corner Z coordinate (south positive, north negative)
    pub z2: i32,
    /// Type of heightmap to generate
    #[serde(default)]
    pub heightmap_type: HeightmapType,
}

// ============================================================================
// Prefab requests
// ============================================================================

fn default_door_block() -> String {
    "minecraft:oak_door".to_string()
}

fn default_width() -> u32 {
    1
}

fn default_stairs_block() -> String {
    "minecraft:stone".to_string()
}

fn default_stair_type() -> String {
    "minecraft:stone_stairs".to_string()
}

fn default_pane_block() -> String {
    "minecraft:glass_pane".to_string()
}

fn default_torch_block() -> String {
    "minecraft:wall_torch".to_string()
}

fn default_sign_block() -> String {
    "minecraft:oak_wall_sign".to_string()
}

/// Prefab block types are advertised as required so callers always choose a
/// material; deserialization still falls back to the defaults above.
fn require_block_type(schema: &mut schemars::Schema) {
    require_properties(schema, &["block_type"]);
}

fn require_stair_blocks(schema: &mut schemars::Schema) {
    require_properties(schema, &["block_type", "stair_type"]);
}

fn require_properties(schema: &mut schemars::Schema, names: &[&str]) {
    let required = schema
        .ensure_object()
        .entry("required")
        .or_insert_with(|| serde_json::Value::Array(Vec::new()));
    if let serde_json::Value::Array(required) = required {
        for name in names {
            if !required.iter().any(|v| v.as_str() == Some(*name)) {
                required.push(serde_json::Value::from(*name));
            }
        }
    }
}

/// A row of doors.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(transform = require_block_type)]
pub struct DoorLine {
    /// Starting X coordinate (east positive, west negative)
    pub start_x: i32,
    /// Starting Y coordinate (elevation: -64 to 320, sea level at 63)
    pub start_y: i32,
    /// Starting Z coordinate (south positive, north negative)
    pub start_z: i32,
    /// Number of doors to place in a row (default: 1)
    #[serde(default = "default_width")]
    #[schemars(range(min = 1))]
    pub width: u32,
    /// Direction the doors should face
    pub facing: Facing,
    /// Door block type (e.g., 'minecraft:oak_door', 'minecraft:iron_door')
    #[serde(default = "default_door_block")]
    pub block_type: String,
    /// Door hinge position
    #[serde(default)]
    pub hinge: Hinge,
    /// Whether to alternate door hinges so they pair up to double doors
    #[serde(default)]
    pub double_doors: bool,
    /// Whether doors start in open position
    #[serde(default)]
    pub open: bool,
}

/// A wide staircase between two points.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(transform = require_stair_blocks)]
pub struct Staircase {
    /// Starting X coordinate (east positive, west negative)
    pub start_x: i32,
    /// Starting Y coordinate (elevation: -64 to 320, sea level at 63)
    pub start_y: i32,
    /// Starting Z coordinate (south positive, north negative)
    pub start_z: i32,
    /// Ending X coordinate (east positive, west negative)
    pub end_x: i32,
    /// Ending Y coordinate (elevation: -64 to 320, sea level at 63)
    pub end_y: i32,
    /// Ending Z coordinate (south positive, north negative)
    pub end_z: i32,
    /// Base block type for solid sections (e.g., 'minecraft:oak_planks')
    #[serde(default = "default_stairs_block")]
    pub block_type: String,
    /// Stair block type (e.g., 'minecraft:oak_stairs')
    #[serde(default = "default_stair_type")]
    pub stair_type: String,
    /// Orientation of the staircase structure (determines width calculation)
    pub staircase_direction: Facing,
    /// Whether to fill underneath the staircase for support
    #[serde(default)]
    pub fill_support: bool,
}

/// A vertical wall of window panes.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(transform = require_block_type)]
pub struct WindowPaneWall {
    /// Starting X coordinate (east positive, west negative)
    pub start_x: i32,
    /// Starting Y coordinate (elevation: -64 to 320, sea level at 63)
    pub start_y: i32,
    /// Starting Z coordinate (south positive, north negative)
    pub start_z: i32,
    /// Ending X coordinate (east positive, west negative)
    pub end_x: i32,
    /// Ending Z coordinate (south positive, north negative)
    pub end_z: i32,
    /// Height of the window pane wall in blocks
    #[schemars(range(min = 1))]
    pub height: u32,
    /// Pane block type (e.g., 'minecraft:glass_pane', 'minecraft:iron_bars')
    #[serde(default = "default_pane_block")]
    pub block_type: String,
    /// Whether the panes should be waterlogged
    #[serde(default)]
    pub waterlogged: bool,
}

impl WindowPaneWall {
    /// Y coordinate of the top row of panes.
    pub fn top_y(&self) -> i64 {
        i64::from(self.start_y) + i64::from(self.height) - 1
    }
}

/// A single ground or wall torch.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(transform = require_block_type)]
pub struct TorchPlacement {
    /// X coordinate (east positive, west negative)
    pub x: i32,
    /// Y coordinate (elevation: -64 to 320, sea level at 63)
    pub y: i32,
    /// Z coordinate (south positive, north negative)
    pub z: i32,
    /// Torch type (e.g., 'minecraft:torch' for ground, 'minecraft:wall_torch' for wall-mounted, 'minecraft:soul_wall_torch', 'minecraft:redstone_wall_torch')
    #[serde(default = "default_torch_block")]
    pub block_type: String,
    /// For wall torches: direction the torch faces OUT from the wall (north/south/east/west). If not provided, auto-detects based on adjacent solid blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facing: Option<Facing>,
}

/// A single wall or standing sign.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(transform = require_block_type)]
pub struct SignPlacement {
    /// X coordinate (east positive, west negative)
    pub x: i32,
    /// Y coordinate (elevation: -64 to 320, sea level at 63)
    pub y: i32,
    /// Z coordinate (south positive, north negative)
    pub z: i32,
    /// Sign type (e.g., 'minecraft:oak_wall_sign' for wall, 'minecraft:oak_sign' for standing, 'minecraft:birch_wall_sign', etc.)
    #[serde(default = "default_sign_block")]
    pub block_type: String,
    /// Array of 0-4 text lines for the front of the sign
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(length(max = 4))]
    pub front_lines: Option<Vec<String>>,
    /// Array of 0-4 text lines for the back of the sign (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(length(max = 4))]
    pub back_lines: Option<Vec<String>>,
    /// For wall signs: direction the sign faces OUT from the wall (north/south/east/west). If not provided, auto-detects based on adjacent solid blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facing: Option<Facing>,
    /// For standing signs: rotation angle 0-15 (0=south, 4=west, 8=north, 12=east). Default: 0
    #[serde(default)]
    #[schemars(range(min = 0, max = 15))]
    pub rotation: u8,
    /// Whether the sign text should glow (visible in darkness)
    #[serde(default)]
    pub glowing: bool,
}

// ============================================================================
// Build tasks
// ============================================================================

/// Discriminator of a queued build task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    BlockSet,
    BlockFill,
    PrefabDoor,
    PrefabStairs,
    PrefabWindow,
    PrefabTorch,
    PrefabSign,
}

impl TaskType {
    pub const ALL: [TaskType; 7] = [
        Self::BlockSet,
        Self::BlockFill,
        Self::PrefabDoor,
        Self::PrefabStairs,
        Self::PrefabWindow,
        Self::PrefabTorch,
        Self::PrefabSign,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BlockSet => "BLOCK_SET",
            Self::BlockFill => "BLOCK_FILL",
            Self::PrefabDoor => "PREFAB_DOOR",
            Self::PrefabStairs => "PREFAB_STAIRS",
            Self::PrefabWindow => "PREFAB_WINDOW",
            Self::PrefabTorch => "PREFAB_TORCH",
            Self::PrefabSign => "PREFAB_SIGN",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task body tagged with its type.
///
/// Serializes as `{"task_type": "...", "task_data": {...}}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "task_type", content = "task_data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildTask {
    BlockSet(BlockSet),
    BlockFill(BoxFill),
    PrefabDoor(DoorLine),
    PrefabStairs(Staircase),
    PrefabWindow(WindowPaneWall),
    PrefabTorch(TorchPlacement),
    PrefabSign(SignPlacement),
}

impl BuildTask {
    pub fn task_type(&self) -> TaskType {
        match self {
            Self::BlockSet(_) => TaskType::BlockSet,
            Self::BlockFill(_) => TaskType::BlockFill,
            Self::PrefabDoor(_) => TaskType::PrefabDoor,
            Self::PrefabStairs(_) => TaskType::PrefabStairs,
            Self::PrefabWindow(_) => TaskType::PrefabWindow,
            Self::PrefabTorch(_) => TaskType::PrefabTorch,
            Self::PrefabSign(_) => TaskType::PrefabSign,
        }
    }
}

/// Axis-aligned box used to look up builds.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LocationQuery {
    /// Minimum X coordinate (east positive, west negative)
    pub min_x: i32,
    /// Minimum Y coordinate (elevation: -64 to 320, sea level at 63)
    pub min_y: i32,
    /// Minimum Z coordinate (south positive, north negative)
    pub min_z: i32,
    /// Maximum X coordinate (east positive, west negative)
    pub max_x: i32,
    /// Maximum Y coordinate (elevation: -64 to 320, sea level at 63)
    pub max_y: i32,
    /// Maximum Z coordinate (south positive, north negative)
    pub max_z: i32,
    /// Whether to include builds that are still in progress (default: false)
    #[serde(default)]
    pub include_in_progress: bool,
}

// ============================================================================
// Responses
// ============================================================================

/// A 3D position as reported by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

/// Yaw and pitch in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    #[serde(default)]
    pub yaw: f64,
    #[serde(default)]
    pub pitch: f64,
}

/// An online player.
#[derive(Debug, Clone, Deserialize)]
pub struct Player {
    pub name: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub rotation: Rotation,
}

/// An entry of the block or entity type registry.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryEntry {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// A horizontal X/Z point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct PlanePoint {
    #[serde(default)]
    pub x: i64,
    #[serde(default)]
    pub z: i64,
}

/// Bounds of a heightmap area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct AreaBounds {
    pub min: PlanePoint,
    pub max: PlanePoint,
}

/// Lowest and highest surface values.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct HeightRange {
    pub min: i64,
    pub max: i64,
}

/// Heightmap response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HeightmapReport {
    #[serde(default, alias = "heightmap")]
    pub heights: Vec<Vec<i64>>,
    #[serde(default)]
    pub area_bounds: Option<AreaBounds>,
    #[serde(default)]
    pub size: Option<PlanePoint>,
    #[serde(default)]
    pub height_range: Option<HeightRange>,
    #[serde(default)]
    pub heightmap_type: Option<String>,
    #[serde(default)]
    pub world: Option<String>,
}

/// Summary statistics over a height grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightStats {
    pub min: i64,
    pub max: i64,
    pub average: f64,
    pub samples: usize,
}

impl HeightmapReport {
    /// Min/max/average over every cell; `None` for an empty grid.
    ///
    /// A server-provided `height_range` wins over the computed extremes.
    pub fn stats(&self) -> Option<HeightStats> {
        let mut cells = self.heights.iter().flatten().copied();
        let first = cells.next()?;

        let (mut min, mut max, mut sum, mut samples) = (first, first, first as f64, 1usize);
        for h in cells {
            min = min.min(h);
            max = max.max(h);
            sum += h as f64;
            samples += 1;
        }

        if let Some(range) = self.height_range {
            min = range.min;
            max = range.max;
        }

        Some(HeightStats {
            min,
            max,
            average: sum / samples as f64,
            samples,
        })
    }
}

/// A build record.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub world: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default, alias = "completedAt")]
    pub completed_at: Option<String>,
}

/// A queued task record.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskRecord {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default, alias = "taskOrder")]
    pub task_order: Option<i64>,
    #[serde(default, alias = "taskType")]
    pub task_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "errorMessage")]
    pub error_message: Option<String>,
}

/// A build that intersects a queried area.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationMatch {
    pub build: BuildRecord,
    #[serde(default, alias = "intersectingTasks")]
    pub intersecting_tasks: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_task_serializes_adjacently_tagged() {
        let task = BuildTask::BlockFill(BoxFill {
            x1: 0,
            y1: 64,
            z1: 0,
            x2: 2,
            y2: 66,
            z2: 2,
            block_type: "minecraft:stone".into(),
        });
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["task_type"], "BLOCK_FILL");
        assert_eq!(value["task_data"]["block_type"], "minecraft:stone");
        assert_eq!(value["task_data"]["y2"], 66);
    }

    #[test]
    fn test_task_type_tags_match_serialization() {
        for task_type in TaskType::ALL {
            let value = serde_json::to_value(task_type).unwrap();
            assert_eq!(value, json!(task_type.as_str()));
        }
    }

    #[test]
    fn test_block_spec_accepts_legacy_camel_case() {
        let spec: BlockSpec =
            serde_json::from_value(json!({"blockName": "minecraft:oak_door", "blockStates": {"half": "lower"}}))
                .unwrap();
        assert_eq!(spec.block_name, "minecraft:oak_door");
        let wire = serde_json::to_value(&spec).unwrap();
        assert_eq!(wire["block_name"], "minecraft:oak_door");
        assert_eq!(wire["block_states"]["half"], "lower");
    }

    #[test]
    fn test_prefab_defaults() {
        let door: DoorLine =
            serde_json::from_value(json!({"start_x": 1, "start_y": 64, "start_z": 1, "facing": "north"}))
                .unwrap();
        assert_eq!(door.width, 1);
        assert_eq!(door.block_type, "minecraft:oak_door");
        assert_eq!(door.hinge, Hinge::Left);
        assert!(!door.open);

        let sign: SignPlacement =
            serde_json::from_value(json!({"x": 0, "y": 70, "z": 0})).unwrap();
        assert_eq!(sign.block_type, "minecraft:oak_wall_sign");
        assert_eq!(sign.rotation, 0);
        let wire = serde_json::to_value(&sign).unwrap();
        assert!(wire.get("front_lines").is_none());
        assert!(wire.get("facing").is_none());
    }

    #[test]
    fn test_rotation_wire_names() {
        let r: StructureRotation = serde_json::from_value(json!("COUNTERCLOCKWISE_90")).unwrap();
        assert_eq!(r, StructureRotation::Counterclockwise90);
        assert_eq!(StructureRotation::default().as_str(), "NONE");
    }

    #[test]
    fn test_heightmap_stats() {
        let report: HeightmapReport =
            serde_json::from_value(json!({"heights": [[64, 65], [70, 61]]})).unwrap();
        let stats = report.stats().unwrap();
        assert_eq!(stats.min, 61);
        assert_eq!(stats.max, 70);
        assert_eq!(stats.samples, 4);
        assert!((stats.average - 65.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_heightmap_legacy_field_and_range_override() {
        let report: HeightmapReport = serde_json::from_value(json!({
            "heightmap": [[10, 20]],
            "height_range": {"min": 5, "max": 25}
        }))
        .unwrap();
        let stats = report.stats().unwrap();
        assert_eq!((stats.min, stats.max), (5, 25));
        assert!((stats.average - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_heightmap_empty_grid() {
        assert!(HeightmapReport::default().stats().is_none());
    }
}
