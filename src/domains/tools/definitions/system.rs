//! System tools: teleporting, the liveness probe and the coordinate guide.

use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use super::common::NoParams;
use crate::domains::minecraft::{MinecraftClient, PROBE_OK_BODY, Teleport, resolve_world};
use crate::domains::tools::error::{ApiResultExt, ToolError, ToolResult, require_success};
use crate::domains::tools::format::coordinate;
use crate::domains::tools::registry::{McTool, Validate};

/// Coordinate and orientation guide, served as a tool and as a resource.
pub const COORDINATE_CONVENTIONS: &str = "\
# Minecraft coordinate conventions

## Axes
- X: east is positive, west is negative
- Y: elevation; builds range from -64 (bedrock floor) to 320 (build limit), sea level is 63
- Z: south is positive, north is negative

## Block positions
- Block coordinates are integers; a block at (x, y, z) fills the cube from (x, y, z) to (x+1, y+1, z+1)
- Entity and player positions are decimals; (10.5, 64.0, -3.5) is the centre of the block at (10, 64, -4)
- Box and area tools accept corners in any order; both corners are inclusive

## Rotation
- Yaw is horizontal rotation in degrees: 0 = south, 90 = west, 180 = north, -90 = east
- Yaw wraps around, so 270 is east and -180 is north
- Pitch is vertical rotation in degrees: 0 = horizontal, 90 = straight down, -90 = straight up

## Facing
- Prefab facing values are north, south, east and west
- Wall-mounted torches and signs face OUT from the wall they hang on and occupy the block in front of it
- Standing sign rotation runs 0-15 in 22.5 degree steps: 0 = south, 4 = west, 8 = north, 12 = east

## Worlds
- Omitted world names default to minecraft:overworld
- Other vanilla worlds are minecraft:the_nether and minecraft:the_end
";

// ============================================================================
// teleport_player
// ============================================================================

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TeleportParams {
    /// Name of the player to teleport
    pub player_name: String,
    /// X coordinate (east positive, west negative)
    pub x: f64,
    /// Y coordinate (elevation: -64 to 320, sea level at 63)
    pub y: f64,
    /// Z coordinate (south positive, north negative)
    pub z: f64,
    /// World dimension (optional, defaults to minecraft:overworld)
    #[serde(default)]
    pub dimension: Option<String>,
    /// Horizontal rotation in degrees (optional, 0=south, 90=west, 180=north, -90=east)
    #[serde(default)]
    pub yaw: f64,
    /// Vertical rotation in degrees (optional, 0=horizontal, 90=down, -90=up)
    #[serde(default)]
    #[schemars(range(min = -90.0, max = 90.0))]
    pub pitch: f64,
}

impl Validate for TeleportParams {
    fn validate(&self) -> ToolResult<()> {
        if self.player_name.trim().is_empty() {
            return Err(ToolError::validation("player_name must not be empty"));
        }
        if !(-90.0..=90.0).contains(&self.pitch) {
            return Err(ToolError::validation(format!(
                "pitch must be between -90 and 90, got {}",
                self.pitch
            )));
        }
        if ![self.x, self.y, self.z, self.yaw].iter().all(|v| v.is_finite()) {
            return Err(ToolError::validation("coordinates and yaw must be finite numbers"));
        }
        Ok(())
    }
}

pub struct TeleportPlayerTool;

impl McTool for TeleportPlayerTool {
    const NAME: &'static str = "teleport_player";
    const DESCRIPTION: &'static str =
        "Teleport a player to specified coordinates with optional rotation and dimension";
    type Params = TeleportParams;

    #[instrument(skip_all, fields(player = %params.player_name))]
    async fn execute(client: &MinecraftClient, params: TeleportParams) -> ToolResult {
        const OP: &str = "teleport player";
        let dimension = params.dimension.as_deref();

        let teleport = Teleport {
            player_name: &params.player_name,
            x: params.x,
            y: params.y,
            z: params.z,
            yaw: params.yaw,
            pitch: params.pitch,
        };
        let reply = client.teleport_player(&teleport, dimension).await.during(OP)?;
        require_success(reply, OP)?;

        let mut text = format!(
            "✅ Successfully teleported {} to {} in {}",
            params.player_name,
            coordinate(params.x, params.y, params.z),
            resolve_world(dimension)
        );
        if params.yaw != 0.0 || params.pitch != 0.0 {
            text.push_str(&format!(
                "\nRotation: Yaw {:.1}°, Pitch {:.1}°",
                params.yaw, params.pitch
            ));
        }
        Ok(text)
    }
}

// ============================================================================
// test_server_connection
// ============================================================================

/// Longest slice of an unexpected probe body echoed back.
const PROBE_ECHO_LIMIT: usize = 200;

/// Liveness probe against `/api/test`.
pub struct TestServerConnectionTool;

impl McTool for TestServerConnectionTool {
    const NAME: &'static str = "test_server_connection";
    const DESCRIPTION: &'static str =
        "Test if the Minecraft server API is running and responding to requests";
    type Params = NoParams;

    #[instrument(skip_all)]
    async fn execute(client: &MinecraftClient, _params: NoParams) -> ToolResult {
        let body = client
            .test_connection()
            .await
            .during("test server connection")?;

        if body.contains(PROBE_OK_BODY) {
            info!("Minecraft server is online");
            return Ok("✅ Minecraft server is ONLINE and responding correctly".to_string());
        }

        warn!(body_len = body.len(), "Probe answered with unexpected content");
        let echo: String = body.chars().take(PROBE_ECHO_LIMIT).collect();
        Ok(format!(
            "⚠️ Minecraft server responded but with unexpected content\nResponse: {echo}"
        ))
    }
}

// ============================================================================
// get_coordinate_conventions
// ============================================================================

pub struct CoordinateConventionsTool;

impl McTool for CoordinateConventionsTool {
    const NAME: &'static str = "get_coordinate_conventions";
    const DESCRIPTION: &'static str = "Get a brief guide to the coordinate system, rotation angles and facing conventions used by the other tools";
    type Params = NoParams;

    async fn execute(_client: &MinecraftClient, _params: NoParams) -> ToolResult {
        Ok(COORDINATE_CONVENTIONS.to_string())
    }
}
