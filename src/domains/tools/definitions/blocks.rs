//! Block tools: registry listing, block grids, chunk reads, fills and heightmaps.

use tracing::{info, instrument};

use super::common::{InWorld, NoParams, payload_as, reported_world};
use crate::domains::minecraft::{
    BlockSet, BoxFill, ChunkQuery, HeightmapQuery, HeightmapReport, MinecraftClient, RegistryEntry,
};
use crate::domains::tools::error::{ApiResultExt, ToolError, ToolResult, require_success};
use crate::domains::tools::format::{
    LIST_LIMIT, coordinate_range, field_text, list_with_limit,
};
use crate::domains::tools::registry::{McTool, Validate};

/// Largest edge of a chunk read.
const MAX_CHUNK_EDGE: u32 = 64;

impl Validate for BlockSet {
    fn validate(&self) -> ToolResult<()> {
        let mut blocks = self.blocks.iter().flatten().flatten().flatten().peekable();
        if blocks.peek().is_none() {
            return Err(ToolError::validation("blocks must contain at least one block"));
        }
        if blocks.any(|b| b.block_name.trim().is_empty()) {
            return Err(ToolError::validation("every block needs a block_name"));
        }
        Ok(())
    }
}

impl Validate for ChunkQuery {
    fn validate(&self) -> ToolResult<()> {
        for (axis, size) in [("size_x", self.size_x), ("size_y", self.size_y), ("size_z", self.size_z)] {
            if !(1..=MAX_CHUNK_EDGE).contains(&size) {
                return Err(ToolError::validation(format!(
                    "{axis} must be between 1 and {MAX_CHUNK_EDGE}, got {size}"
                )));
            }
        }
        Ok(())
    }
}

impl Validate for BoxFill {
    fn validate(&self) -> ToolResult<()> {
        if self.block_type.trim().is_empty() {
            return Err(ToolError::validation("block_type must not be empty"));
        }
        Ok(())
    }
}

impl Validate for HeightmapQuery {}

// ============================================================================
// get_blocks
// ============================================================================

pub struct GetBlocksTool;

impl McTool for GetBlocksTool {
    const NAME: &'static str = "get_blocks";
    const DESCRIPTION: &'static str = "Get list of all available block types";
    type Params = NoParams;

    #[instrument(skip_all)]
    async fn execute(client: &MinecraftClient, _params: NoParams) -> ToolResult {
        let payload = client.get_blocks().await.during("get blocks")?;
        let blocks: Vec<RegistryEntry> = payload_as(payload, "get blocks")?;

        Ok(format!(
            "**Available Block Types ({} total):**\n{}",
            blocks.len(),
            list_with_limit(&blocks, LIST_LIMIT)
        ))
    }
}

// ============================================================================
// set_blocks
// ============================================================================

/// Writes a 3D grid of blocks.
pub struct SetBlocksTool;

impl McTool for SetBlocksTool {
    const NAME: &'static str = "set_blocks";
    const DESCRIPTION: &'static str = "Set blocks in the world using a 3D array of block objects with optional block states. Remember to set any non default states needed.";
    type Params = InWorld<BlockSet>;

    #[instrument(skip_all)]
    async fn execute(client: &MinecraftClient, params: InWorld<BlockSet>) -> ToolResult {
        const OP: &str = "set blocks";
        let world = params.world.as_deref();

        let reply = client.set_blocks(&params.request, world).await.during(OP)?;
        let payload = require_success(reply, OP)?;

        let set = field_text(&payload, "blocks_set", "0");
        let skipped = field_text(&payload, "blocks_skipped", "0");
        info!(blocks_set = %set, blocks_skipped = %skipped, "Blocks written");

        Ok(format!(
            "✅ Successfully set {} blocks (skipped {}) in world {}",
            set,
            skipped,
            reported_world(&payload, world)
        ))
    }
}

// ============================================================================
// get_blocks_chunk
// ============================================================================

pub struct GetBlocksChunkTool;

impl McTool for GetBlocksChunkTool {
    const NAME: &'static str = "get_blocks_chunk";
    const DESCRIPTION: &'static str = "Get a chunk of blocks from the world";
    type Params = InWorld<ChunkQuery>;

    #[instrument(skip_all)]
    async fn execute(client: &MinecraftClient, params: InWorld<ChunkQuery>) -> ToolResult {
        const OP: &str = "get blocks chunk";

        let reply = client
            .get_blocks_chunk(&params.request, params.world.as_deref())
            .await
            .during(OP)?;
        let payload = require_success(reply, OP)?;

        serde_json::to_string_pretty(&payload).map_err(|e| ToolError::internal(e.to_string()))
    }
}

// ============================================================================
// fill_box
// ============================================================================

/// Fills an axis-aligned box with one block type.
pub struct FillBoxTool;

impl McTool for FillBoxTool {
    const NAME: &'static str = "fill_box";
    const DESCRIPTION: &'static str = "Fill a cuboid/box with a specific block type between two coordinates. Can also be used to clear space by filling with minecraft:air.";
    type Params = InWorld<BoxFill>;

    #[instrument(skip_all, fields(block_type = %params.request.block_type))]
    async fn execute(client: &MinecraftClient, params: InWorld<BoxFill>) -> ToolResult {
        const OP: &str = "fill box";
        let world = params.world.as_deref();
        let fill = &params.request;

        let reply = client.fill_box(fill, world).await.during(OP)?;
        let payload = require_success(reply, OP)?;

        Ok(format!(
            "✅ Successfully filled {} blocks with {} {} in world {}",
            field_text(&payload, "blocks_set", "0"),
            field_text(&payload, "block_type", &fill.block_type),
            coordinate_range(
                (fill.x1.into(), fill.y1.into(), fill.z1.into()),
                (fill.x2.into(), fill.y2.into(), fill.z2.into())
            ),
            reported_world(&payload, world)
        ))
    }
}

// ============================================================================
// get_heightmap
// ============================================================================

/// Surface heights over a rectangle, summarised.
pub struct GetHeightmapTool;

impl McTool for GetHeightmapTool {
    const NAME: &'static str = "get_heightmap";
    const DESCRIPTION: &'static str = "Get topographical heightmap for a rectangular area - useful for building placement and terrain analysis";
    type Params = InWorld<HeightmapQuery>;

    #[instrument(skip_all)]
    async fn execute(client: &MinecraftClient, params: InWorld<HeightmapQuery>) -> ToolResult {
        const OP: &str = "get heightmap";
        let world = params.world.as_deref();
        let query = &params.request;

        let reply = client.get_heightmap(query, world).await.during(OP)?;
        let payload = require_success(reply, OP)?;
        let world = reported_world(&payload, world);
        let report: HeightmapReport = payload_as(payload, OP)?;

        let (width, length) = match report.size {
            Some(size) => (size.x, size.z),
            None => (
                report.heights.len() as i64,
                report.heights.first().map_or(0, Vec::len) as i64,
            ),
        };
        let (min, max) = match report.area_bounds {
            Some(bounds) => ((bounds.min.x, bounds.min.z), (bounds.max.x, bounds.max.z)),
            None => (
                (i64::from(query.x1.min(query.x2)), i64::from(query.z1.min(query.z2))),
                (i64::from(query.x1.max(query.x2)), i64::from(query.z1.max(query.z2))),
            ),
        };
        let heightmap_type = report
            .heightmap_type
            .as_deref()
            .unwrap_or(query.heightmap_type.as_str());

        let mut text = format!(
            "**Heightmap Data ({width}x{length}):**\nWorld: {world}\nType: {heightmap_type}\nArea: from {} to {}\n\n",
            block_coordinate_2d(min),
            block_coordinate_2d(max),
        );
        match report.stats() {
            Some(stats) => text.push_str(&format!(
                "**Height Statistics:**\n- Minimum: {}\n- Maximum: {}\n- Average: {:.1}",
                stats.min, stats.max, stats.average
            )),
            None => text.push_str("**Height Statistics:** n/a (no samples returned)"),
        }
        Ok(text)
    }
}

fn block_coordinate_2d((x, z): (i64, i64)) -> String {
    format!("({x}, {z})")
}
