//! Tool definitions module.
//!
//! One file per tool group, mirroring the REST API's route families.

pub mod blocks;
pub mod builds;
pub mod common;
pub mod messages;
pub mod prefabs;
pub mod system;
pub mod world;

pub use blocks::{FillBoxTool, GetBlocksChunkTool, GetBlocksTool, GetHeightmapTool, SetBlocksTool};
pub use builds::{
    AddBuildTaskTool, AddSingleBlockTaskTool, BuildTaskParams, CreateBuildTool,
    DEPRECATED_ADD_BUILD_TASK, DEPRECATED_ADD_BUILD_TASK_DESCRIPTION,
    DEPRECATED_ADD_BUILD_TASK_MESSAGE, ExecuteBuildTool, GetBuildStatusTool,
    QueryBuildsByLocationTool, TaskBody,
};
pub use common::{InWorld, NoParams};
pub use messages::{BroadcastMessageTool, SendMessageToPlayerTool};
pub use prefabs::{
    PlaceDoorLineTool, PlaceNbtStructureTool, PlaceSignTool, PlaceStairsTool, PlaceTorchTool,
    PlaceWindowPaneWallTool,
};
pub use system::{
    COORDINATE_CONVENTIONS, CoordinateConventionsTool, TeleportPlayerTool,
    TestServerConnectionTool,
};
pub use world::{GetEntitiesTool, GetPlayersTool, SpawnEntityTool};
