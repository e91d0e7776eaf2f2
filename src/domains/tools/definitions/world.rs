//! World tools: online players, entity types and entity spawning.

use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use super::common::{NoParams, payload_as, payload_field, reported_world};
use crate::domains::minecraft::{MinecraftClient, Player, Position, RegistryEntry};
use crate::domains::tools::error::{ApiResultExt, ToolResult, require_success};
use crate::domains::tools::format::{LIST_LIMIT, coordinate, field_text, list_with_limit, player_info};
use crate::domains::tools::registry::{McTool, Validate};

// ============================================================================
// get_players
// ============================================================================

/// Lists online players with position, rotation and facing.
pub struct GetPlayersTool;

impl McTool for GetPlayersTool {
    const NAME: &'static str = "get_players";
    const DESCRIPTION: &'static str =
        "Get list of all players currently online with their positions and rotations";
    type Params = NoParams;

    #[instrument(skip_all)]
    async fn execute(client: &MinecraftClient, _params: NoParams) -> ToolResult {
        let payload = client.get_players().await.during("get players")?;
        let players: Vec<Player> = payload_as(payload, "get players")?;

        if players.is_empty() {
            return Ok("No players are currently online".to_string());
        }

        let mut text = "**Online Players:**\n".to_string();
        for player in &players {
            text.push_str(&player_info(player));
        }
        Ok(text)
    }
}

// ============================================================================
// get_entities
// ============================================================================

/// Lists spawnable entity types.
pub struct GetEntitiesTool;

impl McTool for GetEntitiesTool {
    const NAME: &'static str = "get_entities";
    const DESCRIPTION: &'static str = "Get list of all available entity types that can be spawned";
    type Params = NoParams;

    #[instrument(skip_all)]
    async fn execute(client: &MinecraftClient, _params: NoParams) -> ToolResult {
        let payload = client.get_entities().await.during("get entities")?;
        let entities: Vec<RegistryEntry> = payload_as(payload, "get entities")?;

        Ok(format!(
            "**Available Entity Types ({} total):**\n{}",
            entities.len(),
            list_with_limit(&entities, LIST_LIMIT)
        ))
    }
}

// ============================================================================
// spawn_entity
// ============================================================================

/// Parameters for spawning an entity.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SpawnEntityParams {
    /// Entity type (e.g., 'minecraft:zombie', 'minecraft:cow')
    pub entity_type: String,
    /// X coordinate (east positive, west negative)
    pub x: f64,
    /// Y coordinate (elevation: -64 to 320, sea level at 63)
    pub y: f64,
    /// Z coordinate (south positive, north negative)
    pub z: f64,
    /// World name (optional, defaults to minecraft:overworld)
    #[serde(default)]
    pub world: Option<String>,
}

impl Validate for SpawnEntityParams {}

/// Spawns one entity.
pub struct SpawnEntityTool;

impl McTool for SpawnEntityTool {
    const NAME: &'static str = "spawn_entity";
    const DESCRIPTION: &'static str = "Spawn an entity at specified coordinates";
    type Params = SpawnEntityParams;

    #[instrument(skip_all, fields(entity_type = %params.entity_type))]
    async fn execute(client: &MinecraftClient, params: SpawnEntityParams) -> ToolResult {
        const OP: &str = "spawn entity";
        let world = params.world.as_deref();

        let reply = client
            .spawn_entity(&params.entity_type, params.x, params.y, params.z, world)
            .await
            .during(OP)?;
        let payload = require_success(reply, OP)?;

        let position: Position = payload_field(&payload, "position", OP).unwrap_or(Position {
            x: params.x,
            y: params.y,
            z: params.z,
        });
        let entity_type = field_text(&payload, "type", &params.entity_type);
        info!("Spawned {} at {:?}", entity_type, position);

        let mut text = format!(
            "✅ Successfully spawned {} at {}",
            entity_type,
            coordinate(position.x, position.y, position.z)
        );
        if let Some(uuid) = payload.get("uuid").and_then(|v| v.as_str()) {
            text.push_str(&format!("\nEntity UUID: {uuid}"));
        }
        text.push_str(&format!("\nWorld: {}", reported_world(&payload, world)));
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use crate::domains::minecraft::testing::RecordingBackend;
    use crate::domains::minecraft::ApiError;
    use crate::domains::tools::test_support::{call, text_of};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_get_players_reports_facing() {
        let backend = Arc::new(RecordingBackend::new().respond_json(json!([
            {
                "name": "Steve",
                "uuid": "uuid-1",
                "position": {"x": 1.0, "y": 64.0, "z": -2.0},
                "rotation": {"yaw": 180.0, "pitch": 5.0}
            }
        ])));

        let result = call(&backend, "get_players", json!({})).await;

        assert_eq!(result.is_error, Some(false));
        let text = text_of(&result);
        assert!(text.contains("**Steve** (UUID: uuid-1)"));
        assert!(text.contains("Facing: NORTH"));
        assert_eq!(backend.requests()[0].path, "/api/world/players");
    }

    #[tokio::test]
    async fn test_get_entities_caps_list() {
        let entities: Vec<_> = (0..23)
            .map(|i| json!({"id": format!("minecraft:mob_{i}"), "display_name": format!("Mob {i}")}))
            .collect();
        let backend = Arc::new(RecordingBackend::new().respond_json(json!(entities)));

        let result = call(&backend, "get_entities", json!({})).await;

        let text = text_of(&result);
        assert!(text.starts_with("**Available Entity Types (23 total):**"));
        assert!(text.contains("- minecraft:mob_0 (Mob 0)"));
        assert!(!text.contains("mob_20"));
        assert!(text.contains("... and 3 more items"));
    }

    #[tokio::test]
    async fn test_spawn_echoes_remote_position() {
        let backend = Arc::new(RecordingBackend::new().respond_with(|body| {
            let body = body.unwrap();
            json!({
                "success": true,
                "type": body["type"],
                "uuid": "e-1",
                "position": {"x": body["x"], "y": body["y"], "z": body["z"]},
                "world": body["world"],
            })
        }));

        let result = call(
            &backend,
            "spawn_entity",
            json!({"entity_type": "minecraft:cow", "x": 12.5, "y": 70, "z": -40.3}),
        )
        .await;

        let text = text_of(&result);
        assert!(text.contains("✅ Successfully spawned minecraft:cow at (12.5, 70.0, -40.3)"), "{text}");
        assert!(text.contains("Entity UUID: e-1"));
        assert!(text.contains("World: minecraft:overworld"));
    }

    #[tokio::test]
    async fn test_spawn_offline_is_connectivity_error() {
        let backend = Arc::new(
            RecordingBackend::new().respond_err(ApiError::Connect("connection refused".into())),
        );

        let result = call(
            &backend,
            "spawn_entity",
            json!({"entity_type": "minecraft:cow", "x": 0, "y": 64, "z": 0}),
        )
        .await;

        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result).contains("OFFLINE"));
    }
}
