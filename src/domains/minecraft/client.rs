//! Typed client for the Minecraft REST API.
//!
//! One method per remote endpoint. Each method builds its request body,
//! resolves the target world (defaulting to [`DEFAULT_WORLD`]), picks the
//! timeout for its call class and hands the request to a
//! [`MinecraftBackend`]. Response bodies come back as parsed JSON with the
//! server's own `success` flag untouched; interpreting it is the caller's job.
//!
//! Dropping a returned future aborts the HTTP request, but the server keeps
//! running whatever it already started (a build execution in particular).

use serde::Serialize;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use super::backend::{MinecraftBackend, ReqwestBackend, StructureUpload};
use super::encoding::decode_structure_data;
use super::error::{ApiError, ApiResult};
use super::models::{
    BlockSet, BoxFill, BuildTask, ChunkQuery, DEFAULT_WORLD, DoorLine, HeightmapQuery,
    LocationQuery, SignPlacement, Staircase, StructureRotation, TorchPlacement, WindowPaneWall,
};
use crate::core::config::{MinecraftConfig, TimeoutConfig};

/// Text the `/api/test` endpoint answers with when the server is healthy.
pub const PROBE_OK_BODY: &str = "Server is running";

/// Resolve the world a request targets.
pub fn resolve_world(world: Option<&str>) -> &str {
    world
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .unwrap_or(DEFAULT_WORLD)
}

/// A JSON reply carrying the server's own `success` flag.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteReply(Value);

impl RemoteReply {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Whether the server reported `success: true`.
    pub fn is_success(&self) -> bool {
        self.0.get("success").and_then(Value::as_bool).unwrap_or(false)
    }

    /// The server's `error` field, or "Unknown error".
    pub fn error_message(&self) -> String {
        match self.0.get("error") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Null) | None => "Unknown error".to_string(),
            Some(Value::String(_)) => "Unknown error".to_string(),
            Some(other) => other.to_string(),
        }
    }

    pub fn payload(&self) -> &Value {
        &self.0
    }

    pub fn into_payload(self) -> Value {
        self.0
    }
}

/// A decoded structure upload request.
#[derive(Debug, Clone)]
pub struct StructurePlacement<'a> {
    /// Base64 structure file contents.
    pub data: &'a str,
    pub filename: &'a str,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub rotation: StructureRotation,
    pub include_entities: bool,
    pub replace_blocks: bool,
}

/// A message addressed to one player.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerMessage<'a> {
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    pub action_bar: bool,
}

/// A player teleport request.
#[derive(Debug, Clone, Serialize)]
pub struct Teleport<'a> {
    pub player_name: &'a str,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f64,
    pub pitch: f64,
}

/// Client for the Minecraft REST API.
#[derive(Clone)]
pub struct MinecraftClient {
    backend: Arc<dyn MinecraftBackend>,
    timeouts: TimeoutConfig,
}

impl std::fmt::Debug for MinecraftClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinecraftClient")
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}

impl MinecraftClient {
    /// Create a client over an arbitrary backend.
    pub fn new(backend: Arc<dyn MinecraftBackend>, timeouts: TimeoutConfig) -> Self {
        Self { backend, timeouts }
    }

    /// Create a reqwest-backed client from configuration.
    pub fn from_config(config: &MinecraftConfig) -> ApiResult<Self> {
        let backend = ReqwestBackend::new(config.base_url.clone())?;
        Ok(Self::new(Arc::new(backend), config.timeouts.clone()))
    }

    pub fn timeouts(&self) -> &TimeoutConfig {
        &self.timeouts
    }

    // ------------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------------

    fn parse(body: &str) -> ApiResult<Value> {
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Serialize `body` and stamp the resolved world onto it.
    fn in_world<T: Serialize>(body: &T, key: &str, world: Option<&str>) -> ApiResult<Value> {
        let mut map = match serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))? {
            Value::Object(map) => map,
            other => {
                return Err(ApiError::Encode(format!(
                    "expected an object body, got {other}"
                )));
            }
        };
        map.insert(key.to_string(), Value::String(resolve_world(world).to_string()));
        Ok(Value::Object(map))
    }

    async fn get_value(&self, path: &str, timeout: Duration) -> ApiResult<Value> {
        let body = self.backend.get(path, timeout).await?;
        Self::parse(&body)
    }

    async fn post_reply(&self, path: &str, body: Value, timeout: Duration) -> ApiResult<RemoteReply> {
        let raw = self.backend.post_json(path, &body, timeout).await?;
        Ok(RemoteReply::new(Self::parse(&raw)?))
    }

    // ------------------------------------------------------------------------
    // System
    // ------------------------------------------------------------------------

    /// Liveness probe; returns the raw response text.
    #[instrument(skip(self))]
    pub async fn test_connection(&self) -> ApiResult<String> {
        self.backend.get("/api/test", self.timeouts.probe()).await
    }

    #[instrument(skip(self, teleport), fields(player = teleport.player_name))]
    pub async fn teleport_player(
        &self,
        teleport: &Teleport<'_>,
        dimension: Option<&str>,
    ) -> ApiResult<RemoteReply> {
        let body = Self::in_world(teleport, "dimension", dimension)?;
        self.post_reply("/api/players/teleport", body, self.timeouts.ordinary())
            .await
    }

    // ------------------------------------------------------------------------
    // World
    // ------------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn get_players(&self) -> ApiResult<Value> {
        self.get_value("/api/world/players", self.timeouts.ordinary())
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_entities(&self) -> ApiResult<Value> {
        self.get_value("/api/world/entities", self.timeouts.ordinary())
            .await
    }

    #[instrument(skip(self))]
    pub async fn spawn_entity(
        &self,
        entity_type: &str,
        x: f64,
        y: f64,
        z: f64,
        world: Option<&str>,
    ) -> ApiResult<RemoteReply> {
        let body = json!({
            "type": entity_type,
            "x": x,
            "y": y,
            "z": z,
            "world": resolve_world(world),
        });
        self.post_reply("/api/world/entities/spawn", body, self.timeouts.ordinary())
            .await
    }

    // ------------------------------------------------------------------------
    // Blocks
    // ------------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn get_blocks(&self) -> ApiResult<Value> {
        self.get_value("/api/world/blocks/list", self.timeouts.ordinary())
            .await
    }

    #[instrument(skip(self, request))]
    pub async fn set_blocks(&self, request: &BlockSet, world: Option<&str>) -> ApiResult<RemoteReply> {
        let body = Self::in_world(request, "world", world)?;
        self.post_reply("/api/world/blocks/set", body, self.timeouts.ordinary())
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_blocks_chunk(
        &self,
        request: &ChunkQuery,
        world: Option<&str>,
    ) -> ApiResult<RemoteReply> {
        let body = Self::in_world(request, "world", world)?;
        self.post_reply("/api/world/blocks/chunk", body, self.timeouts.ordinary())
            .await
    }

    #[instrument(skip(self))]
    pub async fn fill_box(&self, request: &BoxFill, world: Option<&str>) -> ApiResult<RemoteReply> {
        let body = Self::in_world(request, "world", world)?;
        self.post_reply("/api/world/blocks/fill", body, self.timeouts.ordinary())
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_heightmap(
        &self,
        request: &HeightmapQuery,
        world: Option<&str>,
    ) -> ApiResult<RemoteReply> {
        let body = Self::in_world(request, "world", world)?;
        self.post_reply("/api/world/blocks/heightmap", body, self.timeouts.ordinary())
            .await
    }

    // ------------------------------------------------------------------------
    // Messages
    // ------------------------------------------------------------------------

    #[instrument(skip(self, message))]
    pub async fn broadcast_message(&self, message: &str, action_bar: bool) -> ApiResult<RemoteReply> {
        let body = json!({ "message": message, "action_bar": action_bar });
        self.post_reply("/api/message/broadcast", body, self.timeouts.ordinary())
            .await
    }

    #[instrument(skip(self, message), fields(uuid = message.uuid, name = message.name))]
    pub async fn send_message_to_player(&self, message: &PlayerMessage<'_>) -> ApiResult<RemoteReply> {
        let body = serde_json::to_value(message).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.post_reply("/api/message/player", body, self.timeouts.ordinary())
            .await
    }

    // ------------------------------------------------------------------------
    // Prefabs
    // ------------------------------------------------------------------------

    /// Upload an NBT structure file.
    ///
    /// The base64 payload is decoded before anything is sent; malformed data
    /// fails with [`ApiError::InvalidEncoding`] without a network call.
    #[instrument(skip(self, placement), fields(filename = placement.filename))]
    pub async fn place_nbt_structure(
        &self,
        placement: &StructurePlacement<'_>,
        world: Option<&str>,
    ) -> ApiResult<RemoteReply> {
        let bytes = decode_structure_data(placement.data)?;
        debug!(bytes = bytes.len(), "Decoded structure data");

        let upload = StructureUpload {
            field: "nbt_file",
            filename: placement.filename.to_string(),
            bytes,
            fields: vec![
                ("x", placement.x.to_string()),
                ("y", placement.y.to_string()),
                ("z", placement.z.to_string()),
                ("rotation", placement.rotation.as_str().to_string()),
                ("include_entities", placement.include_entities.to_string()),
                ("replace_blocks", placement.replace_blocks.to_string()),
                ("world", resolve_world(world).to_string()),
            ],
        };

        let raw = self
            .backend
            .post_multipart("/api/world/structure/place", upload, self.timeouts.structure())
            .await?;
        Ok(RemoteReply::new(Self::parse(&raw)?))
    }

    #[instrument(skip(self))]
    pub async fn place_door_line(&self, request: &DoorLine, world: Option<&str>) -> ApiResult<RemoteReply> {
        let body = Self::in_world(request, "world", world)?;
        self.post_reply("/api/world/prefabs/door", body, self.timeouts.ordinary())
            .await
    }

    #[instrument(skip(self))]
    pub async fn place_stairs(&self, request: &Staircase, world: Option<&str>) -> ApiResult<RemoteReply> {
        let body = Self::in_world(request, "world", world)?;
        self.post_reply("/api/world/prefabs/stairs", body, self.timeouts.ordinary())
            .await
    }

    #[instrument(skip(self))]
    pub async fn place_window_pane_wall(
        &self,
        request: &WindowPaneWall,
        world: Option<&str>,
    ) -> ApiResult<RemoteReply> {
        let body = Self::in_world(request, "world", world)?;
        self.post_reply("/api/world/prefabs/window-pane", body, self.timeouts.ordinary())
            .await
    }

    #[instrument(skip(self))]
    pub async fn place_torch(&self, request: &TorchPlacement, world: Option<&str>) -> ApiResult<RemoteReply> {
        let body = Self::in_world(request, "world", world)?;
        self.post_reply("/api/world/prefabs/torch", body, self.timeouts.ordinary())
            .await
    }

    #[instrument(skip(self))]
    pub async fn place_sign(&self, request: &SignPlacement, world: Option<&str>) -> ApiResult<RemoteReply> {
        let body = Self::in_world(request, "world", world)?;
        self.post_reply("/api/world/prefabs/sign", body, self.timeouts.ordinary())
            .await
    }

    // ------------------------------------------------------------------------
    // Builds
    // ------------------------------------------------------------------------

    #[instrument(skip(self, description))]
    pub async fn create_build(
        &self,
        name: &str,
        description: Option<&str>,
        world: Option<&str>,
    ) -> ApiResult<RemoteReply> {
        let mut body = Map::new();
        body.insert("name".into(), Value::String(name.to_string()));
        if let Some(description) = description {
            body.insert("description".into(), Value::String(description.to_string()));
        }
        body.insert("world".into(), Value::String(resolve_world(world).to_string()));

        self.post_reply("/api/builds", Value::Object(body), self.timeouts.ordinary())
            .await
    }

    /// Queue a task on a build.
    ///
    /// The world is stamped into `task_data`, where the server reads it.
    #[instrument(skip(self, task, description), fields(task_type = %task.task_type()))]
    pub async fn add_build_task(
        &self,
        build_id: &str,
        task: &BuildTask,
        world: Option<&str>,
        description: &str,
    ) -> ApiResult<RemoteReply> {
        let mut body = serde_json::to_value(task).map_err(|e| ApiError::Encode(e.to_string()))?;
        if let Some(Value::Object(data)) = body.get_mut("task_data") {
            data.insert("world".into(), Value::String(resolve_world(world).to_string()));
        }
        if let Value::Object(map) = &mut body {
            map.insert("description".into(), Value::String(description.to_string()));
        }

        let path = format!("/api/builds/{build_id}/tasks");
        self.post_reply(&path, body, self.timeouts.ordinary()).await
    }

    /// Run every queued task of a build, with the long build timeout.
    #[instrument(skip(self))]
    pub async fn execute_build(&self, build_id: &str) -> ApiResult<RemoteReply> {
        let path = format!("/api/builds/{build_id}/execute");
        self.post_reply(&path, json!({}), self.timeouts.build()).await
    }

    #[instrument(skip(self))]
    pub async fn query_builds_by_location(
        &self,
        query: &LocationQuery,
        world: Option<&str>,
    ) -> ApiResult<RemoteReply> {
        let body = Self::in_world(query, "world", world)?;
        self.post_reply("/api/builds/query-location", body, self.timeouts.ordinary())
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_build_status(&self, build_id: &str) -> ApiResult<RemoteReply> {
        let path = format!("/api/builds/{build_id}");
        let value = self.get_value(&path, self.timeouts.ordinary()).await?;
        Ok(RemoteReply::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::minecraft::models::{BlockSpec, Facing, Hinge};
    use crate::domains::minecraft::testing::RecordingBackend;

    fn client_with(backend: &Arc<RecordingBackend>) -> MinecraftClient {
        MinecraftClient::new(backend.clone(), TimeoutConfig::default())
    }

    #[test]
    fn test_resolve_world() {
        assert_eq!(resolve_world(None), "minecraft:overworld");
        assert_eq!(resolve_world(Some("")), "minecraft:overworld");
        assert_eq!(resolve_world(Some("  ")), "minecraft:overworld");
        assert_eq!(resolve_world(Some("minecraft:the_nether")), "minecraft:the_nether");
    }

    #[test]
    fn test_reply_error_message_fallback() {
        assert_eq!(RemoteReply::new(json!({"success": false})).error_message(), "Unknown error");
        assert_eq!(
            RemoteReply::new(json!({"success": false, "error": "nope"})).error_message(),
            "nope"
        );
        assert!(!RemoteReply::new(json!({"error": "x"})).is_success());
        assert!(RemoteReply::new(json!({"success": true})).is_success());
    }

    #[tokio::test]
    async fn test_fill_box_payload_and_default_world() {
        let backend = Arc::new(RecordingBackend::new().respond_json(json!({"success": true})));
        let client = client_with(&backend);
        let fill = BoxFill {
            x1: -5,
            y1: 60,
            z1: 10,
            x2: 5,
            y2: 70,
            z2: 20,
            block_type: "minecraft:stone".into(),
        };

        client.fill_box(&fill, None).await.unwrap();

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/api/world/blocks/fill");
        assert_eq!(request.timeout, Duration::from_secs(15));
        let body = request.body.as_ref().unwrap();
        assert_eq!(body["x1"], -5);
        assert_eq!(body["z2"], 20);
        assert_eq!(body["block_type"], "minecraft:stone");
        assert_eq!(body["world"], "minecraft:overworld");
    }

    #[tokio::test]
    async fn test_spawn_position_round_trip() {
        let backend = Arc::new(RecordingBackend::new().respond_with(|body| {
            let body = body.unwrap();
            json!({
                "success": true,
                "uuid": "1234",
                "position": {"x": body["x"], "y": body["y"], "z": body["z"]},
            })
        }));
        let client = client_with(&backend);

        let reply = client
            .spawn_entity("minecraft:cow", 10.5, -63.0, -2048.25, Some("minecraft:the_end"))
            .await
            .unwrap();

        let position: crate::domains::minecraft::Position =
            serde_json::from_value(reply.payload()["position"].clone()).unwrap();
        assert_eq!((position.x, position.y, position.z), (10.5, -63.0, -2048.25));

        let body = backend.requests()[0].body.clone().unwrap();
        assert_eq!(body["type"], "minecraft:cow");
        assert_eq!(body["world"], "minecraft:the_end");
    }

    #[tokio::test]
    async fn test_structure_upload_uses_long_timeout() {
        let backend = Arc::new(RecordingBackend::new().respond_json(json!({"success": true})));
        let client = client_with(&backend);
        let placement = StructurePlacement {
            data: "aGVsbG8",
            filename: "house.nbt",
            x: 1,
            y: 2,
            z: 3,
            rotation: StructureRotation::Clockwise90,
            include_entities: false,
            replace_blocks: true,
        };

        client.place_nbt_structure(&placement, None).await.unwrap();

        let request = &backend.requests()[0];
        assert_eq!(request.path, "/api/world/structure/place");
        assert_eq!(request.timeout, Duration::from_secs(60));
        let upload = request.upload.as_ref().unwrap();
        assert_eq!(upload.field, "nbt_file");
        assert_eq!(upload.filename, "house.nbt");
        assert_eq!(upload.bytes, b"hello");
        assert!(upload.fields.contains(&("rotation", "CLOCKWISE_90".to_string())));
        assert!(upload.fields.contains(&("include_entities", "false".to_string())));
        assert!(upload.fields.contains(&("world", "minecraft:overworld".to_string())));
    }

    #[tokio::test]
    async fn test_invalid_structure_data_sends_nothing() {
        let backend = Arc::new(RecordingBackend::new());
        let client = client_with(&backend);
        let placement = StructurePlacement {
            data: "%%%",
            filename: "bad.nbt",
            x: 0,
            y: 0,
            z: 0,
            rotation: StructureRotation::NoRotation,
            include_entities: true,
            replace_blocks: true,
        };

        let err = client.place_nbt_structure(&placement, None).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidEncoding(_)));
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn test_add_build_task_payload() {
        let backend = Arc::new(RecordingBackend::new().respond_json(json!({"success": true})));
        let client = client_with(&backend);
        let task = BuildTask::PrefabDoor(DoorLine {
            start_x: 0,
            start_y: 64,
            start_z: 0,
            width: 2,
            facing: Facing::East,
            block_type: "minecraft:iron_door".into(),
            hinge: Hinge::Right,
            double_doors: true,
            open: false,
        });

        client
            .add_build_task("b-1", &task, Some("minecraft:the_nether"), "front door")
            .await
            .unwrap();

        let request = &backend.requests()[0];
        assert_eq!(request.path, "/api/builds/b-1/tasks");
        let body = request.body.as_ref().unwrap();
        assert_eq!(body["task_type"], "PREFAB_DOOR");
        assert_eq!(body["description"], "front door");
        assert_eq!(body["task_data"]["facing"], "east");
        assert_eq!(body["task_data"]["hinge"], "right");
        assert_eq!(body["task_data"]["world"], "minecraft:the_nether");
    }

    #[tokio::test]
    async fn test_block_set_wire_names() {
        let backend = Arc::new(RecordingBackend::new().respond_json(json!({"success": true})));
        let client = client_with(&backend);
        let request = BlockSet::single(
            1,
            2,
            3,
            BlockSpec {
                block_name: "minecraft:stone".into(),
                block_states: None,
            },
        );

        client.set_blocks(&request, None).await.unwrap();

        let body = backend.requests()[0].body.clone().unwrap();
        assert_eq!(body["blocks"][0][0][0]["block_name"], "minecraft:stone");
        assert!(body["blocks"][0][0][0].get("block_states").is_none());
    }

    #[tokio::test]
    async fn test_execute_build_uses_build_timeout() {
        let backend = Arc::new(RecordingBackend::new().respond_json(json!({"success": true})));
        let client = client_with(&backend);

        client.execute_build("abc").await.unwrap();

        let request = &backend.requests()[0];
        assert_eq!(request.path, "/api/builds/abc/execute");
        assert_eq!(request.timeout, Duration::from_secs(120));
    }

    #[tokio::test]
    async fn test_probe_uses_short_timeout() {
        let backend = Arc::new(RecordingBackend::new().respond_text("Server is running"));
        let client = client_with(&backend);

        let body = client.test_connection().await.unwrap();

        assert_eq!(body, PROBE_OK_BODY);
        let request = &backend.requests()[0];
        assert_eq!(request.method, "GET");
        assert_eq!(request.timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_teleport_uses_dimension_key() {
        let backend = Arc::new(RecordingBackend::new().respond_json(json!({"success": true})));
        let client = client_with(&backend);
        let teleport = Teleport {
            player_name: "Steve",
            x: 0.5,
            y: 80.0,
            z: 0.5,
            yaw: 90.0,
            pitch: 0.0,
        };

        client.teleport_player(&teleport, None).await.unwrap();

        let body = backend.requests()[0].body.clone().unwrap();
        assert_eq!(body["dimension"], "minecraft:overworld");
        assert!(body.get("world").is_none());
        assert_eq!(body["player_name"], "Steve");
    }

    #[tokio::test]
    async fn test_undecodable_body_is_decode_error() {
        let backend = Arc::new(RecordingBackend::new().respond_text("<html>"));
        let client = client_with(&backend);

        let err = client.get_players().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
