//! Chat tools: broadcasts and direct messages.

use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use crate::domains::minecraft::{MinecraftClient, PlayerMessage};
use crate::domains::tools::error::{ApiResultExt, ToolError, ToolResult, require_success};
use crate::domains::tools::registry::{McTool, Validate};

fn location(action_bar: bool) -> &'static str {
    if action_bar { "action bar" } else { "chat" }
}

fn check_message(message: &str) -> ToolResult<()> {
    if message.is_empty() {
        return Err(ToolError::validation("message must not be empty"));
    }
    Ok(())
}

// ============================================================================
// broadcast_message
// ============================================================================

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BroadcastParams {
    /// Message text to send to all players
    pub message: String,
    /// If true, shows message in action bar above hotbar. If false, shows in chat
    #[serde(default)]
    pub action_bar: bool,
}

impl Validate for BroadcastParams {
    fn validate(&self) -> ToolResult<()> {
        check_message(&self.message)
    }
}

pub struct BroadcastMessageTool;

impl McTool for BroadcastMessageTool {
    const NAME: &'static str = "broadcast_message";
    const DESCRIPTION: &'static str = "Send a message to all players on the server";
    type Params = BroadcastParams;

    #[instrument(skip_all, fields(action_bar = params.action_bar))]
    async fn execute(client: &MinecraftClient, params: BroadcastParams) -> ToolResult {
        const OP: &str = "broadcast message";

        let reply = client
            .broadcast_message(&params.message, params.action_bar)
            .await
            .during(OP)?;
        require_success(reply, OP)?;

        Ok(format!(
            "✅ Successfully broadcast message to all players in {}",
            location(params.action_bar)
        ))
    }
}

// ============================================================================
// send_message_to_player
// ============================================================================

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PlayerMessageParams {
    /// Message text to send to the player
    pub message: String,
    /// Player's UUID (takes priority over name if both provided)
    #[serde(default)]
    pub player_uuid: Option<String>,
    /// Player's name (used if UUID not provided)
    #[serde(default)]
    pub player_name: Option<String>,
    /// If true, shows message in action bar above hotbar. If false, shows in chat
    #[serde(default)]
    pub action_bar: bool,
}

impl PlayerMessageParams {
    /// The non-blank UUID, then the non-blank name.
    fn recipient(&self) -> (Option<&str>, Option<&str>) {
        fn non_blank(s: &Option<String>) -> Option<&str> {
            s.as_deref().filter(|v| !v.trim().is_empty())
        }
        match non_blank(&self.player_uuid) {
            Some(uuid) => (Some(uuid), None),
            None => (None, non_blank(&self.player_name)),
        }
    }
}

impl Validate for PlayerMessageParams {
    fn validate(&self) -> ToolResult<()> {
        check_message(&self.message)?;
        match self.recipient() {
            (None, None) => Err(ToolError::validation(
                "Must provide either player_uuid or player_name",
            )),
            _ => Ok(()),
        }
    }
}

pub struct SendMessageToPlayerTool;

impl McTool for SendMessageToPlayerTool {
    const NAME: &'static str = "send_message_to_player";
    const DESCRIPTION: &'static str = "Send a message to a specific player";
    type Params = PlayerMessageParams;

    #[instrument(skip_all)]
    async fn execute(client: &MinecraftClient, params: PlayerMessageParams) -> ToolResult {
        const OP: &str = "send message to player";
        let (uuid, name) = params.recipient();

        let message = PlayerMessage {
            message: &params.message,
            uuid,
            name,
            action_bar: params.action_bar,
        };
        let reply = client.send_message_to_player(&message).await.during(OP)?;
        require_success(reply, OP)?;

        Ok(format!(
            "✅ Successfully sent message to player {} in {}",
            uuid.or(name).unwrap_or_default(),
            location(params.action_bar)
        ))
    }
}
