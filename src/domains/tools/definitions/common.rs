//! Common utilities shared by tool definitions.

use schemars::JsonSchema;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domains::minecraft::resolve_world;
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::registry::Validate;

/// Parameters of a tool that takes no arguments.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NoParams {}

impl Validate for NoParams {}

/// A request body plus the world it targets.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct InWorld<T> {
    #[serde(flatten)]
    pub request: T,
    /// World name (optional, defaults to minecraft:overworld)
    #[serde(default)]
    pub world: Option<String>,
}

impl<T: Validate> Validate for InWorld<T> {
    fn validate(&self) -> ToolResult<()> {
        self.request.validate()
    }
}

/// Decode field `key` of a success payload.
pub fn payload_field<T: DeserializeOwned>(
    payload: &Value,
    key: &str,
    operation: &'static str,
) -> ToolResult<T> {
    let value = payload
        .get(key)
        .cloned()
        .ok_or_else(|| ToolError::UnexpectedResponse {
            operation,
            message: format!("missing '{key}'"),
        })?;

    serde_json::from_value(value).map_err(|e| ToolError::UnexpectedResponse {
        operation,
        message: format!("invalid '{key}': {e}"),
    })
}

/// Decode a whole payload (e.g. a bare array) into `T`.
pub fn payload_as<T: DeserializeOwned>(payload: Value, operation: &'static str) -> ToolResult<T> {
    serde_json::from_value(payload).map_err(|e| ToolError::UnexpectedResponse {
        operation,
        message: e.to_string(),
    })
}

/// The world the server reports, else the one we asked for.
pub fn reported_world(payload: &Value, requested: Option<&str>) -> String {
    payload
        .get("world")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| resolve_world(requested).to_string())
}

/// Reject build ids that would change the request path.
pub fn check_build_id(build_id: &str) -> ToolResult<()> {
    let id = build_id.trim();
    if id.is_empty() {
        return Err(ToolError::validation("build_id must not be empty"));
    }
    if id.contains(['/', '?', '#', '%']) || id.chars().any(char::is_whitespace) {
        return Err(ToolError::validation(format!("Invalid build_id: {build_id}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reported_world_prefers_server_value() {
        let payload = json!({"world": "minecraft:the_nether"});
        assert_eq!(reported_world(&payload, None), "minecraft:the_nether");
        assert_eq!(reported_world(&json!({}), None), "minecraft:overworld");
        assert_eq!(reported_world(&json!({}), Some("minecraft:the_end")), "minecraft:the_end");
    }

    #[test]
    fn test_build_id_rules() {
        assert!(check_build_id("6f1c2a9e-0b7d-4c55-9e0e-1a2b3c4d5e6f").is_ok());
        assert!(check_build_id("").is_err());
        assert!(check_build_id("../admin").is_err());
        assert!(check_build_id("a b").is_err());
    }

    #[test]
    fn test_payload_field_missing_is_unexpected_response() {
        let err = payload_field::<String>(&json!({}), "build", "create build").unwrap_err();
        assert!(matches!(err, ToolError::UnexpectedResponse { .. }));
    }
}
