//! Tools domain module.
//!
//! Tools are the executable functions MCP clients call. Each one wraps a
//! single Minecraft REST endpoint (or, for `get_coordinate_conventions`,
//! static text) and renders the server's reply as human-readable text.
//!
//! ## Architecture
//!
//! - `definitions/` - Tool implementations, grouped by API area
//! - `registry.rs` - The immutable tool table shared by every transport
//! - `format.rs` - Text helpers used by the handlers
//! - `error.rs` - Tool-specific error types and tiers
//!
//! ## Adding a New Tool
//!
//! 1. Define params and implement [`McTool`] in the matching `definitions/` file
//! 2. Export it in `definitions/mod.rs`
//! 3. Add an `Entry::live::<YourTool>()` line in `ToolRegistry::new`

pub mod definitions;
pub mod error;
pub mod format;
pub mod registry;

pub use error::{ErrorTier, ToolError, ToolResult};
pub use registry::{McTool, ToolRegistry, Validate};

#[cfg(test)]
pub(crate) mod test_support {
    use rmcp::model::{CallToolResult, RawContent};
    use serde_json::Value;
    use std::sync::Arc;

    use super::ToolRegistry;
    use crate::core::config::TimeoutConfig;
    use crate::domains::minecraft::MinecraftClient;
    use crate::domains::minecraft::testing::RecordingBackend;

    /// A registry whose client talks to `backend`.
    pub fn registry_with(backend: &Arc<RecordingBackend>) -> ToolRegistry {
        let client = MinecraftClient::new(backend.clone(), TimeoutConfig::default());
        ToolRegistry::new(Arc::new(client))
    }

    /// The first text block of a tool result.
    pub fn text_of(result: &CallToolResult) -> &str {
        match result.content.first().map(|c| &c.raw) {
            Some(RawContent::Text(t)) => &t.text,
            other => panic!("expected text content, got {other:?}"),
        }
    }

    /// Call tool `name` with JSON `arguments` through a fresh registry.
    pub async fn call(backend: &Arc<RecordingBackend>, name: &str, arguments: Value) -> CallToolResult {
        let arguments = match arguments {
            Value::Object(map) => Some(map),
            Value::Null => None,
            other => panic!("tool arguments must be an object, got {other}"),
        };
        registry_with(backend).call(name, arguments).await
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{call, text_of};
    use crate::domains::minecraft::testing::RecordingBackend;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_remote_failure_and_success_are_distinct() {
        let backend = Arc::new(
            RecordingBackend::new()
                .respond_json(json!({"success": false, "error": "Unknown block"}))
                .respond_json(json!({"success": true, "blocks_set": 8})),
        );
        let args = json!({
            "x1": 0, "y1": 64, "z1": 0, "x2": 1, "y2": 65, "z2": 1,
            "block_type": "minecraft:not_a_block"
        });

        let failed = tokio_test::block_on(call(&backend, "fill_box", args.clone()));
        let succeeded = tokio_test::block_on(call(&backend, "fill_box", args));

        assert_eq!(failed.is_error, Some(true));
        assert_eq!(text_of(&failed), "❌ Failed to fill box: Unknown block");
        assert_eq!(succeeded.is_error, Some(false));
        assert!(text_of(&succeeded).starts_with("✅ Successfully filled 8 blocks"));
        assert_eq!(backend.request_count(), 2);
    }
}
