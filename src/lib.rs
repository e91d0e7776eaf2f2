//! Minecraft MCP Server
//!
//! A Model Context Protocol server that lets an agent inspect and build in
//! a Minecraft world through the game server's REST API.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the MCP handler and transports
//! - **domains**: business logic
//!   - **minecraft**: typed client for the remote REST API
//!   - **tools**: the tool catalogue, dispatch and response formatting
//!   - **resources**: the coordinate conventions document
//!
//! # Example
//!
//! ```rust,no_run
//! use minecraft_mcp_server::{core::Config, core::McpServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config)?;
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
