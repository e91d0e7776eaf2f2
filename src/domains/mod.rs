//! Business logic, one module per area.
//!
//! `minecraft` talks to the game server's REST API; `tools` and `resources`
//! expose it over MCP.

pub mod minecraft;
pub mod resources;
pub mod tools;
