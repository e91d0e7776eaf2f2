//! Resources domain module.
//!
//! Resources are read-only documents MCP clients can fetch by URI. The server
//! publishes a single one: the coordinate conventions guide, the same text
//! the `get_coordinate_conventions` tool returns.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual resource definitions (one file per resource)
//! - `registry.rs` - Central resource registration
//! - `service.rs` - Resource service for listing and reading

pub mod definitions;
mod error;
mod registry;
mod service;

pub use definitions::ResourceDefinition;
pub use error::ResourceError;
pub use registry::{get_all_resources, resource_uris};
pub use service::{ResourceEntry, ResourceService};
