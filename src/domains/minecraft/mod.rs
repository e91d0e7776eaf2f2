//! Minecraft REST API domain.
//!
//! Everything that knows about the remote server lives here: wire models,
//! the HTTP backend seam, the typed client and small pure helpers for
//! directions and structure encoding. The MCP layer sits on top in
//! [`crate::domains::tools`].

pub mod backend;
pub mod client;
pub mod direction;
pub mod encoding;
pub mod error;
pub mod models;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{MinecraftBackend, ReqwestBackend, StructureUpload};
pub use client::{
    MinecraftClient, PROBE_OK_BODY, PlayerMessage, RemoteReply, StructurePlacement, Teleport,
    resolve_world,
};
pub use direction::{Cardinal, normalize_yaw, yaw_to_cardinal};
pub use encoding::decode_structure_data;
pub use error::{ApiError, ApiResult};
pub use models::*;
