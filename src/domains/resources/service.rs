//! Resource service implementation.
//!
//! The ResourceService holds the registered resources and answers list and
//! read requests. Resources are defined in `definitions/` and registered via
//! `registry.rs`.

use rmcp::model::{ReadResourceResult, Resource, ResourceContents};
use std::collections::BTreeMap;
use tracing::{debug, info};

use super::error::ResourceError;
use super::registry::get_all_resources;

/// An entry in the resource registry.
#[derive(Debug, Clone)]
pub struct ResourceEntry {
    /// The resource metadata.
    pub resource: Resource,

    /// Text body served on read.
    pub content: String,
}

/// Service for listing and reading resources.
#[derive(Debug)]
pub struct ResourceService {
    /// Key: resource URI.
    resources: BTreeMap<String, ResourceEntry>,
}

impl Default for ResourceService {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceService {
    pub fn new() -> Self {
        let mut service = Self {
            resources: BTreeMap::new(),
        };
        for entry in get_all_resources() {
            service.register_resource(entry);
        }
        info!("Registered {} resources", service.resources.len());
        service
    }

    /// Register a resource.
    pub fn register_resource(&mut self, entry: ResourceEntry) {
        debug!("Registering resource: {}", entry.resource.raw.uri);
        self.resources
            .insert(entry.resource.raw.uri.to_string(), entry);
    }

    /// List all available resources.
    pub fn list_resources(&self) -> Vec<Resource> {
        self.resources
            .values()
            .map(|entry| entry.resource.clone())
            .collect()
    }

    /// Read a resource by URI.
    pub fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        let entry = self
            .resources
            .get(uri)
            .ok_or_else(|| ResourceError::unknown_uri(uri, self.resources.keys().cloned()))?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::TextResourceContents {
                uri: uri.to_string(),
                mime_type: entry.resource.raw.mime_type.clone(),
                text: entry.content.clone(),
                meta: None,
            }],
        })
    }
}
