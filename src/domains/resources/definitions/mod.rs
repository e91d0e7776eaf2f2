//! Resource definitions module.
//!
//! Each resource is defined in its own file with its URI, metadata and
//! content.

mod conventions;

pub use conventions::ConventionsResource;

/// Trait for resource definitions.
pub trait ResourceDefinition {
    /// The unique URI of the resource.
    const URI: &'static str;

    /// The display name of the resource.
    const NAME: &'static str;

    /// Human-readable title.
    const TITLE: &'static str;

    /// A description of the resource.
    const DESCRIPTION: &'static str;

    /// The MIME type of the resource content.
    const MIME_TYPE: &'static str;

    /// The resource body.
    fn content() -> String;
}
