//! Coordinate conventions resource.

use super::ResourceDefinition;
use crate::domains::tools::definitions::COORDINATE_CONVENTIONS;

pub struct ConventionsResource;

impl ResourceDefinition for ConventionsResource {
    const URI: &'static str = "file://conventions";
    const NAME: &'static str = "conventions";
    const TITLE: &'static str = "conventions";
    const DESCRIPTION: &'static str = "A brief guide to conventions and coordinate systems used";
    const MIME_TYPE: &'static str = "text/plain";

    fn content() -> String {
        COORDINATE_CONVENTIONS.to_string()
    }
}
