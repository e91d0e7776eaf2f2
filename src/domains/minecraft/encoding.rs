//! Base64 handling for uploaded structure files.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::error::{ApiError, ApiResult};

/// Decode base64 structure data, restoring missing `=` padding.
///
/// Whitespace (line-wrapped input) is ignored. Content that is not valid
/// base64 is rejected with [`ApiError::InvalidEncoding`].
pub fn decode_structure_data(data: &str) -> ApiResult<Vec<u8>> {
    let mut cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();

    if cleaned.is_empty() {
        return Err(ApiError::InvalidEncoding("structure data is empty".to_string()));
    }

    let missing = (4 - cleaned.len() % 4) % 4;
    cleaned.extend(std::iter::repeat_n('=', missing));

    STANDARD
        .decode(cleaned.as_bytes())
        .map_err(|e| ApiError::InvalidEncoding(e.to_string()))
}
