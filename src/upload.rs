//! Upload validation
//!
//! Checks an uploaded blob against the size limit and the allowed image
//! types, then hands it back base64-encoded. The bytes are not resized,
//! re-encoded, or inspected beyond that.

use crate::mime::ImageMime;
use crate::{Error, Result};
use base64::Engine as _;

/// 5 MiB.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Fail early when a declared or partially-read size is already too big.
pub fn check_size(size: usize) -> Result<()> {
    if size > MAX_UPLOAD_BYTES {
        return Err(Error::InvalidUpload(format!(
            "File too large: {} bytes exceeds the 5 MB limit",
            size
        )));
    }
    Ok(())
}

/// Validate an upload and return its base64 encoding.
///
/// Size is checked before the type and before the content is touched.
pub fn accept(raw: &[u8], declared_mime: Option<&str>, declared_size: usize) -> Result<String> {
    check_size(declared_size)?;
    check_size(raw.len())?;

    let declared = declared_mime.unwrap_or_default();
    if ImageMime::from_declared(declared).is_none() {
        let allowed: Vec<&str> = ImageMime::ALL.iter().map(|m| m.as_str()).collect();
        return Err(Error::InvalidUpload(format!(
            "Unsupported file type '{}'. Allowed types: {}",
            declared,
            allowed.join(", ")
        )));
    }

    if raw.is_empty() {
        return Err(Error::InvalidUpload("File is empty".to_string()));
    }

    Ok(base64::engine::general_purpose::STANDARD.encode(raw))
}
