//! `{"image": "data:<mime>;base64,<data>"}` payloads

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hyper::body::Bytes;
use serde::Deserialize;

use super::{ImagePayload, MAX_IMAGE_BYTES, ONLY_IMAGES};
use crate::error::CmsError;
use crate::http::mime;

#[derive(Debug, Deserialize)]
struct UploadBody {
    #[serde(default)]
    image: Option<String>,
}

/// Read the `image` field of a JSON upload body
pub fn extract_from_json(body: &[u8]) -> Result<ImagePayload, CmsError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(CmsError::BadRequest("No image provided".to_string()));
    }
    let parsed: UploadBody = serde_json::from_slice(body)
        .map_err(|e| CmsError::BadRequest(format!("Invalid JSON body: {e}")))?;
    match parsed.image {
        Some(uri) if !uri.trim().is_empty() => parse(uri.trim()),
        _ => Err(CmsError::BadRequest("No image provided".to_string())),
    }
}

/// Decode a base64 image data URI
pub fn parse(uri: &str) -> Result<ImagePayload, CmsError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| CmsError::BadRequest("Image must be a data URI".to_string()))?;
    let (meta, data) = rest
        .split_once(',')
        .ok_or_else(|| CmsError::BadRequest("Malformed data URI".to_string()))?;

    let mut params = meta.split(';');
    let mime_type = params.next().unwrap_or_default().trim().to_ascii_lowercase();
    if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return Err(CmsError::BadRequest(
            "Image data URI must be base64 encoded".to_string(),
        ));
    }

    if !mime::mentions_image_kind(&mime_type) {
        return Err(CmsError::BadRequest(ONLY_IMAGES.to_string()));
    }
    let extension = mime::extension_for_image_mime(&mime_type)
        .ok_or_else(|| CmsError::BadRequest(ONLY_IMAGES.to_string()))?;

    // Base64 inflates by 4/3; reject obviously oversized input before decoding
    if data.len() / 4 * 3 > MAX_IMAGE_BYTES + 2 {
        return Err(CmsError::PayloadTooLarge);
    }
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| CmsError::BadRequest(format!("Invalid base64 image data: {e}")))?;
    if bytes.is_empty() {
        return Err(CmsError::BadRequest("No image provided".to_string()));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(CmsError::PayloadTooLarge);
    }

    Ok(ImagePayload {
        bytes: Bytes::from(bytes),
        mime_type,
        extension: extension.to_string(),
    })
}
