//! `multipart/form-data` payloads with an `image` file field

use std::ffi::OsStr;
use std::io::Cursor;
use std::path::Path;

use hyper::body::Bytes;
use multer::{Constraints, Multipart, SizeLimit};

use super::{ImagePayload, MAX_IMAGE_BYTES, ONLY_IMAGES};
use crate::error::CmsError;
use crate::http::mime;

/// Form field that carries the file
pub const IMAGE_FIELD: &str = "image";

pub async fn extract(content_type: &str, body: Bytes) -> Result<ImagePayload, CmsError> {
    let boundary = multer::parse_boundary(content_type)?;
    let constraints =
        Constraints::new().size_limit(SizeLimit::new().per_field(MAX_IMAGE_BYTES as u64));
    let mut multipart =
        Multipart::with_reader_with_constraints(Cursor::new(body), boundary, constraints);

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let mime_type = field
            .content_type()
            .map_or_else(|| "application/octet-stream".to_string(), |m| {
                m.essence_str().to_string()
            });
        let extension = Path::new(&file_name)
            .extension()
            .and_then(OsStr::to_str)
            .map(|e| format!(".{}", e.to_ascii_lowercase()))
            .unwrap_or_default();

        if !mime::is_allowed_image(&extension, &mime_type) {
            crate::logger::log_debug(&format!(
                "Rejected upload '{file_name}' ({mime_type})"
            ));
            return Err(CmsError::BadRequest(ONLY_IMAGES.to_string()));
        }

        let bytes = field.bytes().await?;
        if bytes.is_empty() {
            break;
        }
        return Ok(ImagePayload {
            bytes,
            mime_type,
            extension,
        });
    }

    Err(CmsError::BadRequest("No file uploaded".to_string()))
}
