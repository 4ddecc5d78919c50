//! Upload payload extraction
//!
//! Turns a `POST /api/upload` body into a validated [`ImagePayload`].
//! Two encodings are accepted: a multipart form with an `image` file field,
//! or a JSON object `{"image": "data:<mime>;base64,<data>"}`.

pub mod data_uri;
pub mod multipart;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hyper::body::Bytes;
use hyper::HeaderMap;

use crate::error::CmsError;

/// Largest decoded image accepted (10 MB)
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

pub const ONLY_IMAGES: &str = "Only image files are allowed";

/// A validated image ready to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub bytes: Bytes,
    pub mime_type: String,
    /// Lowercased, with leading dot (".png")
    pub extension: String,
}

impl ImagePayload {
    /// Re-encode as a base64 data URI for hosts that accept one
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            STANDARD.encode(&self.bytes)
        )
    }
}

/// Parse and validate the image from an upload request
pub async fn extract_image(headers: &HeaderMap, body: Bytes) -> Result<ImagePayload, CmsError> {
    let content_type = headers
        .get(hyper::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if content_type
        .to_ascii_lowercase()
        .starts_with("multipart/form-data")
    {
        multipart::extract(content_type, body).await
    } else {
        data_uri::extract_from_json(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dispatches_on_content_type() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/json".parse().unwrap());
        let body = Bytes::from(r#"{"image":"data:image/png;base64,iVBORw0K"}"#);
        let image = extract_image(&headers, body).await.unwrap();
        assert_eq!(image.extension, ".png");

        headers.insert(
            "content-type",
            "multipart/form-data; boundary=XYZ".parse().unwrap(),
        );
        let body = Bytes::from("--XYZ--\r\n");
        let err = extract_image(&headers, body).await.unwrap_err();
        assert_eq!(err.to_string(), "No file uploaded");
    }

    #[test]
    fn test_data_uri_reencoding() {
        let image = ImagePayload {
            bytes: Bytes::from_static(b"GIF89a"),
            mime_type: "image/gif".to_string(),
            extension: ".gif".to_string(),
        };
        assert_eq!(image.to_data_uri(), "data:image/gif;base64,R0lGODlh");
    }
}
