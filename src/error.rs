//! Request error taxonomy
//!
//! Every failure on an API path ends as one of these variants, which maps to
//! an HTTP status and a JSON `{"error": "..."}` body.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CmsError {
    /// Missing or wrong admin credential
    #[error("Unauthorized")]
    Unauthorized,

    /// Remote storage or media host not configured
    #[error("{0}")]
    NotConfigured(String),

    /// Missing or invalid request payload
    #[error("{0}")]
    BadRequest(String),

    /// Body exceeded the configured maximum
    #[error("Payload too large")]
    PayloadTooLarge,

    /// Blob store or media host returned an error
    #[error("{0}")]
    Upstream(String),

    /// Local disk write failed
    #[error("{0}")]
    Storage(String),
}

impl CmsError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Upstream(_) | Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn into_response(self) -> Response<Full<Bytes>> {
        let body = serde_json::json!({ "error": self.to_string() });
        crate::http::json_response(self.status(), &body)
    }
}

impl From<reqwest::Error> for CmsError {
    fn from(err: reqwest::Error) -> Self {
        Self::Upstream(err.to_string())
    }
}

impl From<multer::Error> for CmsError {
    fn from(err: multer::Error) -> Self {
        match err {
            multer::Error::FieldSizeExceeded { .. } | multer::Error::StreamSizeExceeded { .. } => {
                Self::PayloadTooLarge
            }
            other => Self::BadRequest(format!("Invalid multipart body: {other}")),
        }
    }
}
