//! Request body helpers
//!
//! Enforces the configured body ceiling both from `Content-Length` (before
//! reading) and while collecting (for chunked bodies).

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::HeaderMap;

use crate::error::CmsError;
use crate::logger;

/// Validate Content-Length header against the ceiling
pub fn check_content_length(headers: &HeaderMap, max_body_size: u64) -> Result<(), CmsError> {
    let Some(content_length) = headers.get(hyper::header::CONTENT_LENGTH) else {
        return Ok(());
    };
    let Ok(size_str) = content_length.to_str() else {
        logger::log_warning("Content-Length header contains non-ASCII characters");
        return Ok(());
    };
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_warning(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Err(CmsError::PayloadTooLarge)
        }
        Ok(_) => Ok(()),
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            Ok(())
        }
    }
}

/// Collect a request body, failing once it exceeds `max_body_size`
pub async fn read_limited<B>(body: B, max_body_size: u64) -> Result<Bytes, CmsError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_warning(&format!(
                "Request body exceeded {max_body_size} bytes while reading"
            ));
            Err(CmsError::PayloadTooLarge)
        }
        Err(e) => Err(CmsError::BadRequest(format!(
            "Failed to read request body: {e}"
        ))),
    }
}
