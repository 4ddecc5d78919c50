//! `/api/content`: read and replace the site's content document

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};
use serde_json::Value;

use crate::config::AppState;
use crate::error::CmsError;
use crate::http;
use crate::logger;

use super::ADMIN_PASSWORD_HEADER;

/// GET: always 200, the stored document or the fallback
pub async fn get(state: &AppState) -> Response<Full<Bytes>> {
    let document = state.content.read().await;
    http::json_response(StatusCode::OK, &document)
}

/// PUT: replace the stored document with the request body
pub async fn put<B>(req: Request<B>, state: &AppState) -> Result<Response<Full<Bytes>>, CmsError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let provided = req
        .headers()
        .get(ADMIN_PASSWORD_HEADER)
        .and_then(|v| v.to_str().ok());
    if !state.is_authorized(provided) {
        logger::log_auth_rejected("PUT", req.uri().path());
        return Err(CmsError::Unauthorized);
    }
    state.content.ensure_configured()?;

    let body = http::body::read_limited(req.into_body(), state.config.http.max_body_size).await?;
    let document = parse_document(&body)?;

    state.content.write(&document).await?;
    Ok(http::json_response(
        StatusCode::OK,
        &serde_json::json!({ "success": true }),
    ))
}

fn parse_document(body: &[u8]) -> Result<Value, CmsError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(CmsError::BadRequest("No content provided".to_string()));
    }
    serde_json::from_slice(body)
        .map_err(|e| CmsError::BadRequest(format!("Invalid JSON body: {e}")))
}
