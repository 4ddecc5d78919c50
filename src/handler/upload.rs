//! `/api/upload`: store one image and return where it can be fetched

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};

use crate::config::AppState;
use crate::error::CmsError;
use crate::http;
use crate::logger;
use crate::upload;

use super::ADMIN_PASSWORD_HEADER;

/// POST: 401, then 503, then payload validation, then storage
pub async fn post<B>(req: Request<B>, state: &AppState) -> Result<Response<Full<Bytes>>, CmsError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let provided = req
        .headers()
        .get(ADMIN_PASSWORD_HEADER)
        .and_then(|v| v.to_str().ok());
    if !state.is_authorized(provided) {
        logger::log_auth_rejected("POST", req.uri().path());
        return Err(CmsError::Unauthorized);
    }
    state.assets.ensure_configured()?;

    let (parts, body) = req.into_parts();
    let body = http::body::read_limited(body, state.config.http.max_body_size).await?;
    let image = upload::extract_image(&parts.headers, body).await?;

    let url = state.assets.store(&image).await?;
    Ok(http::json_response(
        StatusCode::OK,
        &serde_json::json!({ "url": url }),
    ))
}
