//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: `/api/*` goes to the JSON
//! handlers, everything else to the static layer.

use crate::config::AppState;
use crate::error::CmsError;
use crate::handler::static_files::{self, RequestContext};
use crate::handler::{content, upload};
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

const CONTENT_PATH: &str = "/api/content";
const UPLOAD_PATH: &str = "/api/upload";

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let path = req.uri().path();
    if path == "/api" || path.starts_with("/api/") {
        Ok(route_api(req, &state).await)
    } else {
        let response = route_static(&req, &state).await;
        if state.config.http.enable_cors {
            Ok(http::with_cors(response))
        } else {
            Ok(response)
        }
    }
}

async fn route_api<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let enable_cors = state.config.http.enable_cors;
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = if let Err(e) =
        http::body::check_content_length(req.headers(), state.config.http.max_body_size)
    {
        e.into_response()
    } else {
        match (&method, path.as_str()) {
            (&Method::OPTIONS, CONTENT_PATH | UPLOAD_PATH) => {
                return http::build_options_response(enable_cors)
            }
            (&Method::GET, CONTENT_PATH) => content::get(state).await,
            (&Method::PUT, CONTENT_PATH) => respond(&method, &path, content::put(req, state).await),
            (&Method::POST, UPLOAD_PATH) => respond(&method, &path, upload::post(req, state).await),
            (_, CONTENT_PATH | UPLOAD_PATH) => {
                logger::log_warning(&format!("Method not allowed: {method} {path}"));
                http::json_method_not_allowed()
            }
            _ => http::json_not_found(),
        }
    };

    if enable_cors {
        http::with_cors(response)
    } else {
        response
    }
}

/// Turn a handler result into a response, logging server-side failures
fn respond(
    method: &Method,
    path: &str,
    result: Result<Response<Full<Bytes>>, CmsError>,
) -> Response<Full<Bytes>> {
    result.unwrap_or_else(|e| {
        if e.status().is_server_error() {
            logger::log_error(&format!("{method} {path} failed: {e}"));
        } else {
            logger::log_debug(&format!("{method} {path} rejected: {e}"));
        }
        e.into_response()
    })
}

async fn route_static<B>(req: &Request<B>, state: &AppState) -> Response<Full<Bytes>> {
    let method = req.method();
    match *method {
        Method::GET | Method::HEAD => {}
        Method::OPTIONS => return http::build_options_response(state.config.http.enable_cors),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            return http::build_405_response();
        }
    }

    if http::body::check_content_length(req.headers(), state.config.http.max_body_size).is_err() {
        return http::build_413_response();
    }

    let ctx = RequestContext {
        path: req.uri().path(),
        is_head: *method == Method::HEAD,
        if_none_match: req
            .headers()
            .get(hyper::header::IF_NONE_MATCH)
            .and_then(|v| v.to_str().ok()),
    };

    if let Some(uploads) = state.assets.local() {
        let prefix = uploads.url_prefix();
        if ctx
            .path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
        {
            return static_files::serve_upload(&ctx, uploads).await;
        }
    }

    static_files::serve_site(&ctx, &state.config.storage.site_dir).await
}
