//! Static file serving module
//!
//! Serves the pre-built site and previously uploaded assets straight from
//! disk. Nothing beyond path resolution, `ETag` revalidation and MIME lookup.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::http::{self, cache, mime};
use crate::logger;
use crate::storage::{naming, DiskAssetStore};

/// Files tried, in order, when a path names a directory
pub const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

/// Request details the static layer cares about
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<&'a str>,
}

/// Serve `<uploads dir>/<name>` for `<prefix>/<name>`
pub async fn serve_upload(ctx: &RequestContext<'_>, store: &DiskAssetStore) -> Response<Full<Bytes>> {
    let name = ctx
        .path
        .strip_prefix(store.url_prefix())
        .map(|rest| rest.trim_start_matches('/'))
        .unwrap_or_default();
    if !naming::is_asset_name(name) {
        return http::build_404_response();
    }

    let file_path = store.dir().join(name);
    match fs::read(&file_path).await {
        Ok(content) => build_static_file_response(content, content_type_of(&file_path), ctx),
        Err(e) => {
            logger::log_debug(&format!("Upload not found '{}': {e}", file_path.display()));
            http::build_404_response()
        }
    }
}

/// Serve a file from the site directory
pub async fn serve_site(ctx: &RequestContext<'_>, site_dir: &Path) -> Response<Full<Bytes>> {
    match load_from_directory(site_dir, ctx.path).await {
        Some((content, content_type)) => build_static_file_response(content, content_type, ctx),
        None => http::build_404_response(),
    }
}

/// Resolve `path` under `static_dir`, trying index files for directories
pub async fn load_from_directory(
    static_dir: &Path,
    path: &str,
) -> Option<(Vec<u8>, &'static str)> {
    let relative_path = path.trim_start_matches('/');
    let mut file_path = static_dir.join(relative_path);

    let static_dir_canonical = match fs::canonicalize(static_dir).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{}': {e}",
                static_dir.display()
            ));
            return None;
        }
    };

    if relative_path.is_empty() || relative_path.ends_with('/') || is_dir(&file_path).await {
        file_path = find_index_file(&file_path).await?;
    }

    // Missing files are an ordinary 404
    let file_path_canonical = fs::canonicalize(&file_path).await.ok()?;
    if !file_path_canonical.starts_with(&static_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&file_path_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            return None;
        }
    };

    Some((content, content_type_of(&file_path_canonical)))
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_dir())
}

async fn find_index_file(dir: &Path) -> Option<PathBuf> {
    for index_file in INDEX_FILES {
        let candidate = dir.join(index_file);
        if fs::metadata(&candidate).await.is_ok_and(|m| m.is_file()) {
            return Some(candidate);
        }
    }
    None
}

fn content_type_of(path: &Path) -> &'static str {
    mime::get_content_type(path.extension().and_then(|e| e.to_str()))
}

/// Build static file response with `ETag` revalidation
fn build_static_file_response(
    data: Vec<u8>,
    content_type: &str,
    ctx: &RequestContext<'_>,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&data);
    if cache::check_etag_match(ctx.if_none_match, &etag) {
        return http::build_304_response(&etag);
    }
    http::response::build_cached_response(Bytes::from(data), content_type, &etag, ctx.is_head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::StatusCode;

    fn ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
            if_none_match: None,
        }
    }

    async fn body_of(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_index_and_nested_files() {
        let site = tempfile::tempdir().unwrap();
        std::fs::write(site.path().join("index.html"), "<h1>home</h1>").unwrap();
        std::fs::create_dir(site.path().join("css")).unwrap();
        std::fs::write(site.path().join("css/site.css"), "body{}").unwrap();

        let resp = serve_site(&ctx("/"), site.path()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "text/html; charset=utf-8");
        assert_eq!(body_of(resp).await, "<h1>home</h1>");

        let resp = serve_site(&ctx("/css/site.css"), site.path()).await;
        assert_eq!(resp.headers()["content-type"], "text/css");

        let resp = serve_site(&ctx("/missing.html"), site.path()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_traversal_is_blocked() {
        let root = tempfile::tempdir().unwrap();
        let site = root.path().join("site");
        std::fs::create_dir(&site).unwrap();
        std::fs::write(root.path().join("secret.txt"), "nope").unwrap();

        let resp = serve_site(&ctx("/../secret.txt"), &site).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_etag_revalidation() {
        let site = tempfile::tempdir().unwrap();
        std::fs::write(site.path().join("a.txt"), "abc").unwrap();

        let first = serve_site(&ctx("/a.txt"), site.path()).await;
        let etag = first.headers()["etag"].to_str().unwrap().to_string();

        let revalidate = RequestContext {
            path: "/a.txt",
            is_head: false,
            if_none_match: Some(&etag),
        };
        let resp = serve_site(&revalidate, site.path()).await;
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_uploads_only_serve_generated_names() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("1700000000000-7.png"), b"png-bytes").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"private").unwrap();
        let store = DiskAssetStore::new(dir.path().to_path_buf(), "/uploads");

        let resp = serve_upload(&ctx("/uploads/1700000000000-7.png"), &store).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "image/png");
        assert_eq!(body_of(resp).await, &b"png-bytes"[..]);

        let resp = serve_upload(&ctx("/uploads/notes.txt"), &store).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = serve_upload(&ctx("/uploads/1700000000000-8.png"), &store).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
