//! HTTP cache control module
//!
//! Provides `ETag` generation and conditional request handling.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Generate a quoted `ETag` from file content
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}\"", hasher.finish())
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Accepts a single tag, a comma separated list, or `*`.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag
            .split(',')
            .map(str::trim)
            .any(|e| e == etag || e == "*" || e.strip_prefix("W/") == Some(etag))
    })
}
