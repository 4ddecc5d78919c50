//! MIME type detection module
//!
//! Maps file extensions to Content-Type for the static layer, and decides
//! which uploads count as images.

/// Image kinds accepted for upload
pub const ALLOWED_IMAGE_KINDS: [&str; 6] = ["jpeg", "jpg", "png", "gif", "webp", "svg"];

/// Get MIME Content-Type based on file extension
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    let ext = extension.map(str::to_ascii_lowercase);
    match ext.as_deref() {
        // Text
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("txt" | "md") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",

        // Scripts and data
        Some("js" | "mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("webmanifest") => "application/manifest+json",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        Some("pdf") => "application/pdf",
        Some("mp4") => "video/mp4",

        _ => "application/octet-stream",
    }
}

/// True when a MIME type names one of the allowed image kinds
///
/// `image/svg+xml` passes, `text/plain` does not.
pub fn mentions_image_kind(mime_type: &str) -> bool {
    let lower = mime_type.to_ascii_lowercase();
    ALLOWED_IMAGE_KINDS.iter().any(|kind| lower.contains(kind))
}

/// True when `extension` (leading dot optional) is exactly an allowed kind
pub fn is_image_extension(extension: &str) -> bool {
    let bare = extension.strip_prefix('.').unwrap_or(extension);
    ALLOWED_IMAGE_KINDS
        .iter()
        .any(|kind| bare.eq_ignore_ascii_case(kind))
}

/// Both the filename extension and the declared MIME type must name an image
pub fn is_allowed_image(extension: &str, mime_type: &str) -> bool {
    is_image_extension(extension) && mentions_image_kind(mime_type)
}

/// File extension (with leading dot) for an image MIME type
pub fn extension_for_image_mime(mime_type: &str) -> Option<&'static str> {
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "image/jpeg" | "image/jpg" => Some(".jpg"),
        "image/png" => Some(".png"),
        "image/gif" => Some(".gif"),
        "image/webp" => Some(".webp"),
        "image/svg+xml" | "image/svg" => Some(".svg"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(get_content_type(Some("html")), "text/html; charset=utf-8");
        assert_eq!(get_content_type(Some("css")), "text/css");
        assert_eq!(get_content_type(Some("js")), "application/javascript");
        assert_eq!(get_content_type(Some("json")), "application/json");
        assert_eq!(get_content_type(Some("PNG")), "image/png");
        assert_eq!(get_content_type(Some("svg")), "image/svg+xml");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(get_content_type(Some("xyz")), "application/octet-stream");
        assert_eq!(get_content_type(None), "application/octet-stream");
    }

    #[test]
    fn test_image_allow_list() {
        assert!(is_allowed_image(".png", "image/png"));
        assert!(is_allowed_image(".JPG", "image/jpeg"));
        assert!(is_allowed_image(".svg", "image/svg+xml"));
        assert!(!is_allowed_image(".txt", "text/plain"));
        // Disguised extension or MIME type alone is not enough
        assert!(!is_allowed_image(".txt", "image/png"));
        assert!(!is_allowed_image(".png", "application/octet-stream"));
        assert!(!is_allowed_image("", "image/png"));
        assert!(!is_allowed_image(".", "image/png"));
    }

    #[test]
    fn test_extension_must_match_exactly() {
        assert!(is_image_extension(".webp"));
        assert!(is_image_extension("JPEG"));
        for ext in [".png_1", ".png#x", ".png ", ".xpng", ".svgz"] {
            assert!(!is_image_extension(ext), "{ext:?} should be rejected");
        }
    }

    #[test]
    fn test_extension_for_mime() {
        assert_eq!(extension_for_image_mime("image/jpeg"), Some(".jpg"));
        assert_eq!(extension_for_image_mime("image/SVG+xml"), Some(".svg"));
        assert_eq!(extension_for_image_mime("image/webp; q=1"), Some(".webp"));
        assert_eq!(extension_for_image_mime("image/bmp"), None);
        assert_eq!(extension_for_image_mime("text/plain"), None);
    }
}
