//! Disk-backed content document and uploads

use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::fs;

use super::naming::unique_asset_name;
use crate::error::CmsError;
use crate::upload::ImagePayload;

/// `content.json` on local disk
#[derive(Debug, Clone)]
pub struct FileContentStore {
    path: PathBuf,
}

impl FileContentStore {
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Value, String> {
        let text = fs::read_to_string(&self.path)
            .await
            .map_err(|e| format!("read {}: {e}", self.path.display()))?;
        serde_json::from_str(&text).map_err(|e| format!("parse {}: {e}", self.path.display()))
    }

    /// Replace the whole document, pretty-printed with 2-space indent
    pub async fn save(&self, document: &Value) -> Result<usize, CmsError> {
        let text = serde_json::to_string_pretty(document)
            .map_err(|e| CmsError::Storage(format!("Failed to save content: {e}")))?;
        fs::write(&self.path, &text).await.map_err(|e| {
            crate::logger::log_error(&format!(
                "Failed to write {}: {e}",
                self.path.display()
            ));
            CmsError::Storage("Failed to save content".to_string())
        })?;
        Ok(text.len())
    }
}

/// Uploads directory served back under a URL prefix
#[derive(Debug, Clone)]
pub struct DiskAssetStore {
    dir: PathBuf,
    url_prefix: String,
}

impl DiskAssetStore {
    pub fn new(dir: PathBuf, url_prefix: &str) -> Self {
        Self {
            dir,
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Write the image under a fresh name and return its URL
    pub async fn store(&self, image: &ImagePayload) -> Result<String, CmsError> {
        let name = unique_asset_name(&image.extension);
        let path = self.dir.join(&name);
        fs::write(&path, &image.bytes).await.map_err(|e| {
            crate::logger::log_error(&format!("Failed to write {}: {e}", path.display()));
            CmsError::Storage("Failed to store upload".to_string())
        })?;
        Ok(format!("{}/{name}", self.url_prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::body::Bytes;

    #[tokio::test]
    async fn test_content_roundtrip_replaces_whole_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileContentStore::new(dir.path().join("content.json"));
        assert!(store.load().await.is_err());

        store.save(&serde_json::json!({"b": 2})).await.unwrap();
        store.save(&serde_json::json!({"a": 1})).await.unwrap();
        assert_eq!(store.load().await.unwrap(), serde_json::json!({"a": 1}));

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(text, "{\n  \"a\": 1\n}");
    }

    #[tokio::test]
    async fn test_save_into_missing_dir_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileContentStore::new(dir.path().join("missing/content.json"));
        let err = store.save(&serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, CmsError::Storage(_)));
    }

    #[tokio::test]
    async fn test_asset_store_writes_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskAssetStore::new(dir.path().to_path_buf(), "/uploads/");
        let image = ImagePayload {
            bytes: Bytes::from_static(b"GIF89a..."),
            mime_type: "image/gif".to_string(),
            extension: ".gif".to_string(),
        };
        let url = store.store(&image).await.unwrap();
        let name = url.strip_prefix("/uploads/").unwrap();
        assert!(name.ends_with(".gif"));
        assert_eq!(std::fs::read(dir.path().join(name)).unwrap(), b"GIF89a...");
    }
}
