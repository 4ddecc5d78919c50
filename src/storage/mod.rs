//! Storage backends
//!
//! The content document and uploaded assets each have one backend, chosen at
//! startup from the deployment mode and which credentials are present.
//!
//! | mode         | content           | assets              |
//! |--------------|-------------------|---------------------|
//! | `local`      | `data/content.json` | `data/uploads/`   |
//! | `serverless` | JSONBin (or none) | Cloudinary (or none) |
//!
//! A missing remote backend makes writes fail with 503; reads of the content
//! document always succeed through the bundled fallback.

pub mod cloudinary;
pub mod jsonbin;
pub mod local;
pub mod naming;

use std::path::{Path, PathBuf};

use reqwest::Client;
use serde_json::Value;

use crate::config::{Config, DeploymentMode};
use crate::error::CmsError;
use crate::logger;
use crate::upload::ImagePayload;

pub use cloudinary::CloudinaryStore;
pub use jsonbin::JsonBinStore;
pub use local::{DiskAssetStore, FileContentStore};

const CONTENT_NOT_CONFIGURED: &str = "Storage not configured. Set JSONBIN_BIN_ID and JSONBIN_API_KEY environment variables.";
const UPLOADS_NOT_CONFIGURED: &str = "Image uploads not configured. Set CLOUDINARY_CLOUD_NAME and CLOUDINARY_UPLOAD_PRESET environment variables.";

/// Where the content document lives
#[derive(Clone)]
pub enum ContentBackend {
    File(FileContentStore),
    JsonBin(JsonBinStore),
    Unconfigured,
}

/// The content document plus its bundled fallback copy
#[derive(Clone)]
pub struct ContentStore {
    backend: ContentBackend,
    fallback: PathBuf,
}

impl ContentStore {
    pub const fn new(backend: ContentBackend, fallback: PathBuf) -> Self {
        Self { backend, fallback }
    }

    pub fn from_config(config: &Config, client: &Client) -> Self {
        let backend = match config.server.mode {
            DeploymentMode::Local => {
                ContentBackend::File(FileContentStore::new(config.storage.content_file()))
            }
            DeploymentMode::Serverless => match config.jsonbin.credentials() {
                Some((bin_id, api_key)) => ContentBackend::JsonBin(JsonBinStore::new(
                    client.clone(),
                    &config.jsonbin.base_url,
                    bin_id,
                    api_key,
                )),
                None => ContentBackend::Unconfigured,
            },
        };
        Self::new(backend, config.storage.fallback_file())
    }

    pub fn describe(&self) -> String {
        match &self.backend {
            ContentBackend::File(store) => format!("file {}", store.path().display()),
            ContentBackend::JsonBin(store) => format!("jsonbin {}", store.bin_url()),
            ContentBackend::Unconfigured => "unconfigured (read-only fallback)".to_string(),
        }
    }

    /// Current document; never fails
    ///
    /// Falls back to the bundled copy, then to `{}`.
    pub async fn read(&self) -> Value {
        let loaded = match &self.backend {
            ContentBackend::File(store) => store.load().await,
            ContentBackend::JsonBin(store) => store.load().await,
            ContentBackend::Unconfigured => return read_fallback(&self.fallback).await,
        };
        match loaded {
            Ok(document) => document,
            Err(reason) => {
                logger::log_content_fallback(&reason);
                read_fallback(&self.fallback).await
            }
        }
    }

    /// Fail fast before the body is read when writes cannot succeed
    pub fn ensure_configured(&self) -> Result<(), CmsError> {
        match self.backend {
            ContentBackend::Unconfigured => {
                Err(CmsError::NotConfigured(CONTENT_NOT_CONFIGURED.to_string()))
            }
            _ => Ok(()),
        }
    }

    /// Replace the stored document
    pub async fn write(&self, document: &Value) -> Result<(), CmsError> {
        let written = match &self.backend {
            ContentBackend::File(store) => store.save(document).await?,
            ContentBackend::JsonBin(store) => store.save(document).await?,
            ContentBackend::Unconfigured => {
                return Err(CmsError::NotConfigured(CONTENT_NOT_CONFIGURED.to_string()))
            }
        };
        logger::log_content_saved(&self.describe(), written);
        Ok(())
    }
}

async fn read_fallback(path: &Path) -> Value {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
            logger::log_warning(&format!(
                "Fallback document {} is not valid JSON: {e}",
                path.display()
            ));
            empty_document()
        }),
        Err(e) => {
            logger::log_debug(&format!(
                "No fallback document at {}: {e}",
                path.display()
            ));
            empty_document()
        }
    }
}

fn empty_document() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Where uploaded images go
#[derive(Clone)]
pub enum AssetStore {
    Disk(DiskAssetStore),
    Cloudinary(CloudinaryStore),
    Unconfigured,
}

impl AssetStore {
    pub fn from_config(config: &Config, client: &Client) -> Self {
        match config.server.mode {
            DeploymentMode::Local => Self::Disk(DiskAssetStore::new(
                config.storage.uploads_dir(),
                &config.storage.uploads_url_prefix,
            )),
            DeploymentMode::Serverless => match config.cloudinary.credentials() {
                Some((cloud, preset)) => Self::Cloudinary(CloudinaryStore::new(
                    client.clone(),
                    &config.cloudinary.base_url,
                    cloud,
                    preset,
                )),
                None => Self::Unconfigured,
            },
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Disk(store) => format!("disk {}", store.dir().display()),
            Self::Cloudinary(store) => format!("cloudinary {}", store.endpoint()),
            Self::Unconfigured => "unconfigured".to_string(),
        }
    }

    /// Fail fast before the body is read when nothing can take the upload
    pub fn ensure_configured(&self) -> Result<(), CmsError> {
        match self {
            Self::Unconfigured => Err(CmsError::NotConfigured(UPLOADS_NOT_CONFIGURED.to_string())),
            _ => Ok(()),
        }
    }

    /// The directory and URL prefix uploads are served from, when on disk
    pub const fn local(&self) -> Option<&DiskAssetStore> {
        match self {
            Self::Disk(store) => Some(store),
            _ => None,
        }
    }

    /// Store the image and return its retrieval URL
    pub async fn store(&self, image: &ImagePayload) -> Result<String, CmsError> {
        let url = match self {
            Self::Disk(store) => store.store(image).await?,
            Self::Cloudinary(store) => store.store(image).await?,
            Self::Unconfigured => {
                return Err(CmsError::NotConfigured(UPLOADS_NOT_CONFIGURED.to_string()))
            }
        };
        logger::log_asset_stored(&url, image.bytes.len());
        Ok(url)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::config_with_dirs;

    #[tokio::test]
    async fn test_read_without_write_uses_fallback() {
        let data = tempfile::tempdir().unwrap();
        let site = tempfile::tempdir().unwrap();
        std::fs::write(site.path().join("content.json"), r#"{"hero":"Hello"}"#).unwrap();

        let cfg = config_with_dirs(data.path(), site.path(), DeploymentMode::Local);
        let store = ContentStore::from_config(&cfg, &Client::new());
        assert_eq!(store.read().await, serde_json::json!({"hero": "Hello"}));
    }

    #[tokio::test]
    async fn test_read_with_no_fallback_is_empty_object() {
        let data = tempfile::tempdir().unwrap();
        let site = tempfile::tempdir().unwrap();
        let cfg = config_with_dirs(data.path(), site.path(), DeploymentMode::Serverless);
        let store = ContentStore::from_config(&cfg, &Client::new());
        assert!(matches!(store.backend, ContentBackend::Unconfigured));
        assert_eq!(store.read().await, serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_unreachable_remote_falls_back() {
        let site = tempfile::tempdir().unwrap();
        std::fs::write(site.path().join("content.json"), r#"{"x":1}"#).unwrap();
        // Port 9 (discard) on loopback refuses connections
        let remote = JsonBinStore::new(Client::new(), "http://127.0.0.1:9", "bin", "key");
        let store = ContentStore::new(
            ContentBackend::JsonBin(remote),
            site.path().join("content.json"),
        );
        assert_eq!(store.read().await, serde_json::json!({"x": 1}));
    }

    #[tokio::test]
    async fn test_unconfigured_writes_are_503() {
        let data = tempfile::tempdir().unwrap();
        let cfg = config_with_dirs(data.path(), data.path(), DeploymentMode::Serverless);
        let client = Client::new();

        let content = ContentStore::from_config(&cfg, &client);
        let err = content.write(&serde_json::json!({})).await.unwrap_err();
        assert_eq!(err.status(), hyper::StatusCode::SERVICE_UNAVAILABLE);

        let assets = AssetStore::from_config(&cfg, &client);
        assert!(assets.local().is_none());
        assert!(matches!(
            assets.ensure_configured(),
            Err(CmsError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_serverless_with_credentials_picks_remote_backends() {
        let data = tempfile::tempdir().unwrap();
        let mut cfg = config_with_dirs(data.path(), data.path(), DeploymentMode::Serverless);
        cfg.jsonbin.bin_id = Some("bin".to_string());
        cfg.jsonbin.api_key = Some("key".to_string());
        cfg.cloudinary.cloud_name = Some("demo".to_string());
        cfg.cloudinary.upload_preset = Some("unsigned".to_string());
        let client = Client::new();

        let content = ContentStore::from_config(&cfg, &client);
        assert!(content.describe().starts_with("jsonbin "));
        let assets = AssetStore::from_config(&cfg, &client);
        assert!(assets.describe().contains("/demo/image/upload"));
        assert!(assets.ensure_configured().is_ok());
    }
}
