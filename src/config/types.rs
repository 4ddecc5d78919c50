// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub jsonbin: JsonBinConfig,
    #[serde(default)]
    pub cloudinary: CloudinaryConfig,
    pub http: HttpConfig,
    pub performance: PerformanceConfig,
    pub logging: LoggingConfig,
}

/// Deployment mode
///
/// `Local` keeps everything on disk and serves the site itself.
/// `Serverless` keeps content in the remote blob store and images on the media host.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentMode {
    #[default]
    Local,
    Serverless,
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Serverless => write!(f, "serverless"),
        }
    }
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    #[serde(default)]
    pub mode: DeploymentMode,
}

/// Admin credential
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    pub admin_password: String,
}

// Keep the secret out of `{:?}` output
impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("admin_password", &"<redacted>")
            .finish()
    }
}

/// Local paths used for content, uploads and the static site
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Holds `content.json` and the `uploads/` directory
    pub data_dir: PathBuf,
    /// Pre-built site files served by the static layer
    pub site_dir: PathBuf,
    /// Bundled fallback document, relative to `site_dir`
    pub fallback_content: PathBuf,
    /// URL prefix under which uploaded files are served
    pub uploads_url_prefix: String,
}

impl StorageConfig {
    pub fn content_file(&self) -> PathBuf {
        self.data_dir.join("content.json")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }

    pub fn fallback_file(&self) -> PathBuf {
        self.site_dir.join(&self.fallback_content)
    }
}

/// Remote JSON blob store (JSONBin v3 API)
#[derive(Clone, Deserialize)]
pub struct JsonBinConfig {
    #[serde(default)]
    pub bin_id: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_jsonbin_url")]
    pub base_url: String,
}

impl fmt::Debug for JsonBinConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonBinConfig")
            .field("bin_id", &self.bin_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Default for JsonBinConfig {
    fn default() -> Self {
        Self {
            bin_id: None,
            api_key: None,
            base_url: default_jsonbin_url(),
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_jsonbin_url() -> String {
    "https://api.jsonbin.io/v3".to_string()
}

/// Remote media host (Cloudinary unsigned upload API)
#[derive(Debug, Deserialize, Clone)]
pub struct CloudinaryConfig {
    #[serde(default)]
    pub cloud_name: Option<String>,
    #[serde(default)]
    pub upload_preset: Option<String>,
    #[serde(default = "default_cloudinary_url")]
    pub base_url: String,
}

impl Default for CloudinaryConfig {
    fn default() -> Self {
        Self {
            cloud_name: None,
            upload_preset: None,
            base_url: default_cloudinary_url(),
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_cloudinary_url() -> String {
    "https://api.cloudinary.com/v1_1".to_string()
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
    /// Timeout in seconds for calls to the blob store and media host
    pub upstream_timeout: u64,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}
