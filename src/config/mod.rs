// Configuration module entry point
// Loads layered configuration and builds the shared application state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    AuthConfig, CloudinaryConfig, Config, DeploymentMode, HttpConfig, JsonBinConfig,
    LoggingConfig, PerformanceConfig, ServerConfig, StorageConfig,
};

/// Password used when none is configured
pub const DEFAULT_ADMIN_PASSWORD: &str = "111825";

/// Environment names understood for compatibility with existing deployments
const LEGACY_ENV_OVERRIDES: [(&str, &str); 6] = [
    ("server.port", "PORT"),
    ("auth.admin_password", "ADMIN_PASSWORD"),
    ("jsonbin.bin_id", "JSONBIN_BIN_ID"),
    ("jsonbin.api_key", "JSONBIN_API_KEY"),
    ("cloudinary.cloud_name", "CLOUDINARY_CLOUD_NAME"),
    ("cloudinary.upload_preset", "CLOUDINARY_UPLOAD_PRESET"),
];

impl Config {
    /// Load configuration from `config_path` (extension optional, file optional)
    ///
    /// Environment wins over the file: `CMS_SERVER__PORT=8080`, and the plain
    /// `PORT`/`ADMIN_PASSWORD`/`JSONBIN_*`/`CLOUDINARY_*` names above all.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("CMS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.mode", "local")?
            .set_default("auth.admin_password", DEFAULT_ADMIN_PASSWORD)?
            .set_default("storage.data_dir", "data")?
            .set_default("storage.site_dir", ".")?
            .set_default("storage.fallback_content", "content.json")?
            .set_default("storage.uploads_url_prefix", "/uploads")?
            .set_default("http.server_name", "sitecms")?
            .set_default("http.enable_cors", true)?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("http.upstream_timeout", 30)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?;

        for (key, var) in LEGACY_ENV_OVERRIDES {
            let value = std::env::var(var).ok().filter(|v| !v.is_empty());
            builder = builder.set_override_option(key, value)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    pub fn uses_default_password(&self) -> bool {
        self.auth.admin_password == DEFAULT_ADMIN_PASSWORD
    }
}

impl JsonBinConfig {
    /// Bin id and master key, only when both are set
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.bin_id.as_deref(), self.api_key.as_deref()) {
            (Some(id), Some(key)) if !id.is_empty() && !key.is_empty() => Some((id, key)),
            _ => None,
        }
    }
}

impl CloudinaryConfig {
    /// Cloud name and unsigned upload preset, only when both are set
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.cloud_name.as_deref(), self.upload_preset.as_deref()) {
            (Some(cloud), Some(preset)) if !cloud.is_empty() && !preset.is_empty() => {
                Some((cloud, preset))
            }
            _ => None,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_defaults_load_without_file() {
        let cfg = Config::load_from("nonexistent-test-config").unwrap();
        assert_eq!(cfg.storage.uploads_url_prefix, "/uploads");
        assert_eq!(cfg.http.max_body_size, 10_485_760);
        assert!(cfg.http.enable_cors);
        assert_eq!(cfg.jsonbin.base_url, "https://api.jsonbin.io/v3");
        assert_eq!(cfg.cloudinary.base_url, "https://api.cloudinary.com/v1_1");
    }

    #[test]
    fn test_storage_paths() {
        let cfg = Config::load_from("nonexistent-test-config").unwrap();
        assert_eq!(
            cfg.storage.content_file(),
            Path::new("data").join("content.json")
        );
        assert_eq!(cfg.storage.uploads_dir(), Path::new("data").join("uploads"));
    }

    #[test]
    fn test_credentials_require_both_values() {
        let mut bin = JsonBinConfig::default();
        assert!(bin.credentials().is_none());
        bin.bin_id = Some("abc".to_string());
        assert!(bin.credentials().is_none());
        bin.api_key = Some(String::new());
        assert!(bin.credentials().is_none());
        bin.api_key = Some("key".to_string());
        assert_eq!(bin.credentials(), Some(("abc", "key")));

        let mut media = CloudinaryConfig::default();
        media.cloud_name = Some("demo".to_string());
        assert!(media.credentials().is_none());
        media.upload_preset = Some("unsigned".to_string());
        assert_eq!(media.credentials(), Some(("demo", "unsigned")));
    }

    #[test]
    fn test_auth_debug_redacts_password() {
        let auth = AuthConfig {
            admin_password: "hunter2".to_string(),
        };
        assert!(!format!("{auth:?}").contains("hunter2"));
    }
}
