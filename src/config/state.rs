// Application state module
// Shared, read-only after startup

use std::time::Duration;

use subtle::ConstantTimeEq;

use super::types::Config;
use crate::storage::{AssetStore, ContentStore};

/// Application state
pub struct AppState {
    pub config: Config,
    pub content: ContentStore,
    pub assets: AssetStore,
}

impl AppState {
    /// Build state with one shared outbound HTTP client
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(format!("{}/{}", config.http.server_name, env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.http.upstream_timeout))
            .build()?;

        Ok(Self {
            content: ContentStore::from_config(config, &client),
            assets: AssetStore::from_config(config, &client),
            config: config.clone(),
        })
    }

    /// Admin credential check, constant-time over equal-length inputs
    pub fn is_authorized(&self, provided: Option<&str>) -> bool {
        let secret = self.config.auth.admin_password.as_bytes();
        provided.is_some_and(|p| p.as_bytes().ct_eq(secret).into())
    }
}
