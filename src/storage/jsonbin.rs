//! Remote content document on a JSONBin v3 bin

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::error::CmsError;

const MASTER_KEY_HEADER: &str = "X-Master-Key";

#[derive(Clone)]
pub struct JsonBinStore {
    client: Client,
    bin_url: String,
    api_key: String,
}

/// `GET /b/<id>/latest` wraps the document in `record`
#[derive(Deserialize)]
struct LatestResponse {
    record: Value,
}

impl JsonBinStore {
    pub fn new(client: Client, base_url: &str, bin_id: &str, api_key: &str) -> Self {
        Self {
            client,
            bin_url: format!("{}/b/{bin_id}", base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
        }
    }

    pub fn bin_url(&self) -> &str {
        &self.bin_url
    }

    pub async fn load(&self) -> Result<Value, String> {
        let resp = self
            .client
            .get(format!("{}/latest", self.bin_url))
            .header(MASTER_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| format!("JSONBin read failed: {e}"))?;
        if !resp.status().is_success() {
            return Err(format!("JSONBin read failed: HTTP {}", resp.status()));
        }
        let latest: LatestResponse = resp
            .json()
            .await
            .map_err(|e| format!("JSONBin read failed: {e}"))?;
        Ok(latest.record)
    }

    /// Overwrite the bin with `document`
    pub async fn save(&self, document: &Value) -> Result<usize, CmsError> {
        let body = serde_json::to_vec(document)
            .map_err(|e| CmsError::Storage(format!("Failed to save content: {e}")))?;
        let len = body.len();
        let resp = self
            .client
            .put(&self.bin_url)
            .header(MASTER_KEY_HEADER, &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| CmsError::Upstream(format!("Failed to save content: {e}")))?;
        if !resp.status().is_success() {
            crate::logger::log_error(&format!(
                "JSONBin write returned HTTP {}",
                resp.status()
            ));
            return Err(CmsError::Upstream(
                "Failed to save content: JSONBin write failed".to_string(),
            ));
        }
        Ok(len)
    }
}
