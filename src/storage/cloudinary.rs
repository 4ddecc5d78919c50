//! Image uploads to a Cloudinary unsigned upload preset

use reqwest::Client;
use serde::Deserialize;

use crate::error::CmsError;
use crate::upload::ImagePayload;

#[derive(Clone)]
pub struct CloudinaryStore {
    client: Client,
    endpoint: String,
    upload_preset: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: Option<ErrorMessage>,
}

#[derive(Deserialize)]
struct ErrorMessage {
    message: Option<String>,
}

impl CloudinaryStore {
    pub fn new(client: Client, base_url: &str, cloud_name: &str, upload_preset: &str) -> Self {
        Self {
            client,
            endpoint: format!(
                "{}/{cloud_name}/image/upload",
                base_url.trim_end_matches('/')
            ),
            upload_preset: upload_preset.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Upload the image and return the host's `secure_url`
    pub async fn store(&self, image: &ImagePayload) -> Result<String, CmsError> {
        let data_uri = image.to_data_uri();
        let form = [
            ("file", data_uri.as_str()),
            ("upload_preset", self.upload_preset.as_str()),
        ];
        let resp = self.client.post(&self.endpoint).form(&form).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let message = resp
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|e| e.error)
                .and_then(|e| e.message)
                .unwrap_or_else(|| "Cloudinary upload failed".to_string());
            crate::logger::log_error(&format!("Cloudinary returned HTTP {status}: {message}"));
            return Err(CmsError::Upstream(message));
        }

        let uploaded: UploadResponse = resp.json().await?;
        uploaded
            .secure_url
            .ok_or_else(|| CmsError::Upstream("Cloudinary response missing secure_url".to_string()))
    }
}
