use serde::Deserialize;

use crate::config::Config;
use crate::error::AppError;

/// Client for the hosted image service. Profile pictures, cover images and
/// tweet media all pass through here: plain http(s) URLs are returned
/// unchanged, inline payloads (data URIs) are pushed to the upload endpoint
/// and exchanged for a stable URL.
#[derive(Clone)]
pub struct MediaClient {
    http: reqwest::Client,
    upload_url: Option<String>,
    upload_preset: Option<String>,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

impl MediaClient {
    pub fn from_config(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            upload_url: config.media_upload_url.clone(),
            upload_preset: config.media_upload_preset.clone(),
        }
    }

    /// Resolve a caller-supplied media reference to a hosted URL.
    ///
    /// Upload failures are the caller's problem (bad payload, host down) and
    /// surface as a 4xx, matching how profile/tweet creation reports them.
    pub async fn upload(&self, payload: &str) -> Result<String, AppError> {
        if payload.starts_with("http://") || payload.starts_with("https://") {
            return Ok(payload.to_string());
        }

        let upload_url = self
            .upload_url
            .as_deref()
            .ok_or_else(|| AppError::Validation("Media uploads are not configured".to_string()))?;

        let mut body = serde_json::json!({ "file": payload });
        if let Some(preset) = &self.upload_preset {
            body["upload_preset"] = serde_json::Value::String(preset.clone());
        }

        let response = self
            .http
            .post(upload_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Validation(format!("Media upload failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Validation(format!(
                "Media upload failed: host answered {}",
                response.status()
            )));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::Validation(format!("Media upload failed: {}", e)))?;

        Ok(uploaded.secure_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unconfigured() -> MediaClient {
        MediaClient {
            http: reqwest::Client::new(),
            upload_url: None,
            upload_preset: None,
        }
    }

    #[tokio::test]
    async fn test_url_passthrough() {
        let client = unconfigured();
        let url = "https://images.example.com/a.png";
        assert_eq!(client.upload(url).await.unwrap(), url);
    }

    #[tokio::test]
    async fn test_inline_payload_requires_configuration() {
        let client = unconfigured();
        let result = client.upload("data:image/png;base64,AAAA").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
