use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use serde::Serialize;
use std::time::Duration;

use slide_common::{GenerationSettings, Resolution};

use crate::decoder::ByteStream;
use crate::error::{GenerationError, Result};

pub const ASPECT_RATIO: &str = "16:9";
/// Bounds the whole streamed generation request, body included.
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(300);
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawRequest {
    pub model: String,
    pub prompt: String,
    pub aspect_ratio: String,
    pub image_size: Resolution,
}

impl DrawRequest {
    pub fn new(model: &str, prompt: &str, image_size: Resolution) -> Self {
        Self {
            model: model.to_string(),
            prompt: prompt.to_string(),
            aspect_ratio: ASPECT_RATIO.to_string(),
            image_size,
        }
    }
}

/// The two calls a slide needs from the generation service.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Submit one generation job and hand back its streamed response body.
    async fn submit(&self, prompt: &str, image_size: Resolution) -> Result<ByteStream>;

    /// Fetch a finished image.
    async fn download(&self, url: &str) -> Result<Bytes>;
}

pub struct HttpGenerationClient {
    http: reqwest::Client,
    settings: GenerationSettings,
}

impl HttpGenerationClient {
    pub fn new(settings: GenerationSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }
}

#[async_trait]
impl GenerationBackend for HttpGenerationClient {
    async fn submit(&self, prompt: &str, image_size: Resolution) -> Result<ByteStream> {
        let endpoint = self.settings.endpoint();
        let body = DrawRequest::new(&self.settings.model, prompt, image_size);
        tracing::debug!("POST {endpoint} (model {}, size {image_size})", body.model);

        let resp = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.settings.api_key)
            .header("content-type", "application/json")
            .timeout(GENERATION_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        tracing::debug!("Response status: {status}");
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_else(|e| {
                tracing::debug!("Failed to read error body: {e}");
                String::new()
            });
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp
            .bytes_stream()
            .map(|chunk| chunk.map_err(GenerationError::from))
            .boxed())
    }

    async fn download(&self, url: &str) -> Result<Bytes> {
        tracing::debug!("GET {url}");
        let resp = self
            .http
            .get(url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.bytes().await?)
    }
}
