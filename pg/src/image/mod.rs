//! Image generation from a composed prompt

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{ImageConfig, LlmConfig};
use crate::llm::LlmError;

/// Where a generated image can be fetched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageReference {
    pub url: String,
    /// Prompt as rewritten by the image model, when it reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
}

/// Renders an image for a text prompt
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<ImageReference, LlmError>;
}

/// OpenAI Images API client
pub struct OpenAIImageClient {
    model: String,
    size: String,
    quality: String,
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenAIImageClient {
    /// Create a client; credentials and base URL come from the model config
    pub fn from_config(llm: &LlmConfig, image: &ImageConfig) -> Result<Self, LlmError> {
        debug!(model = %image.model, size = %image.size, "OpenAIImageClient::from_config: called");
        let api_key = llm.get_api_key().map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
        let http = Client::builder()
            .timeout(Duration::from_millis(image.timeout_ms))
            .build()
            .map_err(LlmError::Network)?;

        Ok(Self {
            model: image.model.clone(),
            size: image.size.clone(),
            quality: image.quality.clone(),
            api_key,
            base_url: llm.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn build_request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "size": self.size,
            "quality": self.quality,
            "n": 1,
        })
    }
}

#[async_trait]
impl ImageGenerator for OpenAIImageClient {
    async fn generate(&self, prompt: &str) -> Result<ImageReference, LlmError> {
        debug!(%self.model, prompt_len = prompt.len(), "generate: called");
        let url = format!("{}/v1/images/generations", self.base_url);

        let response = self
            .http
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&self.build_request_body(prompt))
            .send()
            .await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            debug!(%status, "generate: API error");
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, message: text });
        }

        let body: ImagesResponse = response.json().await?;
        let image = body
            .data
            .into_iter()
            .find_map(|d| {
                d.url.map(|url| ImageReference {
                    url,
                    revised_prompt: d.revised_prompt,
                })
            })
            .ok_or_else(|| LlmError::InvalidResponse("image response contained no URL".to_string()))?;

        info!(url = %image.url, "Image generated");
        Ok(image)
    }
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
    revised_prompt: Option<String>,
}
