use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};
use crate::shared::media::UploadedImage;

/// Output of the pothole detector for one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Detection {
    #[schema(example = "Pothole")]
    pub label: String,
    /// Percentage in 0..=100
    #[schema(example = 87.5)]
    pub confidence: f64,
}

/// External detection and text-generation services
#[async_trait]
pub trait AiGateway: Send + Sync {
    async fn detect(&self, image: &UploadedImage) -> Result<Detection>;

    /// Returns the upstream JSON unchanged
    async fn generate_text(&self, prompt: &str) -> Result<serde_json::Value>;
}

pub struct HttpAiGateway {
    client: reqwest::Client,
    detection_url: String,
    text_url: String,
}

impl HttpAiGateway {
    pub fn new(ai_service_url: &str, text_service_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            detection_url: format!("{}/detect", ai_service_url.trim_end_matches('/')),
            text_url: format!("{}/generate", text_service_url.trim_end_matches('/')),
        })
    }

    async fn send(&self, request: reqwest::RequestBuilder, what: &str) -> Result<reqwest::Response> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("{} request failed: {:?}", what, e);
            AppError::ExternalServiceError(format!("{} failed", what))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("{} returned {}: {}", what, status, body);
            return Err(AppError::ExternalServiceError(format!("{} failed", what)));
        }

        Ok(response)
    }
}

#[async_trait]
impl AiGateway for HttpAiGateway {
    async fn detect(&self, image: &UploadedImage) -> Result<Detection> {
        let part = Part::bytes(image.data.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)
            .map_err(|e| AppError::BadRequest(format!("Invalid image content type: {}", e)))?;
        let form = Form::new().part("image", part);

        let response = self
            .send(
                self.client.post(&self.detection_url).multipart(form),
                "AI detection",
            )
            .await?;

        response.json::<Detection>().await.map_err(|e| {
            tracing::error!("Failed to parse detection response: {:?}", e);
            AppError::ExternalServiceError("AI detection returned an unexpected body".to_string())
        })
    }

    async fn generate_text(&self, prompt: &str) -> Result<serde_json::Value> {
        let response = self
            .send(
                self.client
                    .post(&self.text_url)
                    .json(&serde_json::json!({ "prompt": prompt })),
                "Text generation",
            )
            .await?;

        response.json().await.map_err(|e| {
            tracing::error!("Failed to parse text generation response: {:?}", e);
            AppError::ExternalServiceError(
                "Text generation returned an unexpected body".to_string(),
            )
        })
    }
}
