use futures::future::join_all;
use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::ai::clients::{AiGateway, Detection};
use crate::features::ai::dtos::DetectionResultDto;
use crate::shared::media::UploadedImage;

/// Advisory AI calls proxied for the mobile client
pub struct AiService {
    gateway: Arc<dyn AiGateway>,
}

impl AiService {
    pub fn new(gateway: Arc<dyn AiGateway>) -> Self {
        Self { gateway }
    }

    /// Run detection on every image concurrently and report each outcome separately
    pub async fn detect_batch(&self, images: Vec<UploadedImage>) -> Result<Vec<DetectionResultDto>> {
        if images.is_empty() {
            return Err(AppError::BadRequest("No images uploaded".to_string()));
        }

        let outcomes = join_all(images.iter().map(|image| self.gateway.detect(image))).await;

        Ok(images
            .into_iter()
            .zip(outcomes)
            .enumerate()
            .map(|(index, (image, outcome))| match outcome {
                Ok(Detection { label, confidence }) => DetectionResultDto::Detected {
                    index,
                    filename: image.file_name,
                    label,
                    confidence,
                },
                Err(e) => {
                    tracing::warn!("Detection failed for image {} ({}): {}", index, image.file_name, e);
                    DetectionResultDto::Failed {
                        index,
                        filename: image.file_name,
                        error: e.detail(),
                    }
                }
            })
            .collect())
    }

    pub async fn detect_single(&self, image: UploadedImage) -> Result<Detection> {
        self.gateway.detect(&image).await
    }

    pub async fn generate_text(&self, prompt: Option<String>) -> Result<serde_json::Value> {
        let prompt = prompt
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| AppError::BadRequest("Prompt is required".to_string()))?;

        self.gateway.generate_text(&prompt).await
    }
}
