use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::ai::clients::Detection;
use crate::features::ai::dtos::{
    DetectBatchForm, DetectBatchResponseDto, DetectSingleForm, GenerateTextDto,
};
use crate::features::ai::services::AiService;
use crate::shared::constants::{IMAGES_FIELD, MAX_IMAGES_PER_COMPLAINT};
use crate::shared::media::{read_image_field, UploadedImage};

/// Detect potholes in one or more images
///
/// Every image is analysed independently; failures are reported per image.
#[utoipa::path(
    post,
    path = "/api/ai/detect",
    request_body(content = DetectBatchForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "One result per uploaded image", body = DetectBatchResponseDto),
        (status = 400, description = "No images uploaded")
    ),
    tag = "ai"
)]
pub async fn detect(
    State(service): State<Arc<AiService>>,
    mut multipart: Multipart,
) -> Result<Json<DetectBatchResponseDto>> {
    let mut images: Vec<UploadedImage> = Vec::new();

    while let Some(field) = next_field(&mut multipart).await? {
        let name = field.name().unwrap_or("").to_string();
        if name == IMAGES_FIELD || name == "images[]" {
            if images.len() == MAX_IMAGES_PER_COMPLAINT {
                return Err(AppError::BadRequest(format!(
                    "Too many images. At most {} are allowed.",
                    MAX_IMAGES_PER_COMPLAINT
                )));
            }
            images.push(read_image_field(field).await?);
        } else {
            debug!("Ignoring unknown field: {}", name);
        }
    }

    let results = service.detect_batch(images).await?;
    Ok(Json(DetectBatchResponseDto { results }))
}

/// Detect a pothole in a single image
#[utoipa::path(
    post,
    path = "/api/ai/detect-pothole",
    request_body(content = DetectSingleForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Detection result", body = Detection),
        (status = 400, description = "No image uploaded"),
        (status = 502, description = "Detection service failed")
    ),
    tag = "ai"
)]
pub async fn detect_pothole(
    State(service): State<Arc<AiService>>,
    mut multipart: Multipart,
) -> Result<Json<Detection>> {
    let mut image = None;

    while let Some(field) = next_field(&mut multipart).await? {
        if field.name() == Some("image") {
            image = Some(read_image_field(field).await?);
        }
    }

    let image = image.ok_or_else(|| AppError::BadRequest("Image is required".to_string()))?;
    let detection = service.detect_single(image).await?;
    Ok(Json(detection))
}

/// Generate text from a prompt
#[utoipa::path(
    post,
    path = "/api/ai/generate-text",
    request_body = GenerateTextDto,
    responses(
        (status = 200, description = "Upstream response, unchanged", body = serde_json::Value),
        (status = 400, description = "Prompt is required"),
        (status = 502, description = "Text generation failed")
    ),
    tag = "ai"
)]
pub async fn generate_text(
    State(service): State<Arc<AiService>>,
    AppJson(dto): AppJson<GenerateTextDto>,
) -> Result<Json<serde_json::Value>> {
    let generated = service.generate_text(dto.prompt).await?;
    Ok(Json(generated))
}

async fn next_field(
    multipart: &mut Multipart,
) -> Result<Option<axum::extract::multipart::Field<'_>>> {
    multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })
}
