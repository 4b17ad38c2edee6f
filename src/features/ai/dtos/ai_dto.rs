use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-image outcome of a batch detection; one failure never hides the others
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum DetectionResultDto {
    Detected {
        index: usize,
        filename: String,
        label: String,
        confidence: f64,
    },
    Failed {
        index: usize,
        filename: String,
        error: String,
    },
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DetectBatchResponseDto {
    pub results: Vec<DetectionResultDto>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateTextDto {
    #[schema(example = "Write a short complaint title for a pothole near a school")]
    pub prompt: Option<String>,
}

/// Multipart form for batch detection (documentation only)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct DetectBatchForm {
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub images: Vec<String>,
}

/// Multipart form for single-image detection (documentation only)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct DetectSingleForm {
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub image: String,
}
