use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::post, Router};

use crate::features::ai::handlers;
use crate::features::ai::services::AiService;
use crate::shared::constants::MAX_UPLOAD_BODY_SIZE;

/// Create routes for the AI proxy feature
pub fn routes(service: Arc<AiService>) -> Router {
    Router::new()
        .route("/api/ai/detect", post(handlers::detect))
        .route("/api/ai/detect-pothole", post(handlers::detect_pothole))
        .route("/api/ai/generate-text", post(handlers::generate_text))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_SIZE))
        .with_state(service)
}
