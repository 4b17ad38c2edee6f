use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::features::health::dtos::HealthResponseDto;
use crate::features::health::services::HealthService;

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is running")),
    tag = "health"
)]
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Service status including database connectivity
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service status", body = HealthResponseDto)),
    tag = "health"
)]
pub async fn health_status(State(service): State<Arc<HealthService>>) -> Json<HealthResponseDto> {
    Json(service.status().await)
}
