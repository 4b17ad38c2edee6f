use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponseDto {
    pub ok: bool,
    /// Deployment name, e.g. "development" or "production"
    pub env: String,
    pub db_connected: bool,
}
