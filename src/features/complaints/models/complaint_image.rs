use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Stored photo belonging to a complaint
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ComplaintImage {
    pub id: Uuid,
    pub complaint_id: Uuid,
    pub image_url: String,
    /// Annotated copy produced by the detection service, when available
    pub processed_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}
