use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Complaint category (seeded reference data)
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}
