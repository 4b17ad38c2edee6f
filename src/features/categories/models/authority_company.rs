use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Municipal body that complaints can be routed to
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct AuthorityCompany {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}
