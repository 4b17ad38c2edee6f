use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::users::models::{User, UserRole};
use crate::shared::validation::FIREBASE_UID_REGEX;

/// Request body for `POST /api/users`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterProfileDto {
    #[validate(regex(path = *FIREBASE_UID_REGEX, message = "Invalid firebaseUid"))]
    pub firebase_uid: String,

    #[validate(email(message = "Valid email required"))]
    pub email: String,

    #[validate(length(min = 1, max = 255, message = "Full name is required"))]
    pub full_name: String,

    /// citizen, authority or admin
    #[schema(example = "citizen")]
    pub role: String,

    /// Required for citizens and authorities
    pub ward: Option<String>,

    /// Required for authorities
    pub department: Option<String>,

    /// Required for admins; must match the server secret
    pub admin_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponseDto {
    pub firebase_uid: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponseDto {
    fn from(u: User) -> Self {
        Self {
            firebase_uid: u.firebase_uid,
            email: u.email,
            full_name: u.full_name,
            role: u.role,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterProfileResponseDto {
    pub message: String,
    pub user: UserResponseDto,
}
