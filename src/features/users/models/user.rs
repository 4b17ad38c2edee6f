use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::str::FromStr;
use utoipa::ToSchema;

/// Role stored on the user row (`user_role` enum)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Citizen,
    Authority,
    Admin,
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "citizen" => Ok(UserRole::Citizen),
            "authority" => Ok(UserRole::Authority),
            "admin" => Ok(UserRole::Admin),
            _ => Err("Invalid role. Must be one of: citizen, authority, admin".to_string()),
        }
    }
}

/// Database model for users
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct User {
    pub firebase_uid: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Role-specific profile data; exactly one side row is written per variant
#[derive(Debug, Clone, PartialEq)]
pub enum RoleProfile {
    Citizen { ward: String },
    Authority { department: String, ward: String },
    Admin,
}

impl RoleProfile {
    pub fn role(&self) -> UserRole {
        match self {
            RoleProfile::Citizen { .. } => UserRole::Citizen,
            RoleProfile::Authority { .. } => UserRole::Authority,
            RoleProfile::Admin => UserRole::Admin,
        }
    }
}

/// Validated registration ready to persist
#[derive(Debug, Clone)]
pub struct NewUser {
    pub firebase_uid: String,
    pub email: String,
    pub full_name: String,
    pub profile: RoleProfile,
}
