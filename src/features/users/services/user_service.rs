use std::sync::Arc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::users::dtos::{RegisterProfileDto, UserResponseDto};
use crate::features::users::models::{NewUser, RoleProfile, UserRole};
use crate::features::users::repositories::UserRepository;

pub const INVALID_ADMIN_CODE: &str = "Invalid Admin Code provided.";

/// Profile registration and lookup keyed by Firebase UID
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    admin_code_secret: Option<String>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, admin_code_secret: Option<String>) -> Self {
        Self {
            repository,
            admin_code_secret: admin_code_secret.filter(|s| !s.is_empty()),
        }
    }

    /// Validate the request and create the user with its role side row.
    ///
    /// Every check runs before anything is written.
    pub async fn register(&self, dto: RegisterProfileDto) -> Result<UserResponseDto> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let profile = self.role_profile(&dto)?;
        let new_user = NewUser {
            firebase_uid: dto.firebase_uid,
            email: dto.email,
            full_name: dto.full_name.trim().to_string(),
            profile,
        };

        let user = self.repository.create_profile(&new_user).await?;
        tracing::info!("Registered {:?} profile for {}", user.role, user.firebase_uid);
        Ok(user.into())
    }

    fn role_profile(&self, dto: &RegisterProfileDto) -> Result<RoleProfile> {
        let given = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let role: UserRole = dto.role.parse().map_err(AppError::BadRequest)?;
        match role {
            UserRole::Citizen => {
                let ward = given(&dto.ward).ok_or_else(|| {
                    AppError::BadRequest("Citizen signup requires a Ward/Area.".to_string())
                })?;
                Ok(RoleProfile::Citizen { ward })
            }
            UserRole::Authority => match (given(&dto.department), given(&dto.ward)) {
                (Some(department), Some(ward)) => Ok(RoleProfile::Authority { department, ward }),
                _ => Err(AppError::BadRequest(
                    "Authority requires Department and Ward.".to_string(),
                )),
            },
            UserRole::Admin => {
                let matches = match (&self.admin_code_secret, dto.admin_code.as_deref()) {
                    (Some(secret), Some(code)) => secret == code,
                    _ => false,
                };
                if !matches {
                    tracing::warn!("Rejected admin signup for {}", dto.firebase_uid);
                    return Err(AppError::Forbidden(INVALID_ADMIN_CODE.to_string()));
                }
                Ok(RoleProfile::Admin)
            }
        }
    }

    pub async fn get_profile(&self, firebase_uid: &str) -> Result<UserResponseDto> {
        self.repository
            .find_by_uid(firebase_uid)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("User profile not found in database.".to_string()))
    }
}
