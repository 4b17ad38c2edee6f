use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppPath};
use crate::features::users::dtos::{
    RegisterProfileDto, RegisterProfileResponseDto, UserResponseDto,
};
use crate::features::users::services::UserService;

/// Register a user profile
///
/// The Firebase UID comes from the client's sign-in; the role-specific profile row
/// (citizen, authority or admin) is created together with the user.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = RegisterProfileDto,
    responses(
        (status = 201, description = "Profile created", body = RegisterProfileResponseDto),
        (status = 400, description = "Missing or invalid fields"),
        (status = 403, description = "Invalid admin code"),
        (status = 409, description = "Profile already exists")
    ),
    tag = "users"
)]
pub async fn register_profile(
    State(service): State<Arc<UserService>>,
    AppJson(dto): AppJson<RegisterProfileDto>,
) -> Result<(StatusCode, Json<RegisterProfileResponseDto>)> {
    let user = service.register(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterProfileResponseDto {
            message: "Profile created successfully".to_string(),
            user,
        }),
    ))
}

/// Get a user profile by Firebase UID
#[utoipa::path(
    get,
    path = "/api/users/{firebaseUid}",
    params(("firebaseUid" = String, Path, description = "Firebase UID")),
    responses(
        (status = 200, description = "Profile found", body = UserResponseDto),
        (status = 404, description = "Profile not found")
    ),
    tag = "users"
)]
pub async fn get_profile(
    State(service): State<Arc<UserService>>,
    AppPath(firebase_uid): AppPath<String>,
) -> Result<Json<UserResponseDto>> {
    let user = service.get_profile(&firebase_uid).await?;
    Ok(Json(user))
}
