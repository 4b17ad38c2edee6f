use std::sync::Arc;

use axum::{
    extract::{multipart::Field, Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppPath, AppQuery};
use crate::features::complaints::dtos::{
    ComplaintDetailDto, ComplaintListResponseDto, CreateComplaintForm,
    CreateComplaintResponseDto, DeleteComplaintDto, ListComplaintsQuery,
    RecommendAuthoritiesQuery, RecommendAuthoritiesResponseDto, UpdateComplaintStatusDto,
    UpdateComplaintStatusResponseDto,
};
use crate::features::complaints::models::CreateComplaint;
use crate::features::complaints::services::{
    ComplaintService, NewComplaint, RecommendationService, MISSING_FIELDS_MESSAGE,
};
use crate::shared::constants::{IMAGES_FIELD, MAX_IMAGES_PER_COMPLAINT};
use crate::shared::media::{read_image_field, UploadedImage};
use crate::shared::types::{MessageResponse, PaginationQuery};
use crate::shared::validation::{is_valid_latitude, is_valid_longitude, FIREBASE_UID_REGEX};

/// State for complaint handlers
#[derive(Clone)]
pub struct ComplaintState {
    pub complaint_service: Arc<ComplaintService>,
    pub recommendation_service: Arc<RecommendationService>,
}

/// Submit a complaint
///
/// Accepts multipart/form-data with `title`, `latitude`, `longitude`, `citizenUid`,
/// `categoryId`, one or more `images` parts and optional `description` and `authorityIds`.
/// The complaint, its photos and its authority assignments are stored together or not at all.
#[utoipa::path(
    post,
    path = "/api/complaints",
    request_body(
        content = CreateComplaintForm,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 201, description = "Complaint created", body = CreateComplaintResponseDto),
        (status = 400, description = "Missing or invalid fields", body = crate::shared::types::ErrorResponse),
        (status = 500, description = "Complaint creation failed; nothing was stored", body = crate::shared::types::ErrorResponse)
    ),
    tag = "complaints"
)]
pub async fn create_complaint(
    State(state): State<ComplaintState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CreateComplaintResponseDto>)> {
    let submission = read_submission(multipart).await?;
    let complaint = state.complaint_service.create_complaint(submission).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateComplaintResponseDto {
            message: "Complaint created successfully".to_string(),
            complaint,
        }),
    ))
}

/// List complaints
#[utoipa::path(
    get,
    path = "/api/complaints",
    params(ListComplaintsQuery),
    responses(
        (status = 200, description = "Page of complaints, newest first", body = ComplaintListResponseDto),
        (status = 400, description = "Invalid filter")
    ),
    tag = "complaints"
)]
pub async fn list_complaints(
    State(state): State<ComplaintState>,
    AppQuery(query): AppQuery<ListComplaintsQuery>,
) -> Result<Json<ComplaintListResponseDto>> {
    let response = state
        .complaint_service
        .list_complaints(
            query.status.as_deref(),
            query.category_id,
            None,
            pagination(&query),
        )
        .await?;
    Ok(Json(response))
}

/// List complaints submitted by one citizen
#[utoipa::path(
    get,
    path = "/api/complaints/citizen/{citizenUid}",
    params(
        ("citizenUid" = String, Path, description = "Firebase UID of the citizen"),
        ListComplaintsQuery
    ),
    responses(
        (status = 200, description = "Page of the citizen's complaints", body = ComplaintListResponseDto),
        (status = 400, description = "Invalid filter")
    ),
    tag = "complaints"
)]
pub async fn list_citizen_complaints(
    State(state): State<ComplaintState>,
    AppPath(citizen_uid): AppPath<String>,
    AppQuery(query): AppQuery<ListComplaintsQuery>,
) -> Result<Json<ComplaintListResponseDto>> {
    let response = state
        .complaint_service
        .list_complaints(
            query.status.as_deref(),
            query.category_id,
            Some(citizen_uid),
            pagination(&query),
        )
        .await?;
    Ok(Json(response))
}

/// Get complaint by ID with its category and images
#[utoipa::path(
    get,
    path = "/api/complaints/{id}",
    params(("id" = Uuid, Path, description = "Complaint ID")),
    responses(
        (status = 200, description = "Complaint found", body = ComplaintDetailDto),
        (status = 404, description = "Complaint not found")
    ),
    tag = "complaints"
)]
pub async fn get_complaint(
    State(state): State<ComplaintState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ComplaintDetailDto>> {
    let complaint = state.complaint_service.get_complaint(id).await?;
    Ok(Json(complaint))
}

/// Update complaint status
#[utoipa::path(
    patch,
    path = "/api/complaints/{id}/status",
    params(("id" = Uuid, Path, description = "Complaint ID")),
    request_body = UpdateComplaintStatusDto,
    responses(
        (status = 200, description = "Status updated", body = UpdateComplaintStatusResponseDto),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Complaint not found")
    ),
    tag = "complaints"
)]
pub async fn update_complaint_status(
    State(state): State<ComplaintState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(dto): AppJson<UpdateComplaintStatusDto>,
) -> Result<Json<UpdateComplaintStatusResponseDto>> {
    let complaint = state.complaint_service.update_status(id, dto).await?;
    Ok(Json(UpdateComplaintStatusResponseDto {
        message: "Complaint status updated successfully".to_string(),
        complaint,
    }))
}

/// Delete a complaint (owner only)
#[utoipa::path(
    delete,
    path = "/api/complaints/{id}",
    params(("id" = Uuid, Path, description = "Complaint ID")),
    request_body = DeleteComplaintDto,
    responses(
        (status = 200, description = "Complaint deleted", body = MessageResponse),
        (status = 403, description = "Caller does not own the complaint"),
        (status = 404, description = "Complaint not found")
    ),
    tag = "complaints"
)]
pub async fn delete_complaint(
    State(state): State<ComplaintState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(dto): AppJson<DeleteComplaintDto>,
) -> Result<Json<MessageResponse>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    state
        .complaint_service
        .delete_complaint(id, &dto.citizen_uid)
        .await?;
    Ok(Json(MessageResponse::new("Complaint deleted successfully")))
}

/// Recommend authorities for a complaint
///
/// Proxies the recommendation service and resolves each suggested authority's name.
#[utoipa::path(
    get,
    path = "/api/complaints/recommend-authorities",
    params(RecommendAuthoritiesQuery),
    responses(
        (status = 200, description = "Ranked recommendations", body = RecommendAuthoritiesResponseDto),
        (status = 400, description = "Missing required query parameters"),
        (status = 502, description = "Recommendation service failed")
    ),
    tag = "complaints"
)]
pub async fn recommend_authorities(
    State(state): State<ComplaintState>,
    AppQuery(query): AppQuery<RecommendAuthoritiesQuery>,
) -> Result<Json<RecommendAuthoritiesResponseDto>> {
    let recommendations = state.recommendation_service.recommend(query).await?;
    Ok(Json(RecommendAuthoritiesResponseDto { recommendations }))
}

fn pagination(query: &ListComplaintsQuery) -> PaginationQuery {
    let defaults = PaginationQuery::default();
    PaginationQuery::new(
        query.page.unwrap_or(defaults.page),
        query.limit.unwrap_or(defaults.limit),
    )
}

// =============================================================================
// MULTIPART
// =============================================================================

#[derive(Default)]
struct SubmissionFields {
    title: Option<String>,
    description: Option<String>,
    latitude: Option<String>,
    longitude: Option<String>,
    citizen_uid: Option<String>,
    category_id: Option<String>,
    authority_ids: Option<String>,
    images: Vec<UploadedImage>,
}

/// Read and validate the complaint form. No side effects.
async fn read_submission(mut multipart: Multipart) -> Result<NewComplaint> {
    let mut fields = SubmissionFields::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "title" => fields.title = Some(read_text(field, "title").await?),
            "description" => fields.description = Some(read_text(field, "description").await?),
            "latitude" => fields.latitude = Some(read_text(field, "latitude").await?),
            "longitude" => fields.longitude = Some(read_text(field, "longitude").await?),
            "citizenUid" => fields.citizen_uid = Some(read_text(field, "citizenUid").await?),
            "categoryId" => fields.category_id = Some(read_text(field, "categoryId").await?),
            "authorityIds" => {
                fields.authority_ids = Some(read_text(field, "authorityIds").await?)
            }
            name if name == IMAGES_FIELD || name == "images[]" => {
                if fields.images.len() == MAX_IMAGES_PER_COMPLAINT {
                    return Err(AppError::BadRequest(format!(
                        "Too many images. At most {} are allowed per complaint.",
                        MAX_IMAGES_PER_COMPLAINT
                    )));
                }
                fields.images.push(read_image_field(field).await?);
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    fields.into_submission()
}

async fn read_text(field: Field<'_>, name: &str) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read {} field: {}", name, e)))
}

impl SubmissionFields {
    fn into_submission(self) -> Result<NewComplaint> {
        let missing = || AppError::BadRequest(MISSING_FIELDS_MESSAGE.to_string());
        let present = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let title = present(self.title).ok_or_else(missing)?;
        let latitude = present(self.latitude).ok_or_else(missing)?;
        let longitude = present(self.longitude).ok_or_else(missing)?;
        let citizen_uid = present(self.citizen_uid).ok_or_else(missing)?;
        let category_id = present(self.category_id).ok_or_else(missing)?;
        if self.images.is_empty() {
            return Err(missing());
        }

        let latitude: f64 = latitude
            .parse()
            .map_err(|_| AppError::BadRequest("latitude must be a number.".to_string()))?;
        let longitude: f64 = longitude
            .parse()
            .map_err(|_| AppError::BadRequest("longitude must be a number.".to_string()))?;
        if !is_valid_latitude(latitude) || !is_valid_longitude(longitude) {
            return Err(AppError::BadRequest(format!(
                "Coordinates out of range: latitude must be within [-90, 90] and longitude within [-180, 180] (got {}, {}).",
                latitude, longitude
            )));
        }

        if !FIREBASE_UID_REGEX.is_match(&citizen_uid) {
            return Err(AppError::BadRequest("Invalid citizenUid.".to_string()));
        }

        let category_id: i32 = category_id
            .parse()
            .map_err(|_| AppError::BadRequest("categoryId must be an integer.".to_string()))?;

        let authority_ids = match present(self.authority_ids) {
            Some(raw) => parse_authority_ids(&raw)?,
            None => Vec::new(),
        };

        Ok(NewComplaint {
            complaint: CreateComplaint {
                title,
                description: present(self.description),
                latitude,
                longitude,
                citizen_uid,
                category_id,
            },
            authority_ids,
            images: self.images,
        })
    }
}

/// Accepts a JSON array (`[1,2]`) or a comma-separated list (`1,2`)
fn parse_authority_ids(raw: &str) -> Result<Vec<i32>> {
    let invalid = || {
        AppError::BadRequest(
            "authorityIds must be a JSON array or comma-separated list of integers.".to_string(),
        )
    };

    if raw.starts_with('[') {
        return serde_json::from_str(raw).map_err(|_| invalid());
    }

    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<i32>().map_err(|_| invalid()))
        .collect()
}
