use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::complaints::models::{
    Complaint, ComplaintCategory, ComplaintDetails, ComplaintImage, ComplaintStatus,
};
use crate::shared::types::PaginationMeta;
use crate::shared::validation::FIREBASE_UID_REGEX;

// =============================================================================
// RESPONSES
// =============================================================================

/// Complaint row as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintResponseDto {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub citizen_uid: String,
    pub category_id: i32,
    pub current_status: ComplaintStatus,
    pub status_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Complaint> for ComplaintResponseDto {
    fn from(c: Complaint) -> Self {
        Self {
            id: c.id,
            title: c.title,
            description: c.description,
            latitude: c.latitude,
            longitude: c.longitude,
            citizen_uid: c.citizen_uid,
            category_id: c.category_id,
            current_status: c.current_status,
            status_notes: c.status_notes,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComplaintCategoryDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

impl From<ComplaintCategory> for ComplaintCategoryDto {
    fn from(c: ComplaintCategory) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintImageDto {
    pub id: Uuid,
    pub complaint_id: Uuid,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    #[serde(rename = "processedImageURL")]
    pub processed_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ComplaintImage> for ComplaintImageDto {
    fn from(i: ComplaintImage) -> Self {
        Self {
            id: i.id,
            complaint_id: i.complaint_id,
            image_url: i.image_url,
            processed_image_url: i.processed_image_url,
            created_at: i.created_at,
        }
    }
}

/// Complaint with its category, images and assigned authorities
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintDetailDto {
    #[serde(flatten)]
    pub complaint: ComplaintResponseDto,
    pub category: Option<ComplaintCategoryDto>,
    pub images: Vec<ComplaintImageDto>,
    pub authority_ids: Vec<i32>,
}

impl From<ComplaintDetails> for ComplaintDetailDto {
    fn from(d: ComplaintDetails) -> Self {
        Self {
            complaint: d.complaint.into(),
            category: d.category.map(Into::into),
            images: d.images.into_iter().map(Into::into).collect(),
            authority_ids: d.authority_ids,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateComplaintResponseDto {
    pub message: String,
    pub complaint: ComplaintDetailDto,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComplaintListResponseDto {
    pub complaints: Vec<ComplaintDetailDto>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateComplaintStatusResponseDto {
    pub message: String,
    pub complaint: ComplaintResponseDto,
}

// =============================================================================
// REQUESTS
// =============================================================================

/// Multipart form accepted by `POST /api/complaints` (documentation only).
///
/// The handler reads the fields one by one with axum's `Multipart` extractor.
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct CreateComplaintForm {
    #[schema(example = "Deep pothole on Airport Road")]
    pub title: String,
    pub description: Option<String>,
    #[schema(example = 23.8103)]
    pub latitude: f64,
    #[schema(example = 90.4125)]
    pub longitude: f64,
    pub citizen_uid: String,
    #[schema(example = 1)]
    pub category_id: i32,
    /// JSON array (`[1,2]`) or comma-separated list of authority company ids
    #[schema(example = "[1,2]")]
    pub authority_ids: Option<String>,
    /// One part per photo, in display order
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub images: Vec<String>,
}

/// Body for `PATCH /api/complaints/{id}/status`
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateComplaintStatusDto {
    /// One of pending, in_progress, resolved, closed, rejected
    #[schema(example = "in_progress")]
    pub current_status: String,
    /// Omit to keep the existing notes
    pub status_notes: Option<String>,
}

/// Body for `DELETE /api/complaints/{id}`
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteComplaintDto {
    #[validate(regex(path = *FIREBASE_UID_REGEX, message = "citizenUid is required."))]
    pub citizen_uid: String,
}

/// Filters for listing complaints
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct ListComplaintsQuery {
    /// pending, in_progress, resolved, closed or rejected
    pub status: Option<String>,
    pub category_id: Option<i32>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Query for `GET /api/complaints/recommend-authorities`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct RecommendAuthoritiesQuery {
    pub category: Option<String>,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Human readable address of the complaint location
    pub location_string: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorityRecommendationDto {
    pub authority_id: i32,
    pub authority_name: String,
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecommendAuthoritiesResponseDto {
    pub recommendations: Vec<AuthorityRecommendationDto>,
}
