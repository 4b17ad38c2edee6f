use utoipa::{Modify, OpenApi};

use crate::features::ai::{clients as ai_clients, dtos as ai_dtos, handlers as ai_handlers};
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::complaints::{
    dtos as complaints_dtos, handlers as complaints_handlers, models as complaints_models,
};
use crate::features::health::{dtos as health_dtos, handlers as health_handlers};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers, models as users_models};
use crate::shared::types::{ErrorResponse, MessageResponse, PaginationMeta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health_handlers::liveness,
        health_handlers::health_status,
        // Users
        users_handlers::register_profile,
        users_handlers::get_profile,
        // Categories
        categories_handlers::list_categories,
        categories_handlers::list_authority_companies,
        // Complaints
        complaints_handlers::create_complaint,
        complaints_handlers::list_complaints,
        complaints_handlers::list_citizen_complaints,
        complaints_handlers::get_complaint,
        complaints_handlers::update_complaint_status,
        complaints_handlers::delete_complaint,
        complaints_handlers::recommend_authorities,
        // AI
        ai_handlers::detect,
        ai_handlers::detect_pothole,
        ai_handlers::generate_text,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            MessageResponse,
            PaginationMeta,
            // Health
            health_dtos::HealthResponseDto,
            // Users
            users_models::UserRole,
            users_dtos::RegisterProfileDto,
            users_dtos::UserResponseDto,
            users_dtos::RegisterProfileResponseDto,
            // Categories
            categories_dtos::CategoryResponseDto,
            categories_dtos::AuthorityCompanyResponseDto,
            // Complaints
            complaints_models::ComplaintStatus,
            complaints_dtos::ComplaintResponseDto,
            complaints_dtos::ComplaintCategoryDto,
            complaints_dtos::ComplaintImageDto,
            complaints_dtos::ComplaintDetailDto,
            complaints_dtos::CreateComplaintForm,
            complaints_dtos::CreateComplaintResponseDto,
            complaints_dtos::ComplaintListResponseDto,
            complaints_dtos::UpdateComplaintStatusDto,
            complaints_dtos::UpdateComplaintStatusResponseDto,
            complaints_dtos::DeleteComplaintDto,
            complaints_dtos::AuthorityRecommendationDto,
            complaints_dtos::RecommendAuthoritiesResponseDto,
            // AI
            ai_clients::Detection,
            ai_dtos::DetectionResultDto,
            ai_dtos::DetectBatchResponseDto,
            ai_dtos::DetectBatchForm,
            ai_dtos::DetectSingleForm,
            ai_dtos::GenerateTextDto,
        )
    ),
    tags(
        (name = "health", description = "Service status"),
        (name = "users", description = "Citizen, authority and admin profiles"),
        (name = "categories", description = "Complaint categories and authority companies"),
        (name = "complaints", description = "Complaint submission, tracking and routing"),
        (name = "ai", description = "Pothole detection and text generation proxies"),
    ),
    info(
        title = "CityZen API",
        version = "0.1.0",
        description = "API documentation for CityZen",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
