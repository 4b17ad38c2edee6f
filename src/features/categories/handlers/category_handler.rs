use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::core::extractor::AppQuery;
use crate::features::categories::dtos::{
    AuthorityCompanyQuery, AuthorityCompanyResponseDto, CategoryResponseDto,
};
use crate::features::categories::services::CategoryService;

/// List complaint categories
#[utoipa::path(
    get,
    path = "/api/complaints/categories",
    responses(
        (status = 200, description = "All complaint categories", body = Vec<CategoryResponseDto>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<Vec<CategoryResponseDto>>> {
    let categories = service.list_categories().await?;
    Ok(Json(categories))
}

/// List authority companies
///
/// Pass `categoryId` to get only the companies that handle that category.
#[utoipa::path(
    get,
    path = "/api/authority-companies",
    params(AuthorityCompanyQuery),
    responses(
        (status = 200, description = "Authority companies", body = Vec<AuthorityCompanyResponseDto>),
        (status = 400, description = "Malformed query")
    ),
    tag = "categories"
)]
pub async fn list_authority_companies(
    State(service): State<Arc<CategoryService>>,
    AppQuery(query): AppQuery<AuthorityCompanyQuery>,
) -> Result<Json<Vec<AuthorityCompanyResponseDto>>> {
    let companies = service.list_authority_companies(query.category_id).await?;
    Ok(Json(companies))
}
