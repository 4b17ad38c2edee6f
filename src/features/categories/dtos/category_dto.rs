use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::categories::models::{AuthorityCompany, Category};

/// Response DTO for category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
        }
    }
}

/// Response DTO for authority company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuthorityCompanyResponseDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

impl From<AuthorityCompany> for AuthorityCompanyResponseDto {
    fn from(a: AuthorityCompany) -> Self {
        Self {
            id: a.id,
            name: a.name,
            description: a.description,
        }
    }
}

/// Query params for listing authority companies
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct AuthorityCompanyQuery {
    /// Only companies handling this category
    pub category_id: Option<i32>,
}
