use async_trait::async_trait;
use chrono::Utc;

use crate::core::error::Result;
use crate::features::categories::models::{AuthorityCompany, Category};
use crate::features::categories::repositories::CategoryRepository;

const CATEGORIES: [(i32, &str); 6] = [
    (1, "Roads & Transport"),
    (2, "Garbage & Waste Management"),
    (3, "Streetlights & Electrical"),
    (4, "Water Supply & Drains"),
    (5, "Buildings & Infrastructure"),
    (6, "Environment & Public Spaces"),
];

const AUTHORITY_COMPANIES: [(i32, &str); 6] = [
    (1, "DNCC (Dhaka North City Corporation)"),
    (2, "DSCC (Dhaka South City Corporation)"),
    (3, "DESCO (Dhaka Electric Supply Company)"),
    (4, "DPDC (Dhaka Power Distribution Company)"),
    (5, "DoE (Department of Environment)"),
    (6, "DWASA (Dhaka Water Supply & Sewerage Authority)"),
];

/// (authority_company_id, category_id)
const COVERAGE: [(i32, i32); 16] = [
    (1, 1), (1, 2), (1, 3), (1, 4), (1, 5), (1, 6),
    (2, 1), (2, 2), (2, 3), (2, 4), (2, 5), (2, 6),
    (3, 3),
    (4, 3),
    (5, 6),
    (6, 4),
];

/// Reference data held in memory, matching the seed migration
pub struct MemoryCategoryRepository {
    categories: Vec<Category>,
    companies: Vec<AuthorityCompany>,
}

impl Default for MemoryCategoryRepository {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            categories: CATEGORIES
                .iter()
                .map(|(id, name)| Category {
                    id: *id,
                    name: name.to_string(),
                    description: None,
                    created_at: now,
                })
                .collect(),
            companies: AUTHORITY_COMPANIES
                .iter()
                .map(|(id, name)| AuthorityCompany {
                    id: *id,
                    name: name.to_string(),
                    description: None,
                    created_at: now,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl CategoryRepository for MemoryCategoryRepository {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self.categories.clone())
    }

    async fn list_authority_companies(
        &self,
        category_id: Option<i32>,
    ) -> Result<Vec<AuthorityCompany>> {
        Ok(self
            .companies
            .iter()
            .filter(|company| match category_id {
                None => true,
                Some(category) => COVERAGE.contains(&(company.id, category)),
            })
            .cloned()
            .collect())
    }
}
