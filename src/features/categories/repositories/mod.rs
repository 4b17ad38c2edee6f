#[cfg(test)]
mod memory;
mod postgres;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::categories::models::{AuthorityCompany, Category};

#[cfg(test)]
pub use memory::MemoryCategoryRepository;
pub use postgres::PgCategoryRepository;

/// Read access to the seeded categories and authority companies
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>>;

    /// Authority companies ordered by id, optionally limited to those handling `category_id`
    async fn list_authority_companies(&self, category_id: Option<i32>)
        -> Result<Vec<AuthorityCompany>>;
}
