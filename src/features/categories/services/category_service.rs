use std::collections::HashMap;
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::categories::dtos::{AuthorityCompanyResponseDto, CategoryResponseDto};
use crate::features::categories::repositories::CategoryRepository;

/// Service for category and authority company lookups
pub struct CategoryService {
    repository: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn CategoryRepository>) -> Self {
        Self { repository }
    }

    /// List all categories
    pub async fn list_categories(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories = self.repository.list_categories().await?;
        Ok(categories.into_iter().map(Into::into).collect())
    }

    /// List authority companies, optionally only those covering a category
    pub async fn list_authority_companies(
        &self,
        category_id: Option<i32>,
    ) -> Result<Vec<AuthorityCompanyResponseDto>> {
        let companies = self.repository.list_authority_companies(category_id).await?;
        Ok(companies.into_iter().map(Into::into).collect())
    }

    /// Authority company names keyed by id
    pub async fn authority_names(&self) -> Result<HashMap<i32, String>> {
        let companies = self.repository.list_authority_companies(None).await?;
        Ok(companies.into_iter().map(|c| (c.id, c.name)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::repositories::MemoryCategoryRepository;

    fn service() -> CategoryService {
        CategoryService::new(Arc::new(MemoryCategoryRepository::default()))
    }

    #[tokio::test]
    async fn test_lists_seeded_categories_in_id_order() {
        let categories = service().list_categories().await.unwrap();

        assert_eq!(categories.len(), 6);
        assert_eq!(categories[0].name, "Roads & Transport");
        assert!(categories.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test]
    async fn test_filters_authority_companies_by_category() {
        let service = service();

        let electrical = service.list_authority_companies(Some(3)).await.unwrap();
        let ids: Vec<i32> = electrical.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);

        let all = service.list_authority_companies(None).await.unwrap();
        assert_eq!(all.len(), 6);
    }

    #[tokio::test]
    async fn test_authority_names_are_keyed_by_id() {
        let names = service().authority_names().await.unwrap();
        assert_eq!(
            names.get(&6).map(String::as_str),
            Some("DWASA (Dhaka Water Supply & Sewerage Authority)")
        );
    }
}
