use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::{AuthorityCompany, Category};
use crate::features::categories::repositories::CategoryRepository;

pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, created_at
            FROM categories
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list categories: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn list_authority_companies(
        &self,
        category_id: Option<i32>,
    ) -> Result<Vec<AuthorityCompany>> {
        sqlx::query_as::<_, AuthorityCompany>(
            r#"
            SELECT ac.id, ac.name, ac.description, ac.created_at
            FROM authority_companies ac
            WHERE $1::int IS NULL
               OR EXISTS (
                    SELECT 1 FROM authority_company_categories acc
                    WHERE acc.authority_company_id = ac.id AND acc.category_id = $1
               )
            ORDER BY ac.id
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list authority companies: {:?}", e);
            AppError::Database(e)
        })
    }
}
