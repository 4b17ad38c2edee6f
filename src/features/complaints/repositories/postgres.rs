use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::complaints::models::{
    Complaint, ComplaintCategory, ComplaintDetails, ComplaintFilter, ComplaintImage,
    ComplaintStatus, CreateComplaint,
};
use crate::features::complaints::repositories::{ComplaintRepository, ComplaintTransaction};
use crate::shared::types::PaginationQuery;

const COMPLAINT_COLUMNS: &str = r#"
    c.id, c.title, c.description, c.latitude, c.longitude, c.citizen_uid, c.category_id,
    c.current_status, c.status_notes, c.created_at, c.updated_at
"#;

const FILTER_CLAUSE: &str = r#"
    WHERE ($1::complaint_status IS NULL OR c.current_status = $1)
      AND ($2::int IS NULL OR c.category_id = $2)
      AND ($3::text IS NULL OR c.citizen_uid = $3)
"#;

/// Complaint row with its joined category columns
#[derive(Debug, FromRow)]
struct ComplaintRow {
    #[sqlx(flatten)]
    complaint: Complaint,
    category_name: Option<String>,
    category_description: Option<String>,
}

pub struct PgComplaintRepository {
    pool: PgPool,
}

impl PgComplaintRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach images and authority assignments to a batch of complaint rows
    async fn with_relations(&self, rows: Vec<ComplaintRow>) -> Result<Vec<ComplaintDetails>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|r| r.complaint.id).collect();

        let images = sqlx::query_as::<_, ComplaintImage>(
            r#"
            SELECT id, complaint_id, image_url, processed_image_url, created_at
            FROM complaint_images
            WHERE complaint_id = ANY($1)
            ORDER BY created_at, id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load complaint images: {:?}", e);
            AppError::Database(e)
        })?;

        let assignments = sqlx::query_as::<_, (Uuid, i32)>(
            r#"
            SELECT complaint_id, authority_company_id
            FROM complaint_assignments
            WHERE complaint_id = ANY($1)
            ORDER BY authority_company_id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load complaint assignments: {:?}", e);
            AppError::Database(e)
        })?;

        let mut images_by_complaint: HashMap<Uuid, Vec<ComplaintImage>> = HashMap::new();
        for image in images {
            images_by_complaint
                .entry(image.complaint_id)
                .or_default()
                .push(image);
        }

        let mut authorities_by_complaint: HashMap<Uuid, Vec<i32>> = HashMap::new();
        for (complaint_id, authority_id) in assignments {
            authorities_by_complaint
                .entry(complaint_id)
                .or_default()
                .push(authority_id);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let id = row.complaint.id;
                let category = row.category_name.map(|name| ComplaintCategory {
                    id: row.complaint.category_id,
                    name,
                    description: row.category_description,
                });
                ComplaintDetails {
                    complaint: row.complaint,
                    category,
                    images: images_by_complaint.remove(&id).unwrap_or_default(),
                    authority_ids: authorities_by_complaint.remove(&id).unwrap_or_default(),
                }
            })
            .collect())
    }
}

#[async_trait]
impl ComplaintRepository for PgComplaintRepository {
    async fn begin(&self) -> Result<Box<dyn ComplaintTransaction>> {
        let tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin complaint transaction: {:?}", e);
            AppError::Database(e)
        })?;
        Ok(Box::new(PgComplaintTransaction { tx }))
    }

    async fn list(
        &self,
        filter: &ComplaintFilter,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<ComplaintDetails>, i64)> {
        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM complaints c {}",
            FILTER_CLAUSE
        ))
        .bind(filter.status)
        .bind(filter.category_id)
        .bind(filter.citizen_uid.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count complaints: {:?}", e);
            AppError::Database(e)
        })?;

        let rows = sqlx::query_as::<_, ComplaintRow>(&format!(
            r#"
            SELECT {}, cat.name AS category_name, cat.description AS category_description
            FROM complaints c
            LEFT JOIN categories cat ON cat.id = c.category_id
            {}
            ORDER BY c.created_at DESC, c.id DESC
            LIMIT $4 OFFSET $5
            "#,
            COMPLAINT_COLUMNS, FILTER_CLAUSE
        ))
        .bind(filter.status)
        .bind(filter.category_id)
        .bind(filter.citizen_uid.as_deref())
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list complaints: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((self.with_relations(rows).await?, total))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ComplaintDetails>> {
        let row = sqlx::query_as::<_, ComplaintRow>(&format!(
            r#"
            SELECT {}, cat.name AS category_name, cat.description AS category_description
            FROM complaints c
            LEFT JOIN categories cat ON cat.id = c.category_id
            WHERE c.id = $1
            "#,
            COMPLAINT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get complaint by id: {:?}", e);
            AppError::Database(e)
        })?;

        match row {
            Some(row) => Ok(self.with_relations(vec![row]).await?.into_iter().next()),
            None => Ok(None),
        }
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ComplaintStatus,
        status_notes: Option<&str>,
    ) -> Result<Option<Complaint>> {
        sqlx::query_as::<_, Complaint>(
            r#"
            UPDATE complaints c
            SET current_status = $2,
                status_notes = COALESCE($3, c.status_notes),
                updated_at = NOW()
            WHERE c.id = $1
            RETURNING c.id, c.title, c.description, c.latitude, c.longitude, c.citizen_uid,
                      c.category_id, c.current_status, c.status_notes, c.created_at, c.updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(status_notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update complaint status: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        // Images and assignments go with the row (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM complaints WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete complaint: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}

pub struct PgComplaintTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl ComplaintTransaction for PgComplaintTransaction {
    async fn insert_complaint(&mut self, data: &CreateComplaint) -> Result<Complaint> {
        sqlx::query_as::<_, Complaint>(
            r#"
            INSERT INTO complaints (id, title, description, latitude, longitude, citizen_uid, category_id, current_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending')
            RETURNING id, title, description, latitude, longitude, citizen_uid, category_id,
                      current_status, status_notes, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&data.title)
        .bind(data.description.as_deref())
        .bind(data.latitude)
        .bind(data.longitude)
        .bind(&data.citizen_uid)
        .bind(data.category_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert complaint: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn insert_image(
        &mut self,
        complaint_id: Uuid,
        image_url: &str,
    ) -> Result<ComplaintImage> {
        sqlx::query_as::<_, ComplaintImage>(
            r#"
            INSERT INTO complaint_images (id, complaint_id, image_url)
            VALUES ($1, $2, $3)
            RETURNING id, complaint_id, image_url, processed_image_url, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(complaint_id)
        .bind(image_url)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert complaint image: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn assign_authorities(
        &mut self,
        complaint_id: Uuid,
        authority_ids: &[i32],
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO complaint_assignments (complaint_id, authority_company_id)
            SELECT $1, UNNEST($2::int[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(complaint_id)
        .bind(authority_ids)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to assign authorities: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit complaint transaction: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(|e| {
            tracing::error!("Failed to roll back complaint transaction: {:?}", e);
            AppError::Database(e)
        })
    }
}
