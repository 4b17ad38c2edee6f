use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::users::models::{NewUser, RoleProfile, User};
use crate::features::users::repositories::UserRepository;

/// Map unique violations to a conflict; everything else stays a database error
fn handle_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::Conflict(
                "A profile with this Firebase UID or email already exists.".to_string(),
            );
        }
    }

    tracing::error!("User repository error: {:?}", e);
    AppError::Database(e)
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create_profile(&self, new_user: &NewUser) -> Result<User> {
        let mut tx = self.pool.begin().await.map_err(handle_db_error)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (firebase_uid, email, full_name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING firebase_uid, email, full_name, role, created_at, updated_at
            "#,
        )
        .bind(&new_user.firebase_uid)
        .bind(&new_user.email)
        .bind(&new_user.full_name)
        .bind(new_user.profile.role())
        .fetch_one(&mut *tx)
        .await
        .map_err(handle_db_error)?;

        match &new_user.profile {
            RoleProfile::Citizen { ward } => {
                sqlx::query(
                    "INSERT INTO citizens (id, user_firebase_uid, ward) VALUES ($1, $2, $3)",
                )
                .bind(Uuid::now_v7())
                .bind(&new_user.firebase_uid)
                .bind(ward)
                .execute(&mut *tx)
                .await
                .map_err(handle_db_error)?;
            }
            RoleProfile::Authority { department, ward } => {
                sqlx::query(
                    "INSERT INTO authorities (id, user_firebase_uid, department, ward) VALUES ($1, $2, $3, $4)",
                )
                .bind(Uuid::now_v7())
                .bind(&new_user.firebase_uid)
                .bind(department)
                .bind(ward)
                .execute(&mut *tx)
                .await
                .map_err(handle_db_error)?;
            }
            RoleProfile::Admin => {
                sqlx::query("INSERT INTO admins (id, user_firebase_uid) VALUES ($1, $2)")
                    .bind(Uuid::now_v7())
                    .bind(&new_user.firebase_uid)
                    .execute(&mut *tx)
                    .await
                    .map_err(handle_db_error)?;
            }
        }

        tx.commit().await.map_err(handle_db_error)?;
        Ok(user)
    }

    async fn find_by_uid(&self, firebase_uid: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT firebase_uid, email, full_name, role, created_at, updated_at
            FROM users
            WHERE firebase_uid = $1
            "#,
        )
        .bind(firebase_uid)
        .fetch_optional(&self.pool)
        .await
        .map_err(handle_db_error)
    }
}
