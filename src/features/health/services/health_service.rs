use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::core::database;
use crate::features::health::dtos::HealthResponseDto;

/// Answers whether the database can serve queries right now
#[async_trait]
pub trait DatabaseProbe: Send + Sync {
    async fn is_reachable(&self) -> bool;
}

#[async_trait]
impl DatabaseProbe for PgPool {
    async fn is_reachable(&self) -> bool {
        database::is_reachable(self).await
    }
}

pub struct HealthService {
    environment: String,
    probe: Arc<dyn DatabaseProbe>,
}

impl HealthService {
    pub fn new(environment: String, probe: Arc<dyn DatabaseProbe>) -> Self {
        Self { environment, probe }
    }

    /// The service itself is up whenever this runs; the database flag is reported separately.
    pub async fn status(&self) -> HealthResponseDto {
        HealthResponseDto {
            ok: true,
            env: self.environment.clone(),
            db_connected: self.probe.is_reachable().await,
        }
    }
}
