use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::error::{AppError, Result};

/// Authority offered to the recommendation model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateAuthority {
    pub id: i32,
    pub name: String,
}

/// Payload posted to `{RECOMMENDATION_SERVICE_URL}/recommend-authority`
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationRequest {
    pub category: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub authorities: Vec<CandidateAuthority>,
    pub location_string: Option<String>,
}

/// One ranked suggestion before the authority name is resolved
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRecommendation {
    #[serde(alias = "authorityCompanyId", alias = "authorityId")]
    pub authority_id: i32,
    #[serde(default)]
    pub reason: String,
}

/// The service answers either with a ranked list or with a single best match
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecommendationPayload {
    Ranked {
        recommendations: Vec<RawRecommendation>,
    },
    Single(RawRecommendation),
}

impl RecommendationPayload {
    fn into_recommendations(self) -> Vec<RawRecommendation> {
        match self {
            RecommendationPayload::Ranked { recommendations } => recommendations,
            RecommendationPayload::Single(one) => vec![one],
        }
    }
}

#[async_trait]
pub trait AuthorityRecommender: Send + Sync {
    async fn recommend(&self, request: &RecommendationRequest) -> Result<Vec<RawRecommendation>>;
}

/// Recommendation service reached over HTTP
pub struct HttpAuthorityRecommender {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthorityRecommender {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AuthorityRecommender for HttpAuthorityRecommender {
    async fn recommend(&self, request: &RecommendationRequest) -> Result<Vec<RawRecommendation>> {
        let url = format!("{}/recommend-authority", self.base_url);
        tracing::debug!("Requesting authority recommendation from {}", url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Recommendation request failed: {:?}", e);
                AppError::ExternalServiceError(format!("Recommendation service unavailable: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Recommendation service returned {}: {}", status, body);
            return Err(AppError::ExternalServiceError(format!(
                "Recommendation service returned {}",
                status
            )));
        }

        let payload: RecommendationPayload = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse recommendation response: {:?}", e);
            AppError::ExternalServiceError(format!(
                "Failed to parse recommendation response: {}",
                e
            ))
        })?;

        Ok(payload.into_recommendations())
    }
}
