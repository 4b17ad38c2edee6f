use std::collections::HashMap;
use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::categories::repositories::CategoryRepository;
use crate::features::complaints::clients::{
    AuthorityRecommender, CandidateAuthority, RecommendationRequest,
};
use crate::features::complaints::dtos::{AuthorityRecommendationDto, RecommendAuthoritiesQuery};

pub const UNKNOWN_AUTHORITY: &str = "Unknown Authority";

/// Proxies authority recommendations and resolves authority names
pub struct RecommendationService {
    categories: Arc<dyn CategoryRepository>,
    recommender: Arc<dyn AuthorityRecommender>,
}

impl RecommendationService {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        recommender: Arc<dyn AuthorityRecommender>,
    ) -> Self {
        Self {
            categories,
            recommender,
        }
    }

    pub async fn recommend(
        &self,
        query: RecommendAuthoritiesQuery,
    ) -> Result<Vec<AuthorityRecommendationDto>> {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let (Some(category), Some(description), Some(latitude), Some(longitude)) = (
            non_empty(query.category),
            non_empty(query.description),
            query.latitude,
            query.longitude,
        ) else {
            return Err(AppError::BadRequest(
                "Missing required query parameters.".to_string(),
            ));
        };

        let authorities = self.categories.list_authority_companies(None).await?;
        let names: HashMap<i32, String> = authorities
            .iter()
            .map(|a| (a.id, a.name.clone()))
            .collect();

        let request = RecommendationRequest {
            category,
            description,
            latitude,
            longitude,
            authorities: authorities
                .into_iter()
                .map(|a| CandidateAuthority {
                    id: a.id,
                    name: a.name,
                })
                .collect(),
            location_string: non_empty(query.location_string),
        };

        let recommendations = self.recommender.recommend(&request).await?;
        tracing::debug!(
            "Recommendation service suggested {} authorities",
            recommendations.len()
        );

        Ok(recommendations
            .into_iter()
            .map(|r| AuthorityRecommendationDto {
                authority_name: names
                    .get(&r.authority_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_AUTHORITY.to_string()),
                authority_id: r.authority_id,
                reason: r.reason,
            })
            .collect())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::features::categories::repositories::MemoryCategoryRepository;
    use crate::features::complaints::clients::RawRecommendation;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    /// Recommender returning canned answers and recording what it was asked
    #[derive(Default)]
    pub struct StubRecommender {
        pub answer: Vec<RawRecommendation>,
        pub fail: bool,
        pub requests: Mutex<Vec<RecommendationRequest>>,
    }

    #[async_trait]
    impl AuthorityRecommender for StubRecommender {
        async fn recommend(
            &self,
            request: &RecommendationRequest,
        ) -> Result<Vec<RawRecommendation>> {
            self.requests.lock().await.push(request.clone());
            if self.fail {
                return Err(AppError::ExternalServiceError(
                    "Recommendation service unavailable".to_string(),
                ));
            }
            Ok(self.answer.clone())
        }
    }

    fn full_query() -> RecommendAuthoritiesQuery {
        RecommendAuthoritiesQuery {
            category: Some("Water Supply & Drains".to_string()),
            description: Some("Overflowing drain".to_string()),
            latitude: Some(23.78),
            longitude: Some(90.41),
            location_string: Some("Mirpur, Dhaka".to_string()),
        }
    }

    #[tokio::test]
    async fn test_resolves_names_and_marks_unknown() {
        let recommender = Arc::new(StubRecommender {
            answer: vec![
                RawRecommendation {
                    authority_id: 6,
                    reason: "Drainage is handled by WASA".to_string(),
                },
                RawRecommendation {
                    authority_id: 77,
                    reason: "Guess".to_string(),
                },
            ],
            ..Default::default()
        });
        let service = RecommendationService::new(
            Arc::new(MemoryCategoryRepository::default()),
            recommender.clone(),
        );

        let result = service.recommend(full_query()).await.unwrap();

        assert_eq!(
            result[0].authority_name,
            "DWASA (Dhaka Water Supply & Sewerage Authority)"
        );
        assert_eq!(result[1].authority_name, UNKNOWN_AUTHORITY);

        let requests = recommender.requests.lock().await;
        assert_eq!(requests[0].authorities.len(), 6);
        assert_eq!(requests[0].location_string.as_deref(), Some("Mirpur, Dhaka"));
    }

    #[tokio::test]
    async fn test_missing_parameters_skip_upstream() {
        let recommender = Arc::new(StubRecommender::default());
        let service = RecommendationService::new(
            Arc::new(MemoryCategoryRepository::default()),
            recommender.clone(),
        );

        let mut query = full_query();
        query.description = Some("  ".to_string());
        let err = service.recommend(query).await.unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(recommender.requests.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let service = RecommendationService::new(
            Arc::new(MemoryCategoryRepository::default()),
            Arc::new(StubRecommender {
                fail: true,
                ..Default::default()
            }),
        );

        let err = service.recommend(full_query()).await.unwrap_err();
        assert!(matches!(err, AppError::ExternalServiceError(_)));
    }
}
