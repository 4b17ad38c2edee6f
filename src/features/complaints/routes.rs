use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::features::complaints::handlers::{self, ComplaintState};
use crate::features::complaints::services::{ComplaintService, RecommendationService};
use crate::shared::constants::MAX_UPLOAD_BODY_SIZE;

/// Create routes for the complaints feature
pub fn routes(
    complaint_service: Arc<ComplaintService>,
    recommendation_service: Arc<RecommendationService>,
) -> Router {
    let state = ComplaintState {
        complaint_service,
        recommendation_service,
    };

    Router::new()
        .route(
            "/api/complaints",
            post(handlers::create_complaint)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_SIZE))
                .get(handlers::list_complaints),
        )
        .route(
            "/api/complaints/recommend-authorities",
            get(handlers::recommend_authorities),
        )
        .route(
            "/api/complaints/citizen/{citizen_uid}",
            get(handlers::list_citizen_complaints),
        )
        .route(
            "/api/complaints/{id}",
            get(handlers::get_complaint).delete(handlers::delete_complaint),
        )
        .route(
            "/api/complaints/{id}/status",
            patch(handlers::update_complaint_status),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::repositories::MemoryCategoryRepository;
    use crate::features::complaints::clients::RawRecommendation;
    use crate::features::complaints::repositories::MemoryComplaintRepository;
    use crate::features::complaints::services::StubRecommender;
    use crate::modules::storage::MemoryStorage;
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    struct Harness {
        server: TestServer,
        repository: MemoryComplaintRepository,
        storage: Arc<MemoryStorage>,
    }

    fn harness_with(storage: MemoryStorage, recommender: StubRecommender) -> Harness {
        let repository = MemoryComplaintRepository::default();
        let categories = Arc::new(MemoryCategoryRepository::default());
        let storage = Arc::new(storage);

        let complaint_service = Arc::new(ComplaintService::new(
            Arc::new(repository.clone()),
            categories.clone(),
            storage.clone(),
            "complaint_images",
        ));
        let recommendation_service = Arc::new(RecommendationService::new(
            categories,
            Arc::new(recommender),
        ));

        Harness {
            server: TestServer::new(routes(complaint_service, recommendation_service)).unwrap(),
            repository,
            storage,
        }
    }

    fn harness() -> Harness {
        harness_with(MemoryStorage::default(), StubRecommender::default())
    }

    fn photo(name: &str) -> Part {
        Part::bytes(vec![0xFF, 0xD8, 0xFF, 0xE0])
            .file_name(name)
            .mime_type("image/jpeg")
    }

    fn form() -> MultipartForm {
        MultipartForm::new()
            .add_text("title", "Deep pothole near the bus stop")
            .add_text("description", "Two wheelers keep slipping")
            .add_text("latitude", "23.8103")
            .add_text("longitude", "90.4125")
            .add_text("citizenUid", "citizen-001")
            .add_text("categoryId", "1")
            .add_text("authorityIds", "[1,2]")
    }

    async fn submit(harness: &Harness, form: MultipartForm) -> axum_test::TestResponse {
        harness.server.post("/api/complaints").multipart(form).await
    }

    #[tokio::test]
    async fn test_create_returns_message_and_complaint() {
        let h = harness();

        let response = submit(&h, form().add_part("images", photo("front.jpg"))).await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["message"], "Complaint created successfully");
        assert_eq!(body["complaint"]["currentStatus"], "pending");
        assert_eq!(body["complaint"]["citizenUid"], "citizen-001");
        assert_eq!(body["complaint"]["categoryId"], 1);
        assert_eq!(body["complaint"]["authorityIds"], json!([1, 2]));
        assert!(body["complaint"]["images"][0]["imageURL"]
            .as_str()
            .unwrap()
            .ends_with("_front.jpg"));
    }

    #[tokio::test]
    async fn test_create_without_images_writes_nothing() {
        let h = harness();

        let response = submit(&h, form()).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "Missing required complaint fields or image data.");
        assert_eq!(h.repository.complaint_count().await, 0);
        assert!(h.storage.keys().await.is_empty());
    }

    #[tokio::test]
    async fn test_second_upload_failure_rolls_back_everything() {
        let h = harness_with(MemoryStorage::failing_on_upload(2), StubRecommender::default());

        let response = submit(
            &h,
            form()
                .add_part("images", photo("1.jpg"))
                .add_part("images", photo("2.jpg"))
                .add_part("images", photo("3.jpg")),
        )
        .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Complaint creation failed: "));
        assert_eq!(h.repository.complaint_count().await, 0);
        assert_eq!(h.repository.image_count().await, 0);
        assert!(h.storage.keys().await.is_empty());
    }

    #[tokio::test]
    async fn test_list_paginates_with_meta() {
        let h = harness();
        for i in 0..25 {
            submit(&h, form().add_part("images", photo(&format!("{}.jpg", i))))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = h
            .server
            .get("/api/complaints")
            .add_query_param("page", 2)
            .add_query_param("limit", 10)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["complaints"].as_array().unwrap().len(), 10);
        assert_eq!(
            body["pagination"],
            json!({"total": 25, "page": 2, "limit": 10, "pages": 3})
        );
    }

    #[tokio::test]
    async fn test_list_beyond_last_page_is_empty() {
        let h = harness();
        submit(&h, form().add_part("images", photo("front.jpg")))
            .await
            .assert_status(StatusCode::CREATED);

        let response = h
            .server
            .get("/api/complaints")
            .add_query_param("page", i64::MAX)
            .add_query_param("limit", 100)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert!(body["complaints"].as_array().unwrap().is_empty());
        assert_eq!(body["pagination"]["total"], 1);
        assert_eq!(body["pagination"]["page"], i64::MAX);
    }

    #[tokio::test]
    async fn test_get_unknown_complaint_is_404() {
        let h = harness();

        let response = h
            .server
            .get(&format!("/api/complaints/{}", uuid::Uuid::now_v7()))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["message"], "Complaint not found.");
    }

    #[tokio::test]
    async fn test_status_update_rejects_unknown_status() {
        let h = harness();
        let created: Value = submit(&h, form().add_part("images", photo("a.jpg")))
            .await
            .json();
        let id = created["complaint"]["id"].as_str().unwrap().to_string();

        let response = h
            .server
            .patch(&format!("/api/complaints/{}/status", id))
            .json(&json!({"currentStatus": "archived"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let stored: Value = h.server.get(&format!("/api/complaints/{}", id)).await.json();
        assert_eq!(stored["currentStatus"], "pending");

        let response = h
            .server
            .patch(&format!("/api/complaints/{}/status", id))
            .json(&json!({"currentStatus": "in_progress", "statusNotes": "Crew assigned"}))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["complaint"]["currentStatus"], "in_progress");
        assert_eq!(body["complaint"]["statusNotes"], "Crew assigned");
    }

    #[tokio::test]
    async fn test_delete_checks_ownership() {
        let h = harness();
        let created: Value = submit(&h, form().add_part("images", photo("a.jpg")))
            .await
            .json();
        let id = created["complaint"]["id"].as_str().unwrap().to_string();

        let response = h
            .server
            .delete(&format!("/api/complaints/{}", id))
            .json(&json!({"citizenUid": "intruder"}))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(h.repository.complaint_count().await, 1);
        assert_eq!(h.repository.image_count().await, 1);

        let response = h
            .server
            .delete(&format!("/api/complaints/{}", id))
            .json(&json!({"citizenUid": "citizen-001"}))
            .await;
        response.assert_status_ok();
        assert_eq!(h.repository.complaint_count().await, 0);
        assert!(h.storage.keys().await.is_empty());
    }

    #[tokio::test]
    async fn test_citizen_listing_only_returns_owner_complaints() {
        let h = harness();
        submit(&h, form().add_part("images", photo("a.jpg"))).await;
        submit(
            &h,
            form()
                .add_text("citizenUid", "citizen-002")
                .add_part("images", photo("b.jpg")),
        )
        .await;

        let body: Value = h
            .server
            .get("/api/complaints/citizen/citizen-002")
            .await
            .json();

        assert_eq!(body["pagination"]["total"], 1);
        assert_eq!(body["complaints"][0]["citizenUid"], "citizen-002");
    }

    #[tokio::test]
    async fn test_recommendations_resolve_names() {
        let recommender = StubRecommender {
            answer: vec![RawRecommendation {
                authority_id: 3,
                reason: "Streetlight outage".to_string(),
            }],
            ..Default::default()
        };
        let h = harness_with(MemoryStorage::default(), recommender);

        let response = h
            .server
            .get("/api/complaints/recommend-authorities")
            .add_query_param("category", "Streetlights & Electrical")
            .add_query_param("description", "Dark street")
            .add_query_param("latitude", 23.8)
            .add_query_param("longitude", 90.4)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(
            body["recommendations"],
            json!([{
                "authorityId": 3,
                "authorityName": "DESCO (Dhaka Electric Supply Company)",
                "reason": "Streetlight outage"
            }])
        );
    }

    #[tokio::test]
    async fn test_recommendations_require_parameters_and_map_upstream_errors() {
        let h = harness_with(
            MemoryStorage::default(),
            StubRecommender {
                fail: true,
                ..Default::default()
            },
        );

        h.server
            .get("/api/complaints/recommend-authorities")
            .add_query_param("category", "Roads & Transport")
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        h.server
            .get("/api/complaints/recommend-authorities")
            .add_query_param("category", "Roads & Transport")
            .add_query_param("description", "Pothole")
            .add_query_param("latitude", 23.8)
            .add_query_param("longitude", 90.4)
            .await
            .assert_status(StatusCode::BAD_GATEWAY);
    }
}
