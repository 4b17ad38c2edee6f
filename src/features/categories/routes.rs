use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Create routes for the categories feature
pub fn routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route("/api/complaints/categories", get(handlers::list_categories))
        .route(
            "/api/authority-companies",
            get(handlers::list_authority_companies),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::repositories::MemoryCategoryRepository;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;

    fn server() -> TestServer {
        let service = Arc::new(CategoryService::new(Arc::new(
            MemoryCategoryRepository::default(),
        )));
        TestServer::new(routes(service)).unwrap()
    }

    #[tokio::test]
    async fn test_categories_endpoint_returns_bare_array() {
        let response = server().get("/api/complaints/categories").await;

        response.assert_status_ok();
        let body: Value = response.json();
        let categories = body.as_array().unwrap();
        assert_eq!(categories.len(), 6);
        assert_eq!(categories[1]["name"], "Garbage & Waste Management");
        assert!(categories[1].get("description").is_some());
    }

    #[tokio::test]
    async fn test_authority_companies_filtered_by_category() {
        let response = server()
            .get("/api/authority-companies")
            .add_query_param("categoryId", 6)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        let ids: Vec<i64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 5]);
    }

    #[tokio::test]
    async fn test_authority_companies_rejects_non_numeric_category() {
        let response = server()
            .get("/api/authority-companies?categoryId=roads")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
