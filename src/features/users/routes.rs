use crate::features::users::handlers;
use crate::features::users::services::UserService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/api/users", post(handlers::register_profile))
        .route("/api/users/{firebase_uid}", get(handlers::get_profile))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::repositories::MemoryUserRepository;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn server() -> TestServer {
        let service = Arc::new(UserService::new(
            Arc::new(MemoryUserRepository::default()),
            Some("letmein".to_string()),
        ));
        TestServer::new(routes(service)).unwrap()
    }

    #[tokio::test]
    async fn test_register_then_fetch_profile() {
        let server = server();

        let created = server
            .post("/api/users")
            .json(&json!({
                "firebaseUid": "uid-123",
                "email": "rahim@example.com",
                "fullName": "Rahim Uddin",
                "role": "citizen",
                "ward": "Ward 7"
            }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let body: Value = created.json();
        assert_eq!(body["message"], "Profile created successfully");
        assert_eq!(body["user"]["role"], "citizen");

        let fetched = server.get("/api/users/uid-123").await;
        fetched.assert_status_ok();
        let profile: Value = fetched.json();
        assert_eq!(profile["firebaseUid"], "uid-123");
        assert_eq!(profile["fullName"], "Rahim Uddin");
        assert!(profile.get("createdAt").is_some());
    }

    #[tokio::test]
    async fn test_invalid_admin_code_is_forbidden() {
        let response = server()
            .post("/api/users")
            .json(&json!({
                "firebaseUid": "uid-9",
                "email": "ops@example.com",
                "fullName": "Ops",
                "role": "admin",
                "adminCode": "nope"
            }))
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(response.json::<Value>()["message"], "Invalid Admin Code provided.");
    }

    #[tokio::test]
    async fn test_missing_fields_and_unknown_profile() {
        let server = server();

        server
            .post("/api/users")
            .json(&json!({"firebaseUid": "uid-1", "role": "citizen"}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .get("/api/users/ghost")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
