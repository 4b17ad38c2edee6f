use crate::features::health::handlers;
use crate::features::health::services::HealthService;
use axum::{routing::get, Router};
use std::sync::Arc;

pub fn routes(service: Arc<HealthService>) -> Router {
    Router::new()
        .route("/health", get(handlers::liveness))
        .route("/api/health", get(handlers::health_status))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::health::services::FixedProbe;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_health_endpoints() {
        let service = Arc::new(HealthService::new(
            "staging".to_string(),
            Arc::new(FixedProbe(false)),
        ));
        let server = TestServer::new(routes(service)).unwrap();

        server.get("/health").await.assert_status_ok();

        let response = server.get("/api/health").await;
        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>(),
            json!({"ok": true, "env": "staging", "dbConnected": false})
        );
    }
}
