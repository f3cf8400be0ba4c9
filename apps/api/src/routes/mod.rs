pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::chat::handlers as chat;
use crate::context::handlers as context;
use crate::state::AppState;
use crate::training::handlers as training;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Chat
        .route("/api/v1/chat", post(chat::handle_chat))
        // Training plans
        .route(
            "/api/v1/training-plans/generate",
            post(training::handle_generate_plan),
        )
        .route(
            "/api/v1/training-plans/fallback-preview",
            post(training::handle_fallback_preview),
        )
        // Context
        .route(
            "/api/v1/context/preview",
            post(context::handle_context_preview),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::state::test_support::test_state;
    use crate::store::memory::MemoryDataStore;

    fn router() -> Router {
        build_router(test_state(
            Arc::new(MemoryDataStore::default()),
            "http://127.0.0.1:9",
        ))
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_route() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_fallback_preview_route() {
        let payload = json!({
            "experienceLevel": "intermediate",
            "primaryGoal": "learn_to_ride",
            "daysPerWeek": 4,
            "sessionLength": 45,
            "ownsHorse": true
        });
        let response = router()
            .oneshot(
                Request::post("/api/v1/training-plans/fallback-preview")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["plan"]["phases"].as_array().unwrap().len(), 3);
        assert_eq!(
            body["plan"]["phases"][2]["phaseName"],
            "Preparation for Riding"
        );
    }

    #[tokio::test]
    async fn test_validation_errors_use_error_envelope() {
        let payload = json!({
            "experienceLevel": "intermediate",
            "primaryGoal": "learn_to_ride",
            "daysPerWeek": 0,
            "sessionLength": 45,
            "ownsHorse": true
        });
        let response = router()
            .oneshot(
                Request::post("/api/v1/training-plans/fallback-preview")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
