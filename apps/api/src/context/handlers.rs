//! Axum route handlers for the Context API.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::context::aggregator::{build_comprehensive_context, ContextRequest};
use crate::context::composer::compose_context_prompt;
use crate::errors::AppError;
use crate::models::context::AggregatedContext;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ContextPreviewResponse {
    pub context: AggregatedContext,
    pub prompt: String,
}

/// POST /api/v1/context/preview
///
/// Returns the aggregated context and the prompt section rendered from it,
/// exactly as the chat endpoint would send it to the model.
pub async fn handle_context_preview(
    State(state): State<AppState>,
    Json(request): Json<ContextRequest>,
) -> Result<Json<ContextPreviewResponse>, AppError> {
    let context = build_comprehensive_context(state.store.as_ref(), &request).await?;
    let prompt = compose_context_prompt(&context, &state.tables);

    Ok(Json(ContextPreviewResponse { context, prompt }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::aggregator::fixtures::{horse, store_for};
    use crate::state::test_support::test_state;
    use std::sync::Arc;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_preview_returns_context_and_prompt() {
        let user_id = Uuid::new_v4();
        let mut store = store_for(user_id);
        store.horses.push(horse(user_id, "Juniper", true));
        let state = test_state(Arc::new(store), "http://127.0.0.1:9");

        let Json(response) = handle_context_preview(
            State(state),
            Json(ContextRequest {
                user_id,
                ..ContextRequest::default()
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.context.horse.as_ref().unwrap().name, "Juniper");
        assert!(response.prompt.contains("- Name: Juniper"));
        assert!(response.prompt.starts_with("RIDER CONTEXT"));
    }

    #[tokio::test]
    async fn test_preview_surfaces_store_failure() {
        let user_id = Uuid::new_v4();
        let mut store = store_for(user_id);
        store.fail_horse_lookups = true;
        let state = test_state(Arc::new(store), "http://127.0.0.1:9");

        let result = handle_context_preview(
            State(state),
            Json(ContextRequest {
                user_id,
                ..ContextRequest::default()
            }),
        )
        .await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
