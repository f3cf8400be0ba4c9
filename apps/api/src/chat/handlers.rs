//! Axum route handlers for the Chat API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::chat::orchestrator::{
    generate_chat_response, user_turn_content, ChatRequest, UserChatContext,
    MAX_HISTORY_MESSAGES,
};
use crate::chat::timestamps::MediaAnalysis;
use crate::context::aggregator::{build_comprehensive_context, ContextRequest};
use crate::errors::AppError;
use crate::models::chat::ChatMessage;
use crate::models::context::WeatherSnapshot;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChatApiRequest {
    pub user_id: Uuid,
    /// Omitted to start a new conversation.
    #[serde(default)]
    pub conversation_id: Option<Uuid>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub media_urls: Vec<String>,
    #[serde(default)]
    pub horse_id: Option<Uuid>,
    #[serde(default)]
    pub facility_id: Option<Uuid>,
    #[serde(default)]
    pub weather_context: Option<WeatherSnapshot>,
    #[serde(default)]
    pub environmental_factors: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatApiResponse {
    pub conversation_id: Uuid,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_analysis: Option<MediaAnalysis>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/chat
///
/// Aggregates the rider's context, replays the recent conversation, runs one
/// model turn and stores both sides of the exchange.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatApiRequest>,
) -> Result<Json<ChatApiResponse>, AppError> {
    if request.message.trim().is_empty() && request.media_urls.is_empty() {
        return Err(AppError::Validation(
            "message cannot be empty without media".to_string(),
        ));
    }

    let user_id = request.user_id;
    let conversation_id = request.conversation_id.unwrap_or_else(Uuid::new_v4);
    let store = state.store.as_ref();

    let context = build_comprehensive_context(
        store,
        &ContextRequest {
            user_id,
            horse_id: request.horse_id,
            facility_id: request.facility_id,
            weather_context: request.weather_context,
            environmental_factors: request.environmental_factors,
        },
    )
    .await?;

    let conversation_history: Vec<ChatMessage> = store
        .recent_chat_messages(user_id, conversation_id, MAX_HISTORY_MESSAGES as i64)
        .await?
        .iter()
        .filter_map(|row| row.to_message())
        .collect();
    let incomplete_lessons = store.incomplete_lessons(user_id).await?;

    info!(
        "Chat turn for user {user_id} in conversation {conversation_id} ({} prior messages)",
        conversation_history.len()
    );

    let user_context = UserChatContext {
        experience_level: context.rider.experience_level.clone(),
        primary_method: context.rider.primary_method.as_ref().map(|m| m.name.clone()),
        show_comparisons: context.rider.show_comparisons,
        incomplete_lessons,
    };

    let stored_user_message = user_turn_content(&request.message, request.media_urls.len());

    let response = generate_chat_response(
        &state.llm,
        &state.tables,
        &state.keywords,
        ChatRequest {
            user_message: request.message.clone(),
            conversation_history,
            user_context,
            media_urls: request.media_urls,
            comprehensive_context: Some(context),
        },
    )
    .await?;

    store
        .append_chat_messages(
            user_id,
            conversation_id,
            &[
                ChatMessage::user(stored_user_message),
                ChatMessage::assistant(response.content.clone()),
            ],
        )
        .await?;

    Ok(Json(ChatApiResponse {
        conversation_id,
        content: response.content,
        media_analysis: response.media_analysis,
    }))
}
