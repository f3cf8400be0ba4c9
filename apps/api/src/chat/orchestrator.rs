//! Chat orchestration: composes the system prompt, calls the model and
//! attaches timestamp analysis when the rider sent media.
//!
//! Flow: persona → context → experience clause → method framing →
//!       active lessons → media instructions → style guidelines →
//!       history (last 10) + user message → LLM → timestamp extraction.

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::chat::prompts::{
    ATTACHMENT_NOTE_TEMPLATE, COMPARISON_NO_METHOD, COMPARISON_TEMPLATE, LESSONS_HEADER,
    LESSON_REFERENCE_TEMPLATE, MARKDOWN_GUIDELINES, MEDIA_HEADER, NO_METHOD_INSTRUCTION,
    PERSONA_PREAMBLE, PHOTO_INSTRUCTIONS, PRIMARY_METHOD_TEMPLATE, RESPONSE_STYLE,
    VIDEO_INSTRUCTIONS,
};
use crate::chat::timestamps::{extract_timestamp_analysis, MediaAnalysis, TimestampKeywords};
use crate::context::composer::compose_context_prompt;
use crate::context::tables::PromptTables;
use crate::llm_client::prompts::SAFETY_FIRST_INSTRUCTION;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::chat::ChatMessage;
use crate::models::context::AggregatedContext;
use crate::models::profile::IncompleteLessonRow;

/// Prior messages sent to the model with each turn.
pub const MAX_HISTORY_MESSAGES: usize = 10;

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "m4v", "webm", "avi", "mkv", "3gp"];

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Failed to generate response: {0}")]
    Model(#[from] LlmError),
}

/// The lightweight rider summary available on every chat turn.
#[derive(Debug, Clone, Default)]
pub struct UserChatContext {
    pub experience_level: Option<String>,
    /// Name of the rider's primary method.
    pub primary_method: Option<String>,
    pub show_comparisons: bool,
    pub incomplete_lessons: Vec<IncompleteLessonRow>,
}

#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub user_message: String,
    /// Oldest first.
    pub conversation_history: Vec<ChatMessage>,
    pub user_context: UserChatContext,
    pub media_urls: Vec<String>,
    pub comprehensive_context: Option<AggregatedContext>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_analysis: Option<MediaAnalysis>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Photo,
}

/// Classifies an attachment URL by file extension, or by the CDN's
/// `/video/upload/` path segment. Anything else is treated as a photo.
pub fn classify_media(url: &str) -> MediaKind {
    let lowered = url.to_lowercase();
    if lowered.contains("/video/upload/") {
        return MediaKind::Video;
    }
    let path = lowered.split(['?', '#']).next().unwrap_or_default();
    let extension = path
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.contains('/'));
    match extension {
        Some(ext) if VIDEO_EXTENSIONS.contains(&ext) => MediaKind::Video,
        _ => MediaKind::Photo,
    }
}

/// Assembles the full system prompt. Pure.
pub fn build_system_prompt(request: &ChatRequest, tables: &PromptTables) -> String {
    let ctx = &request.user_context;
    let mut sections: Vec<String> = vec![PERSONA_PREAMBLE.to_string()];

    if let Some(comprehensive) = &request.comprehensive_context {
        sections.push(compose_context_prompt(comprehensive, tables));
    }

    sections.push(format!(
        "EXPERIENCE LEVEL: {}",
        tables.experience_description(ctx.experience_level.as_deref())
    ));

    if request.comprehensive_context.is_none() {
        sections.push(match &ctx.primary_method {
            Some(method) => PRIMARY_METHOD_TEMPLATE.replace("{method}", method),
            None => NO_METHOD_INSTRUCTION.to_string(),
        });
    }
    if ctx.show_comparisons {
        sections.push(match &ctx.primary_method {
            Some(method) => COMPARISON_TEMPLATE.replace("{method}", method),
            None => COMPARISON_NO_METHOD.to_string(),
        });
    }

    if let Some(first) = ctx.incomplete_lessons.first() {
        let mut block = String::from(LESSONS_HEADER);
        for lesson in &ctx.incomplete_lessons {
            block.push_str(&format!(
                "\n- {} (Phase: {}, Module: {})",
                lesson.title, lesson.phase_name, lesson.module_name
            ));
        }
        block.push('\n');
        block.push_str(&LESSON_REFERENCE_TEMPLATE.replace("{lesson}", &first.title));
        sections.push(block);
    }

    if !request.media_urls.is_empty() {
        sections.push(media_instructions(&request.media_urls));
    }

    sections.push(SAFETY_FIRST_INSTRUCTION.to_string());
    sections.push(RESPONSE_STYLE.to_string());
    sections.push(MARKDOWN_GUIDELINES.to_string());

    sections.join("\n\n")
}

fn media_instructions(media_urls: &[String]) -> String {
    let kinds: Vec<MediaKind> = media_urls.iter().map(|u| classify_media(u)).collect();
    let mut block = String::from(MEDIA_HEADER);
    if kinds.contains(&MediaKind::Video) {
        block.push_str("\n\n");
        block.push_str(VIDEO_INSTRUCTIONS);
    }
    if kinds.contains(&MediaKind::Photo) {
        block.push_str("\n\n");
        block.push_str(PHOTO_INSTRUCTIONS);
    }
    block
}

/// `[system, ...last 10 history, user]`
/// The user message as sent to the model and stored in history: the typed
/// text plus an attachment note when media is present.
pub fn user_turn_content(message: &str, media_count: usize) -> String {
    if media_count == 0 {
        return message.to_string();
    }
    let note = ATTACHMENT_NOTE_TEMPLATE.replace("{count}", &media_count.to_string());
    if message.trim().is_empty() {
        note
    } else {
        format!("{message}\n\n{note}")
    }
}

pub fn build_messages(request: &ChatRequest, system_prompt: String) -> Vec<ChatMessage> {
    let history = &request.conversation_history;
    let skip = history.len().saturating_sub(MAX_HISTORY_MESSAGES);

    let user_content = user_turn_content(&request.user_message, request.media_urls.len());

    let mut messages = Vec::with_capacity(history.len() - skip + 2);
    messages.push(ChatMessage::system(system_prompt));
    messages.extend(history[skip..].iter().cloned());
    messages.push(ChatMessage::user(user_content));
    messages
}

/// Runs one chat turn against the model.
pub async fn generate_chat_response(
    llm: &LlmClient,
    tables: &PromptTables,
    keywords: &TimestampKeywords,
    request: ChatRequest,
) -> Result<ChatResponse, ChatError> {
    let system_prompt = build_system_prompt(&request, tables);
    let messages = build_messages(&request, system_prompt);

    info!(
        "Generating chat response: {} messages, {} media attachments",
        messages.len(),
        request.media_urls.len()
    );

    let content = llm.call(&messages).await.map_err(|e| {
        error!("Chat generation failed: {e}");
        ChatError::Model(e)
    })?;

    let media_analysis = (!request.media_urls.is_empty())
        .then(|| extract_timestamp_analysis(&content, &request.media_urls, keywords));

    Ok(ChatResponse {
        content,
        media_analysis,
    })
}
