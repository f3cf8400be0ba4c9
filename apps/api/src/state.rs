use std::sync::Arc;

use crate::chat::timestamps::TimestampKeywords;
use crate::context::tables::PromptTables;
use crate::llm_client::LlmClient;
use crate::store::DataStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Persistence seam. Postgres in production, in-memory in tests.
    pub store: Arc<dyn DataStore>,
    pub llm: LlmClient,
    pub tables: Arc<PromptTables>,
    pub keywords: Arc<TimestampKeywords>,
}
