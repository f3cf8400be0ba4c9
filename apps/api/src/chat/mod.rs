// Chat: one coaching turn per request.
// All LLM calls go through llm_client; timestamp extraction is pure.

pub mod handlers;
pub mod orchestrator;
pub mod prompts;
pub mod timestamps;
