// Training plans: AI generation with a static fallback.
// All LLM calls go through llm_client; the fallback does no I/O.

pub mod fallback;
pub mod generator;
pub mod handlers;
pub mod prompts;
