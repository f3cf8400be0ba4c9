// Shared prompt constants.
// Each feature module that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Safety fragment shared by chat and plan generation.
pub const SAFETY_FIRST_INSTRUCTION: &str = "\
    Safety comes first for both horse and handler. \
    When an exercise carries real risk for the rider's level, say so plainly \
    and recommend working with a qualified professional.";
