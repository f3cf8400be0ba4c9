//! Lookup tables used when rendering prompts.
//!
//! These are plain values handed to the composer and the chat orchestrator so
//! both stay pure and can be tested against custom tables.

use std::collections::BTreeMap;

/// Placeholder replaced with a comma-separated list of method names.
pub const METHODS_PLACEHOLDER: &str = "{methods}";
/// Placeholder replaced with a single method name.
pub const METHOD_PLACEHOLDER: &str = "{method}";

#[derive(Debug, Clone)]
pub struct PromptTables {
    /// Experience level key (as stored, e.g. `complete_beginner`) → instruction clause.
    pub experience_descriptions: BTreeMap<String, String>,
    /// Used when the level is missing or not in the table.
    pub default_experience_description: String,
    /// `explore` mode. May contain `{methods}`.
    pub explore_instruction: String,
    /// `blend` mode. Must contain `{methods}`.
    pub blend_instruction: String,
    /// `single` mode. Must contain `{method}`.
    pub single_instruction: String,
    /// `single` mode when the designated method could not be resolved.
    pub single_unknown_instruction: String,
}

impl PromptTables {
    pub fn experience_description(&self, level: Option<&str>) -> &str {
        level
            .and_then(|l| self.experience_descriptions.get(l))
            .map(String::as_str)
            .unwrap_or(&self.default_experience_description)
    }
}

impl Default for PromptTables {
    fn default() -> Self {
        let experience_descriptions = [
            (
                "complete_beginner",
                "The user is a complete beginner with little or no time around horses. \
                 Explain every term, assume nothing, and put ground safety first.",
            ),
            (
                "some_experience",
                "The user has some experience with horses, such as lessons or casual handling. \
                 Briefly explain technical terms and keep safety reminders visible.",
            ),
            (
                "intermediate",
                "The user is an intermediate horseperson who handles and rides independently. \
                 Use standard terminology and focus on refining technique.",
            ),
            (
                "advanced",
                "The user is an advanced horseperson with years of hands-on experience. \
                 Be concise, go into nuance and discuss trade-offs between approaches.",
            ),
            (
                "professional",
                "The user works professionally with horses. \
                 Speak peer to peer and reference training theory where helpful.",
            ),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            experience_descriptions,
            default_experience_description:
                "The user's experience level is unknown. Start beginner-friendly and adjust \
                 once they show more knowledge."
                    .to_string(),
            explore_instruction:
                "The rider is exploring different horsemanship methods{methods}. Explore various \
                 approaches in your answers and name the method or tradition each technique \
                 comes from so the rider can discover what suits them and their horse."
                    .to_string(),
            blend_instruction:
                "The rider blends techniques from these selected methods: {methods}. Blend \
                 techniques from the selected methods, attributing each technique to the method \
                 it comes from, and point out where the methods disagree."
                    .to_string(),
            single_instruction:
                "The rider follows {method} exclusively. Focus exclusively on {method} and use \
                 its terminology. Do not recommend techniques from other methods unless safety \
                 requires it, and say so when you do."
                    .to_string(),
            single_unknown_instruction:
                "The rider follows a single training method that has not been recorded. Ask \
                 which method they follow before giving method-specific advice."
                    .to_string(),
        }
    }
}
