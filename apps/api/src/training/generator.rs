//! AI training-plan generation.
//!
//! Flow: onboarding → prompt → LLM (JSON only) → strip fences → parse →
//!       structural validation. Failures are typed so the caller can decide
//!       to fall back to the static plan.

use thiserror::Error;
use tracing::info;

use crate::context::composer::humanize;
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, SAFETY_FIRST_INSTRUCTION};
use crate::llm_client::{strip_json_fences, LlmClient, LlmError};
use crate::models::chat::ChatMessage;
use crate::models::training_plan::{OnboardingData, TrainingPlanStructure};
use crate::training::prompts::{PLAN_PROMPT_TEMPLATE, PLAN_SYSTEM};

#[derive(Debug, Error)]
pub enum PlanGenerationError {
    #[error("Model call failed: {0}")]
    Model(#[from] LlmError),

    #[error("Failed to parse plan JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Plan failed validation: {0}")]
    Validation(String),
}

impl PlanGenerationError {
    /// Short tag for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PlanGenerationError::Model(_) => "model",
            PlanGenerationError::Parse(_) => "parse",
            PlanGenerationError::Validation(_) => "validation",
        }
    }
}

pub fn build_plan_prompt(onboarding: &OnboardingData) -> String {
    let horse_ownership = if onboarding.owns_horse {
        "owns their own horse"
    } else {
        "does not own a horse (lesson or borrowed horses)"
    };

    PLAN_PROMPT_TEMPLATE
        .replace("{experience_level}", &humanize(&onboarding.experience_level))
        .replace("{primary_goal}", &humanize(&onboarding.primary_goal))
        .replace("{days_per_week}", &onboarding.days_per_week.to_string())
        .replace("{session_length}", &onboarding.session_length.to_string())
        .replace("{horse_ownership}", horse_ownership)
}

/// Parses model output into a plan and checks its shape.
pub fn parse_plan(raw: &str) -> Result<TrainingPlanStructure, PlanGenerationError> {
    let plan: TrainingPlanStructure = serde_json::from_str(strip_json_fences(raw))?;
    validate_plan(&plan)?;
    Ok(plan)
}

fn validate_plan(plan: &TrainingPlanStructure) -> Result<(), PlanGenerationError> {
    if plan.phases.is_empty() {
        return Err(PlanGenerationError::Validation(
            "plan has no phases".to_string(),
        ));
    }
    for phase in &plan.phases {
        if phase.modules.is_empty() {
            return Err(PlanGenerationError::Validation(format!(
                "phase '{}' has no modules",
                phase.phase_name
            )));
        }
        if let Some(module) = phase.modules.iter().find(|m| m.lessons.is_empty()) {
            return Err(PlanGenerationError::Validation(format!(
                "module '{}' in phase '{}' has no lessons",
                module.module_name, phase.phase_name
            )));
        }
    }
    Ok(())
}

pub async fn generate_training_plan(
    llm: &LlmClient,
    onboarding: &OnboardingData,
) -> Result<TrainingPlanStructure, PlanGenerationError> {
    let messages = [
        ChatMessage::system(format!(
            "{PLAN_SYSTEM} {SAFETY_FIRST_INSTRUCTION} {JSON_ONLY_SYSTEM}"
        )),
        ChatMessage::user(build_plan_prompt(onboarding)),
    ];

    let raw = llm.call(&messages).await?;
    let plan = parse_plan(&raw)?;

    info!(
        "Generated training plan: {} phases, {} lessons",
        plan.phases.len(),
        plan.lesson_count()
    );
    Ok(plan)
}
