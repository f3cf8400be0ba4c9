//! Axum route handlers for the Training Plan API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::training_plan::{OnboardingData, PlanSource, TrainingPlanStructure};
use crate::state::AppState;
use crate::training::fallback::generate_fallback_plan;
use crate::training::generator::generate_training_plan;

const DAYS_PER_WEEK: std::ops::RangeInclusive<u32> = 1..=7;
const SESSION_MINUTES: std::ops::RangeInclusive<u32> = 10..=240;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GeneratePlanRequest {
    pub user_id: Uuid,
    pub onboarding: OnboardingData,
}

#[derive(Debug, Serialize)]
pub struct GeneratePlanResponse {
    pub plan_id: Uuid,
    pub source: PlanSource,
    pub plan: TrainingPlanStructure,
}

#[derive(Debug, Serialize)]
pub struct FallbackPreviewResponse {
    pub plan: TrainingPlanStructure,
}

fn validate_onboarding(onboarding: &OnboardingData) -> Result<(), AppError> {
    if onboarding.experience_level.trim().is_empty() {
        return Err(AppError::Validation(
            "experienceLevel cannot be empty".to_string(),
        ));
    }
    if onboarding.primary_goal.trim().is_empty() {
        return Err(AppError::Validation("primaryGoal cannot be empty".to_string()));
    }
    if !DAYS_PER_WEEK.contains(&onboarding.days_per_week) {
        return Err(AppError::Validation(format!(
            "daysPerWeek must be between 1 and 7, got {}",
            onboarding.days_per_week
        )));
    }
    if !SESSION_MINUTES.contains(&onboarding.session_length) {
        return Err(AppError::Validation(format!(
            "sessionLength must be between 10 and 240 minutes, got {}",
            onboarding.session_length
        )));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/training-plans/generate
///
/// Tries AI generation first. Any generation failure falls back to the static
/// plan; the chosen plan becomes the user's active plan.
pub async fn handle_generate_plan(
    State(state): State<AppState>,
    Json(request): Json<GeneratePlanRequest>,
) -> Result<Json<GeneratePlanResponse>, AppError> {
    validate_onboarding(&request.onboarding)?;

    let (plan, source) = match generate_training_plan(&state.llm, &request.onboarding).await {
        Ok(plan) => (plan, PlanSource::Ai),
        Err(e) => {
            warn!(
                "AI plan generation failed ({}), using fallback plan: {e}",
                e.kind()
            );
            (generate_fallback_plan(&request.onboarding), PlanSource::Fallback)
        }
    };

    let plan_id = state
        .store
        .save_training_plan(request.user_id, &plan, source)
        .await?;

    info!(
        "Training plan {plan_id} ({}) ready for user {}",
        source.as_str(),
        request.user_id
    );

    Ok(Json(GeneratePlanResponse {
        plan_id,
        source,
        plan,
    }))
}

/// POST /api/v1/training-plans/fallback-preview
///
/// Returns the static plan for the given answers without calling the model.
pub async fn handle_fallback_preview(
    Json(onboarding): Json<OnboardingData>,
) -> Result<Json<FallbackPreviewResponse>, AppError> {
    validate_onboarding(&onboarding)?;
    Ok(Json(FallbackPreviewResponse {
        plan: generate_fallback_plan(&onboarding),
    }))
}
