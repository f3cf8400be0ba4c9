//! Rows returned by the profile store. These mirror the relational schema and
//! still carry ids; the context aggregator turns them into id-free snapshots.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// A method the rider reported experience with on their profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperiencedMethod {
    pub method_id: Uuid,
    /// 1–5 self-reported familiarity.
    pub comfort_level: i32,
    #[serde(default)]
    pub years_experience: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfileRow {
    pub user_id: Uuid,
    pub experience_level: Option<String>,
    pub learning_style: Option<String>,
    pub risk_tolerance: Option<String>,
    pub physical_limitations: Option<String>,
    pub primary_goal: Option<String>,
    pub experienced_methods: Json<Vec<ExperiencedMethod>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MethodPreferenceRow {
    pub user_id: Uuid,
    /// Raw stored mode; normalized by `MethodPreferenceMode::from_stored`.
    pub preference_mode: Option<String>,
    /// Methods picked during onboarding.
    pub selected_method_ids: Vec<Uuid>,
    pub primary_method_id: Option<Uuid>,
    pub show_comparisons: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MethodRatingRow {
    pub method_id: Uuid,
    pub comfort_level: i32,
    pub years_experience: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HorseRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub breed: Option<String>,
    pub age_range: Option<String>,
    pub temperament: Vec<String>,
    pub energy_level: Option<String>,
    pub known_issues: Vec<String>,
    pub injuries: Option<String>,
    pub past_trauma: Option<String>,
    pub training_level: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FacilityRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub facility_type: Option<String>,
    pub arena_type: Option<String>,
    pub has_round_pen: bool,
    pub has_indoor_arena: bool,
    pub has_trail_access: bool,
    pub available_equipment: Vec<String>,
    pub constraints: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MethodRow {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub philosophy: Option<String>,
    pub key_principles: Vec<String>,
    pub terminology: Vec<String>,
}

/// A lesson of the user's active plan that has not been completed yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct IncompleteLessonRow {
    pub title: String,
    pub phase_name: String,
    pub module_name: String,
}
