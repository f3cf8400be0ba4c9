use serde::{Deserialize, Serialize};

/// Answers collected during onboarding. Drives both AI and fallback plans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingData {
    /// e.g. `complete_beginner`, `some_experience`, `intermediate`, `advanced`
    pub experience_level: String,
    /// e.g. `groundwork_only`, `learn_to_ride`, `build_confidence`
    pub primary_goal: String,
    pub days_per_week: u32,
    /// Minutes per session.
    pub session_length: u32,
    pub owns_horse: bool,
}

/// A generated curriculum: phases → modules → lessons.
///
/// Every phase has at least one module and every module at least one lesson.
/// Plans violating that are rejected before they reach the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPlanStructure {
    pub phases: Vec<Phase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub phase_number: u32,
    pub phase_name: String,
    pub description: String,
    pub modules: Vec<Module>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub module_number: u32,
    pub module_name: String,
    pub description: String,
    pub lessons: Vec<LessonTemplate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonTemplate {
    pub lesson_number: u32,
    pub title: String,
    pub objective: String,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub safety_notes: Vec<String>,
    #[serde(default)]
    pub common_mistakes: Vec<String>,
    #[serde(default)]
    pub move_on_when: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_professional_help: Option<bool>,
}

impl TrainingPlanStructure {
    pub fn lesson_count(&self) -> usize {
        self.phases
            .iter()
            .flat_map(|p| &p.modules)
            .map(|m| m.lessons.len())
            .sum()
    }
}

/// Where a stored plan came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanSource {
    Ai,
    Fallback,
}

impl PlanSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanSource::Ai => "ai",
            PlanSource::Fallback => "fallback",
        }
    }
}
