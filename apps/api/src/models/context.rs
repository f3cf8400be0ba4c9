//! Request-scoped snapshots assembled by the context aggregator.
//!
//! Every optional piece of data is an `Option` (or an empty-skipped `Vec`) so the
//! prompt composer can treat "present" as "render this section". Nothing here is
//! mutated after construction.

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

/// How the rider wants training methods framed.
///
/// `Explore` is the documented default for riders with no recorded preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodPreferenceMode {
    #[default]
    Explore,
    Blend,
    Single,
}

impl MethodPreferenceMode {
    /// Normalizes the stored preference string. Missing or unrecognized values
    /// become `Explore`.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") => Self::default(),
            Some("explore") => Self::Explore,
            Some("blend") => Self::Blend,
            Some("single") => Self::Single,
            Some(other) => {
                warn!("Unknown method preference '{other}', defaulting to explore");
                Self::default()
            }
        }
    }
}

/// A horsemanship method resolved to its full record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodProfile {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub philosophy: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub principles: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub terminology: Vec<String>,
}

/// One merged entry of the rider's method experience.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodExperience {
    pub method: MethodProfile,
    pub comfort_level: i32,
    pub years_experience: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorseSnapshot {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_range: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub temperament: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_level: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub known_issues: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub injuries: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub past_trauma: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_level: Option<String>,
}

impl HorseSnapshot {
    pub fn is_unpredictable(&self) -> bool {
        self.temperament
            .iter()
            .any(|t| t.to_lowercase().contains("unpredictable"))
    }

    pub fn has_history_concerns(&self) -> bool {
        !self.known_issues.is_empty() || self.injuries.is_some() || self.past_trauma.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiderSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_tolerance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_limitations: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_goal: Option<String>,
    pub method_preference: MethodPreferenceMode,
    #[serde(default)]
    pub show_comparisons: bool,
    /// Methods picked during onboarding, resolved to full records.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selected_methods: Vec<MethodProfile>,
    /// The designated method for `single` mode, or the lead method otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_method: Option<MethodProfile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub method_experience: Vec<MethodExperience>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilitySnapshot {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arena_type: Option<String>,
    #[serde(default)]
    pub has_round_pen: bool,
    #[serde(default)]
    pub has_indoor_arena: bool,
    #[serde(default)]
    pub has_trail_access: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub available_equipment: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<String>,
}

/// Current conditions supplied by the client at request time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_f: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_mph: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footing: Option<String>,
}

impl WeatherSnapshot {
    pub fn is_empty(&self) -> bool {
        self.temperature_f.is_none()
            && self.conditions.is_none()
            && self.wind_mph.is_none()
            && self.humidity_percent.is_none()
            && self.footing.is_none()
    }
}

/// Everything known about the rider's situation for a single request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horse: Option<HorseSnapshot>,
    pub rider: RiderSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility: Option<FacilitySnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_context: Option<WeatherSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environmental_factors: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preference_defaults_to_explore() {
        assert_eq!(
            MethodPreferenceMode::from_stored(None),
            MethodPreferenceMode::Explore
        );
        assert_eq!(
            MethodPreferenceMode::from_stored(Some("")),
            MethodPreferenceMode::Explore
        );
        assert_eq!(
            MethodPreferenceMode::from_stored(Some("mixed")),
            MethodPreferenceMode::Explore
        );
    }

    #[test]
    fn test_preference_parses_known_modes() {
        assert_eq!(
            MethodPreferenceMode::from_stored(Some("Blend")),
            MethodPreferenceMode::Blend
        );
        assert_eq!(
            MethodPreferenceMode::from_stored(Some(" single ")),
            MethodPreferenceMode::Single
        );
    }

    #[test]
    fn test_absent_sections_are_omitted_from_json() {
        let ctx = AggregatedContext {
            horse: None,
            rider: RiderSnapshot::default(),
            facility: None,
            weather_context: None,
            environmental_factors: None,
        };
        let value = serde_json::to_value(&ctx).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("horse"));
        assert!(!obj.contains_key("facility"));
        assert!(!obj.contains_key("weatherContext"));
        assert!(!obj.contains_key("environmentalFactors"));
        let rider = obj["rider"].as_object().unwrap();
        assert!(!rider.contains_key("experienceLevel"));
        assert_eq!(rider["methodPreference"], "explore");
    }

    #[test]
    fn test_unpredictable_detection_is_case_insensitive() {
        let horse = HorseSnapshot {
            name: "Storm".to_string(),
            breed: None,
            age_range: None,
            temperament: vec!["Calm".to_string(), "Unpredictable".to_string()],
            energy_level: None,
            known_issues: vec![],
            injuries: None,
            past_trauma: None,
            training_level: None,
        };
        assert!(horse.is_unpredictable());
        assert!(!horse.has_history_concerns());
    }
}
