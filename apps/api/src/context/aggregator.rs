//! Context aggregation: gathers rider, horse, facility, method and
//! environmental data into one `AggregatedContext` per request.
//!
//! Flow: profile + preference + ratings → horse → facility →
//!       merge method experience → one batched method lookup → snapshots.

use std::collections::HashMap;

use anyhow::Result;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::models::context::{
    AggregatedContext, FacilitySnapshot, HorseSnapshot, MethodExperience, MethodPreferenceMode,
    MethodProfile, RiderSnapshot, WeatherSnapshot,
};
use crate::models::profile::{
    ExperiencedMethod, FacilityRow, HorseRow, MethodRatingRow, MethodRow, UserProfileRow,
};
use crate::store::DataStore;

/// Comfort level given to methods picked during onboarding with no rating yet.
pub const ONBOARDING_DEFAULT_COMFORT: i32 = 3;

/// What the caller knows when asking for context.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContextRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub horse_id: Option<Uuid>,
    #[serde(default)]
    pub facility_id: Option<Uuid>,
    #[serde(default)]
    pub weather_context: Option<WeatherSnapshot>,
    #[serde(default)]
    pub environmental_factors: Vec<String>,
}

/// A method-experience entry before the method record is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergedExperience {
    pub method_id: Uuid,
    pub comfort_level: i32,
    pub years_experience: i32,
}

/// Builds the request's `AggregatedContext`. Any store failure aborts the build.
pub async fn build_comprehensive_context(
    store: &dyn DataStore,
    request: &ContextRequest,
) -> Result<AggregatedContext> {
    let user_id = request.user_id;

    let profile = store.user_profile(user_id).await?;
    let preference = store.method_preference(user_id).await?;
    let ratings = store.method_ratings(user_id).await?;

    let horse = match request.horse_id {
        Some(horse_id) => store.horse(user_id, horse_id).await?,
        None => store.first_active_horse(user_id).await?,
    };

    let facility = match request.facility_id {
        Some(facility_id) => store.facility(user_id, facility_id).await?,
        None => store.first_active_facility(user_id).await?,
    };

    let selected_ids: Vec<Uuid> = preference
        .as_ref()
        .map(|p| p.selected_method_ids.clone())
        .unwrap_or_default();
    let experienced: &[ExperiencedMethod] = profile
        .as_ref()
        .map(|p| p.experienced_methods.0.as_slice())
        .unwrap_or(&[]);
    let merged = merge_method_experience(&selected_ids, &ratings, experienced);

    let mode = MethodPreferenceMode::from_stored(
        preference.as_ref().and_then(|p| p.preference_mode.as_deref()),
    );
    let primary_id = preference.as_ref().and_then(|p| p.primary_method_id);

    let mut lookup_ids: Vec<Uuid> = Vec::new();
    for id in merged
        .iter()
        .map(|m| m.method_id)
        .chain(selected_ids.iter().copied())
        .chain(primary_id)
    {
        if !lookup_ids.contains(&id) {
            lookup_ids.push(id);
        }
    }
    let methods: HashMap<Uuid, MethodProfile> = store
        .methods_by_ids(&lookup_ids)
        .await?
        .into_iter()
        .map(|row| (row.id, method_profile(row)))
        .collect();

    let selected_methods: Vec<MethodProfile> = selected_ids
        .iter()
        .filter_map(|id| methods.get(id).cloned())
        .collect();

    let primary_method = primary_id
        .and_then(|id| methods.get(&id).cloned())
        .or_else(|| match mode {
            MethodPreferenceMode::Single => selected_methods.first().cloned(),
            _ => None,
        });

    let method_experience: Vec<MethodExperience> = merged
        .iter()
        .filter_map(|m| {
            methods.get(&m.method_id).map(|method| MethodExperience {
                method: method.clone(),
                comfort_level: m.comfort_level,
                years_experience: m.years_experience,
            })
        })
        .collect();

    let rider = rider_snapshot(
        profile,
        mode,
        preference.as_ref().map(|p| p.show_comparisons).unwrap_or(false),
        selected_methods,
        primary_method,
        method_experience,
    );

    let weather_context = request
        .weather_context
        .clone()
        .map(|w| WeatherSnapshot {
            conditions: non_blank(w.conditions),
            footing: non_blank(w.footing),
            ..w
        })
        .filter(|w| !w.is_empty());

    let environmental_factors: Vec<String> = request
        .environmental_factors
        .iter()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .map(String::from)
        .collect();

    let context = AggregatedContext {
        horse: horse.map(horse_snapshot),
        rider,
        facility: facility.map(facility_snapshot),
        weather_context,
        environmental_factors: (!environmental_factors.is_empty()).then_some(environmental_factors),
    };

    info!(
        "Built context for user {user_id}: horse={}, facility={}, methods={}, mode={:?}",
        context.horse.is_some(),
        context.facility.is_some(),
        context.rider.method_experience.len(),
        context.rider.method_preference
    );

    Ok(context)
}

/// Merges the three method-experience sources, keyed by method id:
///
/// 1. onboarding-selected methods seed comfort 3 and 0 years;
/// 2. explicit ratings overwrite unconditionally;
/// 3. profile-reported experience overwrites only with a strictly higher comfort.
///
/// Output keeps first-seen order.
pub fn merge_method_experience(
    selected_method_ids: &[Uuid],
    ratings: &[MethodRatingRow],
    experienced: &[ExperiencedMethod],
) -> Vec<MergedExperience> {
    let mut merged: Vec<MergedExperience> = Vec::new();

    fn slot(merged: &mut [MergedExperience], id: Uuid) -> Option<&mut MergedExperience> {
        merged.iter_mut().find(|m| m.method_id == id)
    }

    for &method_id in selected_method_ids {
        if slot(&mut merged, method_id).is_none() {
            merged.push(MergedExperience {
                method_id,
                comfort_level: ONBOARDING_DEFAULT_COMFORT,
                years_experience: 0,
            });
        }
    }

    for rating in ratings {
        let entry = MergedExperience {
            method_id: rating.method_id,
            comfort_level: rating.comfort_level,
            years_experience: rating.years_experience,
        };
        match slot(&mut merged, rating.method_id) {
            Some(existing) => *existing = entry,
            None => merged.push(entry),
        }
    }

    for reported in experienced {
        let entry = MergedExperience {
            method_id: reported.method_id,
            comfort_level: reported.comfort_level,
            years_experience: reported.years_experience,
        };
        match slot(&mut merged, reported.method_id) {
            Some(existing) if reported.comfort_level > existing.comfort_level => *existing = entry,
            Some(_) => {}
            None => merged.push(entry),
        }
    }

    merged
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn non_blank_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

fn method_profile(row: MethodRow) -> MethodProfile {
    MethodProfile {
        id: row.id,
        name: row.name,
        category: non_blank(row.category),
        philosophy: non_blank(row.philosophy),
        principles: non_blank_list(row.key_principles),
        terminology: non_blank_list(row.terminology),
    }
}

fn horse_snapshot(row: HorseRow) -> HorseSnapshot {
    HorseSnapshot {
        name: row.name,
        breed: non_blank(row.breed),
        age_range: non_blank(row.age_range),
        temperament: non_blank_list(row.temperament),
        energy_level: non_blank(row.energy_level),
        known_issues: non_blank_list(row.known_issues),
        injuries: non_blank(row.injuries),
        past_trauma: non_blank(row.past_trauma),
        training_level: non_blank(row.training_level),
    }
}

fn facility_snapshot(row: FacilityRow) -> FacilitySnapshot {
    FacilitySnapshot {
        name: row.name,
        facility_type: non_blank(row.facility_type),
        arena_type: non_blank(row.arena_type),
        has_round_pen: row.has_round_pen,
        has_indoor_arena: row.has_indoor_arena,
        has_trail_access: row.has_trail_access,
        available_equipment: non_blank_list(row.available_equipment),
        constraints: non_blank(row.constraints),
    }
}

fn rider_snapshot(
    profile: Option<UserProfileRow>,
    method_preference: MethodPreferenceMode,
    show_comparisons: bool,
    selected_methods: Vec<MethodProfile>,
    primary_method: Option<MethodProfile>,
    method_experience: Vec<MethodExperience>,
) -> RiderSnapshot {
    let mut rider = RiderSnapshot {
        method_preference,
        show_comparisons,
        selected_methods,
        primary_method,
        method_experience,
        ..RiderSnapshot::default()
    };
    if let Some(profile) = profile {
        rider.experience_level = non_blank(profile.experience_level);
        rider.learning_style = non_blank(profile.learning_style);
        rider.risk_tolerance = non_blank(profile.risk_tolerance);
        rider.physical_limitations = non_blank(profile.physical_limitations);
        rider.primary_goal = non_blank(profile.primary_goal);
    }
    rider
}

#[cfg(test)]
pub(crate) mod fixtures {
    use sqlx::types::Json;

    use super::*;
    use crate::models::profile::MethodPreferenceRow;
    use crate::store::memory::MemoryDataStore;

    pub fn method(name: &str) -> MethodRow {
        MethodRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category: Some("groundwork".to_string()),
            philosophy: Some(format!("{name} philosophy")),
            key_principles: vec!["pressure and release".to_string()],
            terminology: vec![format!("{name} term")],
        }
    }

    pub fn horse(user_id: Uuid, name: &str, active: bool) -> HorseRow {
        HorseRow {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            breed: Some("Quarter Horse".to_string()),
            age_range: Some("adult (5-15)".to_string()),
            temperament: vec!["calm".to_string()],
            energy_level: Some("moderate".to_string()),
            known_issues: vec![],
            injuries: None,
            past_trauma: None,
            training_level: Some("green".to_string()),
            is_active: active,
        }
    }

    pub fn facility(user_id: Uuid, name: &str, active: bool) -> FacilityRow {
        FacilityRow {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            facility_type: Some("boarding barn".to_string()),
            arena_type: Some("outdoor sand".to_string()),
            has_round_pen: true,
            has_indoor_arena: false,
            has_trail_access: false,
            available_equipment: vec!["rope halter".to_string()],
            constraints: None,
            is_active: active,
        }
    }

    pub fn profile(user_id: Uuid, experienced: Vec<ExperiencedMethod>) -> UserProfileRow {
        UserProfileRow {
            user_id,
            experience_level: Some("some_experience".to_string()),
            learning_style: Some("visual".to_string()),
            risk_tolerance: Some("   ".to_string()),
            physical_limitations: None,
            primary_goal: Some("groundwork_only".to_string()),
            experienced_methods: Json(experienced),
        }
    }

    pub fn preference(user_id: Uuid, mode: &str, selected: Vec<Uuid>) -> MethodPreferenceRow {
        MethodPreferenceRow {
            user_id,
            preference_mode: Some(mode.to_string()),
            selected_method_ids: selected,
            primary_method_id: None,
            show_comparisons: false,
        }
    }

    pub fn store_for(user_id: Uuid) -> MemoryDataStore {
        MemoryDataStore {
            profiles: vec![profile(user_id, vec![])],
            ..MemoryDataStore::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn rating(method_id: Uuid, comfort: i32, years: i32) -> MethodRatingRow {
        MethodRatingRow {
            method_id,
            comfort_level: comfort,
            years_experience: years,
        }
    }

    fn reported(method_id: Uuid, comfort: i32, years: i32) -> ExperiencedMethod {
        ExperiencedMethod {
            method_id,
            comfort_level: comfort,
            years_experience: years,
        }
    }

    #[test]
    fn test_onboarding_selection_seeds_default_comfort() {
        let id = Uuid::new_v4();
        let merged = merge_method_experience(&[id], &[], &[]);
        assert_eq!(
            merged,
            vec![MergedExperience {
                method_id: id,
                comfort_level: 3,
                years_experience: 0
            }]
        );
    }

    #[test]
    fn test_rating_overwrites_onboarding_default() {
        let id = Uuid::new_v4();
        let merged = merge_method_experience(&[id], &[rating(id, 5, 2)], &[]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].comfort_level, 5);
        assert_eq!(merged[0].years_experience, 2);
    }

    #[test]
    fn test_rating_overwrites_even_when_lower() {
        let id = Uuid::new_v4();
        let merged = merge_method_experience(&[id], &[rating(id, 1, 0)], &[]);
        assert_eq!(merged[0].comfort_level, 1);
    }

    #[test]
    fn test_reported_experience_wins_when_higher() {
        let id = Uuid::new_v4();
        let merged = merge_method_experience(&[], &[rating(id, 2, 1)], &[reported(id, 4, 6)]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].comfort_level, 4);
        assert_eq!(merged[0].years_experience, 6);
    }

    #[test]
    fn test_reported_experience_never_lowers_comfort() {
        let id = Uuid::new_v4();
        let merged = merge_method_experience(&[], &[rating(id, 4, 3)], &[reported(id, 1, 9)]);
        assert_eq!(merged[0].comfort_level, 4);
        assert_eq!(merged[0].years_experience, 3);
    }

    #[test]
    fn test_reported_experience_equal_comfort_does_not_overwrite() {
        let id = Uuid::new_v4();
        let merged = merge_method_experience(&[], &[rating(id, 4, 3)], &[reported(id, 4, 9)]);
        assert_eq!(merged[0].years_experience, 3);
    }

    #[test]
    fn test_merge_keeps_first_seen_order_and_dedups() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let merged = merge_method_experience(
            &[a, b, a],
            &[rating(c, 2, 0)],
            &[reported(b, 5, 1)],
        );
        let ids: Vec<Uuid> = merged.iter().map(|m| m.method_id).collect();
        assert_eq!(ids, vec![a, b, c]);
        assert_eq!(merged[1].comfort_level, 5);
    }

    #[tokio::test]
    async fn test_explicit_horse_id_is_scoped_to_user() {
        let user_id = Uuid::new_v4();
        let other_user = Uuid::new_v4();
        let foreign = horse(other_user, "NotMine", true);
        let mut store = store_for(user_id);
        store.horses = vec![foreign.clone(), horse(user_id, "Mine", true)];

        let request = ContextRequest {
            user_id,
            horse_id: Some(foreign.id),
            ..ContextRequest::default()
        };
        let ctx = build_comprehensive_context(&store, &request).await.unwrap();
        assert!(ctx.horse.is_none());
    }

    #[tokio::test]
    async fn test_falls_back_to_first_active_horse_and_facility() {
        let user_id = Uuid::new_v4();
        let mut store = store_for(user_id);
        store.horses = vec![
            horse(user_id, "Retired", false),
            horse(user_id, "Biscuit", true),
        ];
        store.facilities = vec![facility(user_id, "Home Barn", true)];

        let request = ContextRequest {
            user_id,
            ..ContextRequest::default()
        };
        let ctx = build_comprehensive_context(&store, &request).await.unwrap();
        assert_eq!(ctx.horse.unwrap().name, "Biscuit");
        assert_eq!(ctx.facility.unwrap().name, "Home Barn");
    }

    #[tokio::test]
    async fn test_blank_and_absent_fields_are_omitted() {
        let user_id = Uuid::new_v4();
        let store = store_for(user_id);
        let request = ContextRequest {
            user_id,
            weather_context: Some(WeatherSnapshot::default()),
            environmental_factors: vec!["  ".to_string()],
            ..ContextRequest::default()
        };
        let ctx = build_comprehensive_context(&store, &request).await.unwrap();
        assert!(ctx.horse.is_none());
        assert!(ctx.facility.is_none());
        assert!(ctx.weather_context.is_none());
        assert!(ctx.environmental_factors.is_none());
        assert!(ctx.rider.risk_tolerance.is_none());
        assert_eq!(ctx.rider.experience_level.as_deref(), Some("some_experience"));
        assert_eq!(ctx.rider.method_preference, MethodPreferenceMode::Explore);
    }

    #[tokio::test]
    async fn test_blank_weather_strings_are_dropped() {
        let user_id = Uuid::new_v4();
        let store = store_for(user_id);
        let request = ContextRequest {
            user_id,
            weather_context: Some(WeatherSnapshot {
                conditions: Some("  ".to_string()),
                footing: Some(" muddy ".to_string()),
                ..WeatherSnapshot::default()
            }),
            ..ContextRequest::default()
        };
        let weather = build_comprehensive_context(&store, &request)
            .await
            .unwrap()
            .weather_context
            .unwrap();
        assert!(weather.conditions.is_none());
        assert_eq!(weather.footing.as_deref(), Some("muddy"));

        let only_blank = ContextRequest {
            user_id,
            weather_context: Some(WeatherSnapshot {
                conditions: Some(" ".to_string()),
                ..WeatherSnapshot::default()
            }),
            ..ContextRequest::default()
        };
        let ctx = build_comprehensive_context(&store, &only_blank).await.unwrap();
        assert!(ctx.weather_context.is_none());
    }

    #[tokio::test]
    async fn test_methods_are_resolved_with_merged_comfort() {
        let user_id = Uuid::new_v4();
        let parelli = method("Parelli");
        let classical = method("Classical Dressage");
        let mut store = store_for(user_id);
        store.methods = vec![parelli.clone(), classical.clone()];
        store.preferences = vec![preference(user_id, "blend", vec![parelli.id, classical.id])];
        store.ratings = vec![(user_id, rating(classical.id, 5, 4))];
        store.profiles = vec![profile(user_id, vec![reported(parelli.id, 1, 0)])];

        let request = ContextRequest {
            user_id,
            ..ContextRequest::default()
        };
        let ctx = build_comprehensive_context(&store, &request).await.unwrap();
        assert_eq!(ctx.rider.method_preference, MethodPreferenceMode::Blend);
        assert_eq!(ctx.rider.selected_methods.len(), 2);

        let experience: Vec<(&str, i32)> = ctx
            .rider
            .method_experience
            .iter()
            .map(|e| (e.method.name.as_str(), e.comfort_level))
            .collect();
        assert_eq!(experience, vec![("Parelli", 3), ("Classical Dressage", 5)]);
    }

    #[tokio::test]
    async fn test_single_mode_uses_first_selected_method_as_primary() {
        let user_id = Uuid::new_v4();
        let parelli = method("Parelli");
        let mut store = store_for(user_id);
        store.methods = vec![parelli.clone()];
        store.preferences = vec![preference(user_id, "single", vec![parelli.id])];

        let request = ContextRequest {
            user_id,
            ..ContextRequest::default()
        };
        let ctx = build_comprehensive_context(&store, &request).await.unwrap();
        assert_eq!(ctx.rider.primary_method.unwrap().name, "Parelli");
    }

    #[tokio::test]
    async fn test_unknown_method_ids_are_dropped() {
        let user_id = Uuid::new_v4();
        let mut store = store_for(user_id);
        store.preferences = vec![preference(user_id, "explore", vec![Uuid::new_v4()])];

        let request = ContextRequest {
            user_id,
            ..ContextRequest::default()
        };
        let ctx = build_comprehensive_context(&store, &request).await.unwrap();
        assert!(ctx.rider.method_experience.is_empty());
        assert!(ctx.rider.selected_methods.is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_aborts_context_build() {
        let user_id = Uuid::new_v4();
        let mut store = store_for(user_id);
        store.fail_horse_lookups = true;

        let request = ContextRequest {
            user_id,
            ..ContextRequest::default()
        };
        assert!(build_comprehensive_context(&store, &request).await.is_err());
    }
}
