//! Prompt composer: renders an `AggregatedContext` into the context section
//! of the system prompt.
//!
//! Pure: same context and tables in, byte-identical string out. Sections are
//! rendered in a fixed order and only when their data is present. Ids are never
//! rendered; the model only sees names and descriptions.

use crate::context::tables::{PromptTables, METHODS_PLACEHOLDER, METHOD_PLACEHOLDER};
use crate::models::context::{
    AggregatedContext, FacilitySnapshot, HorseSnapshot, MethodPreferenceMode, MethodProfile,
    RiderSnapshot, WeatherSnapshot,
};

const HOT_WEATHER_F: f64 = 85.0;
const FREEZING_F: f64 = 32.0;
const WINDY_MPH: f64 = 20.0;
/// Comfort at or below this marks a method as unfamiliar.
const LOW_COMFORT: i32 = 2;

const CONTEXT_INTRO: &str = "RIDER CONTEXT: Use the following information about this rider, \
their horse and their environment to personalize every answer.";

pub fn compose_context_prompt(context: &AggregatedContext, tables: &PromptTables) -> String {
    let mut sections: Vec<String> = vec![CONTEXT_INTRO.to_string()];

    if let Some(horse) = &context.horse {
        sections.push(render_horse(horse));
    }
    if let Some(rider) = render_rider(&context.rider) {
        sections.push(rider);
    }
    sections.push(render_method_preference(&context.rider, tables));
    if let Some(experience) = render_method_experience(&context.rider) {
        sections.push(experience);
    }
    if let Some(facility) = &context.facility {
        sections.push(render_facility(facility));
    }
    if let Some(conditions) = render_conditions(
        context.weather_context.as_ref(),
        context.environmental_factors.as_deref(),
    ) {
        sections.push(conditions);
    }

    sections.join("\n\n")
}

/// `some_experience` → `some experience`
pub(crate) fn humanize(value: &str) -> String {
    value.replace('_', " ")
}

fn push_line(out: &mut String, label: &str, value: Option<&str>) {
    if let Some(value) = value {
        out.push_str(&format!("- {label}: {}\n", humanize(value)));
    }
}

fn push_list(out: &mut String, label: &str, values: &[String]) {
    if !values.is_empty() {
        let joined = values.iter().map(|v| humanize(v)).collect::<Vec<_>>().join(", ");
        out.push_str(&format!("- {label}: {joined}\n"));
    }
}

fn render_horse(horse: &HorseSnapshot) -> String {
    let mut out = String::from("## Horse Profile\n");
    out.push_str(&format!("- Name: {}\n", horse.name));
    push_line(&mut out, "Breed", horse.breed.as_deref());
    push_line(&mut out, "Age", horse.age_range.as_deref());
    push_list(&mut out, "Temperament", &horse.temperament);
    push_line(&mut out, "Energy level", horse.energy_level.as_deref());
    push_line(&mut out, "Training level", horse.training_level.as_deref());
    push_list(&mut out, "Known issues", &horse.known_issues);
    push_line(&mut out, "Injuries", horse.injuries.as_deref());
    push_line(&mut out, "Past trauma", horse.past_trauma.as_deref());

    if horse.is_unpredictable() {
        out.push_str(&format!(
            "SAFETY WARNING: {} has been described as unpredictable. Put handler safety first, \
             recommend a helmet, gloves and a safe, enclosed working area, and suggest a \
             professional trainer for anything beyond basic groundwork.\n",
            horse.name
        ));
    }
    if horse.has_history_concerns() {
        out.push_str(&format!(
            "STRATEGY NOTE: Account for {}'s issues and history above. Favor slow, gradual \
             progressions, watch for signs of pain or fear, and recommend a veterinarian or \
             professional when a problem may be physical.\n",
            horse.name
        ));
    }
    out.push_str(&format!(
        "Tailor every recommendation to {}'s temperament, energy and training level.",
        horse.name
    ));
    out
}

fn render_rider(rider: &RiderSnapshot) -> Option<String> {
    let has_profile = rider.experience_level.is_some()
        || rider.learning_style.is_some()
        || rider.risk_tolerance.is_some()
        || rider.primary_goal.is_some()
        || rider.physical_limitations.is_some();
    if !has_profile {
        return None;
    }

    let mut out = String::from("## Rider Profile\n");
    push_line(&mut out, "Experience level", rider.experience_level.as_deref());
    push_line(&mut out, "Learning style", rider.learning_style.as_deref());
    push_line(&mut out, "Risk tolerance", rider.risk_tolerance.as_deref());
    push_line(&mut out, "Primary goal", rider.primary_goal.as_deref());
    push_line(
        &mut out,
        "Physical limitations",
        rider.physical_limitations.as_deref(),
    );

    if rider.physical_limitations.is_some() {
        out.push_str(
            "ACCOMMODATION NOTE: The rider has physical limitations. Adapt all recommendations \
             to accommodate these limitations and offer alternatives for anything that may be \
             difficult or unsafe for them.\n",
        );
    }
    out.push_str(
        "Pitch explanations to this rider's experience, learning style and comfort with risk.",
    );
    Some(out)
}

fn method_names(methods: &[MethodProfile]) -> String {
    methods
        .iter()
        .map(|m| m.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_method_preference(rider: &RiderSnapshot, tables: &PromptTables) -> String {
    let mut out = String::from("## Training Method Approach\n");
    match rider.method_preference {
        MethodPreferenceMode::Explore => {
            let interest = if rider.selected_methods.is_empty() {
                String::new()
            } else {
                format!(
                    " (currently interested in: {})",
                    method_names(&rider.selected_methods)
                )
            };
            out.push_str(&tables.explore_instruction.replace(METHODS_PLACEHOLDER, &interest));
            out.push('\n');
            out.push_str("Present options neutrally and let the rider decide what to pursue.");
        }
        MethodPreferenceMode::Blend => {
            let names = if rider.selected_methods.is_empty() {
                "the methods they have tried".to_string()
            } else {
                method_names(&rider.selected_methods)
            };
            out.push_str(&tables.blend_instruction.replace(METHODS_PLACEHOLDER, &names));
            out.push('\n');
            out.push_str(
                "Always label which method each technique comes from so the rider can keep \
                 them apart.",
            );
        }
        MethodPreferenceMode::Single => match &rider.primary_method {
            Some(method) => {
                out.push_str(&tables.single_instruction.replace(METHOD_PLACEHOLDER, &method.name));
                out.push('\n');
                if let Some(philosophy) = &method.philosophy {
                    out.push_str(&format!("- Philosophy: {philosophy}\n"));
                }
                if !method.principles.is_empty() {
                    out.push_str(&format!(
                        "- Key principles: {}\n",
                        method.principles.join(", ")
                    ));
                }
                if !method.terminology.is_empty() {
                    out.push_str(&format!(
                        "- Terminology: {}\n",
                        method.terminology.join(", ")
                    ));
                }
                out.push_str(&format!(
                    "Frame every answer in {}'s own language and principles.",
                    method.name
                ));
            }
            None => {
                out.push_str(&tables.single_unknown_instruction);
            }
        },
    }
    out
}

fn render_method_experience(rider: &RiderSnapshot) -> Option<String> {
    if rider.method_preference == MethodPreferenceMode::Single
        || rider.method_experience.is_empty()
    {
        return None;
    }

    let mut ordered: Vec<_> = rider.method_experience.iter().collect();
    // Stable: equal comfort keeps merge order.
    ordered.sort_by(|a, b| b.comfort_level.cmp(&a.comfort_level));

    let mut out = String::from("## Method Experience\n");
    for exp in &ordered {
        let category = exp
            .method
            .category
            .as_deref()
            .map(|c| format!(" ({})", humanize(c)))
            .unwrap_or_default();
        let years = match exp.years_experience {
            0 => "new to it".to_string(),
            1 => "1 year".to_string(),
            n => format!("{n} years"),
        };
        out.push_str(&format!(
            "- {}{category}: comfort {}/5, {years}\n",
            exp.method.name, exp.comfort_level
        ));
    }

    let strongest = ordered[0];
    out.push_str(&format!(
        "Build on {} where the rider is most comfortable (comfort {}/5).",
        strongest.method.name, strongest.comfort_level
    ));

    let unfamiliar: Vec<&str> = ordered
        .iter()
        .filter(|e| e.comfort_level <= LOW_COMFORT)
        .map(|e| e.method.name.as_str())
        .collect();
    if !unfamiliar.is_empty() {
        out.push_str(&format!(
            " Introduce techniques from {} gradually and explain their terminology.",
            unfamiliar.join(", ")
        ));
    }
    out.push_str(
        " When blending, start from familiar methods and connect new ideas back to them.",
    );
    Some(out)
}

fn render_facility(facility: &FacilitySnapshot) -> String {
    let mut out = String::from("## Facility\n");
    out.push_str(&format!("- Name: {}\n", facility.name));
    push_line(&mut out, "Type", facility.facility_type.as_deref());
    push_line(&mut out, "Arena", facility.arena_type.as_deref());

    let features = [
        ("round pen", facility.has_round_pen),
        ("indoor arena", facility.has_indoor_arena),
        ("trail access", facility.has_trail_access),
    ];
    let available: Vec<&str> = features.iter().filter(|(_, f)| *f).map(|(n, _)| *n).collect();
    let missing: Vec<&str> = features.iter().filter(|(_, f)| !*f).map(|(n, _)| *n).collect();
    if !available.is_empty() {
        out.push_str(&format!("- Available: {}\n", available.join(", ")));
    }
    if !missing.is_empty() {
        out.push_str(&format!("- Not available: {}\n", missing.join(", ")));
    }
    push_list(&mut out, "Equipment", &facility.available_equipment);
    push_line(&mut out, "Constraints", facility.constraints.as_deref());

    out.push_str(
        "Only suggest exercises that can be done with these facilities and equipment, and \
         offer an alternative when something is missing.",
    );
    out
}

fn render_conditions(
    weather: Option<&WeatherSnapshot>,
    environmental_factors: Option<&[String]>,
) -> Option<String> {
    if weather.is_none() && environmental_factors.is_none() {
        return None;
    }

    let mut out = String::from("## Current Conditions\n");
    let mut notes: Vec<&str> = Vec::new();

    if let Some(weather) = weather {
        if let Some(t) = weather.temperature_f {
            out.push_str(&format!("- Temperature: {t}°F\n"));
            if t >= HOT_WEATHER_F {
                notes.push(
                    "It is hot: shorten sessions, work in shade, and watch for overheating and \
                     dehydration.",
                );
            } else if t <= FREEZING_F {
                notes.push(
                    "It is freezing: allow a longer warm-up, watch for icy footing, and cool the \
                     horse out carefully.",
                );
            }
        }
        push_line(&mut out, "Conditions", weather.conditions.as_deref());
        if let Some(w) = weather.wind_mph {
            out.push_str(&format!("- Wind: {w} mph\n"));
            if w >= WINDY_MPH {
                notes.push(
                    "It is windy: horses are often more reactive, so favor familiar, calm work \
                     in a sheltered area.",
                );
            }
        }
        if let Some(h) = weather.humidity_percent {
            out.push_str(&format!("- Humidity: {h}%\n"));
        }
        push_line(&mut out, "Footing", weather.footing.as_deref());
    }
    if let Some(factors) = environmental_factors {
        push_list(&mut out, "Environmental factors", factors);
    }

    for note in notes {
        out.push_str(note);
        out.push('\n');
    }
    out.push_str(
        "Adjust session intensity, length and location to these conditions and call out any \
         safety concerns they create.",
    );
    Some(out)
}
