// All LLM prompt constants for the Training module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for plan generation. `JSON_ONLY_SYSTEM` is appended by the generator.
pub const PLAN_SYSTEM: &str = "You are an expert horsemanship instructor who designs safe, \
    progressive training curricula for riders of every level.";

/// Plan prompt template. Replace `{experience_level}`, `{primary_goal}`,
/// `{days_per_week}`, `{session_length}` and `{horse_ownership}` before sending.
pub const PLAN_PROMPT_TEMPLATE: &str = r#"Create a personalized horsemanship training plan for this rider.

RIDER PROFILE:
- Experience level: {experience_level}
- Primary goal: {primary_goal}
- Availability: {days_per_week} days per week
- Session length: {session_length} minutes
- Horse access: {horse_ownership}

Return a JSON object with this EXACT schema (no extra fields):
{
  "phases": [
    {
      "phaseNumber": 1,
      "phaseName": "Foundation & Safety",
      "description": "What this phase achieves",
      "modules": [
        {
          "moduleNumber": 1,
          "moduleName": "Safety Basics",
          "description": "What this module covers",
          "lessons": [
            {
              "lessonNumber": 1,
              "title": "Understanding Horse Body Language",
              "objective": "What the rider will be able to do",
              "equipment": ["halter", "lead rope"],
              "instructions": ["Step 1", "Step 2"],
              "safetyNotes": ["Never stand directly behind the horse"],
              "commonMistakes": ["Approaching from the blind spot"],
              "moveOnWhen": ["Can name three signs of a relaxed horse"],
              "requiresProfessionalHelp": false
            }
          ]
        }
      ]
    }
  ]
}

STRUCTURE RULES:
- 2 to 4 phases, each with 2 to 4 modules, each with 3 to 6 lessons.
- Number phases, modules and lessons from 1 within their parent.
- Order everything safety first: ground manners and handling before anything mounted.
- Every lesson must fit in a {session_length} minute session.
- Include a review session at the end of every module that revisits earlier lessons.
- Set "requiresProfessionalHelp" to true for any lesson that should be done under a qualified instructor's supervision (first rides, trailer loading, problem behaviors).
- If the rider does not own a horse, assume lesson-barn or borrowed horses and say so in the instructions.
- Match vocabulary and pace to the rider's experience level."#;
