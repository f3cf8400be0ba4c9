//! Static training plan used when AI generation fails.
//!
//! Pure and deterministic: the same onboarding answers always produce the
//! same plan. Two phases for everyone, plus "Preparation for Riding" for
//! riders past the beginner stage who want to ride.

use crate::models::training_plan::{
    LessonTemplate, Module, OnboardingData, Phase, TrainingPlanStructure,
};

const LEARN_TO_RIDE: &str = "learn_to_ride";
const BEGINNER_LEVELS: &[&str] = &["complete_beginner", "some_experience"];

pub fn generate_fallback_plan(onboarding: &OnboardingData) -> TrainingPlanStructure {
    let mut phases = vec![foundation_phase(onboarding), connection_phase()];
    if includes_riding_phase(onboarding) {
        phases.push(riding_preparation_phase());
    }
    TrainingPlanStructure { phases }
}

fn includes_riding_phase(onboarding: &OnboardingData) -> bool {
    onboarding.primary_goal == LEARN_TO_RIDE
        && !BEGINNER_LEVELS.contains(&onboarding.experience_level.as_str())
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

struct LessonDef<'a> {
    title: &'a str,
    objective: &'a str,
    equipment: &'a [&'a str],
    instructions: &'a [&'a str],
    safety_notes: &'a [&'a str],
    common_mistakes: &'a [&'a str],
    move_on_when: &'a [&'a str],
    requires_professional_help: bool,
}

fn lessons(defs: &[LessonDef]) -> Vec<LessonTemplate> {
    defs
        .iter()
        .zip(1..)
        .map(|(def, lesson_number)| LessonTemplate {
            lesson_number,
            title: def.title.to_string(),
            objective: def.objective.to_string(),
            equipment: strings(def.equipment),
            instructions: strings(def.instructions),
            safety_notes: strings(def.safety_notes),
            common_mistakes: strings(def.common_mistakes),
            move_on_when: strings(def.move_on_when),
            requires_professional_help: Some(def.requires_professional_help),
        })
        .collect()
}

fn foundation_phase(onboarding: &OnboardingData) -> Phase {
    let description = if onboarding.owns_horse {
        "Learn to read, approach and handle your horse safely before asking anything of them."
    } else {
        "Learn to read, approach and handle horses safely. Practice with a lesson horse \
         under an instructor's eye."
    };

    Phase {
        phase_number: 1,
        phase_name: "Foundation & Safety".to_string(),
        description: description.to_string(),
        modules: vec![
            Module {
                module_number: 1,
                module_name: "Safety Basics".to_string(),
                description: "How horses communicate and how to stay safe around them."
                    .to_string(),
                lessons: lessons(&[
                    LessonDef {
                        title: "Understanding Horse Body Language",
                        objective: "Recognize relaxed, alert and fearful horses from ears, eyes, \
                                    tail and posture.",
                        equipment: &[],
                        instructions: &[
                            "Observe a horse at liberty for 10 minutes from outside the fence.",
                            "Note ear position, eye softness, tail carriage and weight shifts.",
                            "Compare the horse's signals before and after a change, like feeding time.",
                        ],
                        safety_notes: &["Observe from outside the paddock or stall."],
                        common_mistakes: &[
                            "Watching only the ears and missing the rest of the body.",
                        ],
                        move_on_when: &["You can name three signs of a relaxed horse and three of a worried one."],
                        requires_professional_help: false,
                    },
                    LessonDef {
                        title: "Safe Approach and Haltering",
                        objective: "Approach, greet and halter a horse calmly from the near side.",
                        equipment: &["halter", "lead rope"],
                        instructions: &[
                            "Approach at the shoulder, never straight at the face or from behind.",
                            "Let the horse sniff your hand before touching the neck.",
                            "Slip the noseband on, bring the crown strap over and fasten it.",
                        ],
                        safety_notes: &[
                            "Never wrap the lead rope around your hand.",
                            "Stay out of the kick zone behind the horse.",
                        ],
                        common_mistakes: &["Rushing the approach.", "Halter left loose or twisted."],
                        move_on_when: &["You can halter a calm horse three times without help."],
                        requires_professional_help: false,
                    },
                    LessonDef {
                        title: "Safety Review",
                        objective: "Revisit body language and haltering with a different horse.",
                        equipment: &["halter", "lead rope"],
                        instructions: &[
                            "Describe the horse's mood before approaching.",
                            "Halter and release the horse while narrating each step.",
                        ],
                        safety_notes: &["Ask for help with any horse that pins its ears or turns its hindquarters to you."],
                        common_mistakes: &["Skipping the mood check."],
                        move_on_when: &["Both skills feel routine."],
                        requires_professional_help: false,
                    },
                ]),
            },
            Module {
                module_number: 2,
                module_name: "Handling & Grooming".to_string(),
                description: "Everyday handling that builds trust and good manners.".to_string(),
                lessons: lessons(&[
                    LessonDef {
                        title: "Leading Basics",
                        objective: "Lead a horse at the walk with a slack rope and respectful spacing.",
                        equipment: &["halter", "lead rope"],
                        instructions: &[
                            "Walk at the horse's shoulder with the rope in your right hand.",
                            "Stop by stopping your own feet, then ask with the rope if needed.",
                            "Practice turns away from you to keep your toes safe.",
                        ],
                        safety_notes: &["Keep an arm's length of space; never let the horse crowd you."],
                        common_mistakes: &["Pulling on the rope constantly.", "Walking ahead of the horse."],
                        move_on_when: &["The horse walks, halts and turns with a slack rope."],
                        requires_professional_help: false,
                    },
                    LessonDef {
                        title: "Grooming and Picking Feet",
                        objective: "Groom the whole body and pick up all four feet safely.",
                        equipment: &["curry comb", "body brush", "hoof pick"],
                        instructions: &[
                            "Curry in small circles, then brush with the hair.",
                            "Run your hand down the leg and squeeze the chestnut to ask for the foot.",
                            "Clean from heel to toe, then set the foot down gently.",
                        ],
                        safety_notes: &[
                            "Keep your head up and to the side when working on feet.",
                            "Tie with a quick-release knot or have a handler hold the horse.",
                        ],
                        common_mistakes: &["Kneeling or sitting next to the horse."],
                        move_on_when: &["All four feet come up willingly."],
                        requires_professional_help: false,
                    },
                    LessonDef {
                        title: "Handling Review",
                        objective: "Put leading and grooming together in one calm session.",
                        equipment: &["halter", "lead rope", "grooming kit"],
                        instructions: &[
                            "Lead the horse to the grooming area, tie, groom and pick feet.",
                            "Lead the horse back and release it quietly.",
                        ],
                        safety_notes: &["End the session on a calm note, even if it is shorter."],
                        common_mistakes: &["Hurrying the release at the gate."],
                        move_on_when: &["The whole routine is calm from start to finish."],
                        requires_professional_help: false,
                    },
                ]),
            },
        ],
    }
}

fn connection_phase() -> Phase {
    Phase {
        phase_number: 2,
        phase_name: "Building Connection".to_string(),
        description: "Groundwork that teaches the horse to yield, follow and trust your cues."
            .to_string(),
        modules: vec![
            Module {
                module_number: 1,
                module_name: "Groundwork Fundamentals".to_string(),
                description: "Pressure, release and moving the horse's feet.".to_string(),
                lessons: lessons(&[
                    LessonDef {
                        title: "Pressure and Release",
                        objective: "Understand how horses learn from the release of pressure.",
                        equipment: &["halter", "lead rope"],
                        instructions: &[
                            "Apply light, steady pressure on the lead until the horse takes one step.",
                            "Release instantly and let the horse think.",
                            "Repeat with progressively lighter pressure.",
                        ],
                        safety_notes: &["Increase pressure gradually; never jerk the rope."],
                        common_mistakes: &["Releasing late, after the horse has stopped trying."],
                        move_on_when: &["The horse responds to a light feel on the rope."],
                        requires_professional_help: false,
                    },
                    LessonDef {
                        title: "Yielding the Hindquarters and Forehand",
                        objective: "Move the hindquarters and the shoulders away from light pressure.",
                        equipment: &["halter", "lead rope", "training stick"],
                        instructions: &[
                            "Look at the hip and point toward it to ask the hindquarters to step away.",
                            "Ask the shoulder to step across by pointing at the neck.",
                            "Reward each crossing step with a release.",
                        ],
                        safety_notes: &["Stay out of kicking range when asking the hindquarters to move."],
                        common_mistakes: &["Asking for too many steps at once."],
                        move_on_when: &["Both yields happen from a point or light touch on each side."],
                        requires_professional_help: false,
                    },
                    LessonDef {
                        title: "Groundwork Review",
                        objective: "Combine leading and yields into a short pattern.",
                        equipment: &["halter", "lead rope", "cones"],
                        instructions: &["Lead around cones, halting and yielding at each one."],
                        safety_notes: &["Keep sessions short if the horse becomes tense."],
                        common_mistakes: &["Drilling the same exercise after it is already good."],
                        move_on_when: &["The pattern is soft and consistent on both sides."],
                        requires_professional_help: false,
                    },
                ]),
            },
            Module {
                module_number: 2,
                module_name: "Trust & Communication".to_string(),
                description: "Confidence building for horse and handler.".to_string(),
                lessons: lessons(&[
                    LessonDef {
                        title: "Desensitizing to Everyday Objects",
                        objective: "Help the horse accept tarps, bags and touch all over its body.",
                        equipment: &["halter", "lead rope", "plastic bag on a stick"],
                        instructions: &[
                            "Start at a distance where the horse notices the object but stays calm.",
                            "Retreat the object as soon as the horse relaxes.",
                            "Gradually approach and touch the shoulder, back and legs.",
                        ],
                        safety_notes: &[
                            "Work in an enclosed area with good footing.",
                            "Stop if the horse tries to flee; go back to an easier step.",
                        ],
                        common_mistakes: &["Moving closer while the horse is still worried."],
                        move_on_when: &["The horse stands relaxed while the object touches its body."],
                        requires_professional_help: false,
                    },
                    LessonDef {
                        title: "Reading Stress and Building Confidence",
                        objective: "Spot early signs of stress and adjust before they escalate.",
                        equipment: &["halter", "lead rope"],
                        instructions: &[
                            "Watch for licking and chewing, head lowering and soft eyes as release signals.",
                            "Pause and wait whenever the horse shows tension.",
                        ],
                        safety_notes: &["A horse with a history of fear may need a professional's assessment."],
                        common_mistakes: &["Ignoring small signs until the horse reacts."],
                        move_on_when: &["You can name the horse's early stress signals."],
                        requires_professional_help: false,
                    },
                    LessonDef {
                        title: "Connection Review",
                        objective: "Run a full groundwork session that includes a new object.",
                        equipment: &["halter", "lead rope", "cones", "tarp"],
                        instructions: &["Warm up with yields, then introduce the tarp using approach and retreat."],
                        safety_notes: &["Have a helper present for the first tarp session."],
                        common_mistakes: &["Skipping the warm-up."],
                        move_on_when: &["The horse stays with you calmly through the whole session."],
                        requires_professional_help: false,
                    },
                ]),
            },
        ],
    }
}

fn riding_preparation_phase() -> Phase {
    Phase {
        phase_number: 3,
        phase_name: "Preparation for Riding".to_string(),
        description: "Tack, mounting and the first steps under saddle.".to_string(),
        modules: vec![
            Module {
                module_number: 1,
                module_name: "Tack & Equipment".to_string(),
                description: "Fitting and checking saddle and bridle.".to_string(),
                lessons: lessons(&[
                    LessonDef {
                        title: "Saddling and Bridling",
                        objective: "Tack up correctly and check fit.",
                        equipment: &["saddle", "saddle pad", "bridle"],
                        instructions: &[
                            "Place the pad and saddle slightly forward, then slide back into place.",
                            "Tighten the girth in stages.",
                            "Bridle by guiding the bit in with a thumb at the corner of the mouth.",
                        ],
                        safety_notes: &["Check the girth again before mounting."],
                        common_mistakes: &["Tightening the girth all at once."],
                        move_on_when: &["You can tack up and pass a fit check unaided."],
                        requires_professional_help: false,
                    },
                    LessonDef {
                        title: "Tack Safety Check",
                        objective: "Inspect tack for wear and fit problems.",
                        equipment: &["saddle", "bridle"],
                        instructions: &["Check stitching, buckles and leather for cracks.", "Check saddle clearance at the withers."],
                        safety_notes: &["Do not ride in tack with damaged stitching."],
                        common_mistakes: &["Only checking the parts you can see easily."],
                        move_on_when: &["You can explain why each check matters."],
                        requires_professional_help: false,
                    },
                    LessonDef {
                        title: "Tack Review",
                        objective: "Tack up, check and untack in one routine.",
                        equipment: &["saddle", "saddle pad", "bridle"],
                        instructions: &["Complete the full routine while describing each check."],
                        safety_notes: &["Keep the horse tied or held throughout."],
                        common_mistakes: &["Leaving the bridle on a tied horse."],
                        move_on_when: &["The routine is calm and correct."],
                        requires_professional_help: false,
                    },
                ]),
            },
            Module {
                module_number: 2,
                module_name: "First Mounted Work".to_string(),
                description: "Mounting, position and the walk, under supervision.".to_string(),
                lessons: lessons(&[
                    LessonDef {
                        title: "Mounting and Dismounting",
                        objective: "Mount from a block and dismount safely.",
                        equipment: &["mounting block", "helmet", "tacked horse"],
                        instructions: &[
                            "Position the horse beside the block and check the girth.",
                            "Mount without pulling on the saddle and sit down softly.",
                            "Dismount by kicking both feet free and sliding down facing the saddle.",
                        ],
                        safety_notes: &["Always wear a helmet.", "Have a handler hold the horse."],
                        common_mistakes: &["Poking the horse with your toe while mounting."],
                        move_on_when: &["The horse stands still for mounting and dismounting."],
                        requires_professional_help: true,
                    },
                    LessonDef {
                        title: "Balanced Seat at the Walk",
                        objective: "Sit balanced and steer at the walk.",
                        equipment: &["helmet", "tacked horse"],
                        instructions: &["Ride large circles and changes of direction at the walk.", "Practice halts from the seat first."],
                        safety_notes: &["Ride in an enclosed arena with an instructor present."],
                        common_mistakes: &["Balancing on the reins."],
                        move_on_when: &["You can walk, steer and halt without gripping."],
                        requires_professional_help: true,
                    },
                    LessonDef {
                        title: "Riding Review",
                        objective: "Ride a short walk pattern with mounting and dismounting.",
                        equipment: &["helmet", "tacked horse", "cones"],
                        instructions: &["Mount, ride a cone pattern at the walk, halt and dismount."],
                        safety_notes: &["Stop if the horse shows tension and return to groundwork."],
                        common_mistakes: &["Rushing the pattern."],
                        move_on_when: &["Your instructor agrees you are ready for trot work."],
                        requires_professional_help: true,
                    },
                ]),
            },
        ],
    }
}
