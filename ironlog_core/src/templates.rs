//! Pre-built program templates.
//!
//! A template is a descriptor plus a builder that produces a fresh
//! `WorkoutProgram` tree (days and exercises are never shared between
//! programs).

use crate::catalog::ExerciseCatalog;
use crate::types::*;
use crate::{Error, Result};

/// Describes a pre-built program that can be instantiated
#[derive(Clone, Copy, Debug)]
pub struct ProgramTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub subtitle: &'static str,
    pub description: &'static str,
    pub duration_weeks: u32,
    pub days_per_week: u32,
    pub goal: FitnessGoal,
    pub level: ExperienceLevel,
    builder: fn() -> Vec<WorkoutDay>,
}

impl ProgramTemplate {
    /// Build a fresh, inactive program from this template
    pub fn build(&self) -> WorkoutProgram {
        let mut program = WorkoutProgram::new(
            self.name,
            self.subtitle,
            self.duration_weeks,
            self.days_per_week,
            self.goal,
            self.level,
        );
        program.days = (self.builder)();
        program.template_id = Some(self.id.to_string());
        program
    }
}

static TEMPLATES: [ProgramTemplate; 3] = [
    ProgramTemplate {
        id: "upper_lower_beginner",
        name: "Upper/Lower Split",
        subtitle: "4-Day Beginner Program",
        description: "Trains each muscle group twice per week with an upper/lower split, \
                      built around the fundamental compound lifts.",
        duration_weeks: 12,
        days_per_week: 4,
        goal: FitnessGoal::BuildMuscle,
        level: ExperienceLevel::Beginner,
        builder: upper_lower_beginner,
    },
    ProgramTemplate {
        id: "full_body_beginner",
        name: "Full Body Basics",
        subtitle: "3-Day Beginner Program",
        description: "Whole-body training three times per week for lifters new to \
                      weight training.",
        duration_weeks: 10,
        days_per_week: 3,
        goal: FitnessGoal::BuildMuscle,
        level: ExperienceLevel::Beginner,
        builder: full_body_beginner,
    },
    ProgramTemplate {
        id: "ppl_intermediate",
        name: "Push / Pull / Legs",
        subtitle: "6-Day Intermediate Program",
        description: "The classic PPL split run twice per week for high-volume \
                      hypertrophy work.",
        duration_weeks: 12,
        days_per_week: 6,
        goal: FitnessGoal::BuildMuscle,
        level: ExperienceLevel::Intermediate,
        builder: ppl_intermediate,
    },
];

/// All bundled templates
pub fn list_templates() -> &'static [ProgramTemplate] {
    &TEMPLATES
}

pub fn find_template(id: &str) -> Option<&'static ProgramTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}

/// Build a program from a template id
pub fn build_program(template_id: &str) -> Result<WorkoutProgram> {
    find_template(template_id)
        .map(ProgramTemplate::build)
        .ok_or_else(|| Error::NotFound(format!("program template '{}'", template_id)))
}

/// Report template exercise ids that the catalog does not know
pub fn validate_against_catalog(catalog: &ExerciseCatalog) -> Vec<String> {
    let mut errors = Vec::new();
    for template in list_templates() {
        let program = template.build();
        for day in &program.days {
            for ex in &day.exercises {
                if !catalog.contains(&ex.exercise_id) {
                    errors.push(format!(
                        "Template '{}' day '{}' references unknown exercise '{}'",
                        template.id, day.name, ex.exercise_id
                    ));
                }
            }
        }
    }
    errors
}

#[allow(clippy::too_many_arguments)]
fn ex(
    id: &str,
    name: &str,
    sets: u32,
    rep_min: u32,
    rep_max: u32,
    rest_seconds: u32,
    rpe: f64,
    order: u32,
) -> WorkoutExercise {
    WorkoutExercise::new(id, name, sets, rep_min, rep_max)
        .with_rest(rest_seconds)
        .with_rpe(rpe)
        .with_order(order)
}

fn upper_lower_beginner() -> Vec<WorkoutDay> {
    use ExerciseCategory::*;
    vec![
        WorkoutDay::new(
            "Upper A",
            1,
            Push,
            55,
            vec![
                ex("barbell_bench_press", "Barbell Bench Press", 3, 8, 10, 120, 8.0, 0),
                ex("barbell_row", "Barbell Row", 3, 8, 10, 120, 8.0, 1),
                ex("dumbbell_shoulder_press", "Dumbbell Shoulder Press", 3, 10, 12, 90, 8.0, 2),
                ex("lat_pulldown", "Lat Pulldown", 3, 10, 12, 90, 8.0, 3),
                ex("dumbbell_curl", "Dumbbell Curl", 2, 12, 15, 60, 8.0, 4),
                ex("tricep_pushdown", "Cable Tricep Pushdown", 2, 12, 15, 60, 8.0, 5),
            ],
        ),
        WorkoutDay::new(
            "Lower A",
            2,
            Legs,
            55,
            vec![
                ex("barbell_squat", "Barbell Back Squat", 3, 6, 8, 180, 8.0, 0),
                ex("romanian_deadlift", "Romanian Deadlift", 3, 10, 12, 120, 8.0, 1),
                ex("leg_press", "Leg Press", 3, 10, 15, 90, 8.0, 2),
                ex("leg_curl", "Lying Leg Curl", 3, 10, 15, 90, 8.0, 3),
                ex("calf_raise", "Standing Calf Raise", 3, 12, 20, 60, 8.0, 4),
            ],
        ),
        WorkoutDay::new(
            "Upper B",
            3,
            Pull,
            55,
            vec![
                ex("incline_dumbbell_press", "Incline Dumbbell Press", 3, 10, 12, 90, 8.0, 0),
                ex("pull_up", "Pull-Up", 3, 5, 8, 120, 8.0, 1),
                ex("lateral_raise", "Dumbbell Lateral Raise", 3, 12, 15, 60, 8.0, 2),
                ex("cable_row", "Seated Cable Row", 3, 10, 12, 90, 8.0, 3),
                ex("hammer_curl", "Hammer Curl", 2, 12, 15, 60, 8.0, 4),
                ex("overhead_tricep_extension", "Overhead Tricep Extension", 2, 12, 15, 60, 8.0, 5),
                ex("face_pull", "Cable Face Pull", 2, 15, 20, 60, 7.0, 6),
            ],
        ),
        WorkoutDay::new(
            "Lower B",
            4,
            Legs,
            55,
            vec![
                ex("deadlift", "Conventional Deadlift", 3, 4, 6, 180, 8.0, 0),
                ex("hack_squat", "Hack Squat", 3, 10, 12, 120, 8.0, 1),
                ex("lunge", "Dumbbell Lunge", 3, 10, 12, 90, 8.0, 2),
                ex("leg_extension", "Leg Extension", 3, 12, 15, 60, 8.0, 3),
                ex("hip_thrust", "Barbell Hip Thrust", 3, 10, 15, 90, 8.0, 4),
                ex("calf_raise", "Seated Calf Raise", 4, 12, 20, 60, 8.0, 5),
            ],
        ),
    ]
}

fn full_body_beginner() -> Vec<WorkoutDay> {
    use ExerciseCategory::*;
    vec![
        WorkoutDay::new(
            "Full Body A",
            1,
            FullBody,
            50,
            vec![
                ex("barbell_squat", "Barbell Back Squat", 3, 5, 8, 150, 7.5, 0),
                ex("barbell_bench_press", "Barbell Bench Press", 3, 8, 10, 120, 7.5, 1),
                ex("barbell_row", "Barbell Row", 3, 8, 10, 120, 7.5, 2),
                ex("dumbbell_shoulder_press", "Dumbbell Shoulder Press", 2, 10, 12, 90, 7.5, 3),
                ex("plank", "Plank", 3, 30, 60, 60, 7.0, 4).with_notes("Hold for 30-60 seconds"),
            ],
        ),
        WorkoutDay::new(
            "Full Body B",
            2,
            FullBody,
            50,
            vec![
                ex("deadlift", "Conventional Deadlift", 3, 5, 6, 180, 7.5, 0),
                ex("dumbbell_bench_press", "Dumbbell Bench Press", 3, 10, 12, 90, 7.5, 1),
                ex("lat_pulldown", "Lat Pulldown", 3, 10, 12, 90, 7.5, 2),
                ex("lunge", "Dumbbell Lunge", 2, 10, 12, 90, 7.5, 3),
                ex("dead_bug", "Dead Bug", 3, 8, 10, 60, 7.0, 4).with_notes("8-10 per side"),
            ],
        ),
        WorkoutDay::new(
            "Full Body C",
            3,
            FullBody,
            50,
            vec![
                ex("goblet_squat", "Goblet Squat", 3, 10, 15, 90, 7.5, 0),
                ex("push_up", "Push-Up", 3, 10, 20, 60, 7.5, 1),
                ex("dumbbell_row", "Single-Arm Dumbbell Row", 3, 10, 12, 90, 7.5, 2),
                ex("hip_thrust", "Barbell Hip Thrust", 3, 10, 15, 90, 7.5, 3),
                ex("calf_raise", "Standing Calf Raise", 3, 15, 20, 60, 7.5, 4),
            ],
        ),
    ]
}

fn ppl_intermediate() -> Vec<WorkoutDay> {
    use ExerciseCategory::*;
    vec![
        WorkoutDay::new(
            "Push A",
            1,
            Push,
            65,
            vec![
                ex("barbell_bench_press", "Barbell Bench Press", 4, 6, 8, 150, 8.5, 0),
                ex("incline_dumbbell_press", "Incline Dumbbell Press", 3, 10, 12, 90, 8.0, 1),
                ex("overhead_press", "Barbell Overhead Press", 3, 6, 8, 120, 8.0, 2),
                ex("lateral_raise", "Dumbbell Lateral Raise", 4, 12, 20, 60, 8.0, 3),
                ex("cable_fly", "Cable Fly (Low-to-High)", 3, 12, 15, 60, 8.0, 4),
                ex("tricep_pushdown", "Cable Tricep Pushdown", 3, 12, 15, 60, 8.0, 5),
                ex("skull_crusher", "Skull Crusher", 3, 10, 12, 60, 8.0, 6),
            ],
        ),
        WorkoutDay::new(
            "Pull A",
            2,
            Pull,
            65,
            vec![
                ex("deadlift", "Conventional Deadlift", 4, 4, 6, 240, 8.5, 0),
                ex("pull_up", "Pull-Up", 4, 6, 10, 120, 8.0, 1),
                ex("barbell_row", "Barbell Row", 3, 8, 10, 120, 8.0, 2),
                ex("face_pull", "Cable Face Pull", 3, 15, 20, 60, 7.0, 3),
                ex("barbell_curl", "Barbell Curl", 3, 10, 12, 60, 8.0, 4),
                ex("incline_dumbbell_curl", "Incline Dumbbell Curl", 3, 10, 15, 60, 8.0, 5),
                ex("hammer_curl", "Hammer Curl", 2, 12, 15, 60, 8.0, 6),
            ],
        ),
        WorkoutDay::new(
            "Legs A",
            3,
            Legs,
            65,
            vec![
                ex("barbell_squat", "Barbell Back Squat", 4, 6, 8, 180, 8.5, 0),
                ex("hack_squat", "Hack Squat", 3, 10, 12, 120, 8.0, 1),
                ex("romanian_deadlift", "Romanian Deadlift", 3, 10, 12, 120, 8.0, 2),
                ex("leg_curl", "Lying Leg Curl", 3, 10, 15, 90, 8.0, 3),
                ex("leg_extension", "Leg Extension", 3, 12, 15, 60, 8.0, 4),
                ex("hip_thrust", "Barbell Hip Thrust", 3, 10, 15, 90, 8.0, 5),
                ex("calf_raise", "Standing Calf Raise", 4, 10, 20, 60, 8.0, 6),
            ],
        ),
        WorkoutDay::new(
            "Push B",
            4,
            Push,
            60,
            vec![
                ex("incline_barbell_press", "Incline Barbell Press", 4, 8, 10, 120, 8.0, 0),
                ex("dumbbell_bench_press", "Dumbbell Bench Press", 3, 10, 12, 90, 8.0, 1),
                ex("arnold_press", "Arnold Press", 3, 10, 12, 90, 8.0, 2),
                ex("cable_lateral_raise", "Cable Lateral Raise", 4, 15, 20, 60, 8.0, 3),
                ex("pec_deck", "Pec Deck / Machine Fly", 3, 12, 15, 60, 8.0, 4),
                ex("overhead_tricep_extension", "Overhead Tricep Extension", 3, 10, 15, 60, 8.0, 5),
            ],
        ),
        WorkoutDay::new(
            "Pull B",
            5,
            Pull,
            60,
            vec![
                ex("lat_pulldown", "Lat Pulldown", 4, 8, 12, 90, 8.0, 0),
                ex("dumbbell_row", "Single-Arm Dumbbell Row", 4, 10, 12, 90, 8.0, 1),
                ex("cable_row", "Seated Cable Row", 3, 10, 12, 90, 8.0, 2),
                ex("rear_delt_fly", "Rear Delt Fly", 3, 15, 20, 60, 7.0, 3),
                ex("cable_curl", "Cable Curl", 3, 12, 15, 60, 8.0, 4),
                ex("dumbbell_curl", "Dumbbell Curl", 3, 12, 15, 60, 8.0, 5),
            ],
        ),
        WorkoutDay::new(
            "Legs B",
            6,
            Legs,
            60,
            vec![
                ex("trap_bar_deadlift", "Trap Bar Deadlift", 4, 4, 6, 210, 8.5, 0),
                ex("leg_press", "Leg Press", 4, 10, 15, 120, 8.0, 1),
                ex("lunge", "Dumbbell Lunge", 3, 10, 12, 90, 8.0, 2),
                ex("leg_curl", "Lying Leg Curl", 4, 10, 15, 90, 8.0, 3),
                ex("glute_bridge", "Glute Bridge", 3, 12, 20, 60, 8.0, 4),
                ex("calf_raise", "Standing Calf Raise", 5, 10, 20, 60, 8.0, 5),
            ],
        ),
    ]
}
