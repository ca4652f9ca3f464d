//! Exercise reference catalog.
//!
//! The catalog is an immutable lookup table built once and passed to whoever
//! needs it. `build_default_catalog` supplies the exercises used by the
//! bundled program templates.

use crate::types::*;
use std::collections::HashMap;

/// Read-only exercise repository keyed by exercise id
#[derive(Clone, Debug)]
pub struct ExerciseCatalog {
    exercises: Vec<Exercise>,
    index: HashMap<String, usize>,
}

impl ExerciseCatalog {
    /// Build a catalog; later duplicates of an id are ignored
    pub fn new(exercises: Vec<Exercise>) -> Self {
        let mut index = HashMap::with_capacity(exercises.len());
        for (i, exercise) in exercises.iter().enumerate() {
            if index.contains_key(&exercise.id) {
                tracing::warn!("Duplicate exercise id '{}' ignored", exercise.id);
                continue;
            }
            index.insert(exercise.id.clone(), i);
        }
        Self { exercises, index }
    }

    pub fn lookup(&self, id: &str) -> Option<&Exercise> {
        self.index.get(id).map(|&i| &self.exercises[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn all(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Exercises that work the muscle group (primary or secondary)
    pub fn by_muscle_group(&self, muscle: MuscleGroup) -> Vec<&Exercise> {
        self.exercises
            .iter()
            .filter(|e| e.muscle_groups.contains(&muscle))
            .collect()
    }

    pub fn by_category(&self, category: ExerciseCategory) -> Vec<&Exercise> {
        self.exercises
            .iter()
            .filter(|e| e.category == category)
            .collect()
    }

    /// Exercises whose equipment is entirely within `available`
    pub fn by_equipment(&self, available: &[Equipment]) -> Vec<&Exercise> {
        self.exercises
            .iter()
            .filter(|e| e.equipment.iter().all(|eq| available.contains(eq)))
            .collect()
    }

    /// Resolved alternatives for an exercise; unknown ids are skipped
    pub fn alternatives_for(&self, id: &str) -> Vec<&Exercise> {
        self.lookup(id)
            .map(|e| {
                e.alternatives
                    .iter()
                    .filter_map(|alt| self.lookup(alt))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.index.len() != self.exercises.len() {
            errors.push(format!(
                "Catalog has {} duplicate exercise ids",
                self.exercises.len() - self.index.len()
            ));
        }

        for exercise in &self.exercises {
            if exercise.id.is_empty() {
                errors.push("Exercise has empty ID".to_string());
            }
            if exercise.name.is_empty() {
                errors.push(format!("Exercise '{}' has empty name", exercise.id));
            }
            if exercise.equipment.is_empty() {
                errors.push(format!("Exercise '{}' lists no equipment", exercise.id));
            }
            if !exercise.muscle_groups.contains(&exercise.primary_muscle) {
                errors.push(format!(
                    "Exercise '{}' primary muscle {:?} missing from muscle groups",
                    exercise.id, exercise.primary_muscle
                ));
            }
            for alt in &exercise.alternatives {
                if !self.contains(alt) {
                    errors.push(format!(
                        "Exercise '{}' references non-existent alternative '{}'",
                        exercise.id, alt
                    ));
                }
            }
        }

        errors
    }
}

#[allow(clippy::too_many_arguments)]
fn exercise(
    id: &str,
    name: &str,
    muscle_groups: &[MuscleGroup],
    equipment: &[Equipment],
    difficulty: ExperienceLevel,
    category: ExerciseCategory,
    is_compound: bool,
    alternatives: &[&str],
) -> Exercise {
    Exercise {
        id: id.into(),
        name: name.into(),
        muscle_groups: muscle_groups.to_vec(),
        primary_muscle: muscle_groups[0],
        equipment: equipment.to_vec(),
        difficulty,
        category,
        instructions: Vec::new(),
        tips: Vec::new(),
        is_compound,
        alternatives: alternatives.iter().map(|s| s.to_string()).collect(),
    }
}

fn with_cues(mut exercise: Exercise, instructions: &[&str], tips: &[&str]) -> Exercise {
    exercise.instructions = instructions.iter().map(|s| s.to_string()).collect();
    exercise.tips = tips.iter().map(|s| s.to_string()).collect();
    exercise
}

/// Builds the default catalog with the exercises the bundled templates use
pub fn build_default_catalog() -> ExerciseCatalog {
    use Equipment as E;
    use ExerciseCategory as Cat;
    use ExperienceLevel::*;
    use MuscleGroup as M;

    let exercises = vec![
        // ====================================================================
        // Chest
        // ====================================================================
        with_cues(
            exercise(
                "barbell_bench_press",
                "Barbell Bench Press",
                &[M::Chest, M::Triceps, M::Shoulders],
                &[E::Barbell],
                Intermediate,
                Cat::Push,
                true,
                &["dumbbell_bench_press", "push_up"],
            ),
            &[
                "Lie flat with your eyes under the bar.",
                "Lower the bar to mid-chest with elbows tucked around 45 degrees.",
                "Press back up, driving your feet into the floor.",
            ],
            &["Keep your shoulder blades retracted throughout the lift."],
        ),
        exercise(
            "dumbbell_bench_press",
            "Dumbbell Bench Press",
            &[M::Chest, M::Triceps, M::Shoulders],
            &[E::Dumbbell],
            Beginner,
            Cat::Push,
            true,
            &["barbell_bench_press"],
        ),
        exercise(
            "incline_dumbbell_press",
            "Incline Dumbbell Press",
            &[M::Chest, M::Shoulders, M::Triceps],
            &[E::Dumbbell],
            Beginner,
            Cat::Push,
            true,
            &["incline_barbell_press"],
        ),
        exercise(
            "incline_barbell_press",
            "Incline Barbell Press",
            &[M::Chest, M::Shoulders, M::Triceps],
            &[E::Barbell],
            Intermediate,
            Cat::Push,
            true,
            &["incline_dumbbell_press"],
        ),
        exercise(
            "cable_fly",
            "Cable Fly (Low-to-High)",
            &[M::Chest],
            &[E::Cables],
            Beginner,
            Cat::Push,
            false,
            &["pec_deck"],
        ),
        exercise(
            "pec_deck",
            "Pec Deck / Machine Fly",
            &[M::Chest],
            &[E::Machine],
            Beginner,
            Cat::Push,
            false,
            &["cable_fly"],
        ),
        exercise(
            "push_up",
            "Push-Up",
            &[M::Chest, M::Triceps, M::Shoulders, M::Abs],
            &[E::Bodyweight],
            Beginner,
            Cat::Push,
            true,
            &["dumbbell_bench_press"],
        ),
        // ====================================================================
        // Back
        // ====================================================================
        with_cues(
            exercise(
                "deadlift",
                "Conventional Deadlift",
                &[M::Hamstrings, M::Glutes, M::LowerBack, M::Back, M::Traps],
                &[E::Barbell],
                Intermediate,
                Cat::Pull,
                true,
                &["trap_bar_deadlift", "romanian_deadlift"],
            ),
            &[
                "Stand with the bar over mid-foot.",
                "Brace, pull the slack out of the bar and push the floor away.",
                "Lock out with hips and knees together.",
            ],
            &["Keep the bar in contact with your legs."],
        ),
        exercise(
            "trap_bar_deadlift",
            "Trap Bar Deadlift",
            &[M::Quads, M::Glutes, M::Hamstrings, M::Traps],
            &[E::TrapBar],
            Beginner,
            Cat::Legs,
            true,
            &["deadlift"],
        ),
        exercise(
            "barbell_row",
            "Barbell Row",
            &[M::Back, M::Lats, M::Biceps],
            &[E::Barbell],
            Intermediate,
            Cat::Pull,
            true,
            &["dumbbell_row", "cable_row"],
        ),
        exercise(
            "dumbbell_row",
            "Single-Arm Dumbbell Row",
            &[M::Lats, M::Back, M::Biceps],
            &[E::Dumbbell],
            Beginner,
            Cat::Pull,
            true,
            &["barbell_row"],
        ),
        exercise(
            "cable_row",
            "Seated Cable Row",
            &[M::Back, M::Lats, M::Biceps],
            &[E::Cables],
            Beginner,
            Cat::Pull,
            true,
            &["barbell_row"],
        ),
        exercise(
            "lat_pulldown",
            "Lat Pulldown",
            &[M::Lats, M::Biceps],
            &[E::Cables],
            Beginner,
            Cat::Pull,
            true,
            &["pull_up"],
        ),
        exercise(
            "pull_up",
            "Pull-Up",
            &[M::Lats, M::Biceps, M::Back],
            &[E::PullupBar],
            Intermediate,
            Cat::Pull,
            true,
            &["lat_pulldown"],
        ),
        exercise(
            "face_pull",
            "Cable Face Pull",
            &[M::Shoulders, M::Traps],
            &[E::Cables],
            Beginner,
            Cat::Pull,
            false,
            &["rear_delt_fly"],
        ),
        // ====================================================================
        // Shoulders
        // ====================================================================
        exercise(
            "overhead_press",
            "Barbell Overhead Press",
            &[M::Shoulders, M::Triceps],
            &[E::Barbell],
            Intermediate,
            Cat::Push,
            true,
            &["dumbbell_shoulder_press"],
        ),
        exercise(
            "dumbbell_shoulder_press",
            "Dumbbell Shoulder Press",
            &[M::Shoulders, M::Triceps],
            &[E::Dumbbell],
            Beginner,
            Cat::Push,
            true,
            &["overhead_press", "arnold_press"],
        ),
        exercise(
            "arnold_press",
            "Arnold Press",
            &[M::Shoulders, M::Triceps],
            &[E::Dumbbell],
            Intermediate,
            Cat::Push,
            true,
            &["dumbbell_shoulder_press"],
        ),
        exercise(
            "lateral_raise",
            "Dumbbell Lateral Raise",
            &[M::Shoulders],
            &[E::Dumbbell],
            Beginner,
            Cat::Push,
            false,
            &["cable_lateral_raise"],
        ),
        exercise(
            "cable_lateral_raise",
            "Cable Lateral Raise",
            &[M::Shoulders],
            &[E::Cables],
            Beginner,
            Cat::Push,
            false,
            &["lateral_raise"],
        ),
        exercise(
            "rear_delt_fly",
            "Rear Delt Fly",
            &[M::Shoulders, M::Back],
            &[E::Dumbbell],
            Beginner,
            Cat::Pull,
            false,
            &["face_pull"],
        ),
        // ====================================================================
        // Arms
        // ====================================================================
        exercise(
            "barbell_curl",
            "Barbell Curl",
            &[M::Biceps, M::Forearms],
            &[E::Barbell],
            Beginner,
            Cat::Pull,
            false,
            &["dumbbell_curl"],
        ),
        exercise(
            "dumbbell_curl",
            "Dumbbell Curl",
            &[M::Biceps],
            &[E::Dumbbell],
            Beginner,
            Cat::Pull,
            false,
            &["barbell_curl", "cable_curl"],
        ),
        exercise(
            "incline_dumbbell_curl",
            "Incline Dumbbell Curl",
            &[M::Biceps],
            &[E::Dumbbell],
            Intermediate,
            Cat::Pull,
            false,
            &["dumbbell_curl"],
        ),
        exercise(
            "hammer_curl",
            "Hammer Curl",
            &[M::Biceps, M::Forearms],
            &[E::Dumbbell],
            Beginner,
            Cat::Pull,
            false,
            &["dumbbell_curl"],
        ),
        exercise(
            "cable_curl",
            "Cable Curl",
            &[M::Biceps],
            &[E::Cables],
            Beginner,
            Cat::Pull,
            false,
            &["dumbbell_curl"],
        ),
        exercise(
            "tricep_pushdown",
            "Cable Tricep Pushdown",
            &[M::Triceps],
            &[E::Cables],
            Beginner,
            Cat::Push,
            false,
            &["overhead_tricep_extension"],
        ),
        exercise(
            "overhead_tricep_extension",
            "Overhead Tricep Extension",
            &[M::Triceps],
            &[E::Cables],
            Beginner,
            Cat::Push,
            false,
            &["tricep_pushdown", "skull_crusher"],
        ),
        exercise(
            "skull_crusher",
            "Skull Crusher",
            &[M::Triceps],
            &[E::Barbell],
            Intermediate,
            Cat::Push,
            false,
            &["overhead_tricep_extension"],
        ),
        // ====================================================================
        // Legs
        // ====================================================================
        with_cues(
            exercise(
                "barbell_squat",
                "Barbell Back Squat",
                &[M::Quads, M::Glutes, M::Hamstrings, M::LowerBack],
                &[E::Barbell],
                Intermediate,
                Cat::Legs,
                true,
                &["goblet_squat", "hack_squat", "leg_press"],
            ),
            &[
                "Set the bar on your upper traps and brace.",
                "Sit down between your heels until hips pass parallel.",
                "Drive up through the whole foot.",
            ],
            &["Knees track over the toes."],
        ),
        exercise(
            "goblet_squat",
            "Goblet Squat",
            &[M::Quads, M::Glutes],
            &[E::Dumbbell],
            Beginner,
            Cat::Legs,
            true,
            &["barbell_squat"],
        ),
        exercise(
            "hack_squat",
            "Hack Squat",
            &[M::Quads, M::Glutes],
            &[E::Machine],
            Intermediate,
            Cat::Legs,
            true,
            &["leg_press"],
        ),
        exercise(
            "leg_press",
            "Leg Press",
            &[M::Quads, M::Glutes],
            &[E::Machine],
            Beginner,
            Cat::Legs,
            true,
            &["hack_squat"],
        ),
        exercise(
            "romanian_deadlift",
            "Romanian Deadlift",
            &[M::Hamstrings, M::Glutes, M::LowerBack],
            &[E::Barbell],
            Intermediate,
            Cat::Legs,
            true,
            &["deadlift"],
        ),
        exercise(
            "leg_curl",
            "Lying Leg Curl",
            &[M::Hamstrings],
            &[E::Machine],
            Beginner,
            Cat::Legs,
            false,
            &["romanian_deadlift"],
        ),
        exercise(
            "leg_extension",
            "Leg Extension",
            &[M::Quads],
            &[E::Machine],
            Beginner,
            Cat::Legs,
            false,
            &["lunge"],
        ),
        exercise(
            "lunge",
            "Dumbbell Lunge",
            &[M::Quads, M::Glutes, M::Hamstrings],
            &[E::Dumbbell],
            Beginner,
            Cat::Legs,
            true,
            &["goblet_squat"],
        ),
        exercise(
            "hip_thrust",
            "Barbell Hip Thrust",
            &[M::Glutes, M::Hamstrings],
            &[E::Barbell],
            Beginner,
            Cat::Legs,
            true,
            &["glute_bridge"],
        ),
        exercise(
            "glute_bridge",
            "Glute Bridge",
            &[M::Glutes, M::Hamstrings],
            &[E::Bodyweight],
            Beginner,
            Cat::Legs,
            false,
            &["hip_thrust"],
        ),
        exercise(
            "calf_raise",
            "Standing Calf Raise",
            &[M::Calves],
            &[E::Machine],
            Beginner,
            Cat::Legs,
            false,
            &[],
        ),
        // ====================================================================
        // Core
        // ====================================================================
        exercise(
            "plank",
            "Plank",
            &[M::Abs, M::Obliques],
            &[E::Bodyweight],
            Beginner,
            Cat::Core,
            false,
            &["dead_bug"],
        ),
        exercise(
            "dead_bug",
            "Dead Bug",
            &[M::Abs],
            &[E::Bodyweight],
            Beginner,
            Cat::Core,
            false,
            &["plank"],
        ),
    ];

    ExerciseCatalog::new(exercises)
}
