//! Core domain types for ironlog.
//!
//! This module defines the entities the rest of the crate operates on:
//! - Profile enums and the single local user profile
//! - Exercise catalog metadata
//! - Program plans (program → day → exercise)
//! - Workout logs, set logs and personal records
//! - Body measurements and nutrition logs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::Error;

// ============================================================================
// Profile Enums
// ============================================================================

/// What the user is training for
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    LoseWeight,
    BuildMuscle,
    Recomposition,
    MaintainWeight,
}

impl FitnessGoal {
    pub const ALL: [FitnessGoal; 4] = [
        FitnessGoal::LoseWeight,
        FitnessGoal::BuildMuscle,
        FitnessGoal::Recomposition,
        FitnessGoal::MaintainWeight,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            FitnessGoal::LoseWeight => "Burn fat while preserving muscle",
            FitnessGoal::BuildMuscle => "Maximize muscle growth and strength",
            FitnessGoal::Recomposition => "Lose fat and gain muscle simultaneously",
            FitnessGoal::MaintainWeight => "Stay fit and healthy",
        }
    }
}

impl fmt::Display for FitnessGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitnessGoal::LoseWeight => write!(f, "Lose Weight"),
            FitnessGoal::BuildMuscle => write!(f, "Build Muscle"),
            FitnessGoal::Recomposition => write!(f, "Body Recomposition"),
            FitnessGoal::MaintainWeight => write!(f, "Maintain Weight"),
        }
    }
}

impl FromStr for FitnessGoal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "lose_weight" | "lose" | "cut" => Ok(FitnessGoal::LoseWeight),
            "build_muscle" | "build" | "bulk" => Ok(FitnessGoal::BuildMuscle),
            "recomposition" | "recomp" => Ok(FitnessGoal::Recomposition),
            "maintain_weight" | "maintain" => Ok(FitnessGoal::MaintainWeight),
            other => Err(Error::InvalidInput(format!("Unknown goal: {}", other))),
        }
    }
}

/// Training experience of the user (also the level a program targets)
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    pub fn description(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "Less than 1 year of consistent training",
            ExperienceLevel::Intermediate => "1-3 years of consistent training",
            ExperienceLevel::Advanced => "3+ years of consistent training",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperienceLevel::Beginner => write!(f, "Beginner"),
            ExperienceLevel::Intermediate => write!(f, "Intermediate"),
            ExperienceLevel::Advanced => write!(f, "Advanced"),
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(ExperienceLevel::Beginner),
            "intermediate" => Ok(ExperienceLevel::Intermediate),
            "advanced" => Ok(ExperienceLevel::Advanced),
            other => Err(Error::InvalidInput(format!(
                "Unknown experience level: {}",
                other
            ))),
        }
    }
}

/// Equipment an exercise needs or a user has access to
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    Barbell,
    Dumbbell,
    Cables,
    Machine,
    ResistanceBand,
    PullupBar,
    Bodyweight,
    Kettlebell,
    TrapBar,
}

impl Equipment {
    pub const ALL: [Equipment; 9] = [
        Equipment::Barbell,
        Equipment::Dumbbell,
        Equipment::Cables,
        Equipment::Machine,
        Equipment::ResistanceBand,
        Equipment::PullupBar,
        Equipment::Bodyweight,
        Equipment::Kettlebell,
        Equipment::TrapBar,
    ];
}

impl FromStr for Equipment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "barbell" => Ok(Equipment::Barbell),
            "dumbbell" | "dumbbells" => Ok(Equipment::Dumbbell),
            "cables" | "cable" => Ok(Equipment::Cables),
            "machine" | "machines" => Ok(Equipment::Machine),
            "resistance_band" | "bands" => Ok(Equipment::ResistanceBand),
            "pullup_bar" => Ok(Equipment::PullupBar),
            "bodyweight" => Ok(Equipment::Bodyweight),
            "kettlebell" => Ok(Equipment::Kettlebell),
            "trap_bar" => Ok(Equipment::TrapBar),
            other => Err(Error::InvalidInput(format!("Unknown equipment: {}", other))),
        }
    }
}

/// Muscle groups used to index the exercise catalog
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Biceps,
    Triceps,
    Forearms,
    Quads,
    Hamstrings,
    Glutes,
    Calves,
    Abs,
    Obliques,
    LowerBack,
    Traps,
    Lats,
}

/// Coarse body region a muscle group belongs to
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BodyRegion {
    Upper,
    Lower,
    Core,
}

impl MuscleGroup {
    pub fn body_region(&self) -> BodyRegion {
        match self {
            MuscleGroup::Chest
            | MuscleGroup::Shoulders
            | MuscleGroup::Biceps
            | MuscleGroup::Triceps
            | MuscleGroup::Forearms
            | MuscleGroup::Traps
            | MuscleGroup::Back
            | MuscleGroup::Lats
            | MuscleGroup::LowerBack => BodyRegion::Upper,
            MuscleGroup::Quads | MuscleGroup::Hamstrings | MuscleGroup::Glutes | MuscleGroup::Calves => {
                BodyRegion::Lower
            }
            MuscleGroup::Abs | MuscleGroup::Obliques => BodyRegion::Core,
        }
    }
}

/// Movement pattern category (also the focus of a workout day)
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseCategory {
    Push,
    Pull,
    Legs,
    Core,
    Cardio,
    FullBody,
}

impl fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseCategory::Push => write!(f, "Push"),
            ExerciseCategory::Pull => write!(f, "Pull"),
            ExerciseCategory::Legs => write!(f, "Legs"),
            ExerciseCategory::Core => write!(f, "Core"),
            ExerciseCategory::Cardio => write!(f, "Cardio"),
            ExerciseCategory::FullBody => write!(f, "Full Body"),
        }
    }
}

// ============================================================================
// User Profile
// ============================================================================

/// The single local user
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub goal: FitnessGoal,
    pub experience_level: ExperienceLevel,
    pub days_per_week: u32,
    pub available_equipment: Vec<Equipment>,
    #[serde(default)]
    pub injuries: Vec<String>,
    pub created_at: DateTime<Utc>,
    /// Non-owning link to the active program
    #[serde(default)]
    pub active_program_id: Option<Uuid>,
}

impl UserProfile {
    pub fn new(
        name: impl Into<String>,
        age: u32,
        height_cm: f64,
        weight_kg: f64,
        goal: FitnessGoal,
        experience_level: ExperienceLevel,
        days_per_week: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            age,
            height_cm,
            weight_kg,
            goal,
            experience_level,
            days_per_week,
            available_equipment: Equipment::ALL.to_vec(),
            injuries: Vec::new(),
            created_at: Utc::now(),
            active_program_id: None,
        }
    }

    /// Check the profile invariants (age, height and weight strictly positive)
    pub fn validate(&self) -> crate::Result<()> {
        if self.age == 0 {
            return Err(Error::Validation("age must be greater than 0".into()));
        }
        if !(self.height_cm > 0.0) {
            return Err(Error::Validation("height must be greater than 0".into()));
        }
        if !(self.weight_kg > 0.0) {
            return Err(Error::Validation("weight must be greater than 0".into()));
        }
        if self.days_per_week > 7 {
            return Err(Error::Validation(format!(
                "days per week must be at most 7 (got {})",
                self.days_per_week
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Exercise Catalog Metadata
// ============================================================================

/// Static reference data for one exercise
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub muscle_groups: Vec<MuscleGroup>,
    pub primary_muscle: MuscleGroup,
    pub equipment: Vec<Equipment>,
    pub difficulty: ExperienceLevel,
    pub category: ExerciseCategory,
    pub instructions: Vec<String>,
    pub tips: Vec<String>,
    pub is_compound: bool,
    /// Ids of exercises that can be swapped in
    pub alternatives: Vec<String>,
}

// ============================================================================
// Program Plan
// ============================================================================

/// A prescribed exercise within a workout day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutExercise {
    pub id: Uuid,
    /// Key into the exercise catalog
    pub exercise_id: String,
    pub exercise_name: String,
    pub sets: u32,
    pub rep_min: u32,
    pub rep_max: u32,
    pub rest_seconds: u32,
    pub rpe_target: f64,
    #[serde(default)]
    pub notes: String,
    pub order_index: u32,
    #[serde(default)]
    pub is_warmup: bool,
}

impl WorkoutExercise {
    /// Create a plan entry with the default rest (90s) and RPE target (8)
    pub fn new(
        exercise_id: impl Into<String>,
        exercise_name: impl Into<String>,
        sets: u32,
        rep_min: u32,
        rep_max: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            exercise_id: exercise_id.into(),
            exercise_name: exercise_name.into(),
            sets,
            rep_min,
            rep_max,
            rest_seconds: 90,
            rpe_target: 8.0,
            notes: String::new(),
            order_index: 0,
            is_warmup: false,
        }
    }

    pub fn with_rest(mut self, rest_seconds: u32) -> Self {
        self.rest_seconds = rest_seconds;
        self
    }

    pub fn with_rpe(mut self, rpe_target: f64) -> Self {
        self.rpe_target = rpe_target;
        self
    }

    pub fn with_order(mut self, order_index: u32) -> Self {
        self.order_index = order_index;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// "8 reps" or "8-10 reps"
    pub fn rep_range_text(&self) -> String {
        if self.rep_min == self.rep_max {
            format!("{} reps", self.rep_min)
        } else {
            format!("{}-{} reps", self.rep_min, self.rep_max)
        }
    }

    /// "3 x 8-10 reps"
    pub fn sets_summary(&self) -> String {
        format!("{} x {}", self.sets, self.rep_range_text())
    }
}

/// One training session template within a program
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutDay {
    pub id: Uuid,
    pub name: String,
    pub day_number: u32,
    pub focus: ExerciseCategory,
    pub exercises: Vec<WorkoutExercise>,
    pub estimated_minutes: u32,
    #[serde(default)]
    pub notes: String,
}

impl WorkoutDay {
    /// Create a day; exercises are sorted by `order_index`
    pub fn new(
        name: impl Into<String>,
        day_number: u32,
        focus: ExerciseCategory,
        estimated_minutes: u32,
        mut exercises: Vec<WorkoutExercise>,
    ) -> Self {
        exercises.sort_by_key(|e| e.order_index);
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            day_number,
            focus,
            exercises,
            estimated_minutes,
            notes: String::new(),
        }
    }
}

/// A multi-week training plan instance
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutProgram {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub duration_weeks: u32,
    pub days_per_week: u32,
    pub goal: FitnessGoal,
    pub level: ExperienceLevel,
    pub days: Vec<WorkoutDay>,
    /// 1-based; may run past `duration_weeks`
    pub current_week: u32,
    /// 0-based index into `days`
    pub current_day_index: usize,
    pub start_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub template_id: Option<String>,
}

impl WorkoutProgram {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        duration_weeks: u32,
        days_per_week: u32,
        goal: FitnessGoal,
        level: ExperienceLevel,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            duration_weeks,
            days_per_week,
            goal,
            level,
            days: Vec::new(),
            current_week: 1,
            current_day_index: 0,
            start_date: None,
            is_active: false,
            created_at: Utc::now(),
            template_id: None,
        }
    }

    /// Validate the plan structure
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push("Program has empty name".to_string());
        }
        if self.current_week == 0 {
            errors.push(format!("Program '{}' has current_week 0", self.name));
        }
        if self.days_per_week > 0 && self.current_day_index >= self.days_per_week as usize {
            errors.push(format!(
                "Program '{}' day index {} out of range for {} days/week",
                self.name, self.current_day_index, self.days_per_week
            ));
        }

        let mut seen_numbers = std::collections::HashSet::new();
        for day in &self.days {
            if !seen_numbers.insert(day.day_number) {
                errors.push(format!(
                    "Program '{}' has duplicate day number {}",
                    self.name, day.day_number
                ));
            }

            if day
                .exercises
                .windows(2)
                .any(|w| w[0].order_index > w[1].order_index)
            {
                errors.push(format!("Day '{}' exercises are out of order", day.name));
            }

            for ex in &day.exercises {
                if ex.sets == 0 {
                    errors.push(format!("'{}' in '{}' has 0 sets", ex.exercise_id, day.name));
                }
                if ex.rep_min == 0 || ex.rep_min > ex.rep_max {
                    errors.push(format!(
                        "'{}' in '{}' has invalid rep range {}-{}",
                        ex.exercise_id, day.name, ex.rep_min, ex.rep_max
                    ));
                }
                if !(1.0..=10.0).contains(&ex.rpe_target) {
                    errors.push(format!(
                        "'{}' in '{}' has RPE target {} outside 1-10",
                        ex.exercise_id, day.name, ex.rpe_target
                    ));
                }
            }
        }

        errors
    }
}

// ============================================================================
// Workout Logs
// ============================================================================

/// One completed set
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseSetLog {
    pub id: Uuid,
    pub exercise_id: String,
    pub exercise_name: String,
    /// 1-based, per exercise
    pub set_number: u32,
    pub reps: u32,
    pub weight_kg: f64,
    pub rpe: f64,
    #[serde(default)]
    pub is_personal_record: bool,
    #[serde(default)]
    pub notes: String,
    pub completed_at: DateTime<Utc>,
}

impl ExerciseSetLog {
    pub fn new(
        exercise_id: impl Into<String>,
        exercise_name: impl Into<String>,
        set_number: u32,
        reps: u32,
        weight_kg: f64,
        rpe: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            exercise_id: exercise_id.into(),
            exercise_name: exercise_name.into(),
            set_number,
            reps,
            weight_kg,
            rpe,
            is_personal_record: false,
            notes: String::new(),
            completed_at: Utc::now(),
        }
    }

    /// weight × reps
    pub fn volume(&self) -> f64 {
        self.weight_kg * self.reps as f64
    }

    pub fn estimated_1rm(&self) -> f64 {
        crate::metrics::estimated_1rm(self.weight_kg, self.reps)
    }

    /// "BW" for bodyweight sets, otherwise "80 kg" / "82.5 kg"
    pub fn weight_text(&self) -> String {
        format_weight(self.weight_kg)
    }
}

pub(crate) fn format_weight(weight_kg: f64) -> String {
    if weight_kg == 0.0 {
        "BW".to_string()
    } else if weight_kg.fract() == 0.0 {
        format!("{:.0} kg", weight_kg)
    } else {
        format!("{:.1} kg", weight_kg)
    }
}

/// Sets of one exercise within a log, in first-appearance order
#[derive(Clone, Debug)]
pub struct ExerciseGroup<'a> {
    pub exercise_id: &'a str,
    pub exercise_name: &'a str,
    pub sets: Vec<&'a ExerciseSetLog>,
}

/// A completed or in-progress session record
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutLog {
    pub id: Uuid,
    /// Snapshot, not a live reference
    pub program_name: String,
    pub day_name: String,
    pub date: DateTime<Utc>,
    pub duration_seconds: u32,
    pub sets: Vec<ExerciseSetLog>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub bodyweight_kg: Option<f64>,
}

impl WorkoutLog {
    pub fn new(program_name: impl Into<String>, day_name: impl Into<String>) -> Self {
        Self::new_at(program_name, day_name, Utc::now())
    }

    pub fn new_at(
        program_name: impl Into<String>,
        day_name: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            program_name: program_name.into(),
            day_name: day_name.into(),
            date,
            duration_seconds: 0,
            sets: Vec::new(),
            notes: String::new(),
            bodyweight_kg: None,
        }
    }

    /// Sum of weight × reps over every set
    pub fn total_volume(&self) -> f64 {
        self.sets.iter().map(ExerciseSetLog::volume).sum()
    }

    /// "12m 5s" or "45s"
    pub fn duration_text(&self) -> String {
        let mins = self.duration_seconds / 60;
        let secs = self.duration_seconds % 60;
        if mins > 0 {
            format!("{}m {}s", mins, secs)
        } else {
            format!("{}s", secs)
        }
    }

    /// Sets for one exercise, in logged order
    pub fn sets_for<'a>(&'a self, exercise_id: &'a str) -> impl Iterator<Item = &'a ExerciseSetLog> {
        self.sets.iter().filter(move |s| s.exercise_id == exercise_id)
    }

    /// Group sets by exercise in order of first appearance
    pub fn exercise_groups(&self) -> Vec<ExerciseGroup<'_>> {
        let mut ordered: Vec<&ExerciseSetLog> = self.sets.iter().collect();
        ordered.sort_by_key(|s| s.set_number);

        let mut groups: Vec<ExerciseGroup<'_>> = Vec::new();
        for set in ordered {
            match groups.iter_mut().find(|g| g.exercise_id == set.exercise_id) {
                Some(group) => group.sets.push(set),
                None => groups.push(ExerciseGroup {
                    exercise_id: &set.exercise_id,
                    exercise_name: &set.exercise_name,
                    sets: vec![set],
                }),
            }
        }
        groups
    }
}

/// Best-known performance for one exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PersonalRecord {
    pub id: Uuid,
    pub exercise_id: String,
    pub exercise_name: String,
    pub weight_kg: f64,
    pub reps: u32,
    pub estimated_1rm: f64,
    pub date: DateTime<Utc>,
}

impl PersonalRecord {
    /// Build a record from a logged set
    pub fn from_set(set: &ExerciseSetLog, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            exercise_id: set.exercise_id.clone(),
            exercise_name: set.exercise_name.clone(),
            weight_kg: set.weight_kg,
            reps: set.reps,
            estimated_1rm: set.estimated_1rm(),
            date,
        }
    }

    /// "100.0 kg (1RM)" or "100.0 kg x 5 reps"
    pub fn display_text(&self) -> String {
        if self.reps == 1 {
            format!("{:.1} kg (1RM)", self.weight_kg)
        } else {
            format!("{:.1} kg x {} reps", self.weight_kg, self.reps)
        }
    }
}

// ============================================================================
// Body Measurements
// ============================================================================

/// A point-in-time body-composition snapshot; every numeric field is optional
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct BodyMeasurement {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub weight_kg: Option<f64>,
    pub body_fat_percentage: Option<f64>,
    pub chest_cm: Option<f64>,
    pub waist_cm: Option<f64>,
    pub hips_cm: Option<f64>,
    pub left_bicep_cm: Option<f64>,
    pub right_bicep_cm: Option<f64>,
    pub left_thigh_cm: Option<f64>,
    pub right_thigh_cm: Option<f64>,
    pub neck_cm: Option<f64>,
    #[serde(default)]
    pub notes: String,
}

impl BodyMeasurement {
    pub fn new(date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            ..Default::default()
        }
    }
}

// ============================================================================
// Nutrition
// ============================================================================

/// Meal slot a nutrition entry is filed under
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Preworkout,
    Postworkout,
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MealType::Breakfast => write!(f, "Breakfast"),
            MealType::Lunch => write!(f, "Lunch"),
            MealType::Dinner => write!(f, "Dinner"),
            MealType::Snack => write!(f, "Snack"),
            MealType::Preworkout => write!(f, "Pre-Workout"),
            MealType::Postworkout => write!(f, "Post-Workout"),
        }
    }
}

impl FromStr for MealType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            "preworkout" => Ok(MealType::Preworkout),
            "postworkout" => Ok(MealType::Postworkout),
            other => Err(Error::InvalidInput(format!("Unknown meal type: {}", other))),
        }
    }
}

/// A food with per-serving nutrition values
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FoodItem {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    pub serving_size_g: f64,
    pub serving_unit: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    #[serde(default)]
    pub fiber_g: f64,
    #[serde(default)]
    pub sugar_g: f64,
    #[serde(default)]
    pub sodium_mg: f64,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub is_custom: bool,
    pub created_at: DateTime<Utc>,
}

/// Scaled nutrition values
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NutritionValues {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
}

/// One food eaten, holding a snapshot of the food's values
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NutritionEntry {
    pub id: Uuid,
    pub food_item_id: Uuid,
    pub food_name: String,
    #[serde(default)]
    pub brand: String,
    pub meal_type: MealType,
    /// 1.5 = one and a half servings
    pub serving_multiplier: f64,
    pub serving_size_g: f64,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    #[serde(default)]
    pub fiber_g: f64,
    pub logged_at: DateTime<Utc>,
}

/// Food intake for one calendar day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NutritionLog {
    pub id: Uuid,
    pub date: NaiveDate,
    pub entries: Vec<NutritionEntry>,
    #[serde(default)]
    pub water_ml: u32,
    #[serde(default)]
    pub notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_program() -> WorkoutProgram {
        let mut program = WorkoutProgram::new(
            "Test",
            "test program",
            4,
            2,
            FitnessGoal::BuildMuscle,
            ExperienceLevel::Beginner,
        );
        program.days = vec![
            WorkoutDay::new(
                "A",
                1,
                ExerciseCategory::Push,
                45,
                vec![WorkoutExercise::new("bench", "Bench", 3, 8, 10)],
            ),
            WorkoutDay::new(
                "B",
                2,
                ExerciseCategory::Legs,
                45,
                vec![WorkoutExercise::new("squat", "Squat", 3, 5, 5)],
            ),
        ];
        program
    }

    #[test]
    fn test_profile_validation() {
        let profile = UserProfile::new(
            "Sam",
            30,
            180.0,
            80.0,
            FitnessGoal::BuildMuscle,
            ExperienceLevel::Beginner,
            4,
        );
        assert!(profile.validate().is_ok());

        let mut bad = profile.clone();
        bad.age = 0;
        assert!(matches!(bad.validate(), Err(Error::Validation(_))));

        let mut bad = profile.clone();
        bad.height_cm = 0.0;
        assert!(bad.validate().is_err());

        let mut bad = profile;
        bad.weight_kg = -1.0;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_program_validates() {
        assert!(sample_program().validate().is_empty());
    }

    #[test]
    fn test_program_validation_catches_bad_plan() {
        let mut program = sample_program();
        program.days[1].day_number = 1;
        program.days[0].exercises[0].rep_min = 12;
        program.current_day_index = 2;

        let errors = program.validate();
        assert_eq!(errors.len(), 3, "{:?}", errors);
    }

    #[test]
    fn test_day_sorts_exercises() {
        let day = WorkoutDay::new(
            "A",
            1,
            ExerciseCategory::Push,
            45,
            vec![
                WorkoutExercise::new("b", "B", 3, 8, 10).with_order(1),
                WorkoutExercise::new("a", "A", 3, 8, 10).with_order(0),
            ],
        );
        assert_eq!(day.exercises[0].exercise_id, "a");
    }

    #[test]
    fn test_rep_range_text() {
        let ex = WorkoutExercise::new("bench", "Bench", 3, 8, 10);
        assert_eq!(ex.rep_range_text(), "8-10 reps");
        assert_eq!(ex.sets_summary(), "3 x 8-10 reps");

        let ex = WorkoutExercise::new("squat", "Squat", 5, 5, 5);
        assert_eq!(ex.rep_range_text(), "5 reps");
    }

    #[test]
    fn test_set_helpers() {
        let set = ExerciseSetLog::new("bench", "Bench", 1, 5, 100.0, 8.0);
        assert_eq!(set.volume(), 500.0);
        assert_eq!(set.weight_text(), "100 kg");

        let set = ExerciseSetLog::new("bench", "Bench", 1, 5, 82.5, 8.0);
        assert_eq!(set.weight_text(), "82.5 kg");

        let set = ExerciseSetLog::new("pull_up", "Pull-Up", 1, 8, 0.0, 8.0);
        assert_eq!(set.weight_text(), "BW");
        assert_eq!(set.volume(), 0.0);
    }

    #[test]
    fn test_log_duration_text_and_volume() {
        let mut log = WorkoutLog::new("P", "Day");
        log.duration_seconds = 725;
        assert_eq!(log.duration_text(), "12m 5s");
        log.duration_seconds = 45;
        assert_eq!(log.duration_text(), "45s");

        log.sets.push(ExerciseSetLog::new("a", "A", 1, 10, 50.0, 8.0));
        log.sets.push(ExerciseSetLog::new("b", "B", 1, 5, 100.0, 8.0));
        assert_eq!(log.total_volume(), 1000.0);
    }

    #[test]
    fn test_exercise_groups_keep_first_appearance_order() {
        let mut log = WorkoutLog::new("P", "Day");
        log.sets.push(ExerciseSetLog::new("squat", "Squat", 1, 5, 100.0, 8.0));
        log.sets.push(ExerciseSetLog::new("squat", "Squat", 2, 5, 100.0, 8.0));
        log.sets.push(ExerciseSetLog::new("bench", "Bench", 1, 8, 60.0, 8.0));

        let groups = log.exercise_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].exercise_id, "squat");
        assert_eq!(groups[0].sets.len(), 2);
        assert_eq!(groups[1].exercise_id, "bench");
    }

    #[test]
    fn test_personal_record_display() {
        let set = ExerciseSetLog::new("deadlift", "Deadlift", 1, 1, 180.0, 9.5);
        let pr = PersonalRecord::from_set(&set, Utc::now());
        assert_eq!(pr.display_text(), "180.0 kg (1RM)");
        assert_eq!(pr.estimated_1rm, 180.0);

        let set = ExerciseSetLog::new("deadlift", "Deadlift", 1, 5, 150.0, 8.0);
        let pr = PersonalRecord::from_set(&set, Utc::now());
        assert_eq!(pr.display_text(), "150.0 kg x 5 reps");
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("build_muscle".parse::<FitnessGoal>().unwrap(), FitnessGoal::BuildMuscle);
        assert_eq!("Lose-Weight".parse::<FitnessGoal>().unwrap(), FitnessGoal::LoseWeight);
        assert_eq!("pre-workout".parse::<MealType>().unwrap(), MealType::Preworkout);
        assert_eq!("Advanced".parse::<ExperienceLevel>().unwrap(), ExperienceLevel::Advanced);
        assert!("sideways".parse::<FitnessGoal>().is_err());
    }

    #[test]
    fn test_muscle_body_region() {
        assert_eq!(MuscleGroup::Lats.body_region(), BodyRegion::Upper);
        assert_eq!(MuscleGroup::Glutes.body_region(), BodyRegion::Lower);
        assert_eq!(MuscleGroup::Obliques.body_region(), BodyRegion::Core);
    }
}
