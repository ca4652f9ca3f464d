//! Fitness metrics: BMI, calorie and macro targets, estimated 1RM and
//! body-composition derivatives.
//!
//! All functions are pure. Values that depend on optional inputs return
//! `Option` instead of erroring.
//!
//! ## Known limitation
//!
//! Maintenance calories use the male Mifflin-St Jeor constant (+5) for
//! everyone. The profile carries no sex field to branch on.

use crate::{BodyMeasurement, FitnessGoal, UserProfile};

/// Daily deficit applied for weight loss
pub const CUT_DEFICIT_KCAL: i32 = 500;

/// Daily surplus applied for muscle gain
pub const BULK_SURPLUS_KCAL: i32 = 300;

/// Body mass index: weight / height(m)²
pub fn bmi(height_cm: f64, weight_kg: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Mifflin-St Jeor basal metabolic rate (male constant)
pub fn basal_metabolic_rate(weight_kg: f64, height_cm: f64, age: u32) -> f64 {
    10.0 * weight_kg + 6.25 * height_cm - 5.0 * age as f64 + 5.0
}

/// Activity multiplier keyed by training days per week
pub fn activity_factor(days_per_week: u32) -> f64 {
    match days_per_week {
        0..=1 => 1.2,
        2..=3 => 1.375,
        4..=5 => 1.55,
        _ => 1.725,
    }
}

/// BMR × activity factor, truncated toward zero
pub fn maintenance_calories(weight_kg: f64, height_cm: f64, age: u32, days_per_week: u32) -> i32 {
    (basal_metabolic_rate(weight_kg, height_cm, age) * activity_factor(days_per_week)) as i32
}

/// Adjust maintenance calories for the user's goal
pub fn target_calories(goal: FitnessGoal, maintenance: i32) -> i32 {
    match goal {
        FitnessGoal::LoseWeight => maintenance - CUT_DEFICIT_KCAL,
        FitnessGoal::BuildMuscle => maintenance + BULK_SURPLUS_KCAL,
        FitnessGoal::Recomposition | FitnessGoal::MaintainWeight => maintenance,
    }
}

/// Roughly 0.85 g of protein per lb of bodyweight
pub fn protein_target_g(weight_kg: f64) -> i32 {
    (weight_kg * 2.2 * 0.85) as i32
}

/// 25% of calories from fat
pub fn fat_target_g(target_calories: i32) -> i32 {
    (target_calories as f64 * 0.25 / 9.0) as i32
}

/// Remaining calories after protein and fat, as carbs; never negative
pub fn carb_target_g(target_calories: i32, protein_g: i32, fat_g: i32) -> i32 {
    let remaining = target_calories - protein_g * 4 - fat_g * 9;
    (remaining / 4).max(0)
}

/// Epley estimate; a single rep (or none) returns the weight unchanged
pub fn estimated_1rm(weight_kg: f64, reps: u32) -> f64 {
    if reps <= 1 {
        weight_kg
    } else {
        weight_kg * (1.0 + reps as f64 / 30.0)
    }
}

/// Lean mass, when both weight and body fat are known
pub fn lean_mass_kg(weight_kg: Option<f64>, body_fat_percentage: Option<f64>) -> Option<f64> {
    let weight = weight_kg?;
    let bf = body_fat_percentage?;
    Some(weight * (1.0 - bf / 100.0))
}

/// Fat mass, when both weight and body fat are known
pub fn fat_mass_kg(weight_kg: Option<f64>, body_fat_percentage: Option<f64>) -> Option<f64> {
    let weight = weight_kg?;
    let bf = body_fat_percentage?;
    Some(weight * (bf / 100.0))
}

/// Daily calorie and macro targets for a profile
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MacroTargets {
    pub maintenance_calories: i32,
    pub target_calories: i32,
    pub protein_g: i32,
    pub fat_g: i32,
    pub carbs_g: i32,
}

impl UserProfile {
    pub fn bmi(&self) -> f64 {
        bmi(self.height_cm, self.weight_kg)
    }

    pub fn maintenance_calories(&self) -> i32 {
        maintenance_calories(self.weight_kg, self.height_cm, self.age, self.days_per_week)
    }

    pub fn target_calories(&self) -> i32 {
        target_calories(self.goal, self.maintenance_calories())
    }

    pub fn protein_target_g(&self) -> i32 {
        protein_target_g(self.weight_kg)
    }

    pub fn fat_target_g(&self) -> i32 {
        fat_target_g(self.target_calories())
    }

    pub fn carb_target_g(&self) -> i32 {
        carb_target_g(
            self.target_calories(),
            self.protein_target_g(),
            self.fat_target_g(),
        )
    }

    /// All targets in one pass
    pub fn macro_targets(&self) -> MacroTargets {
        let maintenance = self.maintenance_calories();
        let target = target_calories(self.goal, maintenance);
        let protein = protein_target_g(self.weight_kg);
        let fat = fat_target_g(target);
        MacroTargets {
            maintenance_calories: maintenance,
            target_calories: target,
            protein_g: protein,
            fat_g: fat,
            carbs_g: carb_target_g(target, protein, fat),
        }
    }
}

impl BodyMeasurement {
    pub fn lean_mass_kg(&self) -> Option<f64> {
        lean_mass_kg(self.weight_kg, self.body_fat_percentage)
    }

    pub fn fat_mass_kg(&self) -> Option<f64> {
        fat_mass_kg(self.weight_kg, self.body_fat_percentage)
    }

    /// Waist / height, when a waist measurement exists
    pub fn waist_to_height_ratio(&self, height_cm: f64) -> Option<f64> {
        let waist = self.waist_cm?;
        if height_cm <= 0.0 {
            return None;
        }
        Some(waist / height_cm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExperienceLevel;
    use chrono::Utc;

    fn scenario_profile() -> UserProfile {
        UserProfile::new(
            "Scenario",
            30,
            180.0,
            80.0,
            FitnessGoal::BuildMuscle,
            ExperienceLevel::Intermediate,
            4,
        )
    }

    #[test]
    fn test_bmi() {
        let value = bmi(180.0, 81.0);
        assert!((value - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_activity_factor_bands() {
        assert_eq!(activity_factor(0), 1.2);
        assert_eq!(activity_factor(1), 1.2);
        assert_eq!(activity_factor(3), 1.375);
        assert_eq!(activity_factor(5), 1.55);
        assert_eq!(activity_factor(6), 1.725);
        assert_eq!(activity_factor(7), 1.725);
    }

    #[test]
    fn test_macro_scenario() {
        let profile = scenario_profile();
        assert_eq!(basal_metabolic_rate(80.0, 180.0, 30), 1780.0);

        let targets = profile.macro_targets();
        assert_eq!(targets.maintenance_calories, 2759);
        assert_eq!(targets.target_calories, 3059);
        assert_eq!(targets.protein_g, 149);
        assert_eq!(targets.fat_g, 84);
        assert_eq!(targets.carbs_g, 426);

        assert_eq!(profile.carb_target_g(), 426);
        assert_eq!(profile.fat_target_g(), 84);
    }

    #[test]
    fn test_target_calories_ordering() {
        for maintenance in [1200, 2000, 2759] {
            let lose = target_calories(FitnessGoal::LoseWeight, maintenance);
            let maintain = target_calories(FitnessGoal::MaintainWeight, maintenance);
            let recomp = target_calories(FitnessGoal::Recomposition, maintenance);
            let build = target_calories(FitnessGoal::BuildMuscle, maintenance);

            assert!(lose < maintain);
            assert_eq!(maintain, recomp);
            assert!(recomp < build);
        }
    }

    #[test]
    fn test_carbs_never_negative() {
        assert_eq!(carb_target_g(1000, 400, 200), 0);
        assert_eq!(carb_target_g(0, 0, 0), 0);
        assert_eq!(carb_target_g(-500, 10, 10), 0);
    }

    #[test]
    fn test_estimated_1rm_epley() {
        let e1rm = estimated_1rm(100.0, 5);
        assert!((e1rm - 116.666_666_666).abs() < 1e-6);
    }

    #[test]
    fn test_estimated_1rm_single_rep_is_weight() {
        for w in [0.0, 20.0, 102.5, 250.0] {
            assert_eq!(estimated_1rm(w, 1), w);
            assert_eq!(estimated_1rm(w, 0), w);
        }
    }

    #[test]
    fn test_estimated_1rm_increases_with_reps() {
        let mut previous = estimated_1rm(60.0, 1);
        for reps in 2..=20 {
            let current = estimated_1rm(60.0, reps);
            assert!(current > previous);
            previous = current;
        }
    }

    #[test]
    fn test_body_composition_requires_both_inputs() {
        let mut m = BodyMeasurement::new(Utc::now());
        assert_eq!(m.lean_mass_kg(), None);

        m.weight_kg = Some(80.0);
        assert_eq!(m.lean_mass_kg(), None);
        assert_eq!(m.fat_mass_kg(), None);

        m.body_fat_percentage = Some(20.0);
        let lean = m.lean_mass_kg().unwrap();
        let fat = m.fat_mass_kg().unwrap();
        assert!((lean - 64.0).abs() < 1e-9);
        assert!((fat - 16.0).abs() < 1e-9);

        m.weight_kg = None;
        assert_eq!(m.fat_mass_kg(), None);
    }

    #[test]
    fn test_waist_to_height_ratio() {
        let mut m = BodyMeasurement::new(Utc::now());
        assert_eq!(m.waist_to_height_ratio(180.0), None);
        m.waist_cm = Some(90.0);
        assert_eq!(m.waist_to_height_ratio(180.0), Some(0.5));
        assert_eq!(m.waist_to_height_ratio(0.0), None);
    }
}
