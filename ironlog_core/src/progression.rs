//! Progressive overload advisor.
//!
//! Looks at the most recent sets logged for an exercise to suggest the next
//! working weight, and scans a finishing log for new personal records.

use crate::config::ProgressionConfig;
use crate::{ExerciseSetLog, PersonalRecord, WorkoutDay, WorkoutLog};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;

/// Most recent sets per exercise id for every exercise in `day`
///
/// `logs` must be sorted ascending by date. For each exercise the sets come
/// from the newest log that contains any; exercises never performed are
/// absent from the map.
pub fn load_previous_sets(
    day: &WorkoutDay,
    logs: &[WorkoutLog],
) -> HashMap<String, Vec<ExerciseSetLog>> {
    let mut previous = HashMap::new();

    for planned in &day.exercises {
        if previous.contains_key(&planned.exercise_id) {
            continue;
        }
        let latest = logs.iter().rev().find_map(|log| {
            let sets: Vec<ExerciseSetLog> = log.sets_for(&planned.exercise_id).cloned().collect();
            (!sets.is_empty()).then_some(sets)
        });
        if let Some(sets) = latest {
            tracing::debug!(
                "Found {} previous sets for {}",
                sets.len(),
                planned.exercise_id
            );
            previous.insert(planned.exercise_id.clone(), sets);
        }
    }

    previous
}

/// Next working weight from the last session's sets
///
/// Adds the configured increment to the heaviest set when the average RPE
/// stayed under the threshold; otherwise repeats the heaviest weight.
pub fn suggested_weight(history: &[ExerciseSetLog], config: &ProgressionConfig) -> Option<f64> {
    if history.is_empty() {
        return None;
    }

    let max_weight = history
        .iter()
        .map(|s| s.weight_kg)
        .fold(f64::NEG_INFINITY, f64::max);
    let avg_rpe = history.iter().map(|s| s.rpe).sum::<f64>() / history.len() as f64;

    if avg_rpe < config.rpe_threshold {
        Some(max_weight + config.weight_increment_kg)
    } else {
        Some(max_weight)
    }
}

/// Heaviest weight and total reps from the last session
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerformanceSummary {
    pub max_weight_kg: f64,
    pub total_reps: u32,
}

impl fmt::Display for PerformanceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Last: {:.1} kg · {} total reps",
            self.max_weight_kg, self.total_reps
        )
    }
}

pub fn previous_performance_summary(history: &[ExerciseSetLog]) -> Option<PerformanceSummary> {
    if history.is_empty() {
        return None;
    }
    Some(PerformanceSummary {
        max_weight_kg: history
            .iter()
            .map(|s| s.weight_kg)
            .fold(f64::NEG_INFINITY, f64::max),
        total_reps: history.iter().map(|s| s.reps).sum(),
    })
}

/// Flag new personal records in a finishing log
///
/// Per exercise, only the log's best set (highest estimated 1RM, earliest on
/// ties) is compared against the stored record. It becomes the new record
/// when no record exists or it strictly beats the stored estimate. Updated
/// records are written into `records` and returned.
pub fn check_personal_records(
    log: &mut WorkoutLog,
    records: &mut HashMap<String, PersonalRecord>,
    now: DateTime<Utc>,
) -> Vec<PersonalRecord> {
    let mut best: Vec<(String, usize)> = Vec::new();
    for (idx, set) in log.sets.iter().enumerate() {
        match best.iter_mut().find(|(id, _)| *id == set.exercise_id) {
            Some((_, best_idx)) => {
                if set.estimated_1rm() > log.sets[*best_idx].estimated_1rm() {
                    *best_idx = idx;
                }
            }
            None => best.push((set.exercise_id.clone(), idx)),
        }
    }

    let mut updated = Vec::new();
    for (exercise_id, idx) in best {
        let set = &log.sets[idx];
        let candidate = set.estimated_1rm();

        let record = match records.get(&exercise_id) {
            Some(existing) if candidate <= existing.estimated_1rm => continue,
            Some(existing) => PersonalRecord {
                id: existing.id,
                ..PersonalRecord::from_set(set, now)
            },
            None => PersonalRecord::from_set(set, now),
        };

        tracing::info!(
            "New personal record for {}: {} (e1RM {:.1})",
            record.exercise_name,
            record.display_text(),
            record.estimated_1rm
        );
        log.sets[idx].is_personal_record = true;
        records.insert(exercise_id, record.clone());
        updated.push(record);
    }

    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExerciseCategory, WorkoutExercise};
    use chrono::Duration;

    fn sets(weights: &[f64], rpes: &[f64]) -> Vec<ExerciseSetLog> {
        weights
            .iter()
            .zip(rpes)
            .enumerate()
            .map(|(i, (w, r))| ExerciseSetLog::new("squat", "Squat", i as u32 + 1, 5, *w, *r))
            .collect()
    }

    fn log_with(exercise_id: &str, weight: f64, days_ago: i64) -> WorkoutLog {
        let mut log = WorkoutLog::new_at("P", "D", Utc::now() - Duration::days(days_ago));
        log.sets
            .push(ExerciseSetLog::new(exercise_id, exercise_id, 1, 5, weight, 8.0));
        log
    }

    #[test]
    fn test_suggested_weight_holds_at_threshold() {
        let history = sets(&[80.0, 82.5, 80.0], &[7.0, 7.5, 8.0]);
        assert_eq!(
            suggested_weight(&history, &ProgressionConfig::default()),
            Some(82.5)
        );
    }

    #[test]
    fn test_suggested_weight_adds_increment_when_easy() {
        let history = sets(&[80.0, 82.5, 80.0], &[6.0, 6.0, 6.0]);
        assert_eq!(
            suggested_weight(&history, &ProgressionConfig::default()),
            Some(85.0)
        );
    }

    #[test]
    fn test_suggested_weight_uses_config() {
        let config = ProgressionConfig {
            rpe_threshold: 9.0,
            weight_increment_kg: 5.0,
        };
        let history = sets(&[100.0], &[8.0]);
        assert_eq!(suggested_weight(&history, &config), Some(105.0));
    }

    #[test]
    fn test_no_history_no_suggestion() {
        assert_eq!(suggested_weight(&[], &ProgressionConfig::default()), None);
        assert_eq!(previous_performance_summary(&[]), None);
    }

    #[test]
    fn test_performance_summary() {
        let summary = previous_performance_summary(&sets(&[80.0, 82.5, 80.0], &[7.0; 3])).unwrap();
        assert_eq!(summary.max_weight_kg, 82.5);
        assert_eq!(summary.total_reps, 15);
        assert_eq!(summary.to_string(), "Last: 82.5 kg · 15 total reps");
    }

    #[test]
    fn test_load_previous_sets_uses_most_recent_log() {
        let day = WorkoutDay::new(
            "Legs",
            1,
            ExerciseCategory::Legs,
            60,
            vec![
                WorkoutExercise::new("squat", "Squat", 3, 5, 5),
                WorkoutExercise::new("lunge", "Lunge", 3, 10, 12).with_order(1),
            ],
        );
        let logs = vec![
            log_with("squat", 90.0, 10),
            log_with("squat", 100.0, 3),
            log_with("bench", 70.0, 1),
        ];

        let previous = load_previous_sets(&day, &logs);
        assert_eq!(previous.len(), 1);
        assert_eq!(previous["squat"][0].weight_kg, 100.0);
        assert!(!previous.contains_key("lunge"));
    }

    #[test]
    fn test_first_set_creates_record() {
        let mut log = log_with("squat", 100.0, 0);
        let mut records = HashMap::new();

        let updated = check_personal_records(&mut log, &mut records, Utc::now());
        assert_eq!(updated.len(), 1);
        assert!(log.sets[0].is_personal_record);
        assert_eq!(records["squat"].weight_kg, 100.0);
    }

    #[test]
    fn test_strictly_better_set_replaces_record() {
        let mut records = HashMap::new();
        check_personal_records(&mut log_with("squat", 100.0, 1), &mut records, Utc::now());
        let original_id = records["squat"].id;

        let mut log = log_with("squat", 105.0, 0);
        let updated = check_personal_records(&mut log, &mut records, Utc::now());
        assert_eq!(updated.len(), 1);
        assert!(log.sets[0].is_personal_record);
        assert_eq!(records["squat"].weight_kg, 105.0);
        assert_eq!(records["squat"].id, original_id);
    }

    #[test]
    fn test_tie_or_worse_never_flags() {
        let mut records = HashMap::new();
        check_personal_records(&mut log_with("squat", 100.0, 2), &mut records, Utc::now());
        let before = records["squat"].clone();

        for weight in [100.0, 95.0] {
            let mut log = log_with("squat", weight, 0);
            let updated = check_personal_records(&mut log, &mut records, Utc::now());
            assert!(updated.is_empty());
            assert!(!log.sets[0].is_personal_record);
            assert_eq!(records["squat"], before);
        }
    }

    #[test]
    fn test_only_best_set_in_log_is_flagged() {
        let mut records = HashMap::new();
        check_personal_records(&mut log_with("squat", 100.0, 2), &mut records, Utc::now());

        let mut log = WorkoutLog::new("P", "D");
        log.sets = sets(&[105.0, 110.0, 110.0], &[8.0; 3]);

        let updated = check_personal_records(&mut log, &mut records, Utc::now());
        assert_eq!(updated.len(), 1);
        let flags: Vec<bool> = log.sets.iter().map(|s| s.is_personal_record).collect();
        assert_eq!(flags, vec![false, true, false]);
        assert_eq!(records["squat"].weight_kg, 110.0);
    }
}
