//! Read-only projections over workout history, records and measurements.
//!
//! Nothing here is cached; every query recomputes from the slices it is
//! given. Calendar days are taken in the local time zone.

use crate::config::AnalyticsConfig;
use crate::{BodyMeasurement, PersonalRecord, WorkoutLog};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, Utc};
use std::collections::HashSet;

/// Calendar day of a timestamp in local time
pub fn local_day(at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&Local).date_naive()
}

/// Consecutive days with a workout, counting back from `today`
///
/// A day without a workout ends the streak; no workout today means zero.
pub fn current_streak(logs: &[WorkoutLog], today: NaiveDate) -> u32 {
    let days: HashSet<NaiveDate> = logs.iter().map(|l| local_day(l.date)).collect();

    let mut streak = 0;
    let mut check = today;
    while days.contains(&check) {
        streak += 1;
        match check.pred_opt() {
            Some(prev) => check = prev,
            None => break,
        }
    }
    streak
}

/// Workouts in one calendar week
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeekCount {
    /// Monday of the ISO week
    pub week_start: NaiveDate,
    pub count: usize,
}

fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.weekday().num_days_from_monday() as i64)
}

/// Workout counts for the last `weeks` ISO weeks, oldest first
///
/// The last entry is the week containing `today`.
pub fn weekly_workout_count(logs: &[WorkoutLog], weeks: u32, today: NaiveDate) -> Vec<WeekCount> {
    let current = week_start(today);
    (0..weeks as i64)
        .rev()
        .map(|offset| {
            let start = current - Duration::weeks(offset);
            let iso = start.iso_week();
            let count = logs
                .iter()
                .filter(|l| local_day(l.date).iso_week() == iso)
                .count();
            WeekCount {
                week_start: start,
                count,
            }
        })
        .collect()
}

/// Per-log volume for one exercise, in chronological order
///
/// Logs without sets for the exercise are left out.
pub fn volume_history(logs: &[WorkoutLog], exercise_id: &str) -> Vec<(DateTime<Utc>, f64)> {
    let mut history: Vec<(DateTime<Utc>, f64)> = logs
        .iter()
        .filter_map(|log| {
            let mut sets = log.sets_for(exercise_id).peekable();
            sets.peek()?;
            Some((log.date, sets.map(|s| s.volume()).sum()))
        })
        .collect();
    history.sort_by_key(|(date, _)| *date);
    history
}

pub fn total_volume_lifted(logs: &[WorkoutLog]) -> f64 {
    logs.iter().map(WorkoutLog::total_volume).sum()
}

pub fn total_workouts_completed(logs: &[WorkoutLog]) -> usize {
    logs.len()
}

/// Logs from the last `days` days, oldest first
pub fn workout_history(logs: &[WorkoutLog], days: u32, now: DateTime<Utc>) -> Vec<&WorkoutLog> {
    let cutoff = now - Duration::days(days as i64);
    let mut recent: Vec<&WorkoutLog> = logs.iter().filter(|l| l.date >= cutoff).collect();
    recent.sort_by_key(|l| l.date);
    recent
}

/// Records, newest first
pub fn personal_records_by_recency(records: &[PersonalRecord]) -> Vec<&PersonalRecord> {
    let mut sorted: Vec<&PersonalRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

/// Measurements that carry a weight, oldest first
pub fn weight_history(measurements: &[BodyMeasurement]) -> Vec<(DateTime<Utc>, f64)> {
    let mut history: Vec<(DateTime<Utc>, f64)> = measurements
        .iter()
        .filter_map(|m| m.weight_kg.map(|w| (m.date, w)))
        .collect();
    history.sort_by_key(|(date, _)| *date);
    history
}

pub fn latest_measurement(measurements: &[BodyMeasurement]) -> Option<&BodyMeasurement> {
    measurements.iter().max_by_key(|m| m.date)
}

/// Preset history windows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeRange {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    AllTime,
}

impl TimeRange {
    pub fn days(&self) -> u32 {
        match self {
            TimeRange::OneMonth => 30,
            TimeRange::ThreeMonths => 90,
            TimeRange::SixMonths => 180,
            TimeRange::OneYear => 365,
            TimeRange::AllTime => 3650,
        }
    }
}

/// Days of history to show: the explicit range, else the configured window
pub fn history_window(range: Option<TimeRange>, config: &AnalyticsConfig) -> u32 {
    range.map_or(config.history_days, |r| r.days())
}

impl std::str::FromStr for TimeRange {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1m" => Ok(TimeRange::OneMonth),
            "3m" => Ok(TimeRange::ThreeMonths),
            "6m" => Ok(TimeRange::SixMonths),
            "1y" => Ok(TimeRange::OneYear),
            "all" => Ok(TimeRange::AllTime),
            other => Err(crate::Error::InvalidInput(format!(
                "Unknown time range '{}' (expected 1m, 3m, 6m, 1y or all)",
                other
            ))),
        }
    }
}

/// Headline numbers for a progress screen
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressSnapshot {
    pub current_streak: u32,
    pub total_workouts: usize,
    pub total_volume_kg: f64,
    pub weekly_counts: Vec<WeekCount>,
}

impl ProgressSnapshot {
    pub fn compute(logs: &[WorkoutLog], weeks: u32, today: NaiveDate) -> Self {
        Self {
            current_streak: current_streak(logs, today),
            total_workouts: total_workouts_completed(logs),
            total_volume_kg: total_volume_lifted(logs),
            weekly_counts: weekly_workout_count(logs, weeks, today),
        }
    }
}
