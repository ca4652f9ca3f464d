//! Active workout session.
//!
//! A plain state object driven by explicit transitions. Every transition
//! returns the resulting [`SessionPhase`]; `Complete` is derived from the
//! exercise pointer rather than stored. Time only moves through [`tick`],
//! so callers choose the clock (a [`crate::clock::Ticker`] in the CLI,
//! direct calls in tests).
//!
//! [`tick`]: WorkoutSession::tick

use crate::config::{Config, ProgressionConfig};
use crate::progression::{
    check_personal_records, load_previous_sets, previous_performance_summary, suggested_weight,
    PerformanceSummary,
};
use crate::store::Store;
use crate::{
    Error, ExerciseSetLog, PersonalRecord, Result, UserProfile, WorkoutDay, WorkoutExercise,
    WorkoutLog, WorkoutProgram,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;

/// Where the session is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Exercising,
    Resting,
    /// Every exercise in the day has been worked through
    Complete,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Idle => write!(f, "idle"),
            SessionPhase::Exercising => write!(f, "exercising"),
            SessionPhase::Resting => write!(f, "resting"),
            SessionPhase::Complete => write!(f, "complete"),
        }
    }
}

/// Set input as typed by the user
///
/// Weight and reps are cleared after each logged set; RPE carries over.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingSet {
    pub weight: String,
    pub reps: String,
    pub rpe: f64,
}

impl PendingSet {
    fn new(rpe: f64) -> Self {
        Self {
            weight: String::new(),
            reps: String::new(),
            rpe,
        }
    }
}

/// Result of a successful [`WorkoutSession::finish`]
#[derive(Clone, Debug)]
pub struct FinishSummary {
    pub log: WorkoutLog,
    pub new_records: Vec<PersonalRecord>,
    /// Name of the next day to train, when a program was advanced
    pub next_day: Option<String>,
}

#[derive(Clone, Debug)]
struct ActiveWorkout {
    day: WorkoutDay,
    log: WorkoutLog,
    exercise_index: usize,
    set_index: u32,
    rest_remaining: u32,
    resting: bool,
    elapsed_seconds: u32,
    previous_sets: HashMap<String, Vec<ExerciseSetLog>>,
}

impl ActiveWorkout {
    fn phase(&self) -> SessionPhase {
        if self.resting {
            SessionPhase::Resting
        } else if self.exercise_index >= self.day.exercises.len() {
            SessionPhase::Complete
        } else {
            SessionPhase::Exercising
        }
    }

    fn current_exercise(&self) -> Option<&WorkoutExercise> {
        self.day.exercises.get(self.exercise_index)
    }
}

/// The workout state machine
#[derive(Clone, Debug)]
pub struct WorkoutSession {
    active: Option<ActiveWorkout>,
    pending: PendingSet,
    default_rpe: f64,
    progression: ProgressionConfig,
}

impl WorkoutSession {
    pub fn new(config: &Config) -> Self {
        Self {
            active: None,
            pending: PendingSet::new(config.session.default_rpe),
            default_rpe: config.session.default_rpe,
            progression: config.progression.clone(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.active
            .as_ref()
            .map_or(SessionPhase::Idle, ActiveWorkout::phase)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Begin a workout for `day`
    ///
    /// `history` is every past log, ascending by date; it seeds the
    /// previous-performance data for the day's exercises.
    pub fn start(
        &mut self,
        day: &WorkoutDay,
        program_name: &str,
        history: &[WorkoutLog],
    ) -> Result<SessionPhase> {
        if self.active.is_some() {
            return Err(Error::Session("a workout is already in progress".into()));
        }

        let previous_sets = load_previous_sets(day, history);
        self.active = Some(ActiveWorkout {
            day: day.clone(),
            log: WorkoutLog::new(program_name, &day.name),
            exercise_index: 0,
            set_index: 0,
            rest_remaining: 0,
            resting: false,
            elapsed_seconds: 0,
            previous_sets,
        });
        self.pending = PendingSet::new(self.default_rpe);

        tracing::info!(
            "Started workout '{}' ({} exercises)",
            day.name,
            day.exercises.len()
        );
        Ok(self.phase())
    }

    /// Start today's workout of the store's active program
    pub fn start_today(&mut self, store: &dyn Store) -> Result<SessionPhase> {
        let program = store
            .active_program()?
            .ok_or_else(|| Error::NotFound("no active program".into()))?;
        let day = program
            .todays_workout()
            .ok_or_else(|| Error::NotFound(format!("no workout scheduled in '{}'", program.name)))?;
        let history = store.workout_logs()?;
        self.start(day, &program.name, &history)
    }

    pub fn pending(&self) -> &PendingSet {
        &self.pending
    }

    pub fn pending_mut(&mut self) -> &mut PendingSet {
        &mut self.pending
    }

    /// Log the pending input as a set
    pub fn log_pending_set(&mut self) -> Result<SessionPhase> {
        let PendingSet { weight, reps, rpe } = self.pending.clone();
        self.log_set(&weight, &reps, rpe)
    }

    /// Log a set for the current exercise
    ///
    /// Empty weight means bodyweight. Input that does not parse is rejected
    /// with [`Error::InvalidInput`] and the session is left as it was.
    pub fn log_set(&mut self, weight: &str, reps: &str, rpe: f64) -> Result<SessionPhase> {
        let active = self
            .active
            .as_mut()
            .ok_or_else(|| Error::Session("no workout in progress".into()))?;
        if active.phase() != SessionPhase::Exercising {
            return Err(Error::Session(format!(
                "cannot log a set while {}",
                active.phase()
            )));
        }

        let weight_kg = parse_weight(weight)?;
        let reps = parse_reps(reps)?;
        if !(1.0..=10.0).contains(&rpe) {
            return Err(Error::InvalidInput(format!("RPE must be within 1-10, got {}", rpe)));
        }

        let exercise = active
            .current_exercise()
            .ok_or_else(|| Error::Session("no exercise left to log".into()))?
            .clone();

        let set = ExerciseSetLog::new(
            &exercise.exercise_id,
            &exercise.exercise_name,
            active.set_index + 1,
            reps,
            weight_kg,
            rpe,
        );
        tracing::debug!(
            "Logged {} set {}: {} x {}",
            exercise.exercise_id,
            set.set_number,
            set.weight_text(),
            reps
        );
        active.log.sets.push(set);

        active.set_index += 1;
        if active.set_index >= exercise.sets {
            active.set_index = 0;
            active.exercise_index += 1;
        }

        active.rest_remaining = exercise.rest_seconds;
        active.resting = exercise.rest_seconds > 0;

        self.pending.weight.clear();
        self.pending.reps.clear();
        self.pending.rpe = rpe;

        Ok(self.phase())
    }

    /// Advance the clock by one second
    ///
    /// Counts down rest and leaves `Resting` once it reaches zero. Does
    /// nothing while idle.
    pub fn tick(&mut self) -> SessionPhase {
        if let Some(active) = self.active.as_mut() {
            active.elapsed_seconds = active.elapsed_seconds.saturating_add(1);
            if active.resting {
                active.rest_remaining = active.rest_remaining.saturating_sub(1);
                if active.rest_remaining == 0 {
                    active.resting = false;
                    tracing::debug!("Rest over");
                }
            }
        }
        self.phase()
    }

    /// End the rest period now
    pub fn skip_rest(&mut self) -> Result<SessionPhase> {
        let active = self
            .active
            .as_mut()
            .ok_or_else(|| Error::Session("no workout in progress".into()))?;
        active.rest_remaining = 0;
        active.resting = false;
        Ok(self.phase())
    }

    /// Move on to the next exercise without logging anything
    pub fn skip_exercise(&mut self) -> Result<SessionPhase> {
        let active = self
            .active
            .as_mut()
            .ok_or_else(|| Error::Session("no workout in progress".into()))?;
        if active.phase() != SessionPhase::Exercising {
            return Err(Error::Session(format!(
                "cannot skip an exercise while {}",
                active.phase()
            )));
        }

        if let Some(skipped) = active.current_exercise() {
            tracing::debug!("Skipped {}", skipped.exercise_id);
        }
        active.exercise_index = (active.exercise_index + 1).min(active.day.exercises.len());
        active.set_index = 0;
        Ok(self.phase())
    }

    /// Finalize and persist the workout, then return to idle
    ///
    /// Allowed at any point of an active workout. The log, record updates
    /// and the advanced program are committed together; if the store fails
    /// the error is returned as [`Error::Persistence`] and neither the
    /// session nor `program` changes, so the caller can retry.
    pub fn finish(
        &mut self,
        profile: Option<&UserProfile>,
        program: Option<&mut WorkoutProgram>,
        store: &mut dyn Store,
        now: DateTime<Utc>,
    ) -> Result<FinishSummary> {
        let active = self
            .active
            .as_ref()
            .ok_or_else(|| Error::Session("no workout in progress".into()))?;

        let mut log = active.log.clone();
        log.duration_seconds = active.elapsed_seconds;
        log.bodyweight_kg = profile.map(|p| p.weight_kg);

        let mut records = store.personal_record_map().map_err(persistence)?;
        let new_records = check_personal_records(&mut log, &mut records, now);

        let advanced = program.as_deref().map(|p| {
            let mut next = p.clone();
            next.advance_to_next_day();
            next
        });

        store
            .commit_workout(&log, &new_records, advanced.as_ref())
            .map_err(persistence)?;

        let next_day = advanced
            .as_ref()
            .and_then(|p| p.todays_workout())
            .map(|d| d.name.clone());
        if let (Some(program), Some(advanced)) = (program, advanced) {
            *program = advanced;
        }

        self.active = None;
        self.pending = PendingSet::new(self.default_rpe);

        tracing::info!(
            "Finished workout '{}' in {} ({} sets, {} PRs)",
            log.day_name,
            log.duration_text(),
            log.sets.len(),
            new_records.len()
        );
        Ok(FinishSummary {
            log,
            new_records,
            next_day,
        })
    }

    /// Discard the workout without persisting anything
    pub fn cancel(&mut self) -> SessionPhase {
        if let Some(active) = self.active.take() {
            tracing::info!(
                "Cancelled workout '{}' ({} sets discarded)",
                active.day.name,
                active.log.sets.len()
            );
        }
        self.pending = PendingSet::new(self.default_rpe);
        SessionPhase::Idle
    }

    pub fn day(&self) -> Option<&WorkoutDay> {
        self.active.as_ref().map(|a| &a.day)
    }

    pub fn log(&self) -> Option<&WorkoutLog> {
        self.active.as_ref().map(|a| &a.log)
    }

    pub fn current_exercise(&self) -> Option<&WorkoutExercise> {
        self.active.as_ref().and_then(ActiveWorkout::current_exercise)
    }

    pub fn current_exercise_index(&self) -> usize {
        self.active.as_ref().map_or(0, |a| a.exercise_index)
    }

    /// 1-based number of the next set to log
    pub fn current_set_number(&self) -> u32 {
        self.active.as_ref().map_or(0, |a| a.set_index + 1)
    }

    pub fn rest_remaining(&self) -> u32 {
        self.active.as_ref().map_or(0, |a| a.rest_remaining)
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.active.as_ref().map_or(0, |a| a.elapsed_seconds)
    }

    /// Elapsed time as `MM:SS`
    pub fn elapsed_text(&self) -> String {
        let secs = self.elapsed_seconds();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    /// Sets from the last session of an exercise in today's plan
    pub fn previous_sets(&self, exercise_id: &str) -> Option<&[ExerciseSetLog]> {
        self.active
            .as_ref()
            .and_then(|a| a.previous_sets.get(exercise_id))
            .map(Vec::as_slice)
    }

    /// Suggested weight for the current exercise
    pub fn suggested_weight(&self) -> Option<f64> {
        let exercise = self.current_exercise()?;
        suggested_weight(self.previous_sets(&exercise.exercise_id)?, &self.progression)
    }

    /// Last-session summary for the current exercise
    pub fn previous_summary(&self) -> Option<PerformanceSummary> {
        let exercise = self.current_exercise()?;
        previous_performance_summary(self.previous_sets(&exercise.exercise_id)?)
    }
}

fn persistence(e: Error) -> Error {
    match e {
        Error::Persistence(_) => e,
        other => Error::Persistence(other.to_string()),
    }
}

fn parse_weight(input: &str) -> Result<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return Ok(0.0);
    }
    match trimmed.parse::<f64>() {
        Ok(w) if w.is_finite() && w >= 0.0 => Ok(w),
        _ => Err(Error::InvalidInput(format!(
            "weight must be a non-negative number, got '{}'",
            trimmed
        ))),
    }
}

fn parse_reps(input: &str) -> Result<u32> {
    let trimmed = input.trim();
    match trimmed.parse::<u32>() {
        Ok(r) if r > 0 => Ok(r),
        _ => Err(Error::InvalidInput(format!(
            "reps must be a positive whole number, got '{}'",
            trimmed
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test;
    use crate::store::MemoryStore;
    use crate::templates::build_program;
    use crate::{ExerciseCategory, ExperienceLevel, FitnessGoal};
    use chrono::Duration;

    fn test_day() -> WorkoutDay {
        WorkoutDay::new(
            "Push Test",
            1,
            ExerciseCategory::Push,
            30,
            vec![
                WorkoutExercise::new("bench", "Bench Press", 2, 5, 8).with_rest(3),
                WorkoutExercise::new("dip", "Dip", 1, 8, 12)
                    .with_order(1)
                    .with_rest(0),
            ],
        )
    }

    fn profile() -> UserProfile {
        UserProfile::new(
            "Sam",
            30,
            180.0,
            80.0,
            FitnessGoal::BuildMuscle,
            ExperienceLevel::Beginner,
            4,
        )
    }

    fn session() -> WorkoutSession {
        init_test();
        WorkoutSession::new(&Config::default())
    }

    #[test]
    fn test_start_enters_exercising() {
        let mut s = session();
        assert_eq!(s.phase(), SessionPhase::Idle);

        let phase = s.start(&test_day(), "Test Program", &[]).unwrap();
        assert_eq!(phase, SessionPhase::Exercising);
        assert_eq!(s.current_exercise().unwrap().exercise_id, "bench");
        assert_eq!(s.current_set_number(), 1);
        assert_eq!(s.log().unwrap().program_name, "Test Program");
        assert_eq!(s.log().unwrap().day_name, "Push Test");
        assert_eq!(s.pending().rpe, 8.0);

        assert!(matches!(
            s.start(&test_day(), "Again", &[]),
            Err(Error::Session(_))
        ));
    }

    #[test]
    fn test_log_set_then_rest_countdown() {
        let mut s = session();
        s.start(&test_day(), "P", &[]).unwrap();

        assert_eq!(s.log_set("60", "8", 7.5).unwrap(), SessionPhase::Resting);
        assert_eq!(s.rest_remaining(), 3);
        assert_eq!(s.current_set_number(), 2);

        assert!(matches!(s.log_set("60", "8", 7.5), Err(Error::Session(_))));

        assert_eq!(s.tick(), SessionPhase::Resting);
        assert_eq!(s.tick(), SessionPhase::Resting);
        assert_eq!(s.tick(), SessionPhase::Exercising);
        assert_eq!(s.rest_remaining(), 0);
        assert_eq!(s.elapsed_seconds(), 3);
    }

    #[test]
    fn test_set_numbers_and_exercise_advance() {
        let mut s = session();
        s.start(&test_day(), "P", &[]).unwrap();

        s.log_set("60", "8", 8.0).unwrap();
        s.skip_rest().unwrap();
        s.log_set("62.5", "6", 9.0).unwrap();
        s.skip_rest().unwrap();

        assert_eq!(s.current_exercise().unwrap().exercise_id, "dip");
        assert_eq!(s.current_set_number(), 1);
        let numbers: Vec<u32> = s.log().unwrap().sets.iter().map(|x| x.set_number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_last_set_without_rest_goes_straight_to_complete() {
        let mut s = session();
        s.start(&test_day(), "P", &[]).unwrap();
        s.skip_exercise().unwrap();

        assert_eq!(s.log_set("", "10", 8.0).unwrap(), SessionPhase::Complete);
        assert_eq!(s.log().unwrap().sets[0].weight_kg, 0.0);
    }

    #[test]
    fn test_last_set_with_rest_passes_through_resting() {
        let day = WorkoutDay::new(
            "Single",
            1,
            ExerciseCategory::Legs,
            10,
            vec![WorkoutExercise::new("squat", "Squat", 1, 5, 5).with_rest(2)],
        );
        let mut s = session();
        s.start(&day, "P", &[]).unwrap();

        assert_eq!(s.log_set("100", "5", 8.0).unwrap(), SessionPhase::Resting);
        assert_eq!(s.tick(), SessionPhase::Resting);
        assert_eq!(s.tick(), SessionPhase::Complete);
        assert!(s.current_exercise().is_none());
    }

    #[test]
    fn test_invalid_input_leaves_state_unchanged() {
        let mut s = session();
        s.start(&test_day(), "P", &[]).unwrap();

        for (weight, reps) in [("abc", "5"), ("-5", "5"), ("60", "0"), ("60", "x"), ("60", "")] {
            let result = s.log_set(weight, reps, 8.0);
            assert!(matches!(result, Err(Error::InvalidInput(_))), "{weight} {reps}");
        }
        assert!(matches!(s.log_set("60", "5", 11.0), Err(Error::InvalidInput(_))));

        assert_eq!(s.phase(), SessionPhase::Exercising);
        assert!(s.log().unwrap().sets.is_empty());
        assert_eq!(s.current_set_number(), 1);
    }

    #[test]
    fn test_pending_input_clears_but_rpe_persists() {
        let mut s = session();
        s.start(&test_day(), "P", &[]).unwrap();

        {
            let pending = s.pending_mut();
            pending.weight = "70".into();
            pending.reps = "6".into();
            pending.rpe = 9.0;
        }
        s.log_pending_set().unwrap();

        assert_eq!(s.pending().weight, "");
        assert_eq!(s.pending().reps, "");
        assert_eq!(s.pending().rpe, 9.0);
        assert_eq!(s.log().unwrap().sets[0].weight_kg, 70.0);
    }

    #[test]
    fn test_skip_exercise_caps_at_end() {
        let mut s = session();
        s.start(&test_day(), "P", &[]).unwrap();

        assert_eq!(s.skip_exercise().unwrap(), SessionPhase::Exercising);
        assert_eq!(s.skip_exercise().unwrap(), SessionPhase::Complete);
        assert!(s.skip_exercise().is_err());
        assert_eq!(s.current_exercise_index(), 2);
    }

    #[test]
    fn test_tick_while_idle_is_noop() {
        let mut s = session();
        assert_eq!(s.tick(), SessionPhase::Idle);
        assert_eq!(s.elapsed_seconds(), 0);
        assert!(matches!(s.skip_rest(), Err(Error::Session(_))));
    }

    #[test]
    fn test_elapsed_text() {
        let mut s = session();
        s.start(&test_day(), "P", &[]).unwrap();
        for _ in 0..75 {
            s.tick();
        }
        assert_eq!(s.elapsed_text(), "01:15");
    }

    #[test]
    fn test_cancel_persists_nothing() {
        let mut store = MemoryStore::new();
        let mut s = session();
        s.start(&test_day(), "P", &[]).unwrap();
        s.log_set("60", "8", 8.0).unwrap();

        assert_eq!(s.cancel(), SessionPhase::Idle);
        assert!(!s.is_active());
        assert!(store.workout_logs().unwrap().is_empty());
        assert!(store.personal_records().unwrap().is_empty());
        assert!(matches!(
            s.finish(None, None, &mut store, Utc::now()),
            Err(Error::Session(_))
        ));
    }

    #[test]
    fn test_finish_persists_and_advances() {
        let mut store = MemoryStore::new();
        let profile = profile();
        let mut program = build_program("upper_lower_beginner").unwrap();
        let day = program.todays_workout().unwrap().clone();

        let mut s = session();
        s.start(&day, &program.name, &[]).unwrap();
        let first = s.current_exercise().unwrap().clone();
        s.log_set("100", "5", 8.0).unwrap();
        s.skip_rest().unwrap();
        s.log_set("100", "3", 8.0).unwrap();
        for _ in 0..5 {
            s.tick();
        }

        let summary = s
            .finish(Some(&profile), Some(&mut program), &mut store, Utc::now())
            .unwrap();

        assert_eq!(s.phase(), SessionPhase::Idle);
        assert_eq!(summary.log.bodyweight_kg, Some(80.0));
        assert_eq!(summary.log.duration_seconds, 5);
        assert_eq!(summary.new_records.len(), 1);
        assert!(summary.log.sets[0].is_personal_record);
        assert!(!summary.log.sets[1].is_personal_record);
        assert_eq!(summary.next_day.as_deref(), Some("Lower A"));

        assert_eq!(program.current_day_index, 1);
        assert_eq!(store.workout_logs().unwrap(), vec![summary.log.clone()]);
        assert_eq!(
            store.personal_record_map().unwrap()[&first.exercise_id].weight_kg,
            100.0
        );
        assert_eq!(store.programs().unwrap()[0].current_day_index, 1);
    }

    #[test]
    fn test_failed_persistence_keeps_session_for_retry() {
        let mut store = MemoryStore::new();
        let mut program = build_program("full_body_beginner").unwrap();
        let day = program.todays_workout().unwrap().clone();

        let mut s = session();
        s.start(&day, &program.name, &[]).unwrap();
        s.log_set("80", "5", 8.0).unwrap();

        store.set_read_only(true);
        let result = s.finish(None, Some(&mut program), &mut store, Utc::now());
        assert!(matches!(result, Err(Error::Persistence(_))));
        assert!(s.is_active());
        assert_eq!(s.log().unwrap().sets.len(), 1);
        assert_eq!(program.current_day_index, 0);
        assert!(!s.log().unwrap().sets[0].is_personal_record);

        store.set_read_only(false);
        let summary = s
            .finish(None, Some(&mut program), &mut store, Utc::now())
            .unwrap();
        assert_eq!(summary.log.sets.len(), 1);
        assert_eq!(program.current_day_index, 1);
        assert_eq!(store.workout_logs().unwrap().len(), 1);
    }

    #[test]
    fn test_suggestion_from_history() {
        let mut past = WorkoutLog::new_at("P", "Push Test", Utc::now() - Duration::days(3));
        for (i, (w, rpe)) in [(80.0, 6.0), (82.5, 6.0), (80.0, 6.0)].into_iter().enumerate() {
            past.sets
                .push(ExerciseSetLog::new("bench", "Bench Press", i as u32 + 1, 5, w, rpe));
        }

        let mut s = session();
        s.start(&test_day(), "P", &[past]).unwrap();
        assert_eq!(s.suggested_weight(), Some(85.0));
        assert_eq!(
            s.previous_summary().unwrap().to_string(),
            "Last: 82.5 kg · 15 total reps"
        );

        s.skip_exercise().unwrap();
        assert_eq!(s.suggested_weight(), None);
        assert!(s.previous_summary().is_none());
    }

    #[test]
    fn test_start_today_from_store() {
        let mut store = MemoryStore::new();
        let mut s = session();
        assert!(matches!(s.start_today(&store), Err(Error::NotFound(_))));

        store
            .activate_program(build_program("ppl_intermediate").unwrap(), Utc::now())
            .unwrap();
        assert_eq!(s.start_today(&store).unwrap(), SessionPhase::Exercising);
        assert_eq!(s.day().unwrap().name, "Push A");
    }
}
