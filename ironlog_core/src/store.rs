//! Persistence store for every entity.
//!
//! [`Store`] is the seam the session, scheduler and analytics read and write
//! through. [`MemoryStore`] keeps everything in memory; [`FileStore`] keeps
//! `state.json` plus the `workouts.jsonl` journal under a data directory.

use crate::scheduler::activate_exclusive;
use crate::state::StoreState;
use crate::wal::WorkoutJournal;
use crate::{
    BodyMeasurement, Error, FoodItem, NutritionLog, PersonalRecord, Result, UserProfile,
    WorkoutLog, WorkoutProgram,
};
use chrono::{DateTime, NaiveDate, Utc};
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const STATE_FILE: &str = "state.json";
pub const JOURNAL_FILE: &str = "workouts.jsonl";

/// CRUD over the persisted entities
pub trait Store {
    fn profile(&self) -> Result<Option<UserProfile>>;
    fn save_profile(&mut self, profile: &UserProfile) -> Result<()>;

    fn programs(&self) -> Result<Vec<WorkoutProgram>>;
    /// Insert or replace by id
    fn save_program(&mut self, program: &WorkoutProgram) -> Result<()>;
    fn delete_program(&mut self, id: Uuid) -> Result<()>;

    /// Workout logs ascending by date
    fn workout_logs(&self) -> Result<Vec<WorkoutLog>>;
    fn insert_workout_log(&mut self, log: &WorkoutLog) -> Result<()>;
    fn delete_workout_log(&mut self, id: Uuid) -> Result<()>;

    fn personal_records(&self) -> Result<Vec<PersonalRecord>>;
    /// Insert or replace by exercise id
    fn upsert_personal_record(&mut self, record: &PersonalRecord) -> Result<()>;

    /// Measurements ascending by date
    fn measurements(&self) -> Result<Vec<BodyMeasurement>>;
    fn insert_measurement(&mut self, measurement: &BodyMeasurement) -> Result<()>;
    fn delete_measurement(&mut self, id: Uuid) -> Result<()>;

    fn nutrition_log(&self, date: NaiveDate) -> Result<Option<NutritionLog>>;
    /// Nutrition logs ascending by day
    fn nutrition_logs(&self) -> Result<Vec<NutritionLog>>;
    /// Insert or replace by calendar day
    fn save_nutrition_log(&mut self, log: &NutritionLog) -> Result<()>;

    fn food_items(&self) -> Result<Vec<FoodItem>>;
    fn save_food_item(&mut self, item: &FoodItem) -> Result<()>;

    /// Persist a finished workout, its record updates and the advanced
    /// program together
    fn commit_workout(
        &mut self,
        log: &WorkoutLog,
        records: &[PersonalRecord],
        program: Option<&WorkoutProgram>,
    ) -> Result<()>;

    /// The program flagged active, if any
    fn active_program(&self) -> Result<Option<WorkoutProgram>> {
        Ok(self.programs()?.into_iter().find(|p| p.is_active))
    }

    /// Stored records keyed by exercise id
    fn personal_record_map(&self) -> Result<std::collections::HashMap<String, PersonalRecord>> {
        Ok(self
            .personal_records()?
            .into_iter()
            .map(|r| (r.exercise_id.clone(), r))
            .collect())
    }

    /// Make `program` the single active program and link it from the profile
    fn activate_program(
        &mut self,
        mut program: WorkoutProgram,
        now: DateTime<Utc>,
    ) -> Result<WorkoutProgram> {
        let mut existing: Vec<WorkoutProgram> = self
            .programs()?
            .into_iter()
            .filter(|p| p.id != program.id)
            .collect();
        let previously_active: Vec<Uuid> = existing
            .iter()
            .filter(|p| p.is_active)
            .map(|p| p.id)
            .collect();

        activate_exclusive(&mut existing, &mut program, now);

        for other in existing.iter().filter(|p| previously_active.contains(&p.id)) {
            self.save_program(other)?;
        }
        self.save_program(&program)?;

        if let Some(mut profile) = self.profile()? {
            profile.active_program_id = Some(program.id);
            self.save_profile(&profile)?;
        }
        Ok(program)
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// Store held entirely in memory
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    state: StoreState,
    logs: Vec<WorkoutLog>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every write with [`Error::Persistence`]
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    fn writable(&self) -> Result<()> {
        if self.read_only {
            Err(Error::Persistence("store is read-only".into()))
        } else {
            Ok(())
        }
    }
}

impl Store for MemoryStore {
    fn profile(&self) -> Result<Option<UserProfile>> {
        Ok(self.state.profile.clone())
    }

    fn save_profile(&mut self, profile: &UserProfile) -> Result<()> {
        self.writable()?;
        self.state.profile = Some(profile.clone());
        Ok(())
    }

    fn programs(&self) -> Result<Vec<WorkoutProgram>> {
        Ok(self.state.programs.clone())
    }

    fn save_program(&mut self, program: &WorkoutProgram) -> Result<()> {
        self.writable()?;
        self.state.upsert_program(program);
        Ok(())
    }

    fn delete_program(&mut self, id: Uuid) -> Result<()> {
        self.writable()?;
        if self.state.remove_program(id) {
            Ok(())
        } else {
            Err(Error::NotFound(format!("program {}", id)))
        }
    }

    fn workout_logs(&self) -> Result<Vec<WorkoutLog>> {
        Ok(self.logs.clone())
    }

    fn insert_workout_log(&mut self, log: &WorkoutLog) -> Result<()> {
        self.writable()?;
        match self.logs.iter_mut().find(|l| l.id == log.id) {
            Some(existing) => *existing = log.clone(),
            None => self.logs.push(log.clone()),
        }
        self.logs.sort_by_key(|l| l.date);
        Ok(())
    }

    fn delete_workout_log(&mut self, id: Uuid) -> Result<()> {
        self.writable()?;
        let before = self.logs.len();
        self.logs.retain(|l| l.id != id);
        if self.logs.len() == before {
            return Err(Error::NotFound(format!("workout log {}", id)));
        }
        Ok(())
    }

    fn personal_records(&self) -> Result<Vec<PersonalRecord>> {
        Ok(self.state.personal_records.values().cloned().collect())
    }

    fn upsert_personal_record(&mut self, record: &PersonalRecord) -> Result<()> {
        self.writable()?;
        self.state.upsert_record(record);
        Ok(())
    }

    fn measurements(&self) -> Result<Vec<BodyMeasurement>> {
        Ok(self.state.measurements.clone())
    }

    fn insert_measurement(&mut self, measurement: &BodyMeasurement) -> Result<()> {
        self.writable()?;
        self.state.insert_measurement(measurement);
        Ok(())
    }

    fn delete_measurement(&mut self, id: Uuid) -> Result<()> {
        self.writable()?;
        if self.state.remove_measurement(id) {
            Ok(())
        } else {
            Err(Error::NotFound(format!("measurement {}", id)))
        }
    }

    fn nutrition_log(&self, date: NaiveDate) -> Result<Option<NutritionLog>> {
        Ok(self.state.nutrition_logs.get(&date).cloned())
    }

    fn nutrition_logs(&self) -> Result<Vec<NutritionLog>> {
        Ok(self.state.nutrition_logs.values().cloned().collect())
    }

    fn save_nutrition_log(&mut self, log: &NutritionLog) -> Result<()> {
        self.writable()?;
        self.state.upsert_nutrition_log(log);
        Ok(())
    }

    fn food_items(&self) -> Result<Vec<FoodItem>> {
        Ok(self.state.food_items.clone())
    }

    fn save_food_item(&mut self, item: &FoodItem) -> Result<()> {
        self.writable()?;
        self.state.upsert_food_item(item);
        Ok(())
    }

    fn commit_workout(
        &mut self,
        log: &WorkoutLog,
        records: &[PersonalRecord],
        program: Option<&WorkoutProgram>,
    ) -> Result<()> {
        self.writable()?;
        self.insert_workout_log(log)?;
        for record in records {
            self.state.upsert_record(record);
        }
        if let Some(program) = program {
            self.state.upsert_program(program);
        }
        Ok(())
    }
}

// ============================================================================
// File store
// ============================================================================

/// Store persisted under a data directory
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
    state_path: PathBuf,
    journal: WorkoutJournal,
}

impl FileStore {
    /// Open (without touching disk) a store rooted at `dir`
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let state_path = dir.join(STATE_FILE);
        let journal = WorkoutJournal::new(dir.join(JOURNAL_FILE));
        tracing::debug!("Using data directory {:?}", dir);
        Self {
            dir,
            state_path,
            journal,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn load(&self) -> Result<StoreState> {
        StoreState::load(&self.state_path)
    }

    fn update<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut StoreState) -> Result<T>,
    {
        StoreState::update(&self.state_path, f)
    }
}

impl Store for FileStore {
    fn profile(&self) -> Result<Option<UserProfile>> {
        Ok(self.load()?.profile)
    }

    fn save_profile(&mut self, profile: &UserProfile) -> Result<()> {
        self.update(|s| {
            s.profile = Some(profile.clone());
            Ok(())
        })
    }

    fn programs(&self) -> Result<Vec<WorkoutProgram>> {
        Ok(self.load()?.programs)
    }

    fn save_program(&mut self, program: &WorkoutProgram) -> Result<()> {
        self.update(|s| {
            s.upsert_program(program);
            Ok(())
        })
    }

    fn delete_program(&mut self, id: Uuid) -> Result<()> {
        self.update(|s| {
            if s.remove_program(id) {
                Ok(())
            } else {
                Err(Error::NotFound(format!("program {}", id)))
            }
        })
    }

    fn workout_logs(&self) -> Result<Vec<WorkoutLog>> {
        self.journal.read_all()
    }

    fn insert_workout_log(&mut self, log: &WorkoutLog) -> Result<()> {
        self.journal.append(log)
    }

    fn delete_workout_log(&mut self, id: Uuid) -> Result<()> {
        if self.journal.remove(id)? {
            Ok(())
        } else {
            Err(Error::NotFound(format!("workout log {}", id)))
        }
    }

    fn personal_records(&self) -> Result<Vec<PersonalRecord>> {
        Ok(self.load()?.personal_records.into_values().collect())
    }

    fn upsert_personal_record(&mut self, record: &PersonalRecord) -> Result<()> {
        self.update(|s| {
            s.upsert_record(record);
            Ok(())
        })
    }

    fn measurements(&self) -> Result<Vec<BodyMeasurement>> {
        Ok(self.load()?.measurements)
    }

    fn insert_measurement(&mut self, measurement: &BodyMeasurement) -> Result<()> {
        self.update(|s| {
            s.insert_measurement(measurement);
            Ok(())
        })
    }

    fn delete_measurement(&mut self, id: Uuid) -> Result<()> {
        self.update(|s| {
            if s.remove_measurement(id) {
                Ok(())
            } else {
                Err(Error::NotFound(format!("measurement {}", id)))
            }
        })
    }

    fn nutrition_log(&self, date: NaiveDate) -> Result<Option<NutritionLog>> {
        Ok(self.load()?.nutrition_logs.remove(&date))
    }

    fn nutrition_logs(&self) -> Result<Vec<NutritionLog>> {
        Ok(self.load()?.nutrition_logs.into_values().collect())
    }

    fn save_nutrition_log(&mut self, log: &NutritionLog) -> Result<()> {
        self.update(|s| {
            s.upsert_nutrition_log(log);
            Ok(())
        })
    }

    fn food_items(&self) -> Result<Vec<FoodItem>> {
        Ok(self.load()?.food_items)
    }

    fn save_food_item(&mut self, item: &FoodItem) -> Result<()> {
        self.update(|s| {
            s.upsert_food_item(item);
            Ok(())
        })
    }

    /// Journal first, then state. A failure after the append leaves a log
    /// that a retry rewrites under the same id.
    fn commit_workout(
        &mut self,
        log: &WorkoutLog,
        records: &[PersonalRecord],
        program: Option<&WorkoutProgram>,
    ) -> Result<()> {
        self.journal.append(log)?;
        self.update(|s| {
            for record in records {
                s.upsert_record(record);
            }
            if let Some(program) = program {
                s.upsert_program(program);
            }
            Ok(())
        })?;
        tracing::info!(
            "Committed workout {} ({} sets, {} new records)",
            log.id,
            log.sets.len(),
            records.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::build_program;
    use crate::{ExerciseSetLog, ExperienceLevel, FitnessGoal};
    use chrono::Duration;

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

    fn exercise_store(store: &mut dyn Store) {
        store.save_profile(&profile()).unwrap();

        let first = store
            .activate_program(build_program("full_body_beginner").unwrap(), Utc::now())
            .unwrap();
        let second = store
            .activate_program(build_program("upper_lower_beginner").unwrap(), Utc::now())
            .unwrap();

        let programs = store.programs().unwrap();
        assert_eq!(programs.len(), 2);
        assert_eq!(programs.iter().filter(|p| p.is_active).count(), 1);
        assert_eq!(store.active_program().unwrap().unwrap().id, second.id);
        assert_eq!(
            store.profile().unwrap().unwrap().active_program_id,
            Some(second.id)
        );
        assert!(!programs.iter().find(|p| p.id == first.id).unwrap().is_active);

        let older = WorkoutLog::new_at("P", "A", Utc::now() - Duration::days(2));
        let newer = WorkoutLog::new_at("P", "B", Utc::now());
        store.insert_workout_log(&newer).unwrap();
        store.insert_workout_log(&older).unwrap();
        let logs = store.workout_logs().unwrap();
        assert_eq!(logs.iter().map(|l| l.id).collect::<Vec<_>>(), vec![older.id, newer.id]);

        store.delete_workout_log(older.id).unwrap();
        assert_eq!(store.workout_logs().unwrap().len(), 1);
        assert!(matches!(
            store.delete_workout_log(older.id),
            Err(Error::NotFound(_))
        ));

        let mut m = BodyMeasurement::new(Utc::now());
        m.weight_kg = Some(79.5);
        store.insert_measurement(&m).unwrap();
        assert_eq!(store.measurements().unwrap().len(), 1);
        store.delete_measurement(m.id).unwrap();
        assert!(store.measurements().unwrap().is_empty());

        let today = Utc::now().date_naive();
        assert!(store.nutrition_log(today).unwrap().is_none());
        let mut nlog = NutritionLog::new(today);
        nlog.water_ml = 500;
        store.save_nutrition_log(&nlog).unwrap();
        nlog.water_ml = 750;
        store.save_nutrition_log(&nlog).unwrap();
        assert_eq!(store.nutrition_logs().unwrap().len(), 1);
        assert_eq!(store.nutrition_log(today).unwrap().unwrap().water_ml, 750);
    }

    #[test]
    fn test_memory_store_crud() {
        let mut store = MemoryStore::new();
        exercise_store(&mut store);
    }

    #[test]
    fn test_file_store_crud() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(temp_dir.path());
        exercise_store(&mut store);
        assert!(temp_dir.path().join(STATE_FILE).exists());
        assert!(temp_dir.path().join(JOURNAL_FILE).exists());
    }

    #[test]
    fn test_file_store_commit_and_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut program = build_program("ppl_intermediate").unwrap();
        program.advance_to_next_day();

        let mut log = WorkoutLog::new("PPL", "Push A");
        log.sets
            .push(ExerciseSetLog::new("barbell_bench_press", "Bench", 1, 5, 100.0, 8.0));
        let record = PersonalRecord::from_set(&log.sets[0], log.date);

        {
            let mut store = FileStore::open(temp_dir.path());
            store.commit_workout(&log, &[record], Some(&program)).unwrap();
            // retried commit must not duplicate the log
            store.commit_workout(&log, &[], Some(&program)).unwrap();
        }

        let store = FileStore::open(temp_dir.path());
        assert_eq!(store.workout_logs().unwrap(), vec![log]);
        let records = store.personal_record_map().unwrap();
        assert_eq!(records["barbell_bench_press"].weight_kg, 100.0);
        assert_eq!(store.programs().unwrap()[0].current_day_index, 1);
    }

    #[test]
    fn test_file_store_corrupt_state_reads_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join(STATE_FILE), "garbage").unwrap();

        let mut store = FileStore::open(temp_dir.path());
        assert!(store.profile().unwrap().is_none());

        // writing over a corrupt file recovers it
        store.save_profile(&profile()).unwrap();
        assert!(store.profile().unwrap().is_some());
    }

    #[test]
    fn test_read_only_memory_store_rejects_writes() {
        let mut store = MemoryStore::new();
        store.set_read_only(true);
        let log = WorkoutLog::new("P", "A");

        let result = store.commit_workout(&log, &[], None);
        assert!(matches!(result, Err(Error::Persistence(_))));
        assert!(store.workout_logs().unwrap().is_empty());
    }
}
