//! The `state.json` document: every entity except workout logs.
//!
//! Reads take a shared lock; writes go to a temp file in the same directory,
//! are synced, then renamed over the original. A missing or corrupted file
//! degrades to an empty state with a warning.

use crate::{
    BodyMeasurement, Error, FoodItem, NutritionLog, PersonalRecord, Result, UserProfile,
    WorkoutProgram,
};
use chrono::NaiveDate;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Persisted entities, keyed the way they are looked up
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreState {
    #[serde(default)]
    pub profile: Option<UserProfile>,
    #[serde(default)]
    pub programs: Vec<WorkoutProgram>,
    /// One record per exercise id
    #[serde(default)]
    pub personal_records: BTreeMap<String, PersonalRecord>,
    #[serde(default)]
    pub measurements: Vec<BodyMeasurement>,
    /// One log per calendar day
    #[serde(default)]
    pub nutrition_logs: BTreeMap<NaiveDate, NutritionLog>,
    #[serde(default)]
    pub food_items: Vec<FoodItem>,
}

impl StoreState {
    pub fn upsert_program(&mut self, program: &WorkoutProgram) {
        match self.programs.iter_mut().find(|p| p.id == program.id) {
            Some(existing) => *existing = program.clone(),
            None => self.programs.push(program.clone()),
        }
    }

    pub fn remove_program(&mut self, id: Uuid) -> bool {
        let before = self.programs.len();
        self.programs.retain(|p| p.id != id);
        if let Some(profile) = self.profile.as_mut() {
            if profile.active_program_id == Some(id) {
                profile.active_program_id = None;
            }
        }
        self.programs.len() != before
    }

    pub fn upsert_record(&mut self, record: &PersonalRecord) {
        self.personal_records
            .insert(record.exercise_id.clone(), record.clone());
    }

    pub fn insert_measurement(&mut self, measurement: &BodyMeasurement) {
        self.measurements.push(measurement.clone());
        self.measurements.sort_by_key(|m| m.date);
    }

    pub fn remove_measurement(&mut self, id: Uuid) -> bool {
        let before = self.measurements.len();
        self.measurements.retain(|m| m.id != id);
        self.measurements.len() != before
    }

    pub fn upsert_nutrition_log(&mut self, log: &NutritionLog) {
        self.nutrition_logs.insert(log.date, log.clone());
    }

    pub fn upsert_food_item(&mut self, item: &FoodItem) {
        match self.food_items.iter_mut().find(|f| f.id == item.id) {
            Some(existing) => *existing = item.clone(),
            None => self.food_items.push(item.clone()),
        }
    }

    /// Load state from a file under a shared lock
    ///
    /// Returns an empty state if the file is missing, unreadable or corrupted.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No state file at {:?}, starting empty", path);
            return Ok(Self::default());
        }

        let contents = match read_shared(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("Unable to read state file {:?}: {}. Using defaults.", path, e);
                return Ok(Self::default());
            }
        };

        match serde_json::from_str::<StoreState>(&contents) {
            Ok(state) => {
                tracing::debug!(
                    "Loaded state from {:?} ({} programs, {} records)",
                    path,
                    state.programs.len(),
                    state.personal_records.len()
                );
                Ok(state)
            }
            Err(e) => {
                tracing::warn!("Failed to parse state file {:?}: {}. Using defaults.", path, e);
                Ok(Self::default())
            }
        }
    }

    /// Write state atomically: temp file, fsync, rename
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::Persistence(format!("state path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer(&mut writer, self)?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;
        tracing::debug!("Saved state to {:?}", path);
        Ok(())
    }

    /// Load, modify and save back in one call
    pub fn update<F, T>(path: &Path, f: F) -> Result<T>
    where
        F: FnOnce(&mut StoreState) -> Result<T>,
    {
        let mut state = Self::load(path)?;
        let out = f(&mut state)?;
        state.save(path)?;
        Ok(out)
    }
}

fn read_shared(path: &Path) -> std::io::Result<String> {
    let file = File::open(path)?;
    file.lock_shared()?;
    let mut contents = String::new();
    let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
    file.unlock()?;
    read.map(|_| contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExerciseSetLog, ExperienceLevel, FitnessGoal};
    use chrono::Utc;

    fn profile() -> UserProfile {
        UserProfile::new(
            "Ada",
            34,
            170.0,
            65.0,
            FitnessGoal::Recomposition,
            ExperienceLevel::Intermediate,
            3,
        )
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("state.json");

        let mut state = StoreState {
            profile: Some(profile()),
            ..Default::default()
        };
        let set = ExerciseSetLog::new("barbell_squat", "Barbell Squat", 1, 5, 100.0, 8.0);
        state.upsert_record(&PersonalRecord::from_set(&set, Utc::now()));
        state.save(&state_path).unwrap();

        let loaded = StoreState::load(&state_path).unwrap();
        assert_eq!(loaded.profile.unwrap().name, "Ada");
        assert!(loaded.personal_records.contains_key("barbell_squat"));
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state = StoreState::load(&temp_dir.path().join("missing.json")).unwrap();
        assert_eq!(state, StoreState::default());
    }

    #[test]
    fn test_corrupted_state_falls_back_to_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("state.json");
        std::fs::write(&state_path, "{ not json").unwrap();

        let state = StoreState::load(&state_path).unwrap();
        assert!(state.profile.is_none());
        assert!(state.programs.is_empty());
    }

    #[test]
    fn test_update_persists_changes() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("state.json");

        let count = StoreState::update(&state_path, |state| {
            state.profile = Some(profile());
            Ok(state.programs.len())
        })
        .unwrap();
        assert_eq!(count, 0);

        let loaded = StoreState::load(&state_path).unwrap();
        assert!(loaded.profile.is_some());
    }

    #[test]
    fn test_record_upsert_replaces_by_exercise() {
        let mut state = StoreState::default();
        let first = ExerciseSetLog::new("bench", "Bench", 1, 5, 80.0, 8.0);
        let second = ExerciseSetLog::new("bench", "Bench", 1, 5, 85.0, 8.0);
        state.upsert_record(&PersonalRecord::from_set(&first, Utc::now()));
        state.upsert_record(&PersonalRecord::from_set(&second, Utc::now()));

        assert_eq!(state.personal_records.len(), 1);
        assert_eq!(state.personal_records["bench"].weight_kg, 85.0);
    }

    #[test]
    fn test_removing_active_program_clears_profile_link() {
        let mut state = StoreState {
            profile: Some(profile()),
            ..Default::default()
        };
        let program = crate::templates::build_program("full_body_beginner").unwrap();
        state.upsert_program(&program);
        if let Some(p) = state.profile.as_mut() {
            p.active_program_id = Some(program.id);
        }

        assert!(state.remove_program(program.id));
        assert!(state.programs.is_empty());
        assert_eq!(state.profile.unwrap().active_program_id, None);
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("state.json");
        StoreState::default().save(&state_path).unwrap();

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "state.json")
            .collect();
        assert!(extras.is_empty(), "unexpected files: {:?}", extras);
    }
}
