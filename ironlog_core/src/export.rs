//! CSV export of logged sets.
//!
//! One row per set. Rows are appended, and the header row is written only
//! when the target file is new or empty, so repeated exports accumulate in
//! one sheet.

use crate::{ExerciseSetLog, Result, WorkoutLog};
use std::fs::OpenOptions;
use std::path::Path;

#[derive(Debug, serde::Serialize)]
struct SetRow<'a> {
    log_id: String,
    date: String,
    program: &'a str,
    day: &'a str,
    exercise_id: &'a str,
    exercise_name: &'a str,
    set_number: u32,
    reps: u32,
    weight_kg: f64,
    rpe: f64,
    estimated_1rm: String,
    is_pr: bool,
}

impl<'a> SetRow<'a> {
    fn new(log: &'a WorkoutLog, set: &'a ExerciseSetLog) -> Self {
        SetRow {
            log_id: log.id.to_string(),
            date: log.date.to_rfc3339(),
            program: &log.program_name,
            day: &log.day_name,
            exercise_id: &set.exercise_id,
            exercise_name: &set.exercise_name,
            set_number: set.set_number,
            reps: set.reps,
            weight_kg: set.weight_kg,
            rpe: set.rpe,
            estimated_1rm: format!("{:.2}", set.estimated_1rm()),
            is_pr: set.is_personal_record,
        }
    }
}

/// Append every set of `logs` to the CSV at `path`; returns rows written
pub fn export_sets_csv(logs: &[WorkoutLog], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    let mut rows = 0;
    for log in logs {
        for set in &log.sets {
            writer.serialize(SetRow::new(log, set))?;
            rows += 1;
        }
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} sets from {} workouts to {:?}", rows, logs.len(), path);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_log() -> WorkoutLog {
        let mut log = WorkoutLog::new("Upper/Lower", "Upper A");
        let mut set = ExerciseSetLog::new("barbell_bench_press", "Barbell Bench Press", 1, 5, 100.0, 8.0);
        set.is_personal_record = true;
        log.sets.push(set);
        log.sets
            .push(ExerciseSetLog::new("barbell_row", "Barbell Row", 1, 8, 70.0, 7.5));
        log
    }

    #[test]
    fn test_export_writes_header_and_rows() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("out").join("sets.csv");

        let written = export_sets_csv(&[sample_log()], &csv_path).unwrap();
        assert_eq!(written, 2);

        let mut reader = csv::Reader::from_path(&csv_path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "log_id");
        assert_eq!(&headers[10], "estimated_1rm");
        assert_eq!(&headers[11], "is_pr");

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][4], "barbell_bench_press");
        assert_eq!(&rows[0][10], "116.67");
        assert_eq!(&rows[0][11], "true");
        assert_eq!(&rows[1][11], "false");
    }

    #[test]
    fn test_second_export_appends_without_header() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("sets.csv");

        export_sets_csv(&[sample_log()], &csv_path).unwrap();
        export_sets_csv(&[sample_log()], &csv_path).unwrap();

        let contents = std::fs::read_to_string(&csv_path).unwrap();
        assert_eq!(contents.matches("log_id").count(), 1);
        assert_eq!(contents.lines().count(), 5);
    }

    #[test]
    fn test_empty_export() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("sets.csv");

        assert_eq!(export_sets_csv(&[], &csv_path).unwrap(), 0);
        assert!(csv_path.exists());
    }
}
