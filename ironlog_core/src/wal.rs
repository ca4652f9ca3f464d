//! Append-only workout journal (`workouts.jsonl`).
//!
//! Each finished workout is one JSON line, appended under an exclusive lock.
//! Reads skip unparseable lines and keep one log per id, so a commit that is
//! retried after a partial failure never counts a workout twice.

use crate::{Error, Result, WorkoutLog};
use fs2::FileExt;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// JSONL-backed workout log journal
#[derive(Clone, Debug)]
pub struct WorkoutJournal {
    path: PathBuf,
}

impl WorkoutJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Lock the sidecar file; `remove` renames a new journal into place,
    /// so the journal's own inode cannot carry the lock
    fn lock(&self, exclusive: bool) -> Result<File> {
        self.ensure_parent_dir()?;
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())?;
        if exclusive {
            lock.lock_exclusive()?;
        } else {
            lock.lock_shared()?;
        }
        Ok(lock)
    }

    /// Append one log as a JSON line
    pub fn append(&self, log: &WorkoutLog) -> Result<()> {
        let lock = self.lock(true)?;

        let written = self.append_unlocked(log);
        lock.unlock()?;
        written?;

        tracing::debug!("Appended workout {} to journal", log.id);
        Ok(())
    }

    fn append_unlocked(&self, log: &WorkoutLog) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        let mut line = String::new();
        // A crash mid-append leaves a torn last line; start on a fresh one
        if ends_without_newline(&file)? {
            line.push('\n');
        }
        line.push_str(&serde_json::to_string(log)?);
        line.push('\n');
        (&file).write_all(line.as_bytes())?;
        file.sync_data()?;
        Ok(())
    }

    /// Every distinct log in the journal, ascending by date
    ///
    /// When an id appears more than once the last line wins.
    pub fn read_all(&self) -> Result<Vec<WorkoutLog>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let lock = self.lock(false)?;
        let logs = self.read_unlocked();
        lock.unlock()?;
        logs
    }

    fn read_unlocked(&self) -> Result<Vec<WorkoutLog>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut logs: Vec<WorkoutLog> = Vec::new();
        let mut index: HashMap<Uuid, usize> = HashMap::new();
        let mut skipped = 0usize;

        for (line_num, line_result) in BufReader::new(&file).lines().enumerate() {
            let line = match line_result {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!("Failed to read journal line {}: {}", line_num + 1, e);
                    skipped += 1;
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<WorkoutLog>(&line) {
                Ok(log) => match index.get(&log.id) {
                    Some(&pos) => logs[pos] = log,
                    None => {
                        index.insert(log.id, logs.len());
                        logs.push(log);
                    }
                },
                Err(e) => {
                    tracing::warn!("Skipping corrupt journal line {}: {}", line_num + 1, e);
                    skipped += 1;
                }
            }
        }

        logs.sort_by_key(|l| l.date);
        tracing::debug!(
            "Read {} workouts from journal ({} lines skipped)",
            logs.len(),
            skipped
        );
        Ok(logs)
    }

    /// Drop the log with `id`; returns false when it was not in the journal
    ///
    /// The read, filter and replace all happen under one exclusive lock, so
    /// a concurrent append is never lost.
    pub fn remove(&self, id: Uuid) -> Result<bool> {
        let lock = self.lock(true)?;
        let removed = self.read_unlocked().and_then(|mut logs| {
            let before = logs.len();
            logs.retain(|l| l.id != id);
            if logs.len() == before {
                return Ok(false);
            }
            self.replace_unlocked(&logs)?;
            Ok(true)
        });
        lock.unlock()?;
        removed
    }

    /// Replace the journal contents atomically: temp file, fsync, rename
    fn replace_unlocked(&self, logs: &[WorkoutLog]) -> Result<()> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| Error::Persistence(format!("journal {:?} has no parent", self.path)))?;

        let temp = NamedTempFile::new_in(parent)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            for log in logs {
                serde_json::to_writer(&mut writer, log)?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Rewrote journal with {} workouts", logs.len());
        Ok(())
    }
}

fn ends_without_newline(mut file: &File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}
