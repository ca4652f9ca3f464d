//! Program scheduling: the week/day pointer of a program.
//!
//! The pointer advances one day per finished workout and wraps into the next
//! week after `days_per_week` days. There is no upper bound: a program can run
//! past its planned duration, and completion simply clamps at 100%.

use crate::{WorkoutDay, WorkoutProgram};
use chrono::{DateTime, Utc};

impl WorkoutProgram {
    /// The day to train next, or `None` if the pointer is out of range
    pub fn todays_workout(&self) -> Option<&WorkoutDay> {
        self.days.get(self.current_day_index)
    }

    /// Fraction of the planned days completed, clamped to 1.0
    pub fn completion_percentage(&self) -> f64 {
        if self.duration_weeks == 0 || self.days_per_week == 0 {
            return 0.0;
        }
        let days_per_week = f64::from(self.days_per_week);
        let total_days = f64::from(self.duration_weeks) * days_per_week;
        let completed_days = f64::from(self.current_week.saturating_sub(1)) * days_per_week
            + self.current_day_index as f64;
        (completed_days / total_days).min(1.0)
    }

    /// Move to the next training day, rolling into the next week
    pub fn advance_to_next_day(&mut self) {
        self.current_day_index += 1;
        if self.current_day_index >= self.days_per_week as usize {
            self.current_day_index = 0;
            self.current_week = self.current_week.saturating_add(1);
        }

        if self.current_week > self.duration_weeks {
            tracing::debug!(
                "Program '{}' overran its {} weeks (now week {})",
                self.name,
                self.duration_weeks,
                self.current_week
            );
        }
    }

    /// True once the pointer has moved past the last planned week
    pub fn is_overrun(&self) -> bool {
        self.current_week > self.duration_weeks
    }

    /// Mark active and reset the pointer to week 1, day 0
    pub fn activate(&mut self, now: DateTime<Utc>) {
        self.is_active = true;
        self.start_date = Some(now);
        self.current_week = 1;
        self.current_day_index = 0;
        tracing::info!("Activated program '{}'", self.name);
    }
}

/// Make `program` the only active program among `existing`
///
/// Every program in `existing` is deactivated; `program` is activated and
/// its pointer reset.
pub fn activate_exclusive(
    existing: &mut [WorkoutProgram],
    program: &mut WorkoutProgram,
    now: DateTime<Utc>,
) {
    for other in existing.iter_mut().filter(|p| p.is_active) {
        other.is_active = false;
        tracing::debug!("Deactivated program '{}'", other.name);
    }
    program.activate(now);
}
