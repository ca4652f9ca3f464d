#![forbid(unsafe_code)]

//! Core domain model and business logic for ironlog, a local strength
//! training and nutrition tracker.
//!
//! This crate provides:
//! - Domain types (profile, programs, workout logs, records, measurements, nutrition)
//! - Metrics (BMI, calorie and macro targets, estimated 1RM, body composition)
//! - Program scheduling and the bundled program templates
//! - The active workout state machine and its tick source
//! - Progressive overload suggestions and personal record detection
//! - Analytics over workout history
//! - Persistence (state file, workout journal) and CSV export

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod scheduler;
pub mod templates;
pub mod state;
pub mod wal;
pub mod store;
pub mod progression;
pub mod clock;
pub mod session;
pub mod analytics;
pub mod nutrition;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, ExerciseCatalog};
pub use config::Config;
pub use metrics::MacroTargets;
pub use templates::{build_program, list_templates, ProgramTemplate};
pub use store::{FileStore, MemoryStore, Store};
pub use session::{FinishSummary, SessionPhase, WorkoutSession};
pub use progression::{suggested_weight, PerformanceSummary};
pub use export::export_sets_csv;
