//! Core domain logic for cake day scheduling.
//! This crate is the single source of truth for scheduling rules.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schedule;
pub mod service;
pub mod upload;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::celebration::{CakeSize, Celebration, CelebrationValidationError};
pub use model::person::{Person, PersonValidationError};
pub use repo::celebration_repo::{CelebrationRepository, SqliteCelebrationRepository};
pub use repo::person_repo::{PersonRepository, SqlitePersonRepository};
pub use repo::{RepoError, RepoResult};
pub use schedule::{
    assign_candidates, compute_celebrations, compute_celebrations_with, is_non_working_day,
    next_working_day, resolve, CandidateAssignment, Holiday, ScheduleError, ScheduleResult,
    WorkCalendar,
};
pub use service::cake_day_service::{CakeDayService, ServiceError, UploadSummary};
pub use upload::{parse_rows, parse_upload_file, parse_workbook, UploadError, UploadFormat};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
