//! Cake day use-case service.
//!
//! # Responsibility
//! - Import people into the directory without duplicates.
//! - Recompute a year's celebrations from the full directory.
//! - Replace the stored calendar for that year.
//!
//! # Invariants
//! - Each computation reads the whole directory; nothing is incremental.
//! - A year's calendar is replaced only after the computation succeeded.

use crate::model::celebration::Celebration;
use crate::model::person::Person;
use crate::repo::celebration_repo::CelebrationRepository;
use crate::repo::person_repo::PersonRepository;
use crate::repo::RepoError;
use crate::schedule::{compute_celebrations_with, ScheduleError, WorkCalendar};
use crate::upload::{parse_upload_file, UploadError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Errors from cake day service operations.
#[derive(Debug)]
pub enum ServiceError {
    Upload(UploadError),
    Schedule(ScheduleError),
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upload(err) => write!(f, "{err}"),
            Self::Schedule(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Upload(err) => Some(err),
            Self::Schedule(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<UploadError> for ServiceError {
    fn from(value: UploadError) -> Self {
        Self::Upload(value)
    }
}

impl From<ScheduleError> for ServiceError {
    fn from(value: ScheduleError) -> Self {
        Self::Schedule(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Outcome of one processed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSummary {
    /// Well-formed rows read from the file.
    pub rows_read: usize,
    /// Rows that added a new person to the directory.
    pub people_added: usize,
    /// Celebrations stored for the target year.
    pub celebrations: Vec<Celebration>,
}

/// Service facade over the directory and calendar repositories.
pub struct CakeDayService<P: PersonRepository, C: CelebrationRepository> {
    people: P,
    calendar: C,
    work_calendar: WorkCalendar,
}

impl<P: PersonRepository, C: CelebrationRepository> CakeDayService<P, C> {
    /// Creates a service using the standard working-day calendar.
    pub fn new(people: P, calendar: C) -> Self {
        Self::with_work_calendar(people, calendar, WorkCalendar::default())
    }

    pub fn with_work_calendar(people: P, calendar: C, work_calendar: WorkCalendar) -> Self {
        Self {
            people,
            calendar,
            work_calendar,
        }
    }

    /// Stores people not yet in the directory and returns how many were new.
    ///
    /// The batch is stored atomically; on error the directory is unchanged.
    pub fn import_people(&self, people: &[Person]) -> Result<usize, ServiceError> {
        Ok(self.people.insert_all_if_absent(people)?)
    }

    /// Computes `year` from the full directory without storing the result.
    pub fn compute_year(&self, year: i32) -> Result<Vec<Celebration>, ServiceError> {
        let people = self.people.list_people()?;
        Ok(compute_celebrations_with(&self.work_calendar, &people, year)?)
    }

    /// Recomputes `year` and replaces its stored calendar.
    pub fn refresh_year(&self, year: i32) -> Result<Vec<Celebration>, ServiceError> {
        let celebrations = self.compute_year(year)?;
        self.calendar.replace_year(year, &celebrations)?;
        Ok(celebrations)
    }

    /// Parses an upload, stores new people and refreshes `year`.
    pub fn process_upload(
        &self,
        path: impl AsRef<Path>,
        year: i32,
    ) -> Result<UploadSummary, ServiceError> {
        let people = parse_upload_file(path)?;
        let people_added = self.import_people(&people)?;
        let celebrations = self.refresh_year(year)?;

        info!(
            "event=upload_process module=service status=ok year={} rows={} added={} celebrations={}",
            year,
            people.len(),
            people_added,
            celebrations.len()
        );

        Ok(UploadSummary {
            rows_read: people.len(),
            people_added,
            celebrations,
        })
    }

    /// Stored celebrations for `year`, ordered by date.
    pub fn celebrations_for_year(&self, year: i32) -> Result<Vec<Celebration>, ServiceError> {
        Ok(self.calendar.list_for_year(year)?)
    }

    /// Full directory snapshot in insertion order.
    pub fn list_people(&self) -> Result<Vec<Person>, ServiceError> {
        Ok(self.people.list_people()?)
    }
}
