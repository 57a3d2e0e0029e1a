//! Cake day scheduling.
//!
//! # Responsibility
//! - Decide which days are working days.
//! - Map birthdays onto a target year and roll them to candidate cake days.
//! - Resolve candidate conflicts into the final celebration list.
//!
//! # Invariants
//! - Pure computation: no I/O, no state shared across calls.
//! - Output is ascending by date with unique dates.
//! - `CakeSize::Large` iff a celebration has more than one attendee.

use crate::model::celebration::Celebration;
use crate::model::person::Person;
use chrono::NaiveDate;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

mod assign;
mod calendar;
mod resolve;

pub use assign::{assign_candidates, assign_candidates_with, CandidateAssignment};
pub use calendar::{
    is_non_working_day, next_working_day, Holiday, WorkCalendar, MAX_NON_WORKING_RUN,
};
pub use resolve::{resolve, resolve_with, MAX_POSTPONEMENT_STEPS};

pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Errors from cake day computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Birthdays cannot be mapped onto the requested year.
    YearOutOfRange(i32),
    /// Date arithmetic left the supported calendar range.
    DateOverflow(NaiveDate),
    /// No free working day found within `MAX_POSTPONEMENT_STEPS`.
    PostponementExhausted { from: NaiveDate },
    /// Every day within `MAX_NON_WORKING_RUN` days of `from` is non-working.
    NoWorkingDay { from: NaiveDate },
}

impl Display for ScheduleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::YearOutOfRange(year) => write!(f, "year {year} is outside the supported range"),
            Self::DateOverflow(date) => write!(f, "date arithmetic overflowed after {date}"),
            Self::PostponementExhausted { from } => write!(
                f,
                "no free working day within {MAX_POSTPONEMENT_STEPS} steps after {from}"
            ),
            Self::NoWorkingDay { from } => write!(
                f,
                "no working day within {MAX_NON_WORKING_RUN} days from {from}"
            ),
        }
    }
}

impl Error for ScheduleError {}

/// Computes the celebrations of `year` for `people` with a custom calendar.
pub fn compute_celebrations_with(
    calendar: &WorkCalendar,
    people: &[Person],
    year: i32,
) -> ScheduleResult<Vec<Celebration>> {
    let started_at = Instant::now();
    let candidates = assign_candidates_with(calendar, people, year)?;
    let celebrations = resolve_with(calendar, &candidates)?;
    info!(
        "event=schedule_compute module=schedule status=ok year={} people={} celebrations={} duration_ms={}",
        year,
        people.len(),
        celebrations.len(),
        started_at.elapsed().as_millis()
    );
    Ok(celebrations)
}

/// Computes the celebrations of `year` for `people` with the standard calendar.
pub fn compute_celebrations(people: &[Person], year: i32) -> ScheduleResult<Vec<Celebration>> {
    compute_celebrations_with(WorkCalendar::standard(), people, year)
}
