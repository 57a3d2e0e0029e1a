//! Working-day rules.
//!
//! Weekends are always Saturday and Sunday. Holidays are month/day pairs that
//! apply to every year.

use super::{ScheduleError, ScheduleResult};
use chrono::{Datelike, NaiveDate, Weekday};
use once_cell::sync::Lazy;

const STANDARD_HOLIDAYS: &[(&str, u32, u32)] = &[
    ("Christmas Day", 12, 25),
    ("Boxing Day", 12, 26),
    ("New Year's Day", 1, 1),
];

/// Longest run of consecutive non-working days a scan will cross.
pub const MAX_NON_WORKING_RUN: usize = 366;

static STANDARD_CALENDAR: Lazy<WorkCalendar> = Lazy::new(WorkCalendar::default);

/// A public holiday observed on the same month and day every year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holiday {
    pub name: String,
    pub month: u32,
    pub day: u32,
}

impl Holiday {
    pub fn new(name: impl Into<String>, month: u32, day: u32) -> Self {
        Self {
            name: name.into(),
            month,
            day,
        }
    }

    pub fn matches(&self, date: NaiveDate) -> bool {
        date.month() == self.month && date.day() == self.day
    }
}

/// Weekend pattern plus a year-independent holiday table.
///
/// `Default` observes Christmas Day, Boxing Day and New Year's Day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkCalendar {
    holidays: Vec<Holiday>,
}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self::new(
            STANDARD_HOLIDAYS
                .iter()
                .map(|(name, month, day)| Holiday::new(*name, *month, *day))
                .collect(),
        )
    }
}

impl WorkCalendar {
    pub fn new(holidays: Vec<Holiday>) -> Self {
        Self { holidays }
    }

    /// Shared instance with the standard holiday table.
    pub fn standard() -> &'static WorkCalendar {
        &STANDARD_CALENDAR
    }

    pub fn is_non_working_day(&self, date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
            || self.holidays.iter().any(|holiday| holiday.matches(date))
    }

    /// Candidate cake day for a birthday on `date`.
    ///
    /// Scanning starts the day after `date`. A birthday on a non-working day
    /// earns the following day off as well, so the scan starts one day later.
    pub fn next_working_day(&self, date: NaiveDate) -> ScheduleResult<NaiveDate> {
        let mut candidate = following_day(date)?;
        if self.is_non_working_day(date) {
            candidate = following_day(candidate)?;
        }
        self.skip_non_working(candidate)
    }

    /// First working day strictly after `date`, without the day-off rule.
    pub fn next_working_day_after(&self, date: NaiveDate) -> ScheduleResult<NaiveDate> {
        self.skip_non_working(following_day(date)?)
    }

    fn skip_non_working(&self, from: NaiveDate) -> ScheduleResult<NaiveDate> {
        let mut candidate = from;
        for _ in 0..MAX_NON_WORKING_RUN {
            if !self.is_non_working_day(candidate) {
                return Ok(candidate);
            }
            candidate = following_day(candidate)?;
        }
        Err(ScheduleError::NoWorkingDay { from })
    }
}

/// Returns whether `date` is a weekend day or a standard holiday.
pub fn is_non_working_day(date: NaiveDate) -> bool {
    WorkCalendar::standard().is_non_working_day(date)
}

/// Candidate cake day for a birthday on `date` under the standard calendar.
pub fn next_working_day(date: NaiveDate) -> ScheduleResult<NaiveDate> {
    WorkCalendar::standard().next_working_day(date)
}

pub(crate) fn following_day(date: NaiveDate) -> ScheduleResult<NaiveDate> {
    date.succ_opt().ok_or(ScheduleError::DateOverflow(date))
}
