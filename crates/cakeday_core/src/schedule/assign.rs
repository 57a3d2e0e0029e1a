//! Initial per-person candidate dates.

use super::calendar::WorkCalendar;
use super::{ScheduleError, ScheduleResult};
use crate::model::person::Person;
use chrono::{Datelike, NaiveDate};

/// Provisional cake day for one person before conflicts are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateAssignment {
    pub name: String,
    pub birthday_this_year: NaiveDate,
    pub celebration_date: NaiveDate,
}

/// Maps every birthday onto `year` and rolls it to a candidate cake day.
///
/// Output keeps the input order. A 29 February birthday is observed on
/// 28 February in non-leap years.
pub fn assign_candidates_with(
    calendar: &WorkCalendar,
    people: &[Person],
    year: i32,
) -> ScheduleResult<Vec<CandidateAssignment>> {
    people
        .iter()
        .map(|person| {
            let birthday_this_year = birthday_in_year(person.date_of_birth, year)?;
            Ok(CandidateAssignment {
                name: person.name.clone(),
                birthday_this_year,
                celebration_date: calendar.next_working_day(birthday_this_year)?,
            })
        })
        .collect()
}

/// [`assign_candidates_with`] using the standard calendar.
pub fn assign_candidates(people: &[Person], year: i32) -> ScheduleResult<Vec<CandidateAssignment>> {
    assign_candidates_with(WorkCalendar::standard(), people, year)
}

fn birthday_in_year(date_of_birth: NaiveDate, year: i32) -> ScheduleResult<NaiveDate> {
    let (month, day) = (date_of_birth.month(), date_of_birth.day());
    if let Some(birthday) = NaiveDate::from_ymd_opt(year, month, day) {
        return Ok(birthday);
    }
    if month == 2 && day == 29 {
        if let Some(birthday) = NaiveDate::from_ymd_opt(year, 2, 28) {
            return Ok(birthday);
        }
    }
    Err(ScheduleError::YearOutOfRange(year))
}
