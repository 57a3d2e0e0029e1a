//! Conflict resolution over candidate dates.
//!
//! # Rules
//! - Groups on two consecutive candidate dates share one cake on the later day.
//!   This merge does not consult reserved days.
//! - Every celebration reserves the following day as cake-free.
//! - A group whose date is reserved moves to the next working day that is not
//!   reserved.
//! - Groups that end up on the same date share one cake.

use super::assign::CandidateAssignment;
use super::calendar::{following_day, WorkCalendar};
use super::{ScheduleError, ScheduleResult};
use crate::model::celebration::Celebration;
use chrono::NaiveDate;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// Upper bound on working-day steps when moving a group off reserved days.
pub const MAX_POSTPONEMENT_STEPS: usize = 366;

/// Resolves candidates into final celebrations, ascending by date.
///
/// Attendees keep the relative order of `candidates`; a merged celebration
/// lists the earlier day's group first.
pub fn resolve_with(
    calendar: &WorkCalendar,
    candidates: &[CandidateAssignment],
) -> ScheduleResult<Vec<Celebration>> {
    let mut groups: BTreeMap<NaiveDate, Vec<&str>> = BTreeMap::new();
    for candidate in candidates {
        groups
            .entry(candidate.celebration_date)
            .or_default()
            .push(candidate.name.as_str());
    }
    let dates: Vec<NaiveDate> = groups.keys().copied().collect();

    let mut processed: BTreeSet<NaiveDate> = BTreeSet::new();
    let mut cake_free_days: BTreeSet<NaiveDate> = BTreeSet::new();
    let mut emitted: BTreeMap<NaiveDate, Vec<String>> = BTreeMap::new();
    let mut merged = 0usize;
    let mut postponed = 0usize;

    for index in 0..dates.len() {
        let date = dates[index];
        if processed.contains(&date) {
            continue;
        }

        let mut names = owned_names(&groups[&date]);
        let next_day = following_day(date)?;
        let has_next_group = dates.get(index + 1) == Some(&next_day);

        let effective_date = if has_next_group && !processed.contains(&next_day) {
            names.extend(owned_names(&groups[&next_day]));
            processed.insert(date);
            processed.insert(next_day);
            merged += 1;
            next_day
        } else {
            processed.insert(date);
            if cake_free_days.contains(&date) {
                postponed += 1;
                postpone(calendar, date, &cake_free_days)?
            } else {
                date
            }
        };

        cake_free_days.insert(following_day(effective_date)?);
        emitted.entry(effective_date).or_default().extend(names);
    }

    debug!(
        "event=schedule_resolve module=schedule status=ok candidates={} groups={} celebrations={} merged={} postponed={}",
        candidates.len(),
        dates.len(),
        emitted.len(),
        merged,
        postponed
    );

    Ok(emitted
        .into_iter()
        .map(|(date, attendees)| Celebration::new(date, attendees))
        .collect())
}

/// [`resolve_with`] using the standard calendar.
pub fn resolve(candidates: &[CandidateAssignment]) -> ScheduleResult<Vec<Celebration>> {
    resolve_with(WorkCalendar::standard(), candidates)
}

fn postpone(
    calendar: &WorkCalendar,
    from: NaiveDate,
    cake_free_days: &BTreeSet<NaiveDate>,
) -> ScheduleResult<NaiveDate> {
    let mut candidate = from;
    for _ in 0..MAX_POSTPONEMENT_STEPS {
        candidate = calendar.next_working_day_after(candidate)?;
        if !cake_free_days.contains(&candidate) {
            return Ok(candidate);
        }
    }
    Err(ScheduleError::PostponementExhausted { from })
}

fn owned_names(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::{postpone, resolve, MAX_POSTPONEMENT_STEPS};
    use crate::model::celebration::CakeSize;
    use crate::schedule::{CandidateAssignment, ScheduleError, WorkCalendar};
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    fn candidate(name: &str, celebration_date: NaiveDate) -> CandidateAssignment {
        CandidateAssignment {
            name: name.to_string(),
            birthday_this_year: celebration_date.pred_opt().unwrap(),
            celebration_date,
        }
    }

    #[test]
    fn empty_input_yields_no_celebrations() {
        assert!(resolve(&[]).unwrap().is_empty());
    }

    #[test]
    fn same_day_group_keeps_input_order() {
        let celebrations = resolve(&[
            candidate("Zoe", date(3, 4)),
            candidate("Adam", date(3, 4)),
        ])
        .unwrap();

        assert_eq!(celebrations.len(), 1);
        assert_eq!(celebrations[0].size, CakeSize::Large);
        assert_eq!(celebrations[0].attendees, vec!["Zoe", "Adam"]);
    }

    #[test]
    fn consecutive_groups_merge_onto_the_later_day() {
        let celebrations = resolve(&[
            candidate("Kate", date(7, 16)),
            candidate("Sam", date(7, 15)),
        ])
        .unwrap();

        assert_eq!(celebrations.len(), 1);
        assert_eq!(celebrations[0].date, date(7, 16));
        assert_eq!(celebrations[0].attendees, vec!["Sam", "Kate"]);
    }

    #[test]
    fn group_on_reserved_day_is_postponed() {
        let celebrations = resolve(&[
            candidate("Alex", date(7, 22)),
            candidate("Jen", date(7, 23)),
            candidate("Pete", date(7, 24)),
        ])
        .unwrap();

        assert_eq!(celebrations.len(), 2);
        assert_eq!(celebrations[0].date, date(7, 23));
        assert_eq!(celebrations[0].attendees, vec!["Alex", "Jen"]);
        assert_eq!(celebrations[1].date, date(7, 25));
        assert_eq!(celebrations[1].size, CakeSize::Small);
    }

    #[test]
    fn postponement_skips_the_weekend_and_shares_an_occupied_day() {
        // Wed+Thu merge onto Thu, Fri is reserved, so Carol moves to Monday
        // where Dan already has a candidate date.
        let celebrations = resolve(&[
            candidate("Ann", date(7, 23)),
            candidate("Ben", date(7, 24)),
            candidate("Carol", date(7, 25)),
            candidate("Dan", date(7, 28)),
        ])
        .unwrap();

        assert_eq!(celebrations.len(), 2);
        assert_eq!(celebrations[0].date, date(7, 24));
        assert_eq!(celebrations[1].date, date(7, 28));
        assert_eq!(celebrations[1].attendees, vec!["Carol", "Dan"]);
        assert_eq!(celebrations[1].size, CakeSize::Large);
    }

    #[test]
    fn reserved_day_without_a_neighbour_moves_to_the_next_free_day() {
        let celebrations = resolve(&[
            candidate("Ann", date(7, 14)),
            candidate("Ben", date(7, 15)),
            candidate("Cat", date(7, 16)),
        ])
        .unwrap();

        assert_eq!(celebrations.len(), 2);
        assert_eq!(celebrations[0].date, date(7, 15));
        assert_eq!(celebrations[0].attendees, vec!["Ann", "Ben"]);
        assert_eq!(celebrations[1].date, date(7, 17));
        assert_eq!(celebrations[1].attendees, vec!["Cat"]);
    }

    #[test]
    fn merge_ignores_reservations_on_the_later_day() {
        // Carol is pushed to Monday, reserving Tuesday. Dan and Eve still
        // merge onto that reserved Tuesday.
        let celebrations = resolve(&[
            candidate("Ann", date(7, 23)),
            candidate("Ben", date(7, 24)),
            candidate("Carol", date(7, 25)),
            candidate("Dan", date(7, 28)),
            candidate("Eve", date(7, 29)),
        ])
        .unwrap();

        let dates: Vec<NaiveDate> = celebrations.iter().map(|c| c.date).collect();
        assert_eq!(dates, vec![date(7, 24), date(7, 28), date(7, 29)]);
        assert_eq!(celebrations[1].attendees, vec!["Carol"]);
        assert_eq!(celebrations[2].attendees, vec!["Dan", "Eve"]);
    }

    #[test]
    fn output_dates_are_ascending_and_never_adjacent() {
        let mut candidates = Vec::new();
        let mut day = date(1, 2);
        let mut index = 0;
        while day < date(12, 20) {
            if index % 3 != 2 {
                candidates.push(candidate(&format!("p{index}"), day));
            }
            index += 1;
            day = WorkCalendar::default().next_working_day_after(day).unwrap();
        }

        let celebrations = resolve(&candidates).unwrap();

        for pair in celebrations.windows(2) {
            assert!((pair[1].date - pair[0].date).num_days() >= 2, "{pair:?}");
        }
        for celebration in &celebrations {
            assert_eq!(celebration.size == CakeSize::Large, celebration.attendees.len() > 1);
        }
        let total: usize = celebrations.iter().map(|c| c.attendees.len()).sum();
        assert_eq!(total, candidates.len());
    }

    #[test]
    fn postponement_stops_at_the_step_limit() {
        let calendar = WorkCalendar::default();
        let mut reserved = BTreeSet::new();
        let mut day = date(1, 1);
        for _ in 0..(MAX_POSTPONEMENT_STEPS * 2) {
            reserved.insert(day);
            day = day.succ_opt().unwrap();
        }

        let err = postpone(&calendar, date(1, 1), &reserved).unwrap_err();
        assert_eq!(err, ScheduleError::PostponementExhausted { from: date(1, 1) });
    }
}
