//! Celebration calendar contract and SQLite implementation.
//!
//! # Invariants
//! - Rows are keyed by the year they were computed for, so a cake rolled
//!   into early January still belongs to the previous year's calendar.
//! - `replace_year` swaps a year's rows in one immediate transaction.
//! - Reads are ordered by date ascending; attendee order is preserved.

use super::{ensure_connection_ready, RepoError, RepoResult};
use crate::model::celebration::{CakeSize, Celebration};
use chrono::NaiveDate;
use log::info;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Repository interface for computed celebrations.
pub trait CelebrationRepository {
    /// Replaces every stored celebration of `year` with `celebrations`.
    fn replace_year(&self, year: i32, celebrations: &[Celebration]) -> RepoResult<()>;
    /// Lists celebrations of `year` ordered by date ascending.
    fn list_for_year(&self, year: i32) -> RepoResult<Vec<Celebration>>;
}

/// SQLite-backed celebration calendar.
pub struct SqliteCelebrationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCelebrationRepository<'conn> {
    /// Creates a repository after checking the connection schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "celebrations")?;
        Ok(Self { conn })
    }
}

impl CelebrationRepository for SqliteCelebrationRepository<'_> {
    fn replace_year(&self, year: i32, celebrations: &[Celebration]) -> RepoResult<()> {
        for celebration in celebrations {
            celebration.validate()?;
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let removed = tx.execute("DELETE FROM celebrations WHERE year = ?1;", [year])?;

        for celebration in celebrations {
            let names = serde_json::to_string(&celebration.attendees).map_err(|err| {
                RepoError::InvalidData(format!("cannot encode celebration names: {err}"))
            })?;
            tx.execute(
                "INSERT INTO celebrations (year, date, cake_size, names)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    year,
                    celebration.date.format(DATE_FORMAT).to_string(),
                    celebration.size.as_str(),
                    names,
                ],
            )?;
        }
        tx.commit()?;

        info!(
            "event=calendar_replace module=repo status=ok year={} removed={} inserted={}",
            year,
            removed,
            celebrations.len()
        );
        Ok(())
    }

    fn list_for_year(&self, year: i32) -> RepoResult<Vec<Celebration>> {
        let mut stmt = self.conn.prepare(
            "SELECT date, cake_size, names
             FROM celebrations
             WHERE year = ?1
             ORDER BY date ASC, id ASC;",
        )?;
        let mut rows = stmt.query([year])?;
        let mut celebrations = Vec::new();

        while let Some(row) = rows.next()? {
            celebrations.push(parse_celebration_row(row)?);
        }

        Ok(celebrations)
    }
}

fn parse_celebration_row(row: &Row<'_>) -> RepoResult<Celebration> {
    let date_text: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_text, DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!("invalid date `{date_text}` in celebrations.date"))
    })?;

    let size_text: String = row.get("cake_size")?;
    let size = CakeSize::parse(&size_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid cake size `{size_text}` in celebrations.cake_size"
        ))
    })?;

    let names_text: String = row.get("names")?;
    let attendees: Vec<String> = serde_json::from_str(&names_text).map_err(|err| {
        RepoError::InvalidData(format!("invalid names in celebrations.names: {err}"))
    })?;

    let celebration = Celebration {
        date,
        size,
        attendees,
    };
    celebration.validate()?;
    Ok(celebration)
}
