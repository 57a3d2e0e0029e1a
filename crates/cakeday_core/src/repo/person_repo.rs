//! People directory contract and SQLite implementation.
//!
//! # Invariants
//! - A person is stored at most once per `(name, date_of_birth)` pair.
//! - Listing returns people in first-insertion order.
//! - A batch import is written in one transaction: all of it or none of it.

use super::{ensure_connection_ready, RepoError, RepoResult};
use crate::model::person::Person;
use chrono::NaiveDate;
use log::info;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const DATE_FORMAT: &str = "%Y-%m-%d";
const INSERT_IF_ABSENT_SQL: &str =
    "INSERT OR IGNORE INTO people (name, date_of_birth) VALUES (?1, ?2);";

/// Repository interface for the people directory.
pub trait PersonRepository {
    /// Inserts `person` unless the same name and date of birth already exist.
    ///
    /// Returns `true` when a new row was written.
    fn insert_if_absent(&self, person: &Person) -> RepoResult<bool>;
    /// Inserts every absent person of `people` atomically.
    ///
    /// Returns how many new rows were written. On error nothing is stored.
    fn insert_all_if_absent(&self, people: &[Person]) -> RepoResult<usize>;
    fn list_people(&self) -> RepoResult<Vec<Person>>;
    fn count_people(&self) -> RepoResult<u64>;
}

/// SQLite-backed people directory.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    /// Creates a repository after checking the connection schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "people")?;
        Ok(Self { conn })
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn insert_if_absent(&self, person: &Person) -> RepoResult<bool> {
        person.validate()?;

        let changed = self.conn.execute(
            INSERT_IF_ABSENT_SQL,
            params![
                person.name.as_str(),
                person.date_of_birth.format(DATE_FORMAT).to_string(),
            ],
        )?;

        Ok(changed == 1)
    }

    fn insert_all_if_absent(&self, people: &[Person]) -> RepoResult<usize> {
        for person in people {
            person.validate()?;
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut added = 0;
        {
            let mut stmt = tx.prepare(INSERT_IF_ABSENT_SQL)?;
            for person in people {
                added += stmt.execute(params![
                    person.name.as_str(),
                    person.date_of_birth.format(DATE_FORMAT).to_string(),
                ])?;
            }
        }
        tx.commit()?;

        info!(
            "event=people_import module=repo status=ok rows={} added={}",
            people.len(),
            added
        );
        Ok(added)
    }

    fn list_people(&self) -> RepoResult<Vec<Person>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, date_of_birth FROM people ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut people = Vec::new();

        while let Some(row) = rows.next()? {
            people.push(parse_person_row(row)?);
        }

        Ok(people)
    }

    fn count_people(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM people;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative people count `{count}`")))
    }
}

fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    let date_text: String = row.get("date_of_birth")?;
    let date_of_birth = NaiveDate::parse_from_str(&date_text, DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid date `{date_text}` in people.date_of_birth"
        ))
    })?;

    let person = Person {
        name: row.get("name")?,
        date_of_birth,
    };
    person.validate()?;
    Ok(person)
}
