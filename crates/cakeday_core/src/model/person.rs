//! Person directory record.
//!
//! # Invariants
//! - `name` is trimmed and non-blank.
//! - A person is identified by the `(name, date_of_birth)` pair; two records
//!   with the same pair describe the same person.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One known person with a date of birth.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    /// Serialized as ISO-8601 `YYYY-MM-DD`.
    pub date_of_birth: NaiveDate,
}

/// Validation errors for [`Person`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonValidationError {
    BlankName,
}

impl Display for PersonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "person name must not be blank"),
        }
    }
}

impl Error for PersonValidationError {}

impl Person {
    /// Creates a validated person, trimming surrounding whitespace from `name`.
    pub fn new(
        name: impl Into<String>,
        date_of_birth: NaiveDate,
    ) -> Result<Self, PersonValidationError> {
        let person = Self {
            name: name.into().trim().to_string(),
            date_of_birth,
        };
        person.validate()?;
        Ok(person)
    }

    pub fn validate(&self) -> Result<(), PersonValidationError> {
        if self.name.trim().is_empty() {
            return Err(PersonValidationError::BlankName);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Person, PersonValidationError};
    use chrono::NaiveDate;

    fn dob() -> NaiveDate {
        NaiveDate::from_ymd_opt(1986, 6, 13).unwrap()
    }

    #[test]
    fn new_trims_name() {
        let person = Person::new("  Dave ", dob()).unwrap();
        assert_eq!(person.name, "Dave");
    }

    #[test]
    fn new_rejects_blank_name() {
        assert_eq!(
            Person::new(" \t", dob()).unwrap_err(),
            PersonValidationError::BlankName
        );
    }
}
