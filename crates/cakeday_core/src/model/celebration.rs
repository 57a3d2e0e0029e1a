//! Celebration (cake day) model.
//!
//! # Invariants
//! - `attendees` is non-empty.
//! - `size == CakeSize::Large` iff more than one attendee shares the day.
//!
//! Construct through [`Celebration::new`] so the size always follows the
//! attendee count.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Cake size for one celebration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CakeSize {
    /// One person celebrates.
    Small,
    /// Two or more people share the cake.
    Large,
}

impl CakeSize {
    /// Classifies a celebration by attendee count.
    pub fn for_attendees(count: usize) -> Self {
        if count > 1 {
            Self::Large
        } else {
            Self::Small
        }
    }

    /// Stable lowercase identifier used on the wire and in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Large => "large",
        }
    }

    /// Parses a stable identifier produced by [`CakeSize::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "small" => Some(Self::Small),
            "large" => Some(Self::Large),
            _ => None,
        }
    }
}

impl Display for CakeSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A finalized cake day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Celebration {
    pub date: NaiveDate,
    pub size: CakeSize,
    /// Serialized as `names` to match the calendar output shape.
    #[serde(rename = "names")]
    pub attendees: Vec<String>,
}

/// Validation errors for [`Celebration`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CelebrationValidationError {
    NoAttendees(NaiveDate),
    SizeMismatch {
        date: NaiveDate,
        size: CakeSize,
        attendees: usize,
    },
}

impl Display for CelebrationValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoAttendees(date) => write!(f, "celebration on {date} has no attendees"),
            Self::SizeMismatch {
                date,
                size,
                attendees,
            } => write!(
                f,
                "celebration on {date} is `{size}` but has {attendees} attendee(s)"
            ),
        }
    }
}

impl Error for CelebrationValidationError {}

impl Celebration {
    /// Creates a celebration classified by its attendee count.
    pub fn new(date: NaiveDate, attendees: Vec<String>) -> Self {
        Self {
            date,
            size: CakeSize::for_attendees(attendees.len()),
            attendees,
        }
    }

    pub fn validate(&self) -> Result<(), CelebrationValidationError> {
        if self.attendees.is_empty() {
            return Err(CelebrationValidationError::NoAttendees(self.date));
        }
        if self.size != CakeSize::for_attendees(self.attendees.len()) {
            return Err(CelebrationValidationError::SizeMismatch {
                date: self.date,
                size: self.size,
                attendees: self.attendees.len(),
            });
        }
        Ok(())
    }
}
