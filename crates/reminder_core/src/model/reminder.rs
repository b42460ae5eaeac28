//! Reminder record and form input.
//!
//! # Invariants
//! - `title` is never empty after trimming.
//! - `completed` starts as `false` and only changes through the toggle.
//! - `created_at` is audit metadata; it never takes part in ordering.

use super::proximity::Proximity;
use super::slot::{self, format_date, format_time, parse_date, parse_time, TimeSlot};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque, store-assigned reminder identifier.
pub type ReminderId = String;

/// User-editable reminder fields, already parsed.
///
/// Serialized with the camelCase field names used by reminder documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderFields {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(with = "slot::hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "slot::hhmm")]
    pub end_time: NaiveTime,
}

impl ReminderFields {
    pub fn slot(&self) -> TimeSlot {
        TimeSlot::new(self.date, self.start_time, self.end_time)
    }
}

/// A stored reminder as seen by the list projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub id: ReminderId,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Reminder {
    pub fn from_fields(
        id: ReminderId,
        fields: ReminderFields,
        completed: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: fields.title,
            description: fields.description,
            date: fields.date,
            start_time: fields.start_time,
            end_time: fields.end_time,
            completed,
            created_at,
        }
    }

    pub fn slot(&self) -> TimeSlot {
        TimeSlot::new(self.date, self.start_time, self.end_time)
    }

    /// Copies the user-editable part of this reminder.
    pub fn fields(&self) -> ReminderFields {
        ReminderFields {
            title: self.title.clone(),
            description: self.description.clone(),
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }

    /// Builds a form draft prefilled with this reminder's values.
    pub fn to_draft(&self) -> ReminderDraft {
        ReminderDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            date: format_date(self.date),
            start_time: format_time(self.start_time),
            end_time: format_time(self.end_time),
        }
    }

    pub fn proximity(&self, today: NaiveDate) -> Proximity {
        Proximity::classify(self.date, today)
    }
}

/// Raw form input for creating or editing a reminder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderDraft {
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM`.
    pub start_time: String,
    /// `HH:MM`.
    pub end_time: String,
}

impl ReminderDraft {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        date: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            date: date.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }

    /// Parses the draft into typed fields.
    ///
    /// Title is trimmed; description is kept verbatim. The time range is not
    /// checked here, see [`crate::validator::validate`].
    ///
    /// # Errors
    /// Returns the first field that fails, in form order.
    pub fn parse(&self) -> Result<ReminderFields, ReminderValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ReminderValidationError::EmptyTitle);
        }
        let date = parse_date(&self.date)
            .ok_or_else(|| ReminderValidationError::InvalidDate(self.date.clone()))?;
        let start_time =
            parse_time(&self.start_time).ok_or_else(|| ReminderValidationError::InvalidTime {
                field: TimeField::Start,
                raw: self.start_time.clone(),
            })?;
        let end_time =
            parse_time(&self.end_time).ok_or_else(|| ReminderValidationError::InvalidTime {
                field: TimeField::End,
                raw: self.end_time.clone(),
            })?;

        Ok(ReminderFields {
            title: title.to_string(),
            description: self.description.clone(),
            date,
            start_time,
            end_time,
        })
    }
}

/// Which time input of the form was malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    Start,
    End,
}

impl TimeField {
    /// Document field name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "startTime",
            Self::End => "endTime",
        }
    }
}

/// Form input rejected before any store access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderValidationError {
    EmptyTitle,
    InvalidDate(String),
    InvalidTime { field: TimeField, raw: String },
}

impl Display for ReminderValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::InvalidDate(raw) => write!(f, "date must be YYYY-MM-DD, got `{raw}`"),
            Self::InvalidTime { field, raw } => {
                write!(f, "{} must be HH:MM, got `{raw}`", field.as_str())
            }
        }
    }
}

impl Error for ReminderValidationError {}
