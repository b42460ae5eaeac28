//! Calendar date plus half-open time interval.

use chrono::{NaiveDate, NaiveTime};

/// Wire format for reminder dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Wire format for reminder times of day.
pub const TIME_FORMAT: &str = "%H:%M";

/// A `[start, end)` window on one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSlot {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    pub fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        Self { date, start, end }
    }

    /// Returns `true` when `end` is strictly after `start`.
    pub fn has_valid_range(&self) -> bool {
        self.start < self.end
    }

    /// Half-open intersection test; touching slots do not overlap.
    ///
    /// Slots on different dates never overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.date == other.date && self.start < other.end && self.end > other.start
    }
}

/// Parses a `YYYY-MM-DD` date, ignoring surrounding whitespace.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Parses an `HH:MM` time of day, ignoring surrounding whitespace.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Serde adapter keeping times as `HH:MM` strings in documents.
pub(crate) mod hhmm {
    use super::{format_time, parse_time};
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_time(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_time(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid HH:MM time `{raw}`")))
    }
}
