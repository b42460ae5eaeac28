//! How close a reminder's date is to today.

use chrono::NaiveDate;

/// Calendar-day distance bucket used to highlight upcoming reminders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Proximity {
    Past,
    Today,
    /// Exactly one day ahead.
    Tomorrow,
    /// Two or three days ahead.
    Soon,
    Later,
}

impl Proximity {
    pub fn classify(date: NaiveDate, today: NaiveDate) -> Self {
        match (date - today).num_days() {
            days if days < 0 => Self::Past,
            0 => Self::Today,
            1 => Self::Tomorrow,
            2 | 3 => Self::Soon,
            _ => Self::Later,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Past => "past",
            Self::Today => "today",
            Self::Tomorrow => "tomorrow",
            Self::Soon => "soon",
            Self::Later => "later",
        }
    }
}
