//! Locally held copy of the ordered reminder list.
//!
//! # Invariants
//! - Only a full refresh replaces the item list; it is never patched.
//! - A failed refresh keeps the last known-good items and marks them stale.

use crate::model::proximity::Proximity;
use crate::model::reminder::Reminder;
use chrono::NaiveDate;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderProjection {
    items: Vec<Reminder>,
    stale: bool,
    generation: u64,
}

impl ReminderProjection {
    /// Reminders ordered by `(date, startTime)`.
    pub fn items(&self) -> &[Reminder] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `true` when the latest refresh attempt failed.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Number of successful refreshes so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get(&self, id: &str) -> Option<&Reminder> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn on_date(&self, date: NaiveDate) -> impl Iterator<Item = &Reminder> + '_ {
        self.items.iter().filter(move |item| item.date == date)
    }

    /// Open reminders happening the day after `today`.
    pub fn due_tomorrow(&self, today: NaiveDate) -> Vec<&Reminder> {
        self.items
            .iter()
            .filter(|item| !item.completed && item.proximity(today) == Proximity::Tomorrow)
            .collect()
    }

    pub(crate) fn replace(&mut self, items: Vec<Reminder>) {
        self.items = items;
        self.stale = false;
        self.generation += 1;
    }

    pub(crate) fn mark_stale(&mut self) {
        self.stale = true;
    }
}

#[cfg(test)]
mod tests {
    use super::ReminderProjection;
    use crate::model::reminder::{Reminder, ReminderDraft};
    use chrono::{NaiveDate, Utc};

    fn reminder(id: &str, date: &str, completed: bool) -> Reminder {
        let fields = ReminderDraft::new(id, "", date, "10:00", "11:00")
            .parse()
            .unwrap();
        Reminder::from_fields(id.to_string(), fields, completed, Utc::now())
    }

    #[test]
    fn replace_clears_stale_flag_and_bumps_generation() {
        let mut projection = ReminderProjection::default();
        projection.mark_stale();
        projection.replace(vec![reminder("a", "2024-06-01", false)]);
        assert!(!projection.is_stale());
        assert_eq!(projection.generation(), 1);
        assert_eq!(projection.len(), 1);
    }

    #[test]
    fn mark_stale_keeps_items() {
        let mut projection = ReminderProjection::default();
        projection.replace(vec![reminder("a", "2024-06-01", false)]);
        projection.mark_stale();
        assert!(projection.is_stale());
        assert!(projection.get("a").is_some());
    }

    #[test]
    fn due_tomorrow_skips_completed_and_other_days() {
        let mut projection = ReminderProjection::default();
        projection.replace(vec![
            reminder("today", "2024-06-10", false),
            reminder("open", "2024-06-11", false),
            reminder("done", "2024-06-11", true),
            reminder("later", "2024-06-12", false),
        ]);
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let due: Vec<_> = projection
            .due_tomorrow(today)
            .into_iter()
            .map(|item| item.id.as_str())
            .collect();
        assert_eq!(due, vec!["open"]);
    }
}
