//! Half-open interval overlap validation.

use crate::model::reminder::{Reminder, ReminderId};
use crate::model::slot::TimeSlot;
use std::fmt::{Display, Formatter};

/// Anything occupying a slot under a stable id.
pub trait Scheduled {
    fn schedule_id(&self) -> &str;
    fn schedule_slot(&self) -> TimeSlot;
}

impl Scheduled for Reminder {
    fn schedule_id(&self) -> &str {
        &self.id
    }

    fn schedule_slot(&self) -> TimeSlot {
        self.slot()
    }
}

impl Scheduled for (ReminderId, TimeSlot) {
    fn schedule_id(&self) -> &str {
        &self.0
    }

    fn schedule_slot(&self) -> TimeSlot {
        self.1
    }
}

/// Why a candidate slot was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// End is not strictly after start.
    InvalidRange,
    /// Candidate intersects the slot held by `conflicting_id`.
    Overlap { conflicting_id: ReminderId },
}

impl Display for RejectReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRange => write!(f, "end time must be after start time"),
            Self::Overlap { conflicting_id } => {
                write!(f, "time slot overlaps reminder {conflicting_id}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlapDecision {
    Accept,
    Reject(RejectReason),
}

impl OverlapDecision {
    pub fn is_accept(&self) -> bool {
        matches!(self, Self::Accept)
    }
}

/// Checks `candidate` against `existing` slots.
///
/// Items on other dates and the item whose id equals `exclude_id` are
/// ignored, which lets an edit be re-validated against all *other* reminders.
/// The first intersecting item wins; the remaining items are not inspected.
pub fn validate<'a, T, I>(
    candidate: &TimeSlot,
    existing: I,
    exclude_id: Option<&str>,
) -> OverlapDecision
where
    T: Scheduled + 'a,
    I: IntoIterator<Item = &'a T>,
{
    if !candidate.has_valid_range() {
        return OverlapDecision::Reject(RejectReason::InvalidRange);
    }

    let conflict = existing
        .into_iter()
        .filter(|item| exclude_id != Some(item.schedule_id()))
        .find(|item| candidate.overlaps(&item.schedule_slot()));

    match conflict {
        Some(item) => OverlapDecision::Reject(RejectReason::Overlap {
            conflicting_id: item.schedule_id().to_string(),
        }),
        None => OverlapDecision::Accept,
    }
}

#[cfg(test)]
mod tests {
    use super::{validate, OverlapDecision, RejectReason};
    use crate::model::reminder::ReminderId;
    use crate::model::slot::{parse_date, parse_time, TimeSlot};

    fn slot(date: &str, start: &str, end: &str) -> TimeSlot {
        TimeSlot::new(
            parse_date(date).unwrap(),
            parse_time(start).unwrap(),
            parse_time(end).unwrap(),
        )
    }

    fn existing() -> Vec<(ReminderId, TimeSlot)> {
        vec![("r1".to_string(), slot("2024-06-01", "10:00", "11:00"))]
    }

    fn overlap_with(id: &str) -> OverlapDecision {
        OverlapDecision::Reject(RejectReason::Overlap {
            conflicting_id: id.to_string(),
        })
    }

    #[test]
    fn back_to_back_is_accepted() {
        let decision = validate(&slot("2024-06-01", "11:00", "12:00"), &existing(), None);
        assert_eq!(decision, OverlapDecision::Accept);

        let before = validate(&slot("2024-06-01", "09:00", "10:00"), &existing(), None);
        assert_eq!(before, OverlapDecision::Accept);
    }

    #[test]
    fn contained_slot_is_rejected() {
        let decision = validate(&slot("2024-06-01", "10:30", "10:45"), &existing(), None);
        assert_eq!(decision, overlap_with("r1"));
    }

    #[test]
    fn same_times_on_other_date_are_accepted() {
        let decision = validate(&slot("2024-06-02", "10:30", "10:45"), &existing(), None);
        assert!(decision.is_accept());
    }

    #[test]
    fn excluded_id_never_conflicts_with_itself() {
        let decision = validate(&slot("2024-06-01", "10:00", "11:00"), &existing(), Some("r1"));
        assert!(decision.is_accept());
    }

    #[test]
    fn exclusion_does_not_hide_other_conflicts() {
        let mut items = existing();
        items.push(("r2".to_string(), slot("2024-06-01", "10:30", "12:00")));
        let decision = validate(&slot("2024-06-01", "10:00", "11:00"), &items, Some("r1"));
        assert_eq!(decision, overlap_with("r2"));
    }

    #[test]
    fn empty_or_reversed_range_is_rejected_before_looking_at_data() {
        let empty: Vec<(ReminderId, TimeSlot)> = Vec::new();
        assert_eq!(
            validate(&slot("2024-06-01", "09:00", "09:00"), &empty, None),
            OverlapDecision::Reject(RejectReason::InvalidRange)
        );
        assert_eq!(
            validate(&slot("2024-06-01", "12:00", "10:30"), &existing(), None),
            OverlapDecision::Reject(RejectReason::InvalidRange)
        );
    }

    #[test]
    fn first_conflict_is_reported() {
        let items = vec![
            ("a".to_string(), slot("2024-06-01", "08:00", "09:00")),
            ("b".to_string(), slot("2024-06-01", "09:00", "10:00")),
            ("c".to_string(), slot("2024-06-01", "09:30", "11:00")),
        ];
        let decision = validate(&slot("2024-06-01", "08:30", "09:45"), &items, None);
        assert_eq!(decision, overlap_with("a"));
    }

    #[test]
    fn overlap_matches_half_open_rule_exhaustively_on_a_small_grid() {
        let hours = ["08:00", "09:00", "10:00", "11:00", "12:00"];
        for (i1, s1) in hours.iter().enumerate() {
            for e1 in &hours[i1 + 1..] {
                for (i2, s2) in hours.iter().enumerate() {
                    for e2 in &hours[i2 + 1..] {
                        let a = slot("2024-06-01", s1, e1);
                        let b = slot("2024-06-01", s2, e2);
                        let expected = a.start < b.end && a.end > b.start;
                        let items = vec![("b".to_string(), b)];
                        let decision = validate(&a, &items, None);
                        assert_eq!(!decision.is_accept(), expected, "{s1}-{e1} vs {s2}-{e2}");
                    }
                }
            }
        }
    }
}
