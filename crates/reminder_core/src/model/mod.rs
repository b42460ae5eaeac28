//! Reminder domain model.
//!
//! # Responsibility
//! - Define the reminder record and the raw form input it is built from.
//! - Parse and normalize user-entered dates and times.
//!
//! # Invariants
//! - Every stored reminder is identified by a store-assigned `ReminderId`.
//! - Times are minute-precision and formatted as zero-padded `HH:MM`.

pub mod proximity;
pub mod reminder;
pub mod slot;
