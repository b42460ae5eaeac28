//! Write-time scheduling checks.
//!
//! # Responsibility
//! - Decide whether a candidate slot may be written next to existing ones.
//!
//! # Invariants
//! - Decisions are pure: no store access, no logging, no clock reads.

mod overlap;

pub use overlap::{validate, OverlapDecision, RejectReason, Scheduled};
