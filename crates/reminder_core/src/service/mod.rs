//! Reminder use-case services.
//!
//! # Responsibility
//! - Orchestrate validation and repository calls into user-level actions.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod confirmation;
pub mod projection;
pub mod reminder_service;
