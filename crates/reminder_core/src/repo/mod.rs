//! Reminder store adapter.
//!
//! # Responsibility
//! - Translate reminders to and from schemaless store documents.
//! - Keep collection paths and document field names inside one module.
//!
//! # Invariants
//! - Read paths reject undecodable documents instead of skipping them.
//! - Adapter APIs report missing ids as `NotFound`, separate from store
//!   transport failures.

pub mod reminder_repo;
