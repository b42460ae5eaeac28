//! Core reminder logic.
//! This crate is the single source of truth for scheduling invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;
pub mod validator;

pub use config::{ConfigError, StoreConfig, DEFAULT_APP_ID};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::proximity::Proximity;
pub use model::reminder::{
    Reminder, ReminderDraft, ReminderFields, ReminderId, ReminderValidationError, TimeField,
};
pub use model::slot::TimeSlot;
pub use repo::reminder_repo::{
    DocumentReminderRepository, ReminderRepository, RepoError, RepoResult,
};
pub use service::confirmation::{
    ConfirmationDecision, ConfirmationGate, ConfirmationRequest, FixedDecision,
};
pub use service::projection::ReminderProjection;
pub use service::reminder_service::{
    DeleteOutcome, EditSession, ReminderService, ReminderServiceError, ServiceResult,
};
pub use store::{
    DocumentStore, FailureBehaviour, InMemoryDocumentStore, SqliteDocumentStore, StoreError,
    StoreOperation,
};
pub use validator::{validate, OverlapDecision, RejectReason};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
