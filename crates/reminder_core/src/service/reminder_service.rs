//! Reminder lifecycle orchestration.
//!
//! # Responsibility
//! - Sequence input parsing, overlap validation and store mutation for each
//!   user action.
//! - Own the session state: the list projection and the open edit, if any.
//!
//! # Invariants
//! - Create and full edit are re-validated against a fresh store read at the
//!   moment of the write; earlier checks are never trusted.
//! - The completed toggle never touches date/time fields and skips validation.
//! - Delete only reaches the store after an explicit confirmation.
//! - Every successful mutation is followed by a full projection refresh.
//! - Failed store calls leave the projection at its last known-good value.

use super::confirmation::{ConfirmationGate, ConfirmationRequest};
use super::projection::ReminderProjection;
use crate::model::reminder::{
    Reminder, ReminderDraft, ReminderFields, ReminderId, ReminderValidationError,
};
use crate::repo::reminder_repo::{RepoError, ReminderRepository};
use crate::validator::{validate, OverlapDecision, RejectReason};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Service error for reminder use-cases.
#[derive(Debug)]
pub enum ReminderServiceError {
    /// Form input could not be parsed.
    InvalidInput(ReminderValidationError),
    /// End time is not after start time.
    InvalidRange,
    /// Slot intersects another reminder on the same date.
    Overlap { conflicting_id: ReminderId },
    /// Target reminder does not exist (any more).
    NotFound(ReminderId),
    /// An edit was submitted while no edit session is open.
    NoEditInProgress,
    /// Any failed store read or write.
    StoreUnavailable(RepoError),
}

impl ReminderServiceError {
    /// `true` for errors the user fixes by correcting form input.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::InvalidRange | Self::Overlap { .. }
        )
    }

    fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidRange => "invalid_range",
            Self::Overlap { .. } => "overlap",
            Self::NotFound(_) => "not_found",
            Self::NoEditInProgress => "no_edit_in_progress",
            Self::StoreUnavailable(_) => "store_unavailable",
        }
    }
}

impl Display for ReminderServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "{err}"),
            Self::InvalidRange => write!(f, "end time must be after start time"),
            Self::Overlap { conflicting_id } => {
                write!(f, "time slot overlaps reminder {conflicting_id}")
            }
            Self::NotFound(id) => write!(f, "reminder not found: {id}"),
            Self::NoEditInProgress => write!(f, "no reminder is being edited"),
            Self::StoreUnavailable(err) => write!(f, "reminder store unavailable: {err}"),
        }
    }
}

impl Error for ReminderServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::StoreUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ReminderValidationError> for ReminderServiceError {
    fn from(value: ReminderValidationError) -> Self {
        Self::InvalidInput(value)
    }
}

impl From<RepoError> for ReminderServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::StoreUnavailable(other),
        }
    }
}

impl From<RejectReason> for ReminderServiceError {
    fn from(value: RejectReason) -> Self {
        match value {
            RejectReason::InvalidRange => Self::InvalidRange,
            RejectReason::Overlap { conflicting_id } => Self::Overlap { conflicting_id },
        }
    }
}

pub type ServiceResult<T> = Result<T, ReminderServiceError>;

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// Confirmation was declined or dismissed; nothing was sent to the store.
    Cancelled,
}

/// Reminder currently open in the edit overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub reminder_id: ReminderId,
}

/// Lifecycle service over a reminder repository.
pub struct ReminderService<R: ReminderRepository> {
    repo: R,
    projection: ReminderProjection,
    edit: Option<EditSession>,
}

impl<R: ReminderRepository> ReminderService<R> {
    /// Creates a service with an empty projection; call [`refresh`](Self::refresh)
    /// to load the current list.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            projection: ReminderProjection::default(),
            edit: None,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Read-only view of the last fetched list.
    pub fn projection(&self) -> &ReminderProjection {
        &self.projection
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    /// Validates and stores a new reminder, then refreshes the projection.
    ///
    /// # Errors
    /// - `InvalidInput`, `InvalidRange` or `Overlap` without touching the store
    ///   beyond the same-date read.
    /// - `StoreUnavailable` when the read or the write fails.
    pub fn create_reminder(&mut self, draft: &ReminderDraft) -> ServiceResult<ReminderId> {
        let started_at = Instant::now();
        let result = self.try_create(draft);
        log_outcome("reminder_create", started_at, &result);
        let id = result?;

        self.refresh_after_write();
        Ok(id)
    }

    /// Re-validates `draft` against every other reminder and writes it to `id`.
    ///
    /// `completed` and the creation timestamp are preserved.
    pub fn update_reminder(&mut self, id: &str, draft: &ReminderDraft) -> ServiceResult<()> {
        let started_at = Instant::now();
        let result = self.try_update(id, draft);
        log_outcome("reminder_update", started_at, &result);
        result?;

        self.refresh_after_write();
        Ok(())
    }

    /// Opens the edit overlay for `id` and returns the prefilled form.
    ///
    /// Looks in the projection first and falls back to the store.
    pub fn begin_edit(&mut self, id: &str) -> ServiceResult<ReminderDraft> {
        let draft = match self.projection.get(id) {
            Some(reminder) => reminder.to_draft(),
            None => self
                .repo
                .get_reminder(id)?
                .ok_or_else(|| ReminderServiceError::NotFound(id.to_string()))?
                .to_draft(),
        };
        self.edit = Some(EditSession {
            reminder_id: id.to_string(),
        });
        Ok(draft)
    }

    /// Closes the edit overlay without writing anything.
    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Submits the open edit.
    ///
    /// Input and scheduling rejections keep the session open so the user can
    /// correct the form; success and store failures close it.
    pub fn submit_edit(&mut self, draft: &ReminderDraft) -> ServiceResult<()> {
        let id = match &self.edit {
            Some(session) => session.reminder_id.clone(),
            None => return Err(ReminderServiceError::NoEditInProgress),
        };

        let result = self.update_reminder(&id, draft);
        match &result {
            Err(err) if err.is_input_error() => {}
            _ => self.edit = None,
        }
        result
    }

    /// Sets the completed flag; no overlap validation is involved.
    pub fn toggle_completed(&mut self, id: &str, completed: bool) -> ServiceResult<()> {
        let started_at = Instant::now();
        let result = self
            .repo
            .set_completed(id, completed)
            .map_err(ReminderServiceError::from);
        log_outcome("reminder_toggle", started_at, &result);
        result?;

        self.refresh_after_write();
        Ok(())
    }

    /// Deletes `id` once `gate` confirms.
    ///
    /// Declined or dismissed confirmations return `Cancelled` and never reach
    /// the store.
    pub fn delete_reminder(
        &mut self,
        id: &str,
        gate: &mut impl ConfirmationGate,
    ) -> ServiceResult<DeleteOutcome> {
        let title = self.projection.get(id).map(|reminder| reminder.title.as_str());
        let decision = gate.request(&ConfirmationRequest::delete(id, title));
        if !decision.is_confirmed() {
            info!("event=reminder_delete module=service status=cancelled decision={decision:?}");
            return Ok(DeleteOutcome::Cancelled);
        }

        let started_at = Instant::now();
        let result = self
            .repo
            .delete_reminder(id)
            .map_err(ReminderServiceError::from);
        log_outcome("reminder_delete", started_at, &result);
        result?;

        if self
            .edit
            .as_ref()
            .is_some_and(|session| session.reminder_id == id)
        {
            self.edit = None;
        }
        self.refresh_after_write();
        Ok(DeleteOutcome::Deleted)
    }

    /// Re-reads the full ordered list and replaces the projection wholesale.
    ///
    /// On failure the previous items are kept and the projection is marked
    /// stale.
    pub fn refresh(&mut self) -> ServiceResult<&ReminderProjection> {
        let started_at = Instant::now();
        match self.repo.list_reminders() {
            Ok(items) => {
                info!(
                    "event=projection_refresh module=service status=ok count={} duration_ms={}",
                    items.len(),
                    started_at.elapsed().as_millis()
                );
                self.projection.replace(items);
                Ok(&self.projection)
            }
            Err(err) => {
                warn!(
                    "event=projection_refresh module=service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                self.projection.mark_stale();
                Err(ReminderServiceError::StoreUnavailable(err))
            }
        }
    }

    fn try_create(&self, draft: &ReminderDraft) -> ServiceResult<ReminderId> {
        let fields = draft.parse()?;
        self.check_slot(&fields, None)?;
        Ok(self.repo.create_reminder(&fields)?)
    }

    fn try_update(&self, id: &str, draft: &ReminderDraft) -> ServiceResult<()> {
        let fields = draft.parse()?;
        self.check_slot(&fields, Some(id))?;
        Ok(self.repo.update_reminder(id, &fields)?)
    }

    /// Validates against a fresh same-date read, never against the projection.
    fn check_slot(&self, fields: &ReminderFields, exclude_id: Option<&str>) -> ServiceResult<()> {
        let candidate = fields.slot();
        if !candidate.has_valid_range() {
            return Err(ReminderServiceError::InvalidRange);
        }

        let same_day: Vec<Reminder> = self
            .repo
            .reminders_on_date(fields.date)
            .map_err(ReminderServiceError::StoreUnavailable)?;
        match validate(&candidate, &same_day, exclude_id) {
            OverlapDecision::Accept => Ok(()),
            OverlapDecision::Reject(reason) => Err(reason.into()),
        }
    }

    fn refresh_after_write(&mut self) {
        if let Err(err) = self.refresh() {
            warn!(
                "event=projection_refresh module=service status=stale error_code={} after=write",
                err.code()
            );
        }
    }
}

fn log_outcome<T>(event: &str, started_at: Instant, result: &ServiceResult<T>) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(_) => info!("event={event} module=service status=ok duration_ms={duration_ms}"),
        Err(err) if err.is_input_error() => info!(
            "event={event} module=service status=rejected reason={} duration_ms={duration_ms}",
            err.code()
        ),
        Err(err) => warn!(
            "event={event} module=service status=error error_code={} duration_ms={duration_ms} error={err}",
            err.code()
        ),
    }
}
