//! FFI use-case API for the reminder screen.
//!
//! # Responsibility
//! - Expose one sync function per user action to Dart via FRB.
//! - Turn every service outcome into a transient notice the UI can show.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Store settings are resolved once per process and never change afterwards.
//! - Delete only reaches the store when the caller passes an explicit `true`.
//!
//! # See also
//! - `reminder_core::service::reminder_service`

use chrono::Local;
use log::warn;
use reminder_core::db::open_db;
use reminder_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    ConfirmationDecision, DeleteOutcome, DocumentReminderRepository, FixedDecision, Reminder,
    ReminderDraft, ReminderService, ReminderServiceError, SqliteDocumentStore, StoreConfig,
};
use std::path::PathBuf;
use std::sync::OnceLock;

const ENTRY_DB_FILE_NAME: &str = "reminders_entry.sqlite3";
const ENTRY_DB_PATH_ENV: &str = "REMINDERS_DB_PATH";
static ENTRY_SETTINGS: OnceLock<EntrySettings> = OnceLock::new();

const MSG_ADDED: &str = "Reminder added successfully!";
const MSG_UPDATED: &str = "Reminder updated successfully!";
const MSG_STATUS_UPDATED: &str = "Reminder status updated.";
const MSG_DELETED: &str = "Reminder deleted successfully!";
const MSG_ADD_FAILED: &str = "Failed to add reminder. Please try again.";
const MSG_UPDATE_FAILED: &str = "Failed to update reminder. Please try again.";
const MSG_STATUS_FAILED: &str = "Failed to update reminder status.";
const MSG_DELETE_FAILED: &str = "Failed to delete reminder. Please try again.";
const MSG_LOAD_FAILED: &str =
    "Failed to load reminders. Please check your store connection and try again.";
const MSG_OVERLAP: &str =
    "Error: This time slot overlaps an existing reminder. Please choose a different time.";
const MSG_INVALID_RANGE: &str = "Error: End time must be after start time.";
const MSG_NOT_FOUND: &str = "Error: This reminder no longer exists.";
const MSG_NO_EDIT: &str = "Error: No reminder is being edited.";

#[derive(Debug, Clone, PartialEq, Eq)]
struct EntrySettings {
    db_path: PathBuf,
    config: StoreConfig,
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Pins the store location before the first reminder call.
///
/// Input semantics:
/// - `app_id`: blank falls back to `default-app-id`.
/// - `namespace`: optional collection prefix; blank means none.
/// - `db_path`: SQLite file; `None` keeps the env/temp-dir default.
///
/// # FFI contract
/// - Idempotent for identical settings.
/// - Returns an error once settings are active and differ from the request.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_store(app_id: String, namespace: String, db_path: Option<String>) -> String {
    let config = StoreConfig::new(&app_id).and_then(|config| config.with_namespace(&namespace));
    let config = match config {
        Ok(config) => config,
        Err(err) => return err.to_string(),
    };
    let db_path = match db_path.as_deref().map(str::trim) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => default_db_path(),
    };
    let requested = EntrySettings { db_path, config };

    let active = ENTRY_SETTINGS.get_or_init(|| requested.clone());
    if *active != requested {
        return format!(
            "store already configured: collection `{}` at `{}`",
            active.config.collection_path(),
            active.db_path.display()
        );
    }
    String::new()
}

/// Kind of transient notice shown after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryNoticeKind {
    Success,
    Update,
    Delete,
    Error,
}

/// User-facing message for the notice area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryNotice {
    pub kind: EntryNoticeKind,
    pub message: String,
}

impl EntryNotice {
    fn new(kind: EntryNoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Reminder row as rendered by the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryReminderItem {
    pub id: String,
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM`.
    pub start_time: String,
    /// `HH:MM`.
    pub end_time: String,
    pub completed: bool,
    /// `past|today|tomorrow|soon|later`, relative to the local date.
    pub proximity: String,
}

/// Response envelope for the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryListResponse {
    pub ok: bool,
    /// Ordered by date, then start time.
    pub items: Vec<EntryReminderItem>,
    pub notice: Option<EntryNotice>,
}

/// Response envelope for create/update/toggle/delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryActionResponse {
    /// Whether the store was changed.
    pub ok: bool,
    /// Reminder the action applied to, when it succeeded.
    pub reminder_id: Option<String>,
    /// `None` only for a cancelled delete.
    pub notice: Option<EntryNotice>,
}

impl EntryActionResponse {
    fn success(kind: EntryNoticeKind, message: &str, reminder_id: String) -> Self {
        Self {
            ok: true,
            reminder_id: Some(reminder_id),
            notice: Some(EntryNotice::new(kind, message)),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            reminder_id: None,
            notice: Some(EntryNotice::new(EntryNoticeKind::Error, message)),
        }
    }

    fn cancelled() -> Self {
        Self {
            ok: false,
            reminder_id: None,
            notice: None,
        }
    }
}

/// Creates a reminder from the add form.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns the new reminder id on success.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_create_reminder(
    title: String,
    description: String,
    date: String,
    start_time: String,
    end_time: String,
) -> EntryActionResponse {
    let draft = ReminderDraft::new(title, description, date, start_time, end_time);
    match with_reminder_service(|service| service.create_reminder(&draft)) {
        Ok(Ok(id)) => EntryActionResponse::success(EntryNoticeKind::Success, MSG_ADDED, id),
        Ok(Err(err)) => EntryActionResponse::failure(error_message(&err, MSG_ADD_FAILED)),
        Err(message) => open_failure("entry_create_reminder", message, MSG_ADD_FAILED),
    }
}

/// Lists every reminder ordered by date, then start time.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; a failed read returns an empty list with an error notice.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_list_reminders() -> EntryListResponse {
    let today = Local::now().date_naive();
    let result = with_reminder_service(|service| {
        service.refresh().map(|projection| {
            projection
                .items()
                .iter()
                .map(|reminder| to_entry_item(reminder, today))
                .collect::<Vec<_>>()
        })
    });
    match result {
        Ok(Ok(items)) => EntryListResponse {
            ok: true,
            items,
            notice: None,
        },
        Ok(Err(err)) => {
            warn!("event=entry_list module=ffi status=error error={err}");
            list_failure()
        }
        Err(message) => {
            warn!("event=entry_list module=ffi status=error error={message}");
            list_failure()
        }
    }
}

/// Submits the edit form for `id`.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - The reminder must still exist; its completed flag is preserved.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_update_reminder(
    id: String,
    title: String,
    description: String,
    date: String,
    start_time: String,
    end_time: String,
) -> EntryActionResponse {
    let draft = ReminderDraft::new(title, description, date, start_time, end_time);
    let result = with_reminder_service(|service| {
        service
            .begin_edit(&id)
            .and_then(|_| service.submit_edit(&draft))
    });
    match result {
        Ok(Ok(())) => EntryActionResponse::success(EntryNoticeKind::Update, MSG_UPDATED, id),
        Ok(Err(err)) => EntryActionResponse::failure(error_message(&err, MSG_UPDATE_FAILED)),
        Err(message) => open_failure("entry_update_reminder", message, MSG_UPDATE_FAILED),
    }
}

/// Sets the completed flag of `id`.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_toggle_completed(id: String, completed: bool) -> EntryActionResponse {
    match with_reminder_service(|service| service.toggle_completed(&id, completed)) {
        Ok(Ok(())) => {
            EntryActionResponse::success(EntryNoticeKind::Update, MSG_STATUS_UPDATED, id)
        }
        Ok(Err(err)) => EntryActionResponse::failure(error_message(&err, MSG_STATUS_FAILED)),
        Err(message) => open_failure("entry_toggle_completed", message, MSG_STATUS_FAILED),
    }
}

/// Deletes `id` after the UI asked the user.
///
/// Input semantics:
/// - `confirmed`: `Some(true)` confirmed, `Some(false)` declined, `None`
///   dismissed.
///
/// # FFI contract
/// - Sync call; the store is only opened when confirmed.
/// - Declined or dismissed requests return `ok=false` without a notice.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_delete_reminder(id: String, confirmed: Option<bool>) -> EntryActionResponse {
    let mut gate = FixedDecision(ConfirmationDecision::from_answer(confirmed));
    if !gate.0.is_confirmed() {
        return EntryActionResponse::cancelled();
    }

    match with_reminder_service(|service| service.delete_reminder(&id, &mut gate)) {
        Ok(Ok(DeleteOutcome::Deleted)) => {
            EntryActionResponse::success(EntryNoticeKind::Delete, MSG_DELETED, id)
        }
        Ok(Ok(DeleteOutcome::Cancelled)) => EntryActionResponse::cancelled(),
        Ok(Err(err)) => EntryActionResponse::failure(error_message(&err, MSG_DELETE_FAILED)),
        Err(message) => open_failure("entry_delete_reminder", message, MSG_DELETE_FAILED),
    }
}

fn default_db_path() -> PathBuf {
    if let Ok(raw) = std::env::var(ENTRY_DB_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(ENTRY_DB_FILE_NAME)
}

fn resolve_entry_settings() -> &'static EntrySettings {
    ENTRY_SETTINGS.get_or_init(|| EntrySettings {
        db_path: default_db_path(),
        config: StoreConfig::default(),
    })
}

type EntryService<'conn> = ReminderService<DocumentReminderRepository<SqliteDocumentStore<'conn>>>;

/// Runs `f` against a service over a freshly opened store.
///
/// The outer `Err` carries store-open failures; the inner result is the
/// service outcome.
fn with_reminder_service<T>(f: impl FnOnce(&mut EntryService<'_>) -> T) -> Result<T, String> {
    let settings = resolve_entry_settings();
    let conn = open_db(&settings.db_path).map_err(|err| format!("entry DB open failed: {err}"))?;
    let repo = DocumentReminderRepository::new(SqliteDocumentStore::new(&conn), &settings.config);
    let mut service = ReminderService::new(repo);
    Ok(f(&mut service))
}

fn error_message(err: &ReminderServiceError, store_failure: &str) -> String {
    match err {
        ReminderServiceError::InvalidInput(inner) => format!("Error: {inner}"),
        ReminderServiceError::InvalidRange => MSG_INVALID_RANGE.to_string(),
        ReminderServiceError::Overlap { .. } => MSG_OVERLAP.to_string(),
        ReminderServiceError::NotFound(_) => MSG_NOT_FOUND.to_string(),
        ReminderServiceError::NoEditInProgress => MSG_NO_EDIT.to_string(),
        ReminderServiceError::StoreUnavailable(_) => store_failure.to_string(),
    }
}

fn open_failure(event: &str, message: String, user_message: &str) -> EntryActionResponse {
    warn!("event={event} module=ffi status=error error={message}");
    EntryActionResponse::failure(user_message)
}

fn list_failure() -> EntryListResponse {
    EntryListResponse {
        ok: false,
        items: Vec::new(),
        notice: Some(EntryNotice::new(EntryNoticeKind::Error, MSG_LOAD_FAILED)),
    }
}

fn to_entry_item(reminder: &Reminder, today: chrono::NaiveDate) -> EntryReminderItem {
    let draft = reminder.to_draft();
    EntryReminderItem {
        id: reminder.id.clone(),
        title: draft.title,
        description: draft.description,
        date: draft.date,
        start_time: draft.start_time,
        end_time: draft.end_time,
        completed: reminder.completed,
        proximity: reminder.proximity(today).as_str().to_string(),
    }
}
