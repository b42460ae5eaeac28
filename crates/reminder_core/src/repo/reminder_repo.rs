//! Reminder repository contract and document-store implementation.

use crate::config::StoreConfig;
use crate::model::reminder::{Reminder, ReminderFields, ReminderId};
use crate::model::slot::format_date;
use crate::store::{Document, DocumentStore, StoreError, StoredDocument};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const FIELD_DATE: &str = "date";
pub const FIELD_START_TIME: &str = "startTime";
pub const FIELD_COMPLETED: &str = "completed";

/// Listing order of the reminder projection.
pub const LIST_ORDER: [&str; 2] = [FIELD_DATE, FIELD_START_TIME];

pub type RepoResult<T> = Result<T, RepoError>;

/// Reminder persistence error.
#[derive(Debug)]
pub enum RepoError {
    Store(StoreError),
    NotFound(ReminderId),
    InvalidData { id: ReminderId, message: String },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "reminder not found: {id}"),
            Self::InvalidData { id, message } => {
                write!(f, "invalid reminder document {id}: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData { .. } => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound { id, .. } => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}

/// Reminder persistence operations used by the lifecycle service.
pub trait ReminderRepository {
    /// Stores a new, not yet completed reminder and returns its id.
    fn create_reminder(&self, fields: &ReminderFields) -> RepoResult<ReminderId>;
    fn get_reminder(&self, id: &str) -> RepoResult<Option<Reminder>>;
    /// All reminders ordered by `(date, startTime)` ascending.
    fn list_reminders(&self) -> RepoResult<Vec<Reminder>>;
    fn reminders_on_date(&self, date: NaiveDate) -> RepoResult<Vec<Reminder>>;
    /// Replaces the user-editable fields; `completed` and `createdAt` stay.
    fn update_reminder(&self, id: &str, fields: &ReminderFields) -> RepoResult<()>;
    fn set_completed(&self, id: &str, completed: bool) -> RepoResult<()>;
    fn delete_reminder(&self, id: &str) -> RepoResult<()>;
}

/// Full reminder document as written to the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReminderDocument {
    #[serde(flatten)]
    fields: ReminderFields,
    #[serde(default)]
    completed: bool,
    created_at: DateTime<Utc>,
}

/// [`ReminderRepository`] over any [`DocumentStore`].
pub struct DocumentReminderRepository<S: DocumentStore> {
    store: S,
    collection: String,
}

impl<S: DocumentStore> DocumentReminderRepository<S> {
    pub fn new(store: S, config: &StoreConfig) -> Self {
        Self {
            store,
            collection: config.collection_path(),
        }
    }

    /// Collection path every call is addressed to.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn decode_all(&self, docs: Vec<StoredDocument>) -> RepoResult<Vec<Reminder>> {
        docs.into_iter()
            .map(|doc| decode_reminder(doc.id, doc.data))
            .collect()
    }
}

impl<S: DocumentStore> ReminderRepository for DocumentReminderRepository<S> {
    fn create_reminder(&self, fields: &ReminderFields) -> RepoResult<ReminderId> {
        let document = ReminderDocument {
            fields: fields.clone(),
            completed: false,
            created_at: Utc::now(),
        };
        let record = encode(&document)?;
        Ok(self.store.create(&self.collection, &record)?)
    }

    fn get_reminder(&self, id: &str) -> RepoResult<Option<Reminder>> {
        match self.store.get(&self.collection, id)? {
            Some(data) => decode_reminder(id.to_string(), data).map(Some),
            None => Ok(None),
        }
    }

    fn list_reminders(&self) -> RepoResult<Vec<Reminder>> {
        let docs = self.store.list_ordered(&self.collection, &LIST_ORDER)?;
        self.decode_all(docs)
    }

    fn reminders_on_date(&self, date: NaiveDate) -> RepoResult<Vec<Reminder>> {
        let docs = self.store.query_by_field(
            &self.collection,
            FIELD_DATE,
            &Value::String(format_date(date)),
        )?;
        self.decode_all(docs)
    }

    fn update_reminder(&self, id: &str, fields: &ReminderFields) -> RepoResult<()> {
        let partial = encode(fields)?;
        Ok(self.store.update(&self.collection, id, &partial)?)
    }

    fn set_completed(&self, id: &str, completed: bool) -> RepoResult<()> {
        let mut partial = Document::new();
        partial.insert(FIELD_COMPLETED.to_string(), Value::Bool(completed));
        Ok(self.store.update(&self.collection, id, &partial)?)
    }

    fn delete_reminder(&self, id: &str) -> RepoResult<()> {
        Ok(self.store.delete(&self.collection, id)?)
    }
}

fn encode<T: Serialize>(value: &T) -> RepoResult<Document> {
    match serde_json::to_value(value).map_err(StoreError::from)? {
        Value::Object(map) => Ok(map),
        _ => Err(RepoError::Store(StoreError::InvalidData(
            "reminder did not encode to an object".to_string(),
        ))),
    }
}

fn decode_reminder(id: ReminderId, data: Document) -> RepoResult<Reminder> {
    let document: ReminderDocument =
        serde_json::from_value(Value::Object(data)).map_err(|err| RepoError::InvalidData {
            id: id.clone(),
            message: err.to_string(),
        })?;
    Ok(Reminder::from_fields(
        id,
        document.fields,
        document.completed,
        document.created_at,
    ))
}
