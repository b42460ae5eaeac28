//! Document store contract and backends.
//!
//! # Responsibility
//! - Define the schemaless create/list/query/update/delete contract that the
//!   reminder adapter is written against.
//! - Provide a SQLite-backed store and an in-memory store for tests.
//!
//! # Invariants
//! - Document ids are assigned by the store and never reused.
//! - Field names used for ordering or filtering are plain identifiers.
//! - Listing order is stable: ties keep insertion order.

mod failure;
mod memory_store;
mod sqlite_store;

pub use failure::{FailureBehaviour, StoreOperation};
pub use memory_store::InMemoryDocumentStore;
pub use sqlite_store::SqliteDocumentStore;

use crate::db::DbError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned document identifier.
pub type DocumentId = String;

/// Top-level fields of a schemaless document.
pub type Document = Map<String, Value>;

pub type StoreResult<T> = Result<T, StoreError>;

static FIELD_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid field name regex"));

/// One document together with its id.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub data: Document,
}

/// Failure reported by a document store backend.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    NotFound {
        collection: String,
        id: DocumentId,
    },
    InvalidField(String),
    InvalidData(String),
    Serialization(serde_json::Error),
    /// Backend refused or could not serve the call.
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { collection, id } => {
                write!(f, "document not found: {collection}/{id}")
            }
            Self::InvalidField(name) => write!(f, "invalid document field name `{name}`"),
            Self::InvalidData(message) => write!(f, "invalid stored document: {message}"),
            Self::Serialization(err) => write!(f, "document serialization failed: {err}"),
            Self::Unavailable(message) => write!(f, "document store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Schemaless document persistence addressed by collection path and id.
pub trait DocumentStore {
    /// Inserts `record` and returns its newly assigned id.
    fn create(&self, collection: &str, record: &Document) -> StoreResult<DocumentId>;

    /// Lists all documents ordered ascending by `order_keys`, in turn.
    fn list_ordered(&self, collection: &str, order_keys: &[&str])
        -> StoreResult<Vec<StoredDocument>>;

    /// Lists documents whose top-level `field` equals `value`, in insertion order.
    fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<StoredDocument>>;

    fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Shallow-merges `partial` into the stored document.
    fn update(&self, collection: &str, id: &str, partial: &Document) -> StoreResult<()>;

    fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for &S {
    fn create(&self, collection: &str, record: &Document) -> StoreResult<DocumentId> {
        (**self).create(collection, record)
    }

    fn list_ordered(
        &self,
        collection: &str,
        order_keys: &[&str],
    ) -> StoreResult<Vec<StoredDocument>> {
        (**self).list_ordered(collection, order_keys)
    }

    fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<StoredDocument>> {
        (**self).query_by_field(collection, field, value)
    }

    fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        (**self).get(collection, id)
    }

    fn update(&self, collection: &str, id: &str, partial: &Document) -> StoreResult<()> {
        (**self).update(collection, id, partial)
    }

    fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        (**self).delete(collection, id)
    }
}

/// Rejects field names that are not plain identifiers.
pub(crate) fn check_field_name(field: &str) -> StoreResult<()> {
    if FIELD_NAME_RE.is_match(field) {
        Ok(())
    } else {
        Err(StoreError::InvalidField(field.to_string()))
    }
}

pub(crate) fn new_document_id() -> DocumentId {
    uuid::Uuid::new_v4().to_string()
}
