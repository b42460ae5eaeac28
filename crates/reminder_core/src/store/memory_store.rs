//! In-process document store.
//!
//! Single-threaded by construction (`RefCell`), matching the one-actor model
//! of the reminder service. Failures can be scripted through
//! [`FailureBehaviour`] to exercise error paths without a real backend.

use super::failure::{FailureBehaviour, StoreOperation};
use super::{
    check_field_name, new_document_id, Document, DocumentId, DocumentStore, StoreError,
    StoreResult, StoredDocument,
};
use serde_json::Value;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// `BTreeMap`-backed store; each collection keeps documents in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RefCell<BTreeMap<String, Vec<StoredDocument>>>,
    behaviour: RefCell<FailureBehaviour>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behaviour(behaviour: FailureBehaviour) -> Self {
        Self {
            collections: RefCell::default(),
            behaviour: RefCell::new(behaviour),
        }
    }

    /// Replaces the scripted failure budgets.
    pub fn set_behaviour(&self, behaviour: FailureBehaviour) {
        *self.behaviour.borrow_mut() = behaviour;
    }

    /// Number of documents in `collection`, bypassing failure scripts.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .borrow()
            .get(collection)
            .map_or(0, |docs| docs.len())
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn check(&self, operation: StoreOperation) -> StoreResult<()> {
        self.behaviour.borrow_mut().check(operation)
    }

    fn not_found(collection: &str, id: &str) -> StoreError {
        StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn create(&self, collection: &str, record: &Document) -> StoreResult<DocumentId> {
        self.check(StoreOperation::Create)?;
        let id = new_document_id();
        self.collections
            .borrow_mut()
            .entry(collection.to_string())
            .or_default()
            .push(StoredDocument {
                id: id.clone(),
                data: record.clone(),
            });
        Ok(id)
    }

    fn list_ordered(
        &self,
        collection: &str,
        order_keys: &[&str],
    ) -> StoreResult<Vec<StoredDocument>> {
        self.check(StoreOperation::ListOrdered)?;
        for key in order_keys {
            check_field_name(key)?;
        }

        let mut docs = self
            .collections
            .borrow()
            .get(collection)
            .cloned()
            .unwrap_or_default();
        // sort_by is stable, so ties keep insertion order.
        docs.sort_by(|left, right| {
            order_keys
                .iter()
                .map(|key| compare_fields(left.data.get(*key), right.data.get(*key)))
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
        Ok(docs)
    }

    fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<StoredDocument>> {
        self.check(StoreOperation::QueryByField)?;
        check_field_name(field)?;

        let collections = self.collections.borrow();
        let matches: Vec<StoredDocument> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| doc.data.get(field).unwrap_or(&Value::Null) == value)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(matches)
    }

    fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        self.check(StoreOperation::Get)?;
        Ok(self.collections.borrow().get(collection).and_then(|docs| {
            docs.iter()
                .find(|doc| doc.id == id)
                .map(|doc| doc.data.clone())
        }))
    }

    fn update(&self, collection: &str, id: &str, partial: &Document) -> StoreResult<()> {
        self.check(StoreOperation::Update)?;
        let mut collections = self.collections.borrow_mut();
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
            .ok_or_else(|| Self::not_found(collection, id))?;

        for (key, value) in partial {
            doc.data.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.check(StoreOperation::Delete)?;
        let mut collections = self.collections.borrow_mut();
        let docs = collections
            .get_mut(collection)
            .ok_or_else(|| Self::not_found(collection, id))?;
        let position = docs
            .iter()
            .position(|doc| doc.id == id)
            .ok_or_else(|| Self::not_found(collection, id))?;
        docs.remove(position);
        Ok(())
    }
}

/// Orders values the way SQLite orders `json_extract` results:
/// missing/null, then numbers and booleans, then text, then anything else.
fn compare_fields(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) | Some(Value::Number(_)) => 1,
            Some(Value::String(_)) => 2,
            Some(_) => 3,
        }
    }

    fn numeric(value: &Value) -> f64 {
        match value {
            Value::Bool(flag) => f64::from(u8::from(*flag)),
            Value::Number(number) => number.as_f64().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    match rank(left).cmp(&rank(right)) {
        Ordering::Equal => {}
        other => return other,
    }

    match (left, right) {
        (Some(Value::String(l)), Some(Value::String(r))) => l.cmp(r),
        (Some(l @ (Value::Bool(_) | Value::Number(_))), Some(r)) => numeric(l)
            .partial_cmp(&numeric(r))
            .unwrap_or(Ordering::Equal),
        (Some(l), Some(r)) => l.to_string().cmp(&r.to_string()),
        _ => Ordering::Equal,
    }
}
