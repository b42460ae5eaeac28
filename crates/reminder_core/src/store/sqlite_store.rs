//! SQLite-backed document store.
//!
//! # Invariants
//! - Every document lives in the `documents` table as a JSON object.
//! - `seq` reflects insertion order and breaks ordering ties.
//! - Read paths reject non-object bodies instead of masking them.

use super::{
    check_field_name, new_document_id, Document, DocumentId, DocumentStore, StoreError,
    StoreResult, StoredDocument,
};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde_json::Value;

/// Document store over one open SQLite connection.
///
/// The connection must come from [`crate::db::open_db`] or
/// [`crate::db::open_db_in_memory`] so the schema is in place.
#[derive(Clone, Copy)]
pub struct SqliteDocumentStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDocumentStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn collect_rows(
        &self,
        sql: &str,
        bind_values: Vec<SqlValue>,
    ) -> StoreResult<Vec<StoredDocument>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut docs = Vec::new();
        while let Some(row) = rows.next()? {
            docs.push(parse_document_row(row)?);
        }
        Ok(docs)
    }
}

impl DocumentStore for SqliteDocumentStore<'_> {
    fn create(&self, collection: &str, record: &Document) -> StoreResult<DocumentId> {
        let id = new_document_id();
        let body = serde_json::to_string(record)?;
        self.conn.execute(
            "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3);",
            params![collection, id.as_str(), body],
        )?;
        Ok(id)
    }

    fn list_ordered(
        &self,
        collection: &str,
        order_keys: &[&str],
    ) -> StoreResult<Vec<StoredDocument>> {
        let mut sql = String::from("SELECT id, body FROM documents WHERE collection = ?");
        let mut bind_values = vec![SqlValue::Text(collection.to_string())];

        sql.push_str(" ORDER BY ");
        for key in order_keys {
            check_field_name(key)?;
            sql.push_str("json_extract(body, ?) ASC, ");
            bind_values.push(SqlValue::Text(json_path(key)));
        }
        sql.push_str("seq ASC");

        self.collect_rows(&sql, bind_values)
    }

    fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<StoredDocument>> {
        check_field_name(field)?;
        let bind_values = vec![
            SqlValue::Text(collection.to_string()),
            SqlValue::Text(json_path(field)),
            to_sql_value(value)?,
        ];

        self.collect_rows(
            "SELECT id, body FROM documents
             WHERE collection = ? AND json_extract(body, ?) IS ?
             ORDER BY seq ASC",
            bind_values,
        )
    }

    fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND id = ?2;",
                params![collection, id],
                |row| row.get(0),
            )
            .optional()?;

        body.map(|text| parse_body(id, &text)).transpose()
    }

    fn update(&self, collection: &str, id: &str, partial: &Document) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let body: Option<String> = tx
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND id = ?2;",
                params![collection, id],
                |row| row.get(0),
            )
            .optional()?;
        let Some(body) = body else {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        };

        let mut merged = parse_body(id, &body)?;
        for (key, value) in partial {
            merged.insert(key.clone(), value.clone());
        }

        tx.execute(
            "UPDATE documents
             SET body = ?1, updated_at = (strftime('%s', 'now') * 1000)
             WHERE collection = ?2 AND id = ?3;",
            params![serde_json::to_string(&merged)?, collection, id],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND id = ?2;",
            params![collection, id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

fn json_path(field: &str) -> String {
    format!("$.{field}")
}

/// Maps a JSON scalar to the SQL value `json_extract` would return for it.
fn to_sql_value(value: &Value) -> StoreResult<SqlValue> {
    match value {
        Value::Null => Ok(SqlValue::Null),
        Value::Bool(flag) => Ok(SqlValue::Integer(i64::from(*flag))),
        Value::String(text) => Ok(SqlValue::Text(text.clone())),
        Value::Number(number) => match number.as_i64() {
            Some(int) => Ok(SqlValue::Integer(int)),
            None => number.as_f64().map(SqlValue::Real).ok_or_else(|| {
                StoreError::InvalidData(format!("unsupported numeric query value {number}"))
            }),
        },
        Value::Array(_) | Value::Object(_) => Err(StoreError::InvalidData(
            "query values must be JSON scalars".to_string(),
        )),
    }
}

fn parse_document_row(row: &Row<'_>) -> StoreResult<StoredDocument> {
    let id: String = row.get("id")?;
    let body: String = row.get("body")?;
    let data = parse_body(&id, &body)?;
    Ok(StoredDocument { id, data })
}

fn parse_body(id: &str, body: &str) -> StoreResult<Document> {
    match serde_json::from_str::<Value>(body)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::InvalidData(format!(
            "document {id} body is not an object: {other}"
        ))),
    }
}
