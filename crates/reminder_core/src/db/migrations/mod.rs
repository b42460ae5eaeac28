//! Schema migrations for the SQLite document store.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - All pending migrations run inside one transaction.
//! - Applied migration version is mirrored to `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: include_str!("0001_documents.sql"),
    },
    Migration {
        version: 2,
        sql: include_str!("0002_collection_index.sql"),
    },
];

/// Returns the latest schema version this build understands.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings the connection's schema up to [`latest_version`].
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the database was written by a
///   newer build.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current = current_user_version(conn)?;
    let latest = latest_version();

    if current > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }
    if current == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
        log::debug!(
            "event=store_migrate module=db status=ok version={}",
            migration.version
        );
    }
    tx.commit()?;

    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
