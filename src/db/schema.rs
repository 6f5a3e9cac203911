//! Database schema definitions and initialization.

use crate::errors::{AppResult, DatabaseError};
use rusqlite::Connection;
use tracing::debug;

/// Current schema version.
///
/// Increment this whenever schema changes are made to support future migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Creates all database tables and indexes.
///
/// This function is idempotent - it uses `CREATE TABLE IF NOT EXISTS`
/// so it's safe to call multiple times.
///
/// # Tables
///
/// - `dreams`: One row per dream. Keyword groups and decoding answers are
///   stored as JSON text in the same camelCase shape the CLI imports.
///
/// # Errors
///
/// Returns an error if any DDL statement fails.
pub fn create_tables(conn: &Connection) -> AppResult<()> {
    debug!("Creating database tables");

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS dreams (
            id TEXT PRIMARY KEY NOT NULL,
            timestamp INTEGER NOT NULL,
            keywords TEXT NOT NULL DEFAULT '{}',
            decoding TEXT NOT NULL DEFAULT '{}',
            association TEXT NOT NULL DEFAULT '',
            ai_reflection TEXT,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_dreams_timestamp ON dreams(timestamp DESC);
        "#,
    )
    .map_err(DatabaseError::Sqlite)?;

    conn.pragma_update(None, "user_version", SCHEMA_VERSION)
        .map_err(DatabaseError::Sqlite)?;

    Ok(())
}
