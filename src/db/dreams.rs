//! Dream CRUD operations.
//!
//! This module provides functions for creating, reading, updating, and deleting
//! dream records in the database.

use crate::dream::DreamRecord;
use crate::errors::{AppResult, DatabaseError};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

const SELECT_COLUMNS: &str =
    "SELECT id, timestamp, keywords, decoding, association, ai_reflection FROM dreams";

/// Parses a JSON text column, reporting failures as a column conversion error.
fn json_column<T: serde::de::DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn dream_from_row(row: &Row<'_>) -> rusqlite::Result<DreamRecord> {
    Ok(DreamRecord {
        id: row.get(0)?,
        timestamp: row.get(1)?,
        keywords: json_column(row, 2)?,
        decoding: json_column(row, 3)?,
        association: row.get(4)?,
        ai_reflection: row.get(5)?,
    })
}

/// Inserts a dream.
///
/// # Errors
///
/// Returns an error if a dream with the same id exists or the database
/// operation fails.
pub fn insert_dream(conn: &Connection, dream: &DreamRecord) -> AppResult<()> {
    debug!("Inserting dream {}", dream.id);

    let keywords = serde_json::to_string(&dream.keywords)?;
    let decoding = serde_json::to_string(&dream.decoding)?;

    conn.execute(
        r#"
        INSERT INTO dreams (id, timestamp, keywords, decoding, association, ai_reflection)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        params![
            dream.id,
            dream.timestamp,
            keywords,
            decoding,
            dream.association,
            dream.ai_reflection
        ],
    )
    .map_err(DatabaseError::Sqlite)?;

    Ok(())
}

/// Retrieves a dream by id.
///
/// # Errors
///
/// Returns an error if the database operation fails.
/// Returns `Ok(None)` if no dream has the given id.
pub fn get_dream(conn: &Connection, id: &str) -> AppResult<Option<DreamRecord>> {
    debug!("Getting dream {}", id);

    let dream = conn
        .query_row(
            &format!("{} WHERE id = ?1", SELECT_COLUMNS),
            params![id],
            dream_from_row,
        )
        .optional()
        .map_err(DatabaseError::Sqlite)?;

    Ok(dream)
}

/// Lists all dreams, newest first.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn list_dreams(conn: &Connection) -> AppResult<Vec<DreamRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "{} ORDER BY timestamp DESC, created_at DESC",
            SELECT_COLUMNS
        ))
        .map_err(DatabaseError::Sqlite)?;

    let dreams = stmt
        .query_map([], dream_from_row)
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;

    debug!("Listed {} dreams", dreams.len());
    Ok(dreams)
}

/// Stores a reflection on an existing dream.
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` if no dream has the given id.
pub fn update_reflection(conn: &Connection, id: &str, reflection: &str) -> AppResult<()> {
    debug!("Storing reflection for dream {}", id);

    let updated = conn
        .execute(
            "UPDATE dreams SET ai_reflection = ?1 WHERE id = ?2",
            params![reflection, id],
        )
        .map_err(DatabaseError::Sqlite)?;

    if updated == 0 {
        return Err(DatabaseError::NotFound(format!("Dream with id {} not found", id)).into());
    }
    Ok(())
}

/// Deletes a dream.
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` if no dream has the given id.
pub fn delete_dream(conn: &Connection, id: &str) -> AppResult<()> {
    debug!("Deleting dream {}", id);

    let deleted = conn
        .execute("DELETE FROM dreams WHERE id = ?1", params![id])
        .map_err(DatabaseError::Sqlite)?;

    if deleted == 0 {
        return Err(DatabaseError::NotFound(format!("Dream with id {} not found", id)).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dream::{Decoding, Keywords};
    use crate::errors::AppError;

    fn setup_test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::schema::create_tables(&conn).unwrap();
        conn
    }

    fn dream(id: &str, timestamp: i64) -> DreamRecord {
        DreamRecord {
            id: id.to_string(),
            timestamp,
            keywords: Keywords {
                scenes: vec!["旧教室".to_string()],
                objects: vec!["粉笔".to_string(), "粉笔".to_string()],
                ..Keywords::default()
            },
            decoding: Decoding {
                strongest_emotion: "不安".to_string(),
                recent_life_link: "换工作".to_string(),
                movie_theme: "重返校园".to_string(),
            },
            association: "想起高三".to_string(),
            ai_reflection: None,
        }
    }

    #[test]
    fn test_insert_and_get_roundtrip() {
        let conn = setup_test_db();
        let original = dream("a", 1_700_000_000_000);

        insert_dream(&conn, &original).unwrap();

        let loaded = get_dream(&conn, "a").unwrap().unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_get_dream_not_found() {
        let conn = setup_test_db();
        assert!(get_dream(&conn, "missing").unwrap().is_none());
    }

    #[test]
    fn test_insert_duplicate_id_fails() {
        let conn = setup_test_db();
        insert_dream(&conn, &dream("a", 1)).unwrap();
        assert!(insert_dream(&conn, &dream("a", 2)).is_err());
    }

    #[test]
    fn test_list_dreams_newest_first() {
        let conn = setup_test_db();
        insert_dream(&conn, &dream("old", 1_000)).unwrap();
        insert_dream(&conn, &dream("new", 3_000)).unwrap();
        insert_dream(&conn, &dream("mid", 2_000)).unwrap();

        let ids: Vec<String> = list_dreams(&conn)
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_update_reflection() {
        let conn = setup_test_db();
        insert_dream(&conn, &dream("a", 1)).unwrap();

        update_reflection(&conn, "a", "也许这是内在小孩").unwrap();

        let loaded = get_dream(&conn, "a").unwrap().unwrap();
        assert_eq!(loaded.ai_reflection.as_deref(), Some("也许这是内在小孩"));
    }

    #[test]
    fn test_update_reflection_missing_dream() {
        let conn = setup_test_db();
        match update_reflection(&conn, "ghost", "text") {
            Err(AppError::Database(DatabaseError::NotFound(msg))) => assert!(msg.contains("ghost")),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_delete_dream() {
        let conn = setup_test_db();
        insert_dream(&conn, &dream("a", 1)).unwrap();

        delete_dream(&conn, "a").unwrap();

        assert!(get_dream(&conn, "a").unwrap().is_none());
        assert!(matches!(
            delete_dream(&conn, "a"),
            Err(AppError::Database(DatabaseError::NotFound(_)))
        ));
    }

    #[test]
    fn test_corrupt_json_column_is_reported() {
        let conn = setup_test_db();
        conn.execute(
            "INSERT INTO dreams (id, timestamp, keywords) VALUES ('bad', 1, 'not json')",
            [],
        )
        .unwrap();

        assert!(get_dream(&conn, "bad").is_err());
    }
}
