//! Store new and imported dreams.

use crate::db::dreams::insert_dream;
use crate::db::Database;
use crate::dream::{DreamRecord, NewDream};
use crate::errors::AppResult;
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

/// Records a freshly described dream.
///
/// The dream gets a new uuid v4 id and `now` as its timestamp.
///
/// # Arguments
///
/// * `db` - Database connection
/// * `new_dream` - Keywords, decoding answers and association entered by the user
/// * `now` - Moment of recording
///
/// # Errors
///
/// Returns an error if the dream cannot be stored.
pub fn record_dream(
    db: &Database,
    new_dream: NewDream,
    now: DateTime<Utc>,
) -> AppResult<DreamRecord> {
    let record = new_dream.into_record(Uuid::new_v4().to_string(), now.timestamp_millis());

    let conn = db.get_conn()?;
    insert_dream(&conn, &record)?;

    info!("Recorded dream {}", record.id);
    Ok(record)
}

/// Stores a dream that was recorded elsewhere.
///
/// A blank id is replaced with a new one and a zero timestamp with `now`.
/// Everything else, including an existing reflection, is kept as given.
///
/// # Errors
///
/// Returns an error if a dream with the same id already exists or the
/// database operation fails.
pub fn import_dream(
    db: &Database,
    mut record: DreamRecord,
    now: DateTime<Utc>,
) -> AppResult<DreamRecord> {
    if record.id.trim().is_empty() {
        record.id = Uuid::new_v4().to_string();
    }
    if record.timestamp == 0 {
        record.timestamp = now.timestamp_millis();
    }

    let conn = db.get_conn()?;
    insert_dream(&conn, &record)?;

    info!("Imported dream {}", record.id);
    Ok(record)
}
