//! Generate AI reflections on stored dreams.

use crate::ai::DreamOracle;
use crate::db::dreams::{get_dream, update_reflection};
use crate::db::Database;
use crate::errors::{AppError, AppResult};
use tracing::{debug, info};

/// Generates a reflection on a stored dream.
///
/// # Flow
///
/// 1. Look up the dream by id
/// 2. Ask the oracle for a reflection
/// 3. Store the text on the dream if the model answered
/// 4. Return the text, which is the fallback sentence if it did not
///
/// The database connection is released before the model call so a slow
/// provider never holds a pooled connection.
///
/// # Errors
///
/// Returns an error if the dream doesn't exist or the database fails. A
/// failing model is not an error.
pub fn reflect_on_dream(db: &Database, oracle: &DreamOracle, id: &str) -> AppResult<String> {
    info!("Generating reflection for dream {}", id);

    let dream = {
        let conn = db.get_conn()?;
        get_dream(&conn, id)?
            .ok_or_else(|| AppError::Dream(format!("No dream found with id: {}", id)))?
    };

    let outcome = oracle.reflect_outcome(&dream.to_value());

    if outcome.is_success() {
        let conn = db.get_conn()?;
        update_reflection(&conn, id, outcome.text())?;
        info!("Stored reflection for dream {}", id);
    } else {
        debug!("Reflection unavailable, leaving dream {} unchanged", id);
    }

    Ok(outcome.into_text())
}
