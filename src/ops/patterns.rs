//! Pattern operations across the whole dream journal.
//!
//! - Pattern analysis: one model call over a summary of every stored dream
//! - Emotion spectrum: a local tally of the strongest emotion per dream

use crate::ai::DreamOracle;
use crate::db::dreams::list_dreams;
use crate::db::Database;
use crate::dream::DreamRecord;
use crate::errors::AppResult;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info};

/// How often one emotion was named as a dream's strongest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmotionCount {
    /// Normalized (trimmed, lowercased) emotion.
    pub emotion: String,
    pub count: usize,
}

/// Analyzes recurring patterns across all stored dreams.
///
/// Dreams are summarized newest first. With no stored dreams the
/// not-enough-dreams sentence is returned without contacting a model.
///
/// # Errors
///
/// Returns an error only if the dreams cannot be loaded.
pub fn analyze_dreams(db: &Database, oracle: &DreamOracle) -> AppResult<String> {
    let dreams = {
        let conn = db.get_conn()?;
        list_dreams(&conn)?
    };
    info!("Analyzing patterns across {} dreams", dreams.len());

    let values: Vec<Value> = dreams.iter().map(DreamRecord::to_value).collect();
    Ok(oracle.analyze_patterns(&values))
}

/// Tallies the strongest emotion of each dream.
///
/// Values are trimmed and lowercased, blanks are skipped. The result is
/// ordered by count, highest first, with ties kept in order of first
/// appearance, and holds at most `limit` entries.
pub fn emotion_spectrum(dreams: &[DreamRecord], limit: usize) -> Vec<EmotionCount> {
    let mut counts: Vec<EmotionCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for dream in dreams {
        let emotion = dream.decoding.strongest_emotion.trim().to_lowercase();
        if emotion.is_empty() {
            continue;
        }

        match index.get(&emotion) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(emotion.clone(), counts.len());
                counts.push(EmotionCount { emotion, count: 1 });
            }
        }
    }

    // Stable sort keeps first-appearance order among equal counts
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);

    debug!("Emotion spectrum has {} entries", counts.len());
    counts
}
