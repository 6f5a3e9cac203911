//! Dream records and their parts.
//!
//! `DreamRecord` is the typed form used by the dream store and the CLI. The
//! reflection pipeline deliberately does not depend on it: records arriving
//! from outside (files, the relay) are handled as raw `serde_json::Value`s so
//! that a missing or oddly shaped field can never stop a prompt from being
//! built. `DreamRecord::to_value` bridges the two.
//!
//! The JSON shape uses camelCase keys:
//!
//! ```json
//! {
//!   "id": "…",
//!   "timestamp": 1700000000000,
//!   "keywords": { "scenes": [], "characters": [], "emotions": [], "objects": [] },
//!   "decoding": { "strongestEmotion": "", "recentLifeLink": "", "movieTheme": "" },
//!   "association": "",
//!   "aiReflection": "…"
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The four keyword groups captured while recording a dream.
///
/// Order reflects entry order; duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keywords {
    pub scenes: Vec<String>,
    pub characters: Vec<String>,
    pub emotions: Vec<String>,
    pub objects: Vec<String>,
}

/// Answers to the three emotional decoding questions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Decoding {
    /// The strongest emotion felt in the dream.
    pub strongest_emotion: String,
    /// What in waking life the dream seems linked to.
    pub recent_life_link: String,
    /// If the dream were a film, its theme.
    pub movie_theme: String,
}

/// One journaled dream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DreamRecord {
    /// Store identifier (uuid v4). Empty until stored.
    pub id: String,
    /// Moment of recording, epoch milliseconds. Display and ordering only.
    pub timestamp: i64,
    pub keywords: Keywords,
    pub decoding: Decoding,
    /// Free association narrative.
    pub association: String,
    /// Set after a successful reflection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_reflection: Option<String>,
}

impl DreamRecord {
    /// Converts the record into the loosely typed form the prompt builders read.
    pub fn to_value(&self) -> Value {
        // Plain strings and vectors always serialize; Null only reads as "all fields missing".
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// The user-supplied part of a dream, before it has an id or timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewDream {
    pub keywords: Keywords,
    pub decoding: Decoding,
    pub association: String,
}

impl NewDream {
    /// Completes the dream into a storable record.
    pub fn into_record(self, id: String, timestamp: i64) -> DreamRecord {
        DreamRecord {
            id,
            timestamp,
            keywords: self.keywords,
            decoding: self.decoding,
            association: self.association,
            ai_reflection: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserializes_camel_case_shape() {
        let record: DreamRecord = serde_json::from_value(json!({
            "id": "d-1",
            "timestamp": 1700000000000i64,
            "keywords": { "scenes": ["老房子"], "objects": ["钥匙", "钥匙"] },
            "decoding": { "strongestEmotion": "焦虑", "movieTheme": "迷路" },
            "association": "小时候住过的地方",
            "aiReflection": "也许……"
        }))
        .unwrap();

        assert_eq!(record.id, "d-1");
        assert_eq!(record.keywords.scenes, vec!["老房子"]);
        assert_eq!(record.keywords.objects, vec!["钥匙", "钥匙"]);
        assert!(record.keywords.characters.is_empty());
        assert_eq!(record.decoding.strongest_emotion, "焦虑");
        assert_eq!(record.decoding.recent_life_link, "");
        assert_eq!(record.ai_reflection.as_deref(), Some("也许……"));
    }

    #[test]
    fn test_missing_fields_default() {
        let record: DreamRecord = serde_json::from_value(json!({})).unwrap();
        assert_eq!(record, DreamRecord::default());
    }

    #[test]
    fn test_to_value_uses_camel_case_and_omits_absent_reflection() {
        let record = DreamRecord {
            decoding: Decoding {
                strongest_emotion: "平静".to_string(),
                ..Decoding::default()
            },
            ..DreamRecord::default()
        };

        let value = record.to_value();
        assert_eq!(value["decoding"]["strongestEmotion"], "平静");
        assert!(value.get("aiReflection").is_none());
    }

    #[test]
    fn test_new_dream_into_record() {
        let new_dream = NewDream {
            association: "海边".to_string(),
            ..NewDream::default()
        };

        let record = new_dream.into_record("id-9".to_string(), 42);
        assert_eq!(record.id, "id-9");
        assert_eq!(record.timestamp, 42);
        assert_eq!(record.association, "海边");
        assert!(record.ai_reflection.is_none());
    }
}
