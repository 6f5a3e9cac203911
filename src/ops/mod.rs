//! High-level dream journal operations.
//!
//! This module provides user-facing operations that orchestrate the store
//! and the reflection gateway: recording dreams, reflecting on them, and
//! looking for patterns across the journal.

pub mod patterns;
pub mod record;
pub mod reflect;

// Re-export commonly used functions
pub use patterns::{analyze_dreams, emotion_spectrum, EmotionCount};
pub use record::{import_dream, record_dream};
pub use reflect::reflect_on_dream;
