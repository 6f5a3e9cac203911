//! AI operations for dream reflections and pattern analysis.
//!
//! # Module Structure
//!
//! - `fields`: Defensive reads from loosely shaped dream records
//! - `prompts`: Reflection and analysis prompt templates
//! - `gateway`: `DreamOracle`, the total entry point, and the `ModelBackend` seam
//! - `gemini`: HTTP client for the model provider
//! - `relay`: HTTP client for the credential-holding relay
//!
//! # Example
//!
//! ```no_run
//! use reverie::ai::DreamOracle;
//! use reverie::Config;
//! use serde_json::json;
//!
//! let config = Config::load()?;
//! let oracle = DreamOracle::from_config(&config)?;
//! println!("{}", oracle.analyze_patterns(&[json!({ "timestamp": 1700000000000i64 })]));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod fields;
pub mod gateway;
pub mod gemini;
pub mod prompts;
pub mod relay;

// Re-export commonly used types
pub use gateway::{DreamOracle, ModelBackend, Outcome};
pub use gemini::GeminiClient;
pub use prompts::{analysis_prompt, analysis_prompt_in, reflection_prompt};
pub use relay::RelayClient;
