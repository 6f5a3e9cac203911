//! The reflection gateway.
//!
//! [`DreamOracle`] is the only way the rest of the crate asks a model for
//! text. Its public operations always return displayable text: whatever goes
//! wrong inside a backend is logged and replaced by a fixed fallback sentence.
//!
//! # Example
//!
//! ```no_run
//! use reverie::ai::{DreamOracle, RelayClient};
//! use reverie::Config;
//! use serde_json::json;
//!
//! let config = Config::load()?;
//! let oracle = DreamOracle::new(RelayClient::new(config.relay_settings(), None)?);
//! let text = oracle.reflect(&json!({ "association": "雨夜的车站" }));
//! println!("{}", text);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use super::gemini::GeminiClient;
use super::prompts::{analysis_prompt, reflection_prompt};
use super::relay::RelayClient;
use crate::config::{AiMode, Config};
use crate::constants::{ANALYSIS_FALLBACK, NOT_ENOUGH_DREAMS, REFLECTION_FALLBACK};
use crate::errors::AppResult;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Something that turns a prompt into generated text.
///
/// Implementations make exactly one attempt per call and report every
/// failure as an error; they never substitute text of their own.
pub trait ModelBackend: Send + Sync {
    /// Generates text for `prompt`.
    fn generate(&self, prompt: &str) -> AppResult<String>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// How a single gateway call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The model produced text.
    Succeeded(String),
    /// The call failed; the payload is the fallback sentence.
    Failed(String),
    /// No call was made; the payload is an informational sentence.
    NotSent(String),
}

impl Outcome {
    /// The text to show, whichever way the call ended.
    pub fn text(&self) -> &str {
        match self {
            Outcome::Succeeded(text) | Outcome::Failed(text) | Outcome::NotSent(text) => text,
        }
    }

    /// Consumes the outcome, returning the text to show.
    pub fn into_text(self) -> String {
        match self {
            Outcome::Succeeded(text) | Outcome::Failed(text) | Outcome::NotSent(text) => text,
        }
    }

    /// Whether the text came from the model.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded(_))
    }
}

/// Asks a model for dream reflections and pattern analyses.
///
/// Cheap to clone; clones share the backend. Calls carry no state between
/// them, so one oracle may serve any number of concurrent callers.
#[derive(Clone)]
pub struct DreamOracle {
    backend: Arc<dyn ModelBackend>,
}

impl DreamOracle {
    /// Creates an oracle over `backend`.
    pub fn new(backend: impl ModelBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Creates an oracle over an already shared backend.
    pub fn from_shared(backend: Arc<dyn ModelBackend>) -> Self {
        Self { backend }
    }

    /// Builds the backend selected by `config.ai_mode`.
    ///
    /// # Errors
    ///
    /// Returns an error if direct mode lacks a credential or an HTTP client
    /// cannot be built.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let oracle = match config.ai_mode {
            AiMode::Relay => Self::new(RelayClient::new(
                config.relay_settings(),
                config.request_timeout,
            )?),
            AiMode::Direct => Self::new(GeminiClient::new(
                config.gemini_settings()?,
                config.request_timeout,
            )?),
        };
        info!("Using {} backend", oracle.backend.name());
        Ok(oracle)
    }

    /// Reflects on one dream, returning the model's text or the reflection
    /// fallback sentence.
    pub fn reflect(&self, dream: &Value) -> String {
        self.reflect_outcome(dream).into_text()
    }

    /// Like [`reflect`](Self::reflect), keeping track of whether the model answered.
    pub fn reflect_outcome(&self, dream: &Value) -> Outcome {
        let prompt = reflection_prompt(dream);
        self.settle("reflection", &prompt, REFLECTION_FALLBACK)
    }

    /// Looks for recurring patterns across `dreams`, returning the model's text,
    /// the analysis fallback sentence, or, for an empty list, a note that there
    /// are not enough dreams yet.
    pub fn analyze_patterns(&self, dreams: &[Value]) -> String {
        self.analyze_outcome(dreams).into_text()
    }

    /// Like [`analyze_patterns`](Self::analyze_patterns), keeping track of
    /// whether the model answered.
    pub fn analyze_outcome(&self, dreams: &[Value]) -> Outcome {
        if dreams.is_empty() {
            debug!("No dreams to analyze, skipping model call");
            return Outcome::NotSent(NOT_ENOUGH_DREAMS.to_string());
        }

        let prompt = analysis_prompt(dreams);
        self.settle("analysis", &prompt, ANALYSIS_FALLBACK)
    }

    fn settle(&self, task: &str, prompt: &str, fallback: &str) -> Outcome {
        debug!(task, backend = self.backend.name(), "Sending prompt");

        match self.backend.generate(prompt) {
            Ok(text) if !text.trim().is_empty() => {
                info!(task, chars = text.len(), "Model answered");
                Outcome::Succeeded(text)
            }
            Ok(_) => {
                warn!(task, backend = self.backend.name(), "Model returned blank text");
                Outcome::Failed(fallback.to_string())
            }
            Err(e) => {
                warn!(task, backend = self.backend.name(), error = %e, "Model call failed");
                Outcome::Failed(fallback.to_string())
            }
        }
    }
}
