//! Gemini HTTP client for text generation.
//!
//! This client talks to the provider directly and therefore needs the provider
//! credential. In the default setup only the relay server constructs one; the
//! calling tier uses [`RelayClient`](super::relay::RelayClient) instead.

use super::gateway::ModelBackend;
use crate::config::GeminiSettings;
use crate::errors::{AIError, AppError, AppResult};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Header carrying the provider credential. Kept out of the URL so it never
/// shows up in transport error messages.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Request body for content generation.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Response from content generation. Every level is optional so that a
/// sparse body parses and is then reported as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    settings: GeminiSettings,
    client: Client,
}

impl GeminiClient {
    /// Creates a new Gemini client.
    ///
    /// # Arguments
    ///
    /// * `settings` - Provider base URL, model and credential
    /// * `timeout` - Per-request timeout; `None` disables it
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(settings: GeminiSettings, timeout: Option<Duration>) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { settings, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.base_url, self.settings.model
        )
    }

    /// Sends one generation request and returns the first candidate's text.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The endpoint is unreachable or the request times out
    /// - The endpoint answers with a non-success status
    /// - The body is not the expected JSON
    /// - The body carries no text
    pub fn generate(&self, prompt: &str) -> AppResult<String> {
        debug!(
            "Sending generation request with model: {}",
            self.settings.model
        );

        let request = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.settings.api_key)
            .json(&request)
            .send()
            .map_err(AIError::Unreachable)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AIError::Api {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let generated: GenerateResponse = response.json().map_err(|e| {
            AIError::InvalidResponse(format!("Failed to parse generation response: {}", e))
        })?;

        let text = generated.into_text().ok_or(AIError::EmptyResponse)?;
        debug!("Received generation response ({} chars)", text.len());
        Ok(text)
    }
}

impl ModelBackend for GeminiClient {
    fn generate(&self, prompt: &str) -> AppResult<String> {
        GeminiClient::generate(self, prompt)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
