//! Client for the credential-holding relay.
//!
//! The relay accepts `{"prompt": "..."}` and answers `{"text": "..."}`; the
//! provider key stays on the relay host. See [`crate::relay`] for the server.

use super::gateway::ModelBackend;
use crate::config::RelaySettings;
use crate::errors::{AIError, AppError, AppResult};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Request body understood by the relay's generate route.
#[derive(Debug, Serialize, Deserialize)]
pub struct RelayRequest {
    pub prompt: String,
}

/// Response body of the relay's generate route.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RelayResponse {
    #[serde(default)]
    pub text: Option<String>,
}

/// Client that forwards prompts to the relay.
pub struct RelayClient {
    settings: RelaySettings,
    client: Client,
}

impl RelayClient {
    /// Creates a new relay client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(settings: RelaySettings, timeout: Option<Duration>) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { settings, client })
    }

    /// Sends one prompt to the relay and returns the generated text.
    ///
    /// # Errors
    ///
    /// Returns an error if the relay is unreachable, answers with a
    /// non-success status, or returns a body without text.
    pub fn generate(&self, prompt: &str) -> AppResult<String> {
        debug!("Forwarding prompt to relay ({} chars)", prompt.len());

        let mut request = self.client.post(&self.settings.url).json(&RelayRequest {
            prompt: prompt.to_string(),
        });
        if let Some(token) = &self.settings.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(AIError::Unreachable)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AIError::Api {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let relayed: RelayResponse = response.json().map_err(|e| {
            AIError::InvalidResponse(format!("Failed to parse relay response: {}", e))
        })?;

        relayed.text.ok_or_else(|| AIError::EmptyResponse.into())
    }
}

impl ModelBackend for RelayClient {
    fn generate(&self, prompt: &str) -> AppResult<String> {
        RelayClient::generate(self, prompt)
    }

    fn name(&self) -> &'static str {
        "relay"
    }
}
