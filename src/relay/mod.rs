//! The credential-holding relay server.
//!
//! Callers in relay mode never see the provider key; they post prompts (or
//! whole dreams) here and this process forwards them using the key from its
//! own environment.
//!
//! # Routes
//!
//! - `POST /generate` with `{"prompt": "..."}` answers `{"text": "..."}`
//! - `POST /dream-ai?action=reflect` with `{"dream": {...}}` answers `{"reflection": "..."}`
//! - `POST /dream-ai?action=analyze` with `{"dreams": [...]}` answers `{"analysis": "..."}`
//! - `GET /health` answers `ok`
//!
//! Provider calls use a blocking HTTP client, so handlers run them on the
//! blocking thread pool.

use crate::ai::{DreamOracle, GeminiClient, ModelBackend};
use crate::config::Config;
use crate::constants::{RELAY_DREAM_AI_ROUTE, RELAY_GENERATE_ROUTE, RELAY_HEALTH_ROUTE};
use crate::errors::{AppError, AppResult};
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Shared state for relay handlers.
pub struct RelayState {
    backend: Arc<dyn ModelBackend>,
    oracle: DreamOracle,
    token: Option<String>,
}

impl RelayState {
    /// Creates relay state over `backend`, requiring `token` from callers when set.
    pub fn new(backend: Arc<dyn ModelBackend>, token: Option<String>) -> Self {
        Self {
            oracle: DreamOracle::from_shared(backend.clone()),
            backend,
            token,
        }
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let Some(expected) = self.token.as_deref() else {
            return true;
        };

        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .is_some_and(|presented| presented == expected)
    }
}

#[derive(Debug, Deserialize)]
pub struct DreamAiQuery {
    action: Option<String>,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn parse_body(body: &Bytes) -> Result<Value, Response> {
    serde_json::from_slice(body)
        .map_err(|_| error_response(StatusCode::BAD_REQUEST, "Request body must be JSON"))
}

/// Runs `task` on the blocking pool, mapping a panicked task to a 500.
async fn off_runtime<T, F>(task: F) -> Result<T, Response>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task).await.map_err(|e| {
        error!("Relay worker failed: {}", e);
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
    })
}

/// Forwards a raw prompt to the provider.
pub async fn generate(
    State(state): State<Arc<RelayState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !state.authorized(&headers) {
        return error_response(StatusCode::UNAUTHORIZED, "Unauthorized");
    }

    let request = match parse_body(&body) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let prompt = match request.get("prompt").and_then(Value::as_str) {
        Some(p) if !p.trim().is_empty() => p.to_string(),
        _ => return error_response(StatusCode::BAD_REQUEST, "Missing prompt"),
    };

    debug!(chars = prompt.len(), "Relaying prompt");
    let backend = state.backend.clone();
    let result = match off_runtime(move || backend.generate(&prompt)).await {
        Ok(result) => result,
        Err(response) => return response,
    };

    match result {
        Ok(text) => Json(json!({ "text": text })).into_response(),
        Err(e) => {
            warn!(error = %e, "Provider call failed");
            error_response(StatusCode::BAD_GATEWAY, "Model provider request failed")
        }
    }
}

/// Builds dream prompts server-side and always answers with displayable text.
pub async fn dream_ai(
    State(state): State<Arc<RelayState>>,
    Query(query): Query<DreamAiQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !state.authorized(&headers) {
        return error_response(StatusCode::UNAUTHORIZED, "Unauthorized");
    }

    let request = match parse_body(&body) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let oracle = state.oracle.clone();

    match query.action.as_deref() {
        Some("reflect") => {
            let dream = match request.get("dream") {
                Some(d) if !d.is_null() => d.clone(),
                _ => return error_response(StatusCode::BAD_REQUEST, "Missing dream"),
            };
            match off_runtime(move || oracle.reflect(&dream)).await {
                Ok(reflection) => Json(json!({ "reflection": reflection })).into_response(),
                Err(response) => response,
            }
        }
        Some("analyze") => {
            let dreams = match request.get("dreams") {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(items)) => items.clone(),
                Some(_) => {
                    return error_response(StatusCode::BAD_REQUEST, "dreams must be an array")
                }
            };
            match off_runtime(move || oracle.analyze_patterns(&dreams)).await {
                Ok(analysis) => Json(json!({ "analysis": analysis })).into_response(),
                Err(response) => response,
            }
        }
        _ => error_response(StatusCode::BAD_REQUEST, "Unknown action"),
    }
}

/// Liveness probe.
pub async fn health() -> &'static str {
    "ok"
}

/// Builds the relay router.
pub fn router(state: Arc<RelayState>) -> Router {
    Router::new()
        .route(RELAY_GENERATE_ROUTE, post(generate))
        .route(RELAY_DREAM_AI_ROUTE, post(dream_ai))
        .route(RELAY_HEALTH_ROUTE, get(health))
        .with_state(state)
}

/// Runs the relay server until the process is stopped.
///
/// # Errors
///
/// Returns an error if the provider credential is missing, the runtime
/// cannot start, or the address cannot be bound.
pub fn serve(config: &Config) -> AppResult<()> {
    // The blocking client must be built outside the async runtime
    let client = GeminiClient::new(config.gemini_settings()?, config.request_timeout)?;
    let state = Arc::new(RelayState::new(
        Arc::new(client),
        config.relay_token.clone(),
    ));

    if state.token.is_none() {
        warn!("No relay token configured, accepting unauthenticated requests");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let addr = config.relay_addr.clone();
    let app = router(state.clone());
    let result = runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::Config(format!("Cannot bind relay to {}: {}", addr, e)))?;
        info!("Relay listening on {}", addr);
        axum::serve(listener, app).await?;
        Ok::<(), AppError>(())
    });

    // `state` holds the last reference, so the client is dropped off the runtime
    drop(runtime);
    drop(state);
    result
}
