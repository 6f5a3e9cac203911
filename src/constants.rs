//! Constants used throughout the application.
//!
//! This module contains all constants used in the Reverie application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "reverie";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A dream journal with gentle AI reflections";

// CLI Arguments & Defaults
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Number of emotions shown by the emotion spectrum unless overridden.
pub const DEFAULT_SPECTRUM_LIMIT: usize = 5;

// Configuration Keys & Environment Variables
/// Environment variable selecting how the model is reached (`relay` or `direct`).
pub const ENV_VAR_AI_MODE: &str = "REVERIE_AI_MODE";
/// Environment variable for the relay endpoint used in relay mode.
pub const ENV_VAR_RELAY_URL: &str = "REVERIE_RELAY_URL";
/// Environment variable for the bearer token shared between caller and relay.
pub const ENV_VAR_RELAY_TOKEN: &str = "REVERIE_RELAY_TOKEN";
/// Environment variable for the relay server bind address.
pub const ENV_VAR_RELAY_ADDR: &str = "REVERIE_RELAY_ADDR";
/// Environment variable holding the model provider credential.
pub const ENV_VAR_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
/// Environment variable overriding the model provider base URL.
pub const ENV_VAR_GEMINI_BASE_URL: &str = "REVERIE_GEMINI_BASE_URL";
/// Environment variable overriding the model name.
pub const ENV_VAR_GEMINI_MODEL: &str = "REVERIE_GEMINI_MODEL";
/// Environment variable for the dream database path.
pub const ENV_VAR_DB: &str = "REVERIE_DB";
/// Environment variable for an optional per-request timeout in seconds.
pub const ENV_VAR_TIMEOUT_SECS: &str = "REVERIE_TIMEOUT_SECS";

/// Default relay endpoint.
pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:8787/generate";
/// Default relay server bind address.
pub const DEFAULT_RELAY_ADDR: &str = "127.0.0.1:8787";
/// Default model provider base URL.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Default model used for reflections and analyses.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
/// Default location of the dream database.
pub const DEFAULT_DB_PATH: &str = "~/.local/share/reverie/dreams.db";

// Validation
/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

// Prompt Rendering
/// Substituted for any absent dream field in a reflection prompt.
pub const FIELD_NOT_PROVIDED: &str = "未提供";
/// Substituted for any absent dream field in an analysis summary line.
pub const FIELD_UNKNOWN: &str = "未知";
/// Substituted for a timestamp that cannot be turned into a date.
pub const UNKNOWN_DATE: &str = "未知日期";
/// Date format string for ISO date format (YYYY-MM-DD).
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Separator used when joining keyword lists.
pub const LIST_SEPARATOR: &str = ", ";

// Fallback Sentences
/// Returned by a reflection whenever the model cannot supply text.
pub const REFLECTION_FALLBACK: &str =
    "抱歉，我现在无法进行解读。请先保存下这个梦，稍后静下心来，或许你自己会有新的发现。";
/// Returned by a pattern analysis whenever the model cannot supply text.
pub const ANALYSIS_FALLBACK: &str = "暂时无法分析梦境模式。";
/// Returned by a pattern analysis over zero dreams.
pub const NOT_ENOUGH_DREAMS: &str = "还没有足够的梦境来分析模式。";

// Relay Routes
/// Route accepting `{"prompt": ...}` bodies.
pub const RELAY_GENERATE_ROUTE: &str = "/generate";
/// Route accepting raw dream records with an `action` query parameter.
pub const RELAY_DREAM_AI_ROUTE: &str = "/dream-ai";
/// Liveness route.
pub const RELAY_HEALTH_ROUTE: &str = "/health";

// Logging Configuration
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "reverie";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";
