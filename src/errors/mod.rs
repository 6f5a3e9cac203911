//! Error handling utilities for the reverie application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.
//!
//! Note that the reflection pipeline itself never hands these errors to its
//! callers: `DreamOracle` collapses them into fallback sentences. They surface
//! only from configuration, storage and the CLI.

use std::io;
use thiserror::Error;

/// Represents specific error cases that can occur during database operations.
///
/// # Examples
///
/// ```
/// use reverie::errors::DatabaseError;
///
/// let error = DatabaseError::NotFound("Dream with id abc not found".to_string());
/// assert!(format!("{}", error).contains("not found"));
/// ```
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLite database error.
    #[error("Database error: {0}\n\nIf you're seeing 'file is not a database', the dream store may be corrupted or belong to another application.")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("Failed to get connection from pool: {0}\n\nThis may indicate database connection issues. Try closing other reverie instances.")]
    Pool(#[from] r2d2::Error),

    /// Requested dream not found in database.
    #[error("Dream not found: {0}")]
    NotFound(String),
}

/// Represents specific error cases that can occur while talking to a model.
///
/// These never reach a user directly; the gateway logs them and substitutes a
/// fallback sentence.
///
/// # Examples
///
/// ```
/// use reverie::errors::AIError;
///
/// let error = AIError::Api { status: 503, body: "overloaded".to_string() };
/// assert!(format!("{}", error).contains("503"));
/// ```
#[derive(Debug, Error)]
pub enum AIError {
    /// The model endpoint could not be reached, or the request timed out.
    #[error("Model endpoint unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("Model endpoint returned HTTP {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, for server-side diagnostics only
        body: String,
    },

    /// The response body could not be understood.
    #[error("Invalid response from model endpoint: {0}")]
    InvalidResponse(String),

    /// The response was well-formed but carried no usable text.
    #[error("Model endpoint returned no text")]
    EmptyResponse,
}

/// Represents all possible errors that can occur in the reverie application.
///
/// This enum is the central error type used across the application, with variants
/// for different error categories. It uses `thiserror` for deriving the `Error` trait
/// implementation and formatted error messages.
///
/// # Examples
///
/// Creating a configuration error:
/// ```
/// use reverie::errors::AppError;
///
/// let error = AppError::Config("GEMINI_API_KEY is not set".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: GEMINI_API_KEY is not set");
/// ```
///
/// Converting from an IO error:
/// ```
/// use reverie::errors::AppError;
/// use std::io::{self, ErrorKind};
///
/// let io_error = io::Error::new(ErrorKind::NotFound, "file not found");
/// let app_error: AppError = io_error.into();
///
/// match app_error {
///     AppError::Io(inner) => assert_eq!(inner.kind(), ErrorKind::NotFound),
///     _ => panic!("Expected Io variant"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem or socket operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors in dream handling (unknown ids, unusable input files).
    #[error("Dream error: {0}")]
    Dream(String),

    /// Errors serializing or parsing JSON documents.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors related to database operations.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Errors related to model calls.
    #[error("AI error: {0}")]
    AI(#[from] AIError),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use reverie::errors::{AppResult, AppError};
///
/// fn might_fail() -> AppResult<String> {
///     if false {
///         return Err(AppError::Dream("Something went wrong".to_string()));
///     }
///     Ok("Operation succeeded".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;
