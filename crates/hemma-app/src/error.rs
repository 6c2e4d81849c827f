//! # Application Error Type
//!
//! Unified error type returned by [`AppHandle`](crate::service::AppHandle).
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Hemma                                  │
//! │                                                                         │
//! │  Screen                      Rust Core                                  │
//! │  ──────                      ─────────                                  │
//! │                                                                         │
//! │  handle.sign_up(...)                                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Worker command                                                  │  │
//! │  │  Result<T, AppError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Form invalid? ─── ValidationError ──────────────┐              │  │
//! │  │         │                                        │              │  │
//! │  │         ▼                                        ▼              │  │
//! │  │  Store failed? ─── DbError::QueryFailed ──────► AppError ──────►│  │
//! │  │         │          (logged, never shown)                         │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  e.code    = "DUPLICATE_EMAIL"                                          │
//! │  e.message = "A user with this email already exists"                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serialization
//! `AppError` serializes with a machine-readable `code` and a message that
//! can be shown to the user as is.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

use hemma_core::ValidationError;
use hemma_db::DbError;

/// Message shown for a failed sign-in.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// Message shown when registering an email that is already taken.
pub const DUPLICATE_EMAIL_MESSAGE: &str = "A user with this email already exists";

/// Error returned from facade operations.
///
/// ```json
/// {
///   "code": "INVALID_CREDENTIALS",
///   "message": "Invalid email or password"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for facade responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Sign-in found no account with that email and password
    InvalidCredentials,

    /// Sign-up email is already registered
    DuplicateEmail,

    /// Sign-up form failed validation
    Validation,

    /// Storage operation failed
    Database,

    /// The worker task is no longer running
    ServiceUnavailable,
}

impl AppError {
    /// Creates a new error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_credentials() -> Self {
        AppError::new(ErrorCode::InvalidCredentials, INVALID_CREDENTIALS_MESSAGE)
    }

    pub fn duplicate_email() -> Self {
        AppError::new(ErrorCode::DuplicateEmail, DUPLICATE_EMAIL_MESSAGE)
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Validation, message)
    }

    /// The worker has stopped or dropped the reply.
    pub fn service_unavailable() -> Self {
        AppError::new(ErrorCode::ServiceUnavailable, "Store service is not running")
    }
}

/// Converts database errors to user-facing errors.
///
/// The underlying error is logged; the message returned is generic.
impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UniqueViolation { .. } => AppError::duplicate_email(),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                AppError::new(ErrorCode::Database, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                AppError::new(ErrorCode::Database, "Database migration failed")
            }
            DbError::PoolExhausted => {
                AppError::new(ErrorCode::Database, "Database is busy")
            }
            other => {
                tracing::error!("Database operation failed: {}", other);
                AppError::new(ErrorCode::Database, "Database operation failed")
            }
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

/// Result type for facade operations.
pub type AppResult<T> = Result<T, AppError>;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors raised while loading [`AppConfig`](crate::config::AppConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// No platform directory could be determined.
    #[error("Could not determine app data directory")]
    NoDataDir,
}

pub type ConfigResult<T> = Result<T, ConfigError>;
