//! # Error Types
//!
//! Domain-specific error types for hemma-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  hemma-core errors (this file)                                         │
//! │  └── ValidationError  - Sign-up input failures                         │
//! │                                                                         │
//! │  hemma-db errors (separate crate)                                      │
//! │  └── DbError          - Storage failures                               │
//! │                                                                         │
//! │  hemma-app errors                                                      │
//! │  └── AppError         - What the presentation layer sees               │
//! │                                                                         │
//! │  Flow: ValidationError / DbError → AppError → Screen                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Business outcomes like "wrong password" or "unknown product" are NOT
//! errors. They come back as `bool` / `Option` from the manager.

use thiserror::Error;

/// Input validation errors.
///
/// The `Display` text is short enough to show next to a form field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., email without a domain).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Password and its confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,
}

impl ValidationError {
    /// Creates a Required error for the given field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Returns the name of the offending field, if there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::InvalidFormat { field, .. } => Some(field),
            ValidationError::PasswordMismatch => None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::required("email");
        assert_eq!(err.to_string(), "email is required");

        let err = ValidationError::TooShort {
            field: "password".to_string(),
            min: 6,
        };
        assert_eq!(err.to_string(), "password must be at least 6 characters");

        assert_eq!(
            ValidationError::PasswordMismatch.to_string(),
            "Passwords do not match"
        );
    }

    #[test]
    fn test_field_name() {
        assert_eq!(ValidationError::required("name").field(), Some("name"));
        assert_eq!(ValidationError::PasswordMismatch.field(), None);
    }
}
