//! # Validation Module
//!
//! Input rules for registration and sign-in.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Screen                                                       │
//! │  └── Immediate field feedback                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: AppHandle::sign_up (hemma-app)                               │
//! │  └── THIS MODULE: field and confirmation rules                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: StoreManager + SQLite                                        │
//! │  ├── Email existence check                                             │
//! │  └── UNIQUE(email) constraint                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use hemma_core::validation::validate_sign_up;
//!
//! assert!(validate_sign_up("Ann", "ann@example.com", "secret1", "secret1").is_ok());
//! assert!(validate_sign_up("Ann", "ann@example.com", "secret1", "secret2").is_err());
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Maximum display name length.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum email length (RFC 5321).
pub const MAX_EMAIL_LEN: usize = 254;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a display name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most 100 characters
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - At most 254 characters
/// - Exactly one `@`, non-empty local part
/// - Domain contains a dot that is neither first nor last
///
/// ## Example
/// ```rust
/// use hemma_core::validation::validate_email;
///
/// assert!(validate_email("a@b.com").is_ok());
/// assert!(validate_email("a@b").is_err());
/// assert!(validate_email("@b.com").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    if email.trim().is_empty() {
        return Err(ValidationError::required("email"));
    }

    if email.len() > MAX_EMAIL_LEN {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LEN,
        });
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| invalid("must contain an @ symbol"))?;

    if local.is_empty() {
        return Err(invalid("local part cannot be empty"));
    }

    if domain.contains('@') {
        return Err(invalid("must contain a single @ symbol"));
    }

    let dotted = domain
        .find('.')
        .is_some_and(|pos| pos > 0 && !domain.ends_with('.'));
    if !dotted {
        return Err(invalid("domain must look like example.com"));
    }

    Ok(())
}

/// Validates a new password.
///
/// ## Rules
/// - Must not be empty
/// - At least 6 characters
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::required("password"));
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Form Validators
// =============================================================================

/// Validates a complete registration form.
///
/// ## Order
/// The confirmation check runs first so a mismatch is always reported as
/// "Passwords do not match", then name, email and password in form order.
pub fn validate_sign_up(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> ValidationResult<()> {
    if password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }

    validate_name(name)?;
    validate_email(email)?;
    validate_password(password)?;

    Ok(())
}

/// Checks sign-in input before any lookup.
///
/// Only emptiness is checked: a malformed email simply matches no account.
pub fn validate_sign_in(email: &str, password: &str) -> ValidationResult<()> {
    if email.trim().is_empty() {
        return Err(ValidationError::required("email"));
    }

    if password.is_empty() {
        return Err(ValidationError::required("password"));
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
