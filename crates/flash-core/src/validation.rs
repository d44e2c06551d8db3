//! # Validation Module
//!
//! Input validation for the sign-in form and catalog queries.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Auth form (storefront)                                       │
//! │  ├── Empty email/password check                                        │
//! │  └── Submit button enablement (is_form_valid)                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Format and length rules, trimmed input                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Identity provider                                            │
//! │  └── EMAIL_EXISTS, WEAK_PASSWORD, INVALID_EMAIL, ...                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::MIN_PASSWORD_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest email accepted before hitting the provider.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Validates an email address and returns it trimmed.
///
/// ## Rules
/// - Must not be empty
/// - Exactly one `@` with a non-empty local part and a dotted domain
/// - No whitespace inside
///
/// ## Example
/// ```rust
/// use flash_core::validation::validate_email;
///
/// assert_eq!(validate_email("  demo@email.com ").unwrap(), "demo@email.com");
/// assert!(validate_email("demo@").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LENGTH,
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
        .ok_or_else(|| invalid("missing '@'"))?;

    if local.is_empty() || domain.contains('@') {
        return Err(invalid("must look like name@example.com"));
    }

    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid("domain must contain a dot"));
    }

    Ok(email.to_string())
}

/// Validates a password and returns it trimmed.
///
/// Sign-in only requires a non-empty password. Sign-up also requires
/// [`MIN_PASSWORD_LENGTH`] characters.
pub fn validate_password(password: &str, sign_up: bool) -> ValidationResult<String> {
    let password = password.trim();

    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if sign_up && password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LENGTH,
        });
    }

    Ok(password.to_string())
}

/// Validates a category name used as a query filter.
pub fn validate_category_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "category".to_string(),
        });
    }

    if name.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "category".to_string(),
            max: 100,
        });
    }

    Ok(name.to_string())
}

/// Validates a whole-percent discount.
///
/// The cart accepts any value; the catalog decoder uses this to flag
/// suspicious documents.
pub fn validate_discount_percent(percent: i64) -> ValidationResult<u32> {
    if !(0..=100).contains(&percent) {
        return Err(ValidationError::OutOfRange {
            field: "discountPercent".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(percent as u32)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("demo@email.com").is_ok());
        assert!(validate_email("first.last+tag@shop.co.uk").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("   ").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@email.com").is_err());
        assert!(validate_email("a@b@c.com").is_err());
        assert!(validate_email("user@localhost").is_err());
        assert!(validate_email("us er@email.com").is_err());
        assert!(validate_email(&format!("{}@x.com", "a".repeat(260))).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert_eq!(validate_password(" secret ", false).unwrap(), "secret");
        assert!(validate_password("abc", false).is_ok());
        assert!(validate_password("abc", true).is_err());
        assert!(validate_password("abcdef", true).is_ok());
        assert!(validate_password("   ", false).is_err());
    }

    #[test]
    fn test_validate_category_name() {
        assert_eq!(validate_category_name(" Shirts ").unwrap(), "Shirts");
        assert!(validate_category_name("").is_err());
        assert!(validate_category_name(&"A".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_discount_percent() {
        assert_eq!(validate_discount_percent(0).unwrap(), 0);
        assert_eq!(validate_discount_percent(100).unwrap(), 100);
        assert!(validate_discount_percent(-1).is_err());
        assert!(validate_discount_percent(101).is_err());
    }
}
