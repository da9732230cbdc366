//! Common validation utilities.
//!
//! Custom validation functions used by request DTOs via `#[validate(custom)]`
//! attributes, plus a few helpers handlers call directly.

use chrono::{NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid regex");
}

/// Validates an email address format.
pub fn validate_email_format(email: &str) -> Result<(), ValidationError> {
    if EMAIL_REGEX.is_match(email.trim()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("email_format");
        err.message = Some("Please provide a valid email address".into());
        Err(err)
    }
}

/// Validates password strength: at least 6 characters with one uppercase
/// letter, one lowercase letter, and one digit.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        let mut err = ValidationError::new("password_length");
        err.message = Some("Password must be at least 6 characters long".into());
        return Err(err);
    }

    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if has_upper && has_lower && has_digit {
        Ok(())
    } else {
        let mut err = ValidationError::new("password_strength");
        err.message = Some(
            "Password must contain an uppercase letter, a lowercase letter, and a number".into(),
        );
        Err(err)
    }
}

/// Validates that a string has at least `min` non-whitespace-padded characters.
pub fn trimmed_min_length(value: &str, min: usize) -> bool {
    value.trim().chars().count() >= min
}

/// Validates that an item date is not in the future (UTC).
pub fn validate_date_not_future(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date > Utc::now().date_naive() {
        let mut err = ValidationError::new("date_future");
        err.message = Some("Date cannot be in the future".into());
        return Err(err);
    }
    Ok(())
}

/// Validates a verification message: at least 10 characters after trimming.
pub fn validate_verification_message(message: &str) -> Result<(), ValidationError> {
    if trimmed_min_length(message, 10) {
        Ok(())
    } else {
        let mut err = ValidationError::new("verification_message_length");
        err.message = Some("Verification message must be at least 10 characters".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_validate_email_format_valid() {
        assert!(validate_email_format("alice@campus.edu").is_ok());
        assert!(validate_email_format("bob.smith+tag@example.co.uk").is_ok());
        assert!(validate_email_format("  padded@campus.edu  ").is_ok());
    }

    #[test]
    fn test_validate_email_format_invalid() {
        assert!(validate_email_format("not-an-email").is_err());
        assert!(validate_email_format("missing@domain").is_err());
        assert!(validate_email_format("@campus.edu").is_err());
        assert!(validate_email_format("alice@").is_err());
        assert!(validate_email_format("").is_err());
    }

    #[test]
    fn test_validate_email_format_error_message() {
        let err = validate_email_format("bad").unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Please provide a valid email address"
        );
    }

    #[test]
    fn test_validate_password_strength_valid() {
        assert!(validate_password_strength("Abc123").is_ok());
        assert!(validate_password_strength("Secure1Password").is_ok());
    }

    #[test]
    fn test_validate_password_strength_too_short() {
        let err = validate_password_strength("Ab1").unwrap_err();
        assert_eq!(err.code, "password_length");
    }

    #[test]
    fn test_validate_password_strength_missing_classes() {
        // No uppercase
        assert!(validate_password_strength("abc123").is_err());
        // No lowercase
        assert!(validate_password_strength("ABC123").is_err());
        // No digit
        assert!(validate_password_strength("Abcdef").is_err());
    }

    #[test]
    fn test_validate_password_strength_error_code() {
        let err = validate_password_strength("abcdef").unwrap_err();
        assert_eq!(err.code, "password_strength");
    }

    #[test]
    fn test_trimmed_min_length() {
        assert!(trimmed_min_length("ab", 2));
        assert!(!trimmed_min_length(" a ", 2));
        assert!(!trimmed_min_length("          ", 2));
        assert!(trimmed_min_length("  hello  ", 5));
    }

    #[test]
    fn test_validate_date_not_future_today() {
        let today = Utc::now().date_naive();
        assert!(validate_date_not_future(&today).is_ok());
    }

    #[test]
    fn test_validate_date_not_future_past() {
        let yesterday = Utc::now().date_naive() - Duration::days(1);
        assert!(validate_date_not_future(&yesterday).is_ok());
    }

    #[test]
    fn test_validate_date_not_future_rejects_tomorrow() {
        let tomorrow = Utc::now().date_naive() + Duration::days(1);
        let err = validate_date_not_future(&tomorrow).unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Date cannot be in the future"
        );
    }

    #[test]
    fn test_validate_verification_message() {
        assert!(validate_verification_message("I lost this near the library").is_ok());
        assert!(validate_verification_message("too short").is_err());
        assert!(validate_verification_message("         x         ").is_err());
    }
}
