//! Common validation utilities.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

/// Minimum number of digits in a contact phone number.
const MIN_PHONE_DIGITS: usize = 10;

lazy_static! {
    static ref USERNAME_RE: Regex = Regex::new(r"^[a-z0-9_]+$").expect("valid regex");
}

/// Validates an organizer username: lowercase letters, digits and underscore
/// only. Callers lowercase the input before checking uniqueness; this rejects
/// anything that survives lowercasing with other characters.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if !username.is_empty() && USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        let mut err = ValidationError::new("username_format");
        err.message = Some("Username may only contain letters, digits and _".into());
        Err(err)
    }
}

/// Validates a contact phone number: at least 10 digits once separators and
/// punctuation are stripped, matching the original storefront rule.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    if digits >= MIN_PHONE_DIGITS {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone_too_short");
        err.message = Some("Phone must contain at least 10 digits".into());
        Err(err)
    }
}

/// Validates a platform fee percentage (0 to 100).
pub fn validate_fee_percent(percent: f64) -> Result<(), ValidationError> {
    if (0.0..=100.0).contains(&percent) {
        Ok(())
    } else {
        let mut err = ValidationError::new("fee_percent_range");
        err.message = Some("Fee percent must be between 0 and 100".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("maria_123").is_ok());
        assert!(validate_username("a").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("Maria").is_err());
        assert!(validate_username("maria!").is_err());
        assert!(validate_username("maria silva").is_err());
    }

    #[test]
    fn test_validate_username_error_message() {
        let err = validate_username("no-dashes").unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Username may only contain letters, digits and _"
        );
    }

    #[test]
    fn test_validate_phone_accepts_formatted() {
        assert!(validate_phone("(88) 99999-0000").is_ok());
        assert!(validate_phone("8899990000").is_ok());
        assert!(validate_phone("+55 88 9999-0000").is_ok());
    }

    #[test]
    fn test_validate_phone_too_short() {
        assert!(validate_phone("8888-0000").is_err());
        assert!(validate_phone("").is_err());
        assert!(validate_phone("abc").is_err());
    }

    #[test]
    fn test_validate_fee_percent() {
        assert!(validate_fee_percent(0.0).is_ok());
        assert!(validate_fee_percent(5.0).is_ok());
        assert!(validate_fee_percent(100.0).is_ok());
        assert!(validate_fee_percent(-0.1).is_err());
        assert!(validate_fee_percent(100.1).is_err());
    }
}
