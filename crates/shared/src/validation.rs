//! Common validation utilities.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

/// Maximum allowed past tolerance for booking start times (5 minutes for
/// clock skew between clients and the server).
const MAX_PAST_TOLERANCE_SECS: i64 = 300;

/// Maximum distance into the future a booking may be placed (1 year).
const MAX_FUTURE_DAYS: i64 = 365;

lazy_static! {
    /// E.164 phone number: leading +, 8 to 15 digits, no leading zero.
    static ref E164_REGEX: Regex = Regex::new(r"^\+[1-9]\d{7,14}$").expect("valid regex");
}

/// Validates that a phone number is in E.164 format.
pub fn validate_phone_e164(phone: &str) -> Result<(), ValidationError> {
    if E164_REGEX.is_match(phone) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone_format");
        err.message = Some("Phone number must be in E.164 format (e.g. +14155551234)".into());
        Err(err)
    }
}

/// Validates that a string is non-empty after trimming whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates that a booking start time is in the future.
/// - Allows up to 5 minutes in the past for clock skew
/// - Must not be more than 1 year out
pub fn validate_booking_start(starts_at: &DateTime<Utc>) -> Result<(), ValidationError> {
    let now = Utc::now();

    let past_limit = now - chrono::Duration::seconds(MAX_PAST_TOLERANCE_SECS);
    if *starts_at < past_limit {
        let mut err = ValidationError::new("starts_at_past");
        err.message = Some("Booking start time must be in the future".into());
        return Err(err);
    }

    let future_limit = now + chrono::Duration::days(MAX_FUTURE_DAYS);
    if *starts_at > future_limit {
        let mut err = ValidationError::new("starts_at_too_far");
        err.message = Some("Booking start time cannot be more than a year out".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Phone number tests
    #[test]
    fn test_validate_phone_e164() {
        assert!(validate_phone_e164("+14155551234").is_ok());
        assert!(validate_phone_e164("+442071838750").is_ok());
        assert!(validate_phone_e164("+12025550199").is_ok());
    }

    #[test]
    fn test_validate_phone_e164_rejects_missing_plus() {
        assert!(validate_phone_e164("14155551234").is_err());
    }

    #[test]
    fn test_validate_phone_e164_rejects_leading_zero() {
        assert!(validate_phone_e164("+04155551234").is_err());
    }

    #[test]
    fn test_validate_phone_e164_rejects_short_and_long() {
        assert!(validate_phone_e164("+1234567").is_err());
        assert!(validate_phone_e164("+1234567890123456").is_err());
    }

    #[test]
    fn test_validate_phone_e164_rejects_formatting() {
        assert!(validate_phone_e164("+1 415 555 1234").is_err());
        assert!(validate_phone_e164("+1-415-555-1234").is_err());
    }

    #[test]
    fn test_validate_phone_e164_error_message() {
        let err = validate_phone_e164("bogus").unwrap_err();
        assert!(err.message.unwrap().to_string().contains("E.164"));
    }

    // Blank string tests
    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Biscuit").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("\t\n").is_err());
    }

    // Booking start tests
    #[test]
    fn test_validate_booking_start_future() {
        let tomorrow = Utc::now() + chrono::Duration::days(1);
        assert!(validate_booking_start(&tomorrow).is_ok());
    }

    #[test]
    fn test_validate_booking_start_slight_past_allowed() {
        // 1 minute ago is within clock skew tolerance
        let just_passed = Utc::now() - chrono::Duration::minutes(1);
        assert!(validate_booking_start(&just_passed).is_ok());
    }

    #[test]
    fn test_validate_booking_start_past_rejected() {
        let yesterday = Utc::now() - chrono::Duration::days(1);
        assert!(validate_booking_start(&yesterday).is_err());
    }

    #[test]
    fn test_validate_booking_start_too_far_out() {
        let in_two_years = Utc::now() + chrono::Duration::days(730);
        assert!(validate_booking_start(&in_two_years).is_err());
    }

    #[test]
    fn test_validate_booking_start_error_messages() {
        let past = Utc::now() - chrono::Duration::days(2);
        let err = validate_booking_start(&past).unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Booking start time must be in the future"
        );
    }
}
