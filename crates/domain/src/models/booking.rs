//! Booking domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::validation::{validate_booking_start, validate_not_blank};

/// A grooming appointment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Booking {
    pub id: i64,
    pub booking_id: Uuid,
    pub customer_id: Uuid,
    pub service: String,
    pub starts_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating a booking.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateBookingRequest {
    pub customer_id: Uuid,

    #[validate(
        length(min = 1, max = 100, message = "Service must be 1-100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub service: String,

    #[validate(custom(function = "validate_booking_start"))]
    pub starts_at: DateTime<Utc>,

    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,
}

/// Response payload for booking operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BookingResponse {
    pub booking_id: Uuid,
    pub customer_id: Uuid,
    pub service: String,
    pub starts_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            booking_id: b.booking_id,
            customer_id: b.customer_id,
            service: b.service,
            starts_at: b.starts_at,
            notes: b.notes,
            created_at: b.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn valid_request() -> CreateBookingRequest {
        CreateBookingRequest {
            customer_id: Uuid::new_v4(),
            service: "Full groom".to_string(),
            starts_at: Utc::now() + Duration::days(3),
            notes: None,
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_blank_service_rejected() {
        let mut request = valid_request();
        request.service = "   ".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_overlong_service_rejected() {
        let mut request = valid_request();
        request.service = "x".repeat(101);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_past_start_rejected() {
        let mut request = valid_request();
        request.starts_at = Utc::now() - Duration::days(1);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_overlong_notes_rejected() {
        let mut request = valid_request();
        request.notes = Some("n".repeat(501));
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_request_deserialization() {
        let json = r#"{
            "customer_id": "550e8400-e29b-41d4-a716-446655440000",
            "service": "Bath & brush",
            "starts_at": "2099-06-01T10:00:00Z"
        }"#;
        let request: CreateBookingRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.service, "Bath & brush");
        assert!(request.notes.is_none());
    }

    #[test]
    fn test_response_serialization() {
        let booking = Booking {
            id: 1,
            booking_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            service: "Nail trim".to_string(),
            starts_at: Utc::now() + Duration::days(1),
            notes: Some("anxious pup".to_string()),
            created_at: Utc::now(),
        };
        let response: BookingResponse = booking.into();
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"service\":\"Nail trim\""));
        assert!(json.contains("\"notes\":\"anxious pup\""));
    }
}
