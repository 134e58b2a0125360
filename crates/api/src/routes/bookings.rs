//! Booking intake handlers.
//!
//! A booking that passes validation is always persisted; conversion linking
//! and the confirmation notification are best-effort side effects that
//! never block or roll back the booking itself.

use axum::{extract::State, http::StatusCode, Json};
use tracing::{debug, info, warn};
use validator::Validate;

use domain::models::notification::TemplateKind;
use domain::models::{Booking, BookingResponse, CreateBookingRequest, Customer};
use persistence::repositories::{BookingRepository, CustomerRepository, TrackingLinkRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_conversion_linked;
use crate::services::dispatch::NotificationRequest;
use crate::services::templates::booking_confirmation;

/// Create a new booking.
///
/// POST /api/v1/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    request.validate()?;

    let customers = CustomerRepository::new(state.pool.clone());
    let customer: Customer = customers
        .find_by_customer_id(request.customer_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Customer not found".to_string()))?
        .into();

    let bookings = BookingRepository::new(state.pool.clone());
    let booking: Booking = bookings
        .create(
            customer.customer_id,
            &request.service,
            request.starts_at,
            request.notes.as_deref(),
        )
        .await?
        .into();

    info!(
        booking_id = %booking.booking_id,
        customer_id = %customer.customer_id,
        service = %booking.service,
        "Booking created"
    );

    let settings = state.settings.current().await;

    // Attribute the booking to the most recent outstanding reminder link,
    // if one exists inside the window. Most bookings are not attributable;
    // that is a no-op, not an error.
    let tracking = TrackingLinkRepository::new(state.pool.clone());
    match tracking
        .link_latest_for_customer(
            customer.customer_id,
            booking.booking_id,
            booking.created_at,
            settings.conversion_window_days,
        )
        .await
    {
        Ok(Some(link)) => {
            record_conversion_linked();
            info!(
                booking_id = %booking.booking_id,
                tracking_id = %link.tracking_id,
                "Booking attributed to reminder"
            );
        }
        Ok(None) => {}
        Err(e) => {
            warn!(booking_id = %booking.booking_id, error = %e, "Conversion linking failed");
        }
    }

    // Confirmation notification, also best-effort.
    if let Some((channel, recipient)) = customer.preferred_channel() {
        let content = booking_confirmation(&customer.name, &booking.service, booking.starts_at);
        let notification = NotificationRequest {
            customer_id: customer.customer_id,
            channel,
            recipient: recipient.to_string(),
            template: TemplateKind::BookingConfirmation,
            content,
            tracking_id: None,
        };

        match state.dispatch.dispatch(notification, &settings).await {
            Ok(outcome) => {
                debug!(booking_id = %booking.booking_id, outcome = ?outcome, "Confirmation dispatched");
            }
            Err(e) => {
                warn!(booking_id = %booking.booking_id, error = %e, "Confirmation dispatch failed");
            }
        }
    } else {
        debug!(
            booking_id = %booking.booking_id,
            "Customer has no reachable channel, skipping confirmation"
        );
    }

    Ok((StatusCode::CREATED, Json(booking.into())))
}
