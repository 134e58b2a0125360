//! HTTP route handlers.

pub mod admin;
pub mod bookings;
pub mod health;
pub mod sweeps;
pub mod tracking;
pub mod webhooks;
