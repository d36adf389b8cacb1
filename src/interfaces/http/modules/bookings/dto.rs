//! Booking DTOs

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::application::BookingRequest;

/// Body of `POST /api/v1/bookings`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBookingRequest {
    #[validate(length(min = 1, message = "resource_id is required"))]
    pub resource_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[validate(length(min = 1, max = 64, message = "renter_id must be 1-64 chars"))]
    pub renter_id: Option<String>,
}

impl From<CreateBookingRequest> for BookingRequest {
    fn from(body: CreateBookingRequest) -> Self {
        Self {
            resource_id: body.resource_id,
            start: body.start,
            end: body.end,
            renter_id: body.renter_id,
        }
    }
}

/// Body of `POST /api/v1/quotes`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuoteRequest {
    #[validate(length(min = 1, message = "resource_id is required"))]
    pub resource_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}
