use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{PriceBreakdown, RateUnit, RentalWindow, Reservation};

use super::rejection::BookingRejection;

/// One attempt to reserve a bike for `[start, end)`.
///
/// The window is carried unchecked; validating it is the first step of the
/// booking run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub resource_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub renter_id: Option<String>,
}

impl BookingRequest {
    pub fn new(resource_id: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            resource_id: resource_id.into(),
            start,
            end,
            renter_id: None,
        }
    }

    pub fn with_renter(mut self, renter_id: impl Into<String>) -> Self {
        self.renter_id = Some(renter_id.into());
        self
    }
}

/// `Committed(reservation)` or `Rejected(reason)`
pub type BookingOutcome = Result<Reservation, BookingRejection>;

/// Price of a window without reserving anything
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub resource_id: String,
    pub window: RentalWindow,
    pub rate_unit: RateUnit,
    pub price: PriceBreakdown,
}

/// Result of cancelling an active reservation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cancellation {
    pub reservation: Reservation,
    /// Amount returned to the renter
    pub refund: rust_decimal::Decimal,
    /// Whether the cancellation happened inside the free window
    pub free_cancellation: bool,
}

/// Result of marking a reservation as returned
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Completion {
    pub reservation: Reservation,
    /// Started hours billed past the grace period
    pub late_hours: i64,
    pub late_fee: rust_decimal::Decimal,
    /// Deposit left after the late fee
    pub deposit_refund: rust_decimal::Decimal,
    /// Late fee the deposit did not cover
    pub balance_due: rust_decimal::Decimal,
}
