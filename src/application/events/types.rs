//! Booking events
//!
//! Facts published after a booking attempt or a status change is final.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    ReservationCommitted(ReservationCommittedEvent),
    BookingRejected(BookingRejectedEvent),
    ReservationCancelled(ReservationCancelledEvent),
    ReservationCompleted(ReservationCompletedEvent),
}

impl Event {
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::ReservationCommitted(_) => "reservation_committed",
            Event::BookingRejected(_) => "booking_rejected",
            Event::ReservationCancelled(_) => "reservation_cancelled",
            Event::ReservationCompleted(_) => "reservation_completed",
        }
    }

    pub fn resource_id(&self) -> &str {
        match self {
            Event::ReservationCommitted(e) => &e.resource_id,
            Event::BookingRejected(e) => &e.resource_id,
            Event::ReservationCancelled(e) => &e.resource_id,
            Event::ReservationCompleted(e) => &e.resource_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCommittedEvent {
    pub reservation_id: String,
    pub resource_id: String,
    pub renter_id: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub total: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRejectedEvent {
    pub resource_id: String,
    /// Machine-readable rejection code
    pub reason: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCancelledEvent {
    pub reservation_id: String,
    pub resource_id: String,
    pub refund: Decimal,
    pub free_cancellation: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCompletedEvent {
    pub reservation_id: String,
    pub resource_id: String,
    pub late_fee: Decimal,
    pub deposit_refund: Decimal,
}

/// Wrapper for sending events with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

impl EventMessage {
    pub fn new(event: Event) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event,
        }
    }
}
