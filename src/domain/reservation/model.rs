//! Reservation domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::window::RentalWindow;
use crate::domain::pricing::PriceBreakdown;
use crate::shared::{DomainError, DomainResult};

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Holds the bike for its window; the only status that blocks other bookings
    Active,
    /// Cancelled by the renter before pickup
    Cancelled,
    /// Bike returned
    Completed,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Only active reservations move, and only to a terminal status.
    pub fn can_move_to(self, to: ReservationStatus) -> bool {
        self == Self::Active && to != Self::Active
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A committed booking of one bike for one window.
///
/// Reservations are never deleted; the only mutation is the status moving
/// from `active` to `cancelled` or `completed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    /// Catalog item id of the reserved bike
    pub resource_id: String,
    pub renter_id: Option<String>,
    pub window: RentalWindow,
    pub status: ReservationStatus,
    pub price: PriceBreakdown,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    /// New active reservation with a fresh UUID.
    pub fn new(
        resource_id: impl Into<String>,
        renter_id: Option<String>,
        window: RentalWindow,
        price: PriceBreakdown,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            resource_id: resource_id.into(),
            renter_id,
            window,
            status: ReservationStatus::Active,
            price,
            created_at,
        }
    }

    pub fn total_price(&self) -> rust_decimal::Decimal {
        self.price.total
    }

    pub fn is_active(&self) -> bool {
        self.status == ReservationStatus::Active
    }

    /// Whether this reservation blocks `window` for its bike.
    pub fn blocks(&self, window: &RentalWindow) -> bool {
        self.is_active() && self.window.overlaps(window)
    }

    pub fn cancel(&mut self) -> DomainResult<()> {
        self.transition(ReservationStatus::Active, ReservationStatus::Cancelled)
    }

    pub fn complete(&mut self) -> DomainResult<()> {
        self.transition(ReservationStatus::Active, ReservationStatus::Completed)
    }

    /// Move from `from` to `to`, failing unless the current status is
    /// exactly `from` and the move is allowed. The status is untouched on
    /// failure.
    pub fn transition(&mut self, from: ReservationStatus, to: ReservationStatus) -> DomainResult<()> {
        if self.status != from || !from.can_move_to(to) {
            return Err(DomainError::InvalidTransition {
                id: self.id.clone(),
                from: self.status.as_str(),
                to: to.as_str(),
            });
        }
        self.status = to;
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────
