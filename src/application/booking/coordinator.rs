//! Booking coordinator
//!
//! Drives one booking attempt through
//! `Draft -> Validated -> Checked -> Priced -> Committed`, rejecting with the
//! first failing step. Rejection order is fixed:
//! `InvalidWindow`, `PastDate`, `UnknownResource`, `SourceFailure`,
//! `SlotConflict`, `InvalidRate`, then `PersistenceFailure` or
//! `SlotConflict` from the commit itself.
//!
//! The coordinator holds no lock across requests. Two attempts racing for
//! the same bike are serialized by `ReservationSource::commit`, whose
//! conflict report is turned into the same `SlotConflict` a pre-check would
//! have produced.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::application::events::{
    BookingRejectedEvent, Event, ReservationCancelledEvent, ReservationCommittedEvent,
    ReservationCompletedEvent, SharedEventBus,
};
use crate::domain::{
    check_availability, compute_price, AvailabilityResult, CatalogItem, DomainError,
    DomainResult, LateReturnPolicy, PriceOptions, RentalWindow, Reservation, ReservationStatus,
    SourceProvider, StoreError,
};

use super::rejection::{BookingRejection, BookingStage};
use super::request::{BookingOutcome, BookingRequest, Cancellation, Completion, Quote};

pub const DEFAULT_FREE_CANCELLATION_HOURS: i64 = 2;

pub struct BookingCoordinator {
    sources: Arc<dyn SourceProvider>,
    price_options: PriceOptions,
    free_cancellation: Duration,
    late_return: LateReturnPolicy,
    event_bus: Option<SharedEventBus>,
}

impl BookingCoordinator {
    pub fn new(sources: Arc<dyn SourceProvider>, price_options: PriceOptions) -> Self {
        Self {
            sources,
            price_options,
            free_cancellation: Duration::hours(DEFAULT_FREE_CANCELLATION_HOURS),
            late_return: LateReturnPolicy::default(),
            event_bus: None,
        }
    }

    /// How long before pickup a cancellation still refunds everything
    pub fn with_free_cancellation(mut self, window: Duration) -> Self {
        self.free_cancellation = window;
        self
    }

    pub fn with_late_return(mut self, policy: LateReturnPolicy) -> Self {
        self.late_return = policy;
        self
    }

    pub fn with_event_bus(mut self, event_bus: SharedEventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn price_options(&self) -> &PriceOptions {
        &self.price_options
    }

    /// Process one booking attempt to commit or rejection.
    ///
    /// `now` is the reference instant for the past-date check. Nothing is
    /// persisted unless the result is `Ok`.
    pub async fn run_booking(&self, request: &BookingRequest, now: DateTime<Utc>) -> BookingOutcome {
        let outcome = self.attempt(request, now).await;

        match &outcome {
            Ok(reservation) => {
                metrics::counter!("bookings_total", "outcome" => "committed").increment(1);
                info!(
                    reservation_id = %reservation.id,
                    resource_id = %reservation.resource_id,
                    window = %reservation.window,
                    total = %reservation.price.total,
                    currency = %reservation.price.currency,
                    "Reservation committed"
                );
                self.publish(Event::ReservationCommitted(ReservationCommittedEvent {
                    reservation_id: reservation.id.clone(),
                    resource_id: reservation.resource_id.clone(),
                    renter_id: reservation.renter_id.clone(),
                    start: reservation.window.start(),
                    end: reservation.window.end(),
                    total: reservation.price.total,
                    currency: reservation.price.currency.clone(),
                }));
            }
            Err(rejection) => {
                metrics::counter!("bookings_total", "outcome" => rejection.code()).increment(1);
                if rejection.is_retryable() {
                    warn!(
                        resource_id = %request.resource_id,
                        reason = rejection.code(),
                        stage = %rejection.stage(),
                        error = %rejection,
                        "Booking rejected by collaborator failure"
                    );
                } else {
                    info!(
                        resource_id = %request.resource_id,
                        reason = rejection.code(),
                        stage = %rejection.stage(),
                        "Booking rejected"
                    );
                }
                self.publish(Event::BookingRejected(BookingRejectedEvent {
                    resource_id: request.resource_id.clone(),
                    reason: rejection.code().to_string(),
                    message: rejection.to_string(),
                }));
            }
        }

        outcome
    }

    async fn attempt(&self, request: &BookingRequest, now: DateTime<Utc>) -> BookingOutcome {
        let resource_id = request.resource_id.as_str();

        // Draft -> Validated
        let window = RentalWindow::new(request.start, request.end).map_err(|_| {
            BookingRejection::InvalidWindow {
                start: request.start,
                end: request.end,
            }
        })?;
        if window.start() < now {
            return Err(BookingRejection::PastDate {
                start: window.start(),
                now,
            });
        }
        let item = self.lookup(resource_id).await?;
        debug!(resource_id, stage = %BookingStage::Validated, %window, "Booking request validated");

        // Validated -> Checked
        let availability = self.check(resource_id, &window).await?;
        if !availability.available {
            return Err(BookingRejection::SlotConflict {
                resource_id: resource_id.to_string(),
                conflicting_ids: availability.conflicting_ids(),
            });
        }
        debug!(resource_id, stage = %BookingStage::Checked, "Window is free");

        // Checked -> Priced
        let units = window.billable_units(item.rate_unit);
        let price = compute_price(item.rate, units, &self.price_options).map_err(|source| {
            BookingRejection::InvalidRate {
                resource_id: resource_id.to_string(),
                source,
            }
        })?;
        debug!(resource_id, stage = %BookingStage::Priced, units, total = %price.total, "Booking priced");

        // Priced -> Committed
        let reservation =
            Reservation::new(resource_id, request.renter_id.clone(), window, price, now);
        match self.sources.reservations().commit(reservation.clone()).await {
            Ok(()) => Ok(reservation),
            Err(StoreError::Conflict { conflicting_ids }) => Err(BookingRejection::SlotConflict {
                resource_id: resource_id.to_string(),
                conflicting_ids,
            }),
            Err(err) => Err(BookingRejection::PersistenceFailure {
                message: err.to_string(),
            }),
        }
    }

    async fn lookup(&self, resource_id: &str) -> Result<CatalogItem, BookingRejection> {
        self.sources
            .catalog()
            .get_item(resource_id)
            .await
            .map_err(|err| BookingRejection::SourceFailure {
                what: "catalog",
                message: err.to_string(),
            })?
            .ok_or_else(|| BookingRejection::UnknownResource {
                resource_id: resource_id.to_string(),
            })
    }

    async fn check(
        &self,
        resource_id: &str,
        window: &RentalWindow,
    ) -> Result<AvailabilityResult, BookingRejection> {
        let active = self
            .sources
            .reservations()
            .active_reservations_for(resource_id)
            .await
            .map_err(|err| BookingRejection::SourceFailure {
                what: "reservations",
                message: err.to_string(),
            })?;
        Ok(check_availability(resource_id, window, &active))
    }

    /// Availability of a known bike for `window`, read-only
    pub async fn availability(
        &self,
        resource_id: &str,
        window: &RentalWindow,
    ) -> Result<AvailabilityResult, BookingRejection> {
        self.lookup(resource_id).await?;
        self.check(resource_id, window).await
    }

    /// Price `window` for a known bike without reserving it.
    pub async fn quote(
        &self,
        resource_id: &str,
        window: &RentalWindow,
    ) -> Result<Quote, BookingRejection> {
        let item = self.lookup(resource_id).await?;
        let units = window.billable_units(item.rate_unit);
        let price = compute_price(item.rate, units, &self.price_options).map_err(|source| {
            BookingRejection::InvalidRate {
                resource_id: resource_id.to_string(),
                source,
            }
        })?;

        Ok(Quote {
            resource_id: item.id,
            window: *window,
            rate_unit: item.rate_unit,
            price,
        })
    }

    /// Cancel an active reservation.
    ///
    /// Refunds the full total while `now` is at least the free-cancellation
    /// window ahead of pickup; afterwards only the deposit comes back.
    /// The status change is a compare-and-set in the store, so a cancel
    /// racing a completion fails with `InvalidTransition`.
    pub async fn cancel(&self, reservation_id: &str, now: DateTime<Utc>) -> DomainResult<Cancellation> {
        let reservation = self
            .sources
            .reservations()
            .transition(reservation_id, ReservationStatus::Active, ReservationStatus::Cancelled)
            .await?;

        let free_cancellation = now <= reservation.window.start() - self.free_cancellation;
        let refund = if free_cancellation {
            reservation.price.total
        } else {
            reservation.price.deposit
        };

        info!(
            reservation_id,
            resource_id = %reservation.resource_id,
            %refund,
            free_cancellation,
            "Reservation cancelled"
        );
        self.publish(Event::ReservationCancelled(ReservationCancelledEvent {
            reservation_id: reservation.id.clone(),
            resource_id: reservation.resource_id.clone(),
            refund,
            free_cancellation,
        }));

        Ok(Cancellation {
            reservation,
            refund,
            free_cancellation,
        })
    }

    /// Mark an active reservation as returned at `returned_at`.
    ///
    /// A return past the end of the window plus the grace period is charged
    /// per started hour. The fee is taken from the deposit first; whatever
    /// the deposit does not cover is reported as `balance_due`.
    pub async fn complete(
        &self,
        reservation_id: &str,
        returned_at: DateTime<Utc>,
    ) -> DomainResult<Completion> {
        let reservation = self
            .sources
            .reservations()
            .transition(reservation_id, ReservationStatus::Active, ReservationStatus::Completed)
            .await?;

        let late = self.late_return.assess(reservation.window.end(), returned_at);
        let deposit = reservation.price.deposit;
        let deposit_refund = (deposit - late.fee).max(Decimal::ZERO);
        let balance_due = (late.fee - deposit).max(Decimal::ZERO);

        if late.hours > 0 {
            metrics::counter!("late_returns_total").increment(1);
        }
        info!(
            reservation_id,
            resource_id = %reservation.resource_id,
            late_hours = late.hours,
            late_fee = %late.fee,
            %deposit_refund,
            %balance_due,
            "Reservation completed"
        );
        self.publish(Event::ReservationCompleted(ReservationCompletedEvent {
            reservation_id: reservation.id.clone(),
            resource_id: reservation.resource_id.clone(),
            late_fee: late.fee,
            deposit_refund,
        }));

        Ok(Completion {
            reservation,
            late_hours: late.hours,
            late_fee: late.fee,
            deposit_refund,
            balance_due,
        })
    }

    /// Every reservation of a known bike, any status, in commit order
    pub async fn reservations_for(&self, resource_id: &str) -> DomainResult<Vec<Reservation>> {
        if self.sources.catalog().get_item(resource_id).await?.is_none() {
            return Err(DomainError::NotFound {
                entity: "Bike",
                field: "id",
                value: resource_id.to_string(),
            });
        }
        Ok(self.sources.reservations().list_for_resource(resource_id).await?)
    }

    fn publish(&self, event: Event) {
        if let Some(bus) = &self.event_bus {
            bus.publish(event);
        }
    }
}
