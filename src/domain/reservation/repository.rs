//! Reservation source interface

use async_trait::async_trait;

use super::model::{Reservation, ReservationStatus};
use crate::shared::StoreError;

/// Persistence collaborator for reservations.
///
/// Implementations own the authoritative conflict rule: `commit` must
/// refuse a reservation whose window overlaps an active reservation of the
/// same bike, even when the caller already checked availability.
#[async_trait]
pub trait ReservationSource: Send + Sync {
    /// Active reservations of one bike
    async fn active_reservations_for(&self, resource_id: &str)
        -> Result<Vec<Reservation>, StoreError>;

    /// Atomically append a new reservation, or fail with
    /// `StoreError::Conflict` listing the overlapping reservation ids.
    async fn commit(&self, reservation: Reservation) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Reservation>, StoreError>;

    /// Compare-and-set status change: moves the stored reservation from
    /// `from` to `to` and returns the updated record. Fails with
    /// `StoreError::Transition` when the stored status is not `from`, and
    /// with `StoreError::NotFound` for an unknown id.
    async fn transition(
        &self,
        id: &str,
        from: ReservationStatus,
        to: ReservationStatus,
    ) -> Result<Reservation, StoreError>;

    /// Every reservation of one bike, any status, in commit order
    async fn list_for_resource(&self, resource_id: &str) -> Result<Vec<Reservation>, StoreError>;
}
