//! In-memory store implementing every collaborator

use std::collections::HashSet;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

use crate::domain::{
    CatalogItem, CatalogSource, FavoritesSource, Reservation, ReservationSource,
    ReservationStatus, SourceProvider, StoreError,
};

/// In-memory storage for development and testing.
///
/// Reservations are kept per bike. `commit` re-checks overlaps while
/// holding the bike's map entry, so two commits for the same bike can
/// never both succeed with overlapping windows. `transition` changes a
/// status under the same entry lock, so racing cancel and complete calls
/// cannot both win.
///
/// Lock order is reservations entry, then index entry. Nothing takes a
/// reservations entry while holding an index entry.
pub struct InMemoryStore {
    items: DashMap<String, CatalogItem>,
    /// resource id -> reservations in commit order
    reservations: DashMap<String, Vec<Reservation>>,
    /// reservation id -> resource id
    reservation_index: DashMap<String, String>,
    /// user id -> favorite resource ids
    favorites: DashMap<String, HashSet<String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
            reservations: DashMap::new(),
            reservation_index: DashMap::new(),
            favorites: DashMap::new(),
        }
    }

    pub fn with_catalog(items: impl IntoIterator<Item = CatalogItem>) -> Self {
        let store = Self::new();
        for item in items {
            store.add_item(item);
        }
        store
    }

    /// Insert or replace a catalog item
    pub fn add_item(&self, item: CatalogItem) {
        self.items.insert(item.id.clone(), item);
    }

    pub fn add_favorite(&self, user_id: &str, resource_id: &str) {
        self.favorites
            .entry(user_id.to_string())
            .or_default()
            .insert(resource_id.to_string());
    }

    pub fn remove_favorite(&self, user_id: &str, resource_id: &str) {
        if let Some(mut ids) = self.favorites.get_mut(user_id) {
            ids.remove(resource_id);
        }
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogSource for InMemoryStore {
    async fn list_items(&self) -> Result<Vec<CatalogItem>, StoreError> {
        let mut items: Vec<CatalogItem> = self.items.iter().map(|e| e.value().clone()).collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(items)
    }

    async fn get_item(&self, id: &str) -> Result<Option<CatalogItem>, StoreError> {
        Ok(self.items.get(id).map(|item| item.clone()))
    }
}

#[async_trait]
impl ReservationSource for InMemoryStore {
    async fn active_reservations_for(
        &self,
        resource_id: &str,
    ) -> Result<Vec<Reservation>, StoreError> {
        Ok(self
            .reservations
            .get(resource_id)
            .map(|list| list.iter().filter(|r| r.is_active()).cloned().collect())
            .unwrap_or_default())
    }

    async fn commit(&self, reservation: Reservation) -> Result<(), StoreError> {
        // The entry guard holds the shard lock until the append is done.
        let mut list = self
            .reservations
            .entry(reservation.resource_id.clone())
            .or_default();

        let conflicting_ids: Vec<String> = list
            .iter()
            .filter(|existing| existing.blocks(&reservation.window))
            .map(|existing| existing.id.clone())
            .collect();
        if !conflicting_ids.is_empty() {
            debug!(
                resource_id = %reservation.resource_id,
                conflicts = conflicting_ids.len(),
                "Commit refused"
            );
            return Err(StoreError::Conflict { conflicting_ids });
        }

        match self.reservation_index.entry(reservation.id.clone()) {
            Entry::Occupied(_) => {
                return Err(StoreError::Unavailable(format!(
                    "duplicate reservation id {}",
                    reservation.id
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(reservation.resource_id.clone());
            }
        }
        list.push(reservation);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Reservation>, StoreError> {
        let Some(resource_id) = self.reservation_index.get(id).map(|r| r.value().clone()) else {
            return Ok(None);
        };
        Ok(self
            .reservations
            .get(&resource_id)
            .and_then(|list| list.iter().find(|r| r.id == id).cloned()))
    }

    async fn transition(
        &self,
        id: &str,
        from: ReservationStatus,
        to: ReservationStatus,
    ) -> Result<Reservation, StoreError> {
        let resource_id = self
            .reservation_index
            .get(id)
            .map(|r| r.value().clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let mut list = self
            .reservations
            .get_mut(&resource_id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let slot = list
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let actual = slot.status;
        if slot.transition(from, to).is_err() {
            debug!(reservation_id = %id, %actual, %from, %to, "Transition refused");
            return Err(StoreError::Transition {
                id: id.to_string(),
                from: from.as_str(),
                to: to.as_str(),
                actual: actual.as_str(),
            });
        }
        Ok(slot.clone())
    }

    async fn list_for_resource(&self, resource_id: &str) -> Result<Vec<Reservation>, StoreError> {
        Ok(self
            .reservations
            .get(resource_id)
            .map(|list| list.clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl FavoritesSource for InMemoryStore {
    async fn ids_for(&self, user_id: &str) -> Result<HashSet<String>, StoreError> {
        Ok(self
            .favorites
            .get(user_id)
            .map(|ids| ids.clone())
            .unwrap_or_default())
    }
}

impl SourceProvider for InMemoryStore {
    fn catalog(&self) -> &dyn CatalogSource {
        self
    }

    fn reservations(&self) -> &dyn ReservationSource {
        self
    }

    fn favorites(&self) -> &dyn FavoritesSource {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{compute_price, BikeCategory, PriceOptions, RentalWindow};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap() + Duration::days(n)
    }

    fn reservation(resource_id: &str, from: i64, to: i64) -> Reservation {
        let window = RentalWindow::new(day(from), day(to)).unwrap();
        let price = compute_price(Decimal::from(500), to - from, &PriceOptions::default()).unwrap();
        Reservation::new(resource_id, None, window, price, day(0))
    }

    fn store() -> InMemoryStore {
        InMemoryStore::with_catalog([
            CatalogItem::new("b2", "Activa", BikeCategory::Scooter, Decimal::from(400), "Mumbai"),
            CatalogItem::new("b1", "Classic 350", BikeCategory::Cruiser, Decimal::from(800), "Delhi"),
        ])
    }

    #[tokio::test]
    async fn list_items_is_sorted_snapshot() {
        let store = store();
        let snapshot = store.list_items().await.unwrap();
        store.add_item(CatalogItem::new("b0", "Pulsar", BikeCategory::Sports, Decimal::from(700), "Pune"));

        let ids: Vec<_> = snapshot.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["b1", "b2"]);
        assert_eq!(store.item_count(), 3);
        assert!(store.get_item("b0").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn commit_refuses_overlap_but_allows_adjacent() {
        let store = store();
        let first = reservation("b1", 5, 8);
        store.commit(first.clone()).await.unwrap();

        let err = store.commit(reservation("b1", 7, 9)).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::Conflict {
                conflicting_ids: vec![first.id.clone()]
            }
        );

        store.commit(reservation("b1", 8, 9)).await.unwrap();
        store.commit(reservation("b2", 5, 8)).await.unwrap();
        assert_eq!(store.active_reservations_for("b1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn cancelled_reservations_stop_blocking() {
        let store = store();
        let first = reservation("b1", 5, 8);
        store.commit(first.clone()).await.unwrap();

        let cancelled = store
            .transition(&first.id, ReservationStatus::Active, ReservationStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(cancelled.status, ReservationStatus::Cancelled);

        assert!(store.active_reservations_for("b1").await.unwrap().is_empty());
        store.commit(reservation("b1", 6, 7)).await.unwrap();

        let log = store.list_for_resource("b1").await.unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(store.find_by_id(&first.id).await.unwrap(), Some(cancelled));
    }

    #[tokio::test]
    async fn transition_of_unknown_reservation_is_not_found() {
        let store = store();
        assert_eq!(
            store
                .transition("ghost", ReservationStatus::Active, ReservationStatus::Cancelled)
                .await,
            Err(StoreError::NotFound("ghost".into()))
        );
    }

    #[tokio::test]
    async fn stale_transition_leaves_the_stored_status_alone() {
        let store = store();
        let first = reservation("b1", 5, 8);
        store.commit(first.clone()).await.unwrap();

        // a caller read the reservation while it was still active
        let stale = store.find_by_id(&first.id).await.unwrap().unwrap();
        assert!(stale.is_active());

        store
            .transition(&first.id, ReservationStatus::Active, ReservationStatus::Cancelled)
            .await
            .unwrap();

        let err = store
            .transition(&first.id, ReservationStatus::Active, ReservationStatus::Completed)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::Transition {
                id: first.id.clone(),
                from: "active",
                to: "completed",
                actual: "cancelled",
            }
        );

        let stored = store.find_by_id(&first.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReservationStatus::Cancelled);
    }

    #[tokio::test]
    async fn racing_cancel_and_complete_admit_exactly_one() {
        let store = Arc::new(store());
        let first = reservation("b1", 5, 8);
        store.commit(first.clone()).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            let id = first.id.clone();
            let to = if i % 2 == 0 {
                ReservationStatus::Cancelled
            } else {
                ReservationStatus::Completed
            };
            handles.push(tokio::spawn(async move {
                store
                    .transition(&id, ReservationStatus::Active, to)
                    .await
                    .map(|r| r.status)
            }));
        }

        let mut winners = Vec::new();
        for handle in handles {
            match handle.await.unwrap() {
                Ok(status) => winners.push(status),
                Err(err) => assert!(matches!(err, StoreError::Transition { .. })),
            }
        }
        assert_eq!(winners.len(), 1);

        let stored = store.find_by_id(&first.id).await.unwrap().unwrap();
        assert_eq!(stored.status, winners[0]);
    }

    #[tokio::test]
    async fn duplicate_reservation_id_is_refused_on_any_bike() {
        let store = store();
        let first = reservation("b1", 5, 8);
        store.commit(first.clone()).await.unwrap();

        let mut copy = reservation("b2", 1, 2);
        copy.id = first.id.clone();
        let err = store.commit(copy).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(ref msg) if msg.contains(&first.id)));

        assert!(store.list_for_resource("b2").await.unwrap().is_empty());
        let found = store.find_by_id(&first.id).await.unwrap().unwrap();
        assert_eq!(found.resource_id, "b1");
    }

    #[tokio::test]
    async fn favorites_per_user() {
        let store = store();
        store.add_favorite("u1", "b1");
        store.add_favorite("u1", "b2");
        store.remove_favorite("u1", "b2");

        let ids = store.ids_for("u1").await.unwrap();
        assert_eq!(ids.len(), 1);
        assert!(ids.contains("b1"));
        assert!(store.ids_for("u2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_commits_admit_exactly_one() {
        let store = Arc::new(store());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.commit(reservation("b1", 5, 8)).await.is_ok()
            }));
        }

        let mut committed = 0;
        for handle in handles {
            if handle.await.unwrap() {
                committed += 1;
            }
        }
        assert_eq!(committed, 1);
        assert_eq!(store.active_reservations_for("b1").await.unwrap().len(), 1);
    }
}
