//! Conflict detection between a requested window and existing reservations.

use serde::Serialize;

use super::model::Reservation;
use super::window::RentalWindow;

/// Outcome of an availability check for one bike.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityResult {
    pub resource_id: String,
    pub window: RentalWindow,
    pub available: bool,
    /// Active reservations of the bike that overlap the window, in input order
    pub conflicts: Vec<Reservation>,
}

impl AvailabilityResult {
    pub fn conflicting_ids(&self) -> Vec<String> {
        self.conflicts.iter().map(|r| r.id.clone()).collect()
    }
}

/// Check `window` against the reservations of `resource_id`.
///
/// Only active reservations of the same bike are considered, so passing an
/// unscoped or stale list never produces a false conflict from a cancelled
/// or completed booking.
pub fn check_availability(
    resource_id: &str,
    window: &RentalWindow,
    reservations: &[Reservation],
) -> AvailabilityResult {
    let conflicts: Vec<Reservation> = reservations
        .iter()
        .filter(|r| r.resource_id == resource_id && r.blocks(window))
        .cloned()
        .collect();

    AvailabilityResult {
        resource_id: resource_id.to_string(),
        window: *window,
        available: conflicts.is_empty(),
        conflicts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pricing::{compute_price, PriceOptions};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rust_decimal::Decimal;

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap() + Duration::days(n)
    }

    fn window(s: i64, e: i64) -> RentalWindow {
        RentalWindow::new(day(s), day(e)).unwrap()
    }

    fn reservation(resource: &str, s: i64, e: i64) -> Reservation {
        let price = compute_price(Decimal::from(500), e - s, &PriceOptions::default()).unwrap();
        Reservation::new(resource, None, window(s, e), price, day(0))
    }

    #[test]
    fn no_reservations_means_available() {
        let result = check_availability("bike-1", &window(1, 2), &[]);
        assert!(result.available);
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn reports_every_conflicting_reservation() {
        let existing = vec![
            reservation("bike-1", 1, 3),
            reservation("bike-1", 3, 5),
            reservation("bike-1", 6, 9),
        ];
        let result = check_availability("bike-1", &window(2, 4), &existing);
        assert!(!result.available);
        assert_eq!(
            result.conflicting_ids(),
            vec![existing[0].id.clone(), existing[1].id.clone()]
        );
    }

    #[test]
    fn starts_inside_ends_inside_and_encloses() {
        let existing = vec![reservation("bike-1", 5, 8)];
        for requested in [window(6, 10), window(3, 6), window(4, 9), window(6, 7)] {
            assert!(!check_availability("bike-1", &requested, &existing).available);
        }
    }

    #[test]
    fn adjacent_windows_are_available() {
        let existing = vec![reservation("bike-1", 5, 8)];
        assert!(check_availability("bike-1", &window(8, 10), &existing).available);
        assert!(check_availability("bike-1", &window(2, 5), &existing).available);
    }

    #[test]
    fn other_bikes_and_inactive_reservations_are_ignored() {
        let mut cancelled = reservation("bike-1", 5, 8);
        cancelled.cancel().unwrap();
        let existing = vec![reservation("bike-2", 5, 8), cancelled];
        assert!(check_availability("bike-1", &window(5, 8), &existing).available);
    }
}
