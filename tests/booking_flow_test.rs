//! End-to-end booking runs against the in-memory store.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use bike_rental::application::{BookingCoordinator, BookingRejection, BookingRequest, BookingStage};
use bike_rental::domain::{
    BikeCategory, CatalogItem, PriceOptions, RateUnit, RentalWindow, ReservationStatus,
};
use bike_rental::InMemoryStore;

fn day(n: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 3, n, 10, 0, 0).unwrap()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 3, 1, 9, 0, 0).unwrap()
}

fn store() -> Arc<InMemoryStore> {
    Arc::new(InMemoryStore::with_catalog([
        CatalogItem::new(
            "re-classic",
            "Royal Enfield Classic 350",
            BikeCategory::Cruiser,
            Decimal::from(500),
            "Bangalore",
        ),
        CatalogItem::new(
            "ather",
            "Ather 450X",
            BikeCategory::ElectricScooter,
            Decimal::from(60),
            "Bangalore",
        )
        .with_rate_unit(RateUnit::Hour),
    ]))
}

fn coordinator(store: Arc<InMemoryStore>) -> BookingCoordinator {
    BookingCoordinator::new(store, PriceOptions::default())
}

#[tokio::test]
async fn three_day_booking_then_overlapping_request_is_refused() {
    let coordinator = coordinator(store());

    let first = coordinator
        .run_booking(&BookingRequest::new("re-classic", day(5), day(8)), now())
        .await
        .unwrap();
    assert_eq!(first.price.units, 3);
    assert_eq!(first.price.subtotal, Decimal::from(1500));
    assert_eq!(first.price.tax, Decimal::from(270));
    assert_eq!(first.price.deposit, Decimal::from(250));
    assert_eq!(first.total_price(), Decimal::from(2020));
    assert_eq!(first.status, ReservationStatus::Active);

    let second = coordinator
        .run_booking(&BookingRequest::new("re-classic", day(6), day(7)), now())
        .await
        .unwrap_err();
    assert_eq!(second.code(), "slot_conflict");
    assert_eq!(second.conflicting_ids(), [first.id.clone()]);
    assert_eq!(second.stage(), BookingStage::Validated);
}

#[tokio::test]
async fn committed_reservation_is_listed_and_blocks_its_window() {
    let store = store();
    let coordinator = coordinator(store.clone());

    let reservation = coordinator
        .run_booking(
            &BookingRequest::new("re-classic", day(10), day(12)).with_renter("asha"),
            now(),
        )
        .await
        .unwrap();

    let listed = coordinator.reservations_for("re-classic").await.unwrap();
    assert_eq!(listed, vec![reservation.clone()]);
    assert_eq!(listed[0].renter_id.as_deref(), Some("asha"));

    let window = RentalWindow::new(day(11), day(13)).unwrap();
    let availability = coordinator.availability("re-classic", &window).await.unwrap();
    assert!(!availability.available);
    assert_eq!(availability.conflicting_ids(), vec![reservation.id]);
}

#[tokio::test]
async fn back_to_back_rentals_both_commit() {
    let coordinator = coordinator(store());

    coordinator
        .run_booking(&BookingRequest::new("re-classic", day(5), day(8)), now())
        .await
        .unwrap();
    coordinator
        .run_booking(&BookingRequest::new("re-classic", day(8), day(9)), now())
        .await
        .unwrap();
    coordinator
        .run_booking(&BookingRequest::new("re-classic", day(3), day(5)), now())
        .await
        .unwrap();

    assert_eq!(coordinator.reservations_for("re-classic").await.unwrap().len(), 3);
}

#[tokio::test]
async fn hourly_bike_bills_started_hours() {
    let coordinator = coordinator(store());
    let start = day(5);

    let reservation = coordinator
        .run_booking(
            &BookingRequest::new("ather", start, start + Duration::minutes(150)),
            now(),
        )
        .await
        .unwrap();

    // 2.5h rounds up to 3 hours
    assert_eq!(reservation.price.units, 3);
    assert_eq!(reservation.price.subtotal, Decimal::from(180));
    assert_eq!(reservation.price.tax, Decimal::from(32));
    assert_eq!(reservation.price.deposit, Decimal::from(30));
    assert_eq!(reservation.total_price(), Decimal::from(242));
}

#[tokio::test]
async fn rejections_follow_check_order() {
    let coordinator = coordinator(store());

    let past = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();

    // inverted window on an unknown bike: the window wins
    let err = coordinator
        .run_booking(&BookingRequest::new("ghost", day(3), past), now())
        .await
        .unwrap_err();
    assert!(matches!(err, BookingRejection::InvalidWindow { .. }));

    // past start on an unknown bike: the date wins
    let err = coordinator
        .run_booking(&BookingRequest::new("ghost", past, past + Duration::days(1)), now())
        .await
        .unwrap_err();
    assert!(matches!(err, BookingRejection::PastDate { .. }));

    let err = coordinator
        .run_booking(&BookingRequest::new("ghost", day(5), day(6)), now())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        BookingRejection::UnknownResource {
            resource_id: "ghost".to_string()
        }
    );
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn cancelled_reservation_frees_the_window() {
    let coordinator = coordinator(store());

    let first = coordinator
        .run_booking(&BookingRequest::new("re-classic", day(5), day(8)), now())
        .await
        .unwrap();
    let cancellation = coordinator.cancel(&first.id, now()).await.unwrap();
    assert!(cancellation.free_cancellation);
    assert_eq!(cancellation.refund, Decimal::from(2020));
    assert_eq!(cancellation.reservation.status, ReservationStatus::Cancelled);

    let second = coordinator
        .run_booking(&BookingRequest::new("re-classic", day(6), day(7)), now())
        .await
        .unwrap();
    assert_ne!(second.id, first.id);

    let statuses: Vec<_> = coordinator
        .reservations_for("re-classic")
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.status)
        .collect();
    assert_eq!(
        statuses,
        vec![ReservationStatus::Cancelled, ReservationStatus::Active]
    );
}

#[tokio::test]
async fn late_cancellation_keeps_the_charges() {
    let coordinator = coordinator(store());

    let reservation = coordinator
        .run_booking(&BookingRequest::new("re-classic", day(5), day(8)), now())
        .await
        .unwrap();
    let cancellation = coordinator
        .cancel(&reservation.id, day(5) - Duration::minutes(30))
        .await
        .unwrap();

    assert!(!cancellation.free_cancellation);
    assert_eq!(cancellation.refund, Decimal::from(250));
}

#[tokio::test]
async fn concurrent_requests_for_one_window_commit_once() {
    let coordinator = Arc::new(coordinator(store()));

    let mut tasks = Vec::new();
    for i in 0..12 {
        let coordinator = coordinator.clone();
        tasks.push(tokio::spawn(async move {
            coordinator
                .run_booking(
                    &BookingRequest::new("re-classic", day(5), day(8)).with_renter(format!("r{i}")),
                    now(),
                )
                .await
        }));
    }

    let mut committed = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => committed += 1,
            Err(rejection) => assert_eq!(rejection.code(), "slot_conflict"),
        }
    }
    assert_eq!(committed, 1);
    assert_eq!(coordinator.reservations_for("re-classic").await.unwrap().len(), 1);
}

#[tokio::test]
async fn racing_cancel_and_return_settle_once() {
    let coordinator = Arc::new(coordinator(store()));
    let reservation = coordinator
        .run_booking(&BookingRequest::new("re-classic", day(5), day(8)), now())
        .await
        .unwrap();

    let cancel = {
        let coordinator = coordinator.clone();
        let id = reservation.id.clone();
        tokio::spawn(async move { coordinator.cancel(&id, now()).await.is_ok() })
    };
    let complete = {
        let coordinator = coordinator.clone();
        let id = reservation.id.clone();
        tokio::spawn(async move { coordinator.complete(&id, day(8)).await.is_ok() })
    };
    let cancelled = cancel.await.unwrap();
    let completed = complete.await.unwrap();
    assert!(cancelled ^ completed);

    let stored = coordinator.reservations_for("re-classic").await.unwrap();
    let expected = if cancelled {
        ReservationStatus::Cancelled
    } else {
        ReservationStatus::Completed
    };
    assert_eq!(stored[0].status, expected);
}

#[tokio::test]
async fn late_return_is_charged_against_the_deposit() {
    let coordinator = coordinator(store());
    let reservation = coordinator
        .run_booking(&BookingRequest::new("re-classic", day(5), day(8)), now())
        .await
        .unwrap();

    let completion = coordinator
        .complete(&reservation.id, day(8) + Duration::minutes(95))
        .await
        .unwrap();

    // 65 minutes past the grace period: 2 started hours
    assert_eq!(completion.late_hours, 2);
    assert_eq!(completion.late_fee, Decimal::from(100));
    assert_eq!(completion.deposit_refund, Decimal::from(150));
    assert_eq!(completion.balance_due, Decimal::ZERO);
    assert_eq!(completion.reservation.status, ReservationStatus::Completed);
}
