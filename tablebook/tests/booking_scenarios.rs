//! End-to-end booking scenarios against an on-disk store.
//!
//! Each test seeds a restaurant, then drives slot listing, assignment,
//! booking and cancellation through the public operations API.

mod common;

use common::database::{create_test_database, seed_restaurant};
use common::{date, morning_before, on_service_day, time, RequestFixture, SERVICE_DAY};
use tablebook::operations::{cancel_reservation, complete_reservation, BookingPlan};
use tablebook::{
    assign_and_book, assign_table, compute_slots, BookingPolicy, Error, ReservationFilter,
    ReservationStatus,
};

fn slot_strings(slots: &[tablebook::ClockTime]) -> Vec<String> {
    slots.iter().map(ToString::to_string).collect()
}

#[test]
fn test_empty_table_offers_whole_service_window() {
    let mut db = create_test_database();
    let (restaurant, _) = seed_restaurant(&mut db, &[(1, 4)]);

    let slots = compute_slots(
        &db,
        &BookingPolicy::default(),
        restaurant,
        date("2025-06-01"),
        4,
    )
    .unwrap();

    assert_eq!(slots.len(), 49);
    assert_eq!(slots.first().unwrap().to_string(), "10:00");
    assert_eq!(slots.last().unwrap().to_string(), "22:00");
    assert!(slots.windows(2).all(|w| w[1].minutes() - w[0].minutes() == 15));
}

#[test]
fn test_existing_booking_blocks_lookback_window() {
    let mut db = create_test_database();
    let (restaurant, _) = seed_restaurant(&mut db, &[(1, 4)]);
    let policy = BookingPolicy::default();

    assign_and_book(
        &mut db,
        &policy,
        RequestFixture::new(restaurant).at("18:00").party(4).build(),
        morning_before(),
    )
    .unwrap();

    let slots = slot_strings(&compute_slots(&db, &policy, restaurant, date(SERVICE_DAY), 4).unwrap());

    for blocked in ["16:00", "17:00", "18:00", "19:45"] {
        assert!(!slots.contains(&blocked.to_string()), "{blocked} should be blocked");
    }
    for open in ["10:00", "15:45", "20:00", "22:00"] {
        assert!(slots.contains(&open.to_string()), "{open} should be offered");
    }
    // [16:00, 20:00) removes sixteen quarter hours
    assert_eq!(slots.len(), 49 - 16);
}

#[test]
fn test_party_outside_every_band_gets_no_slots() {
    let mut db = create_test_database();
    let (restaurant, _) = seed_restaurant(&mut db, &[(1, 2), (2, 4)]);
    let policy = BookingPolicy::default();

    let slots = compute_slots(&db, &policy, restaurant, date(SERVICE_DAY), 5).unwrap();
    assert!(slots.is_empty());

    let err = assign_and_book(
        &mut db,
        &policy,
        RequestFixture::new(restaurant).party(5).build(),
        morning_before(),
    )
    .unwrap_err();
    assert!(err.is_unavailable());
    assert!(matches!(err, Error::NoTableAvailable { party_size: 5, .. }));
}

#[test]
fn test_cancellation_reopens_slot() {
    let mut db = create_test_database();
    let (restaurant, tables) = seed_restaurant(&mut db, &[(1, 4)]);
    let policy = BookingPolicy::default();

    let reservation = assign_and_book(
        &mut db,
        &policy,
        RequestFixture::new(restaurant).at("12:00").party(3).build(),
        morning_before(),
    )
    .unwrap();
    assert_eq!(reservation.table_id(), tables[0].id);

    let before = compute_slots(&db, &policy, restaurant, date(SERVICE_DAY), 3).unwrap();
    assert!(!before.contains(&time("12:00")));

    cancel_reservation(&mut db, reservation.id(), morning_before()).unwrap();

    let after = compute_slots(&db, &policy, restaurant, date(SERVICE_DAY), 3).unwrap();
    assert!(after.contains(&time("12:00")));
    assert_eq!(after.len(), 49);
    assert_eq!(
        assign_table(&db, &policy, restaurant, date(SERVICE_DAY), time("12:00"), 3)
            .unwrap()
            .map(|t| t.id),
        Some(tables[0].id)
    );
}

#[test]
fn test_exact_fit_preferred_over_smaller_surplus() {
    let mut db = create_test_database();
    let (restaurant, tables) = seed_restaurant(&mut db, &[(1, 5), (2, 6), (3, 4)]);
    let policy = BookingPolicy::default();

    let chosen = assign_table(&db, &policy, restaurant, date(SERVICE_DAY), time("19:00"), 4)
        .unwrap()
        .unwrap();
    assert_eq!(chosen.id, tables[2].id);

    // Once the exact fit is taken, the smallest surplus wins.
    assign_and_book(
        &mut db,
        &policy,
        RequestFixture::new(restaurant).at("19:00").party(4).build(),
        morning_before(),
    )
    .unwrap();
    let next = assign_and_book(
        &mut db,
        &policy,
        RequestFixture::new(restaurant).at("19:30").party(4).guest("second").build(),
        morning_before(),
    )
    .unwrap();
    assert_eq!(next.table_id(), tables[0].id);
}

#[test]
fn test_booking_validation_errors() {
    let mut db = create_test_database();
    let (restaurant, _) = seed_restaurant(&mut db, &[(1, 4)]);
    let policy = BookingPolicy::default();

    let zero = RequestFixture::new(restaurant).party(0).build();
    assert!(assign_and_book(&mut db, &policy, zero, morning_before())
        .unwrap_err()
        .is_validation());

    let mut bad_phone = RequestFixture::new(restaurant).build();
    bad_phone.contact.phone = "0501234567".into();
    assert!(assign_and_book(&mut db, &policy, bad_phone, morning_before())
        .unwrap_err()
        .is_validation());

    let outside = RequestFixture::new(restaurant).at("22:15").build();
    assert!(assign_and_book(&mut db, &policy, outside, morning_before())
        .unwrap_err()
        .is_validation());

    let unknown = RequestFixture::new(restaurant + 100).build();
    assert!(assign_and_book(&mut db, &policy, unknown, morning_before())
        .unwrap_err()
        .is_not_found());
}

#[test]
fn test_late_booking_end_is_capped() {
    let mut db = create_test_database();
    let (restaurant, _) = seed_restaurant(&mut db, &[(1, 2)]);

    let reservation = assign_and_book(
        &mut db,
        &BookingPolicy::default(),
        RequestFixture::new(restaurant).at("22:00").build(),
        morning_before(),
    )
    .unwrap();

    assert_eq!(reservation.time().end().to_string(), "23:59");
}

#[test]
fn test_listing_filters() {
    let mut db = create_test_database();
    let (restaurant, _) = seed_restaurant(&mut db, &[(1, 2), (2, 4)]);
    let policy = BookingPolicy::default();

    let first = assign_and_book(
        &mut db,
        &policy,
        RequestFixture::new(restaurant).at("13:00").guest("anna").build(),
        morning_before(),
    )
    .unwrap();
    assign_and_book(
        &mut db,
        &policy,
        RequestFixture::new(restaurant)
            .at("13:00")
            .on("02.06.2025")
            .guest("bohdan")
            .build(),
        morning_before(),
    )
    .unwrap();
    complete_reservation(&mut db, first.id(), on_service_day(15, 30)).unwrap();

    let by_day = db
        .list_reservations(
            &ReservationFilter::default()
                .with_restaurant(restaurant)
                .with_date(date(SERVICE_DAY)),
        )
        .unwrap();
    assert_eq!(by_day.len(), 1);
    assert_eq!(by_day[0].status(), ReservationStatus::Completed);

    let by_email = db
        .list_reservations(&ReservationFilter::default().with_email("BOHDAN@example.com"))
        .unwrap();
    assert_eq!(by_email.len(), 1);
    assert_eq!(by_email[0].date(), date("02.06.2025"));

    let active = db
        .list_reservations(&ReservationFilter::default().with_status(ReservationStatus::Active))
        .unwrap();
    assert_eq!(active.len(), 1);
}

#[test]
fn test_plan_reports_first_choice_without_writing() {
    let mut db = create_test_database();
    let (restaurant, tables) = seed_restaurant(&mut db, &[(1, 6)]);
    let policy = BookingPolicy::default();

    let plan = BookingPlan::new(
        RequestFixture::new(restaurant).party(4).build(),
        &policy,
        morning_before(),
    )
    .build_plan(&db)
    .unwrap();

    assert_eq!(plan.len(), 1);
    // capacity 6 for a party of 4 is not an exact fit
    assert_eq!(plan.warnings.len(), 1);

    let result = tablebook::PlanExecutor::new(&mut db)
        .dry_run()
        .execute(&plan)
        .unwrap();
    assert!(result.dry_run);
    assert_eq!(result.table.map(|t| t.id), Some(tables[0].id));
    assert!(db
        .list_reservations(&ReservationFilter::default())
        .unwrap()
        .is_empty());
}
