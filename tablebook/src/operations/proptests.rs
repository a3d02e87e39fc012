//! Property-based tests for the booking and reconciliation operations.
//!
//! Each case runs against a fresh on-disk store, so case counts are kept low.

use chrono::NaiveDate;
use proptest::prelude::*;

use super::{assign_and_book, BookingRequest, ReconcileOperations, ReconcileOptions};
use crate::booking::BookingPolicy;
use crate::clock::ClockTime;
use crate::database::test_util::{booking, create_test_database, date, seed_restaurant};
use crate::database::ReservationFilter;
use crate::reservation::{CustomerContact, ReservationStatus};
use crate::table::TableStatus;

fn capacities_strategy() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(1u32..=8, 1..5)
}

// (slot index on the 15-minute grid, party size)
fn requests_strategy() -> impl Strategy<Value = Vec<(u16, u32)>> {
    prop::collection::vec((0u16..=48, 1u32..=8), 1..20)
}

fn contact() -> CustomerContact {
    CustomerContact::new("Ivan", "Petrenko", "380671112233", None)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 48,
        .. ProptestConfig::default()
    })]

    // No sequence of bookings leaves two active reservations overlapping on
    // one table.
    #[test]
    fn bookings_never_overlap(capacities in capacities_strategy(), requests in requests_strategy()) {
        let mut db = create_test_database();
        let layout: Vec<(u32, u32)> = capacities
            .iter()
            .enumerate()
            .map(|(i, &c)| (u32::try_from(i).unwrap() + 1, c))
            .collect();
        let (restaurant, _) = seed_restaurant(&mut db, &layout);
        let policy = BookingPolicy::default();
        let now = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();

        for (slot, party) in requests {
            let start = ClockTime::from_minutes(600 + slot * 15).unwrap();
            let request = BookingRequest::new(restaurant, date("01.06.2025"), start, party, contact());
            match assign_and_book(&mut db, &policy, request, now) {
                Ok(r) => prop_assert!(r.people_count() == party),
                Err(e) => prop_assert!(e.is_unavailable(), "unexpected error: {e}"),
            }
        }

        let active = db
            .list_reservations(&ReservationFilter::default().with_status(ReservationStatus::Active))
            .unwrap();
        for (i, a) in active.iter().enumerate() {
            for b in &active[i + 1..] {
                if a.table_id() == b.table_id() && a.date() == b.date() {
                    prop_assert!(!a.time().overlaps(&b.time()), "{:?} overlaps {:?}", a, b);
                }
            }
        }
    }

    // A second sweep at the same instant changes nothing.
    #[test]
    fn reconcile_twice_is_noop(
        statuses in prop::collection::vec(0usize..3, 1..5),
        bookings in prop::collection::vec((0usize..5, 40u16..=88), 0..8),
        now_quarter in 40u16..=95,
    ) {
        let mut db = create_test_database();
        let layout: Vec<(u32, u32)> = (1..=u32::try_from(statuses.len()).unwrap())
            .map(|n| (n, 4))
            .collect();
        let (_, tables) = seed_restaurant(&mut db, &layout);

        for (table, &status) in tables.iter().zip(&statuses) {
            let status = [TableStatus::Free, TableStatus::Reserved, TableStatus::Occupied][status];
            db.set_table_status(table.id, status).unwrap();
        }
        for (index, quarter) in bookings {
            let table = &tables[index % tables.len()];
            let start = ClockTime::from_minutes(quarter * 15).unwrap();
            let end = start.saturating_add_minutes(120);
            let new = booking(table.id, "01.06.2025", &start.to_string(), &end.to_string());
            // Overlapping draws are simply rejected by the store.
            let _ = db.try_create_reservation_atomic(&new).unwrap();
        }

        let minutes = u32::from(now_quarter) * 15;
        let now = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(minutes / 60, minutes % 60, 0)
            .unwrap();

        ReconcileOperations::reconcile_statuses(&mut db, now, &ReconcileOptions::new()).unwrap();
        let after_first: Vec<TableStatus> =
            db.list_all_tables().unwrap().iter().map(|t| t.status).collect();

        let second =
            ReconcileOperations::reconcile_statuses(&mut db, now, &ReconcileOptions::new()).unwrap();
        let after_second: Vec<TableStatus> =
            db.list_all_tables().unwrap().iter().map(|t| t.status).collect();

        prop_assert!(second.changes.is_empty());
        prop_assert_eq!(after_first, after_second);
    }
}
