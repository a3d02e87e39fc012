//! Property-based tests for availability and table selection.

use std::collections::HashSet;

use super::{compute_slots, select_table, slot_blocked, BookingPolicy};
use crate::clock::{ClockTime, TimeRange};
use crate::reservation::BookedInterval;
use crate::table::{Table, TableStatus};
use proptest::prelude::*;

// Strategy for a small inventory with unique ids and numbers
fn tables_strategy() -> impl Strategy<Value = Vec<Table>> {
    prop::collection::vec(1u32..=10, 0..8).prop_map(|capacities| {
        capacities
            .into_iter()
            .enumerate()
            .map(|(i, capacity)| Table {
                id: i as i64 + 1,
                restaurant_id: 1,
                number: i as u32 + 1,
                capacity,
                status: TableStatus::Free,
            })
            .collect()
    })
}

// Strategy for a reservation interval on the slot grid
fn range_strategy() -> impl Strategy<Value = TimeRange> {
    (40u16..=88).prop_map(|quarter| {
        let start = ClockTime::from_minutes(quarter * 15).unwrap();
        TimeRange::new(start, start.saturating_add_minutes(120)).unwrap()
    })
}

fn booked_strategy() -> impl Strategy<Value = Vec<BookedInterval>> {
    prop::collection::vec((1i64..=8, range_strategy()), 0..12).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(table_id, range)| BookedInterval { table_id, range })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        max_shrink_iters: 10000,
        .. ProptestConfig::default()
    })]

    // Slots come back ascending, unique and inside the service window
    #[test]
    fn slots_sorted_and_in_window(
        tables in tables_strategy(),
        booked in booked_strategy(),
        party in 1u32..=10,
    ) {
        let policy = BookingPolicy::default();
        let slots = compute_slots(&policy, &tables, &booked, party);

        prop_assert!(slots.windows(2).all(|w| w[0] < w[1]));
        for slot in &slots {
            prop_assert!(policy.is_within_service(*slot));
        }
    }

    // The chosen table never overlaps one of its own active reservations
    #[test]
    fn selected_table_has_no_overlap(
        tables in tables_strategy(),
        booked in booked_strategy(),
        party in 1u32..=10,
        window in range_strategy(),
    ) {
        let policy = BookingPolicy::default();
        if let Some(table) = select_table(&policy, &tables, &booked, party, &window, &HashSet::new()) {
            prop_assert!(policy.capacity_band(party).contains(&table.capacity));
            for interval in booked.iter().filter(|b| b.table_id == table.id) {
                prop_assert!(!interval.range.overlaps(&window));
            }
        }
    }

    // A larger party never sees more slots, as long as no table only fits the larger one
    #[test]
    fn slots_shrink_as_party_grows(
        tables in tables_strategy(),
        booked in booked_strategy(),
        party in 1u32..=8,
    ) {
        let policy = BookingPolicy::default();
        let widened = party + 1 + policy.extra_seats;
        prop_assume!(tables.iter().all(|t| t.capacity != widened));

        let smaller: HashSet<ClockTime> = compute_slots(&policy, &tables, &booked, party).into_iter().collect();
        let larger = compute_slots(&policy, &tables, &booked, party + 1);
        for slot in larger {
            prop_assert!(smaller.contains(&slot));
        }
    }

    // Blocking matches overlap with a window reaching lookback minutes ahead
    #[test]
    fn blocking_matches_lookahead_overlap(
        range in range_strategy(),
        slot_minutes in 0u16..1300,
        lookback in 0u16..=180,
    ) {
        let slot = ClockTime::from_minutes(slot_minutes).unwrap();
        let lookahead = TimeRange::new(slot, slot.saturating_add_minutes(lookback + 1)).unwrap();
        prop_assert_eq!(slot_blocked(&range, slot, lookback), range.overlaps(&lookahead));
    }
}
