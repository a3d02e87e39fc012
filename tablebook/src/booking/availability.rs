//! Slot availability over a fixed table inventory.
//!
//! These functions are pure: callers pass in the tables and the active
//! reservation intervals read from the store, and get back the bookable
//! slots. The answer is advisory; the write path re-checks overlap.

use std::collections::HashMap;

use crate::clock::{ClockTime, TimeRange};
use crate::reservation::BookedInterval;
use crate::table::{Table, TableId};

use super::policy::BookingPolicy;

/// Whether an existing reservation blocks a candidate slot.
///
/// A reservation `[start, end)` blocks slot `t` when
/// `start - lookback <= t < end`: either it is still running at `t`, or it
/// begins within `lookback` minutes after `t`.
///
/// # Examples
///
/// ```
/// use tablebook::booking::slot_blocked;
/// use tablebook::{ClockTime, TimeRange};
///
/// let t = |s: &str| s.parse::<ClockTime>().unwrap();
/// let evening = TimeRange::new(t("18:00"), t("20:00")).unwrap();
///
/// assert!(slot_blocked(&evening, t("16:00"), 120));
/// assert!(slot_blocked(&evening, t("19:45"), 120));
/// assert!(!slot_blocked(&evening, t("15:45"), 120));
/// assert!(!slot_blocked(&evening, t("20:00"), 120));
/// ```
#[must_use]
pub fn slot_blocked(booked: &TimeRange, slot: ClockTime, lookback_minutes: u16) -> bool {
    let reach = u32::from(slot.minutes()) + u32::from(lookback_minutes);
    u32::from(booked.start().minutes()) <= reach && slot < booked.end()
}

/// Tables whose capacity falls inside the band for `party_size`, in table
/// number order.
#[must_use]
pub fn tables_in_band<'a>(
    policy: &BookingPolicy,
    tables: &'a [Table],
    party_size: u32,
) -> Vec<&'a Table> {
    let band = policy.capacity_band(party_size);
    let mut matching: Vec<&Table> = tables
        .iter()
        .filter(|table| band.contains(&table.capacity))
        .collect();
    matching.sort_by_key(|table| table.number);
    matching
}

/// Groups intervals by table for repeated lookups.
pub(crate) fn index_by_table(booked: &[BookedInterval]) -> HashMap<TableId, Vec<TimeRange>> {
    let mut index: HashMap<TableId, Vec<TimeRange>> = HashMap::new();
    for interval in booked {
        index.entry(interval.table_id).or_default().push(interval.range);
    }
    index
}

/// Whether `table_id` has no blocking reservation at `slot`.
#[must_use]
pub fn is_table_available_at(
    policy: &BookingPolicy,
    table_id: TableId,
    booked: &[BookedInterval],
    slot: ClockTime,
) -> bool {
    booked
        .iter()
        .filter(|interval| interval.table_id == table_id)
        .all(|interval| !slot_blocked(&interval.range, slot, policy.lookback_minutes))
}

/// Computes the bookable slots for a party.
///
/// A slot is bookable when at least one table in the capacity band has no
/// blocking reservation at it. The result is ascending and free of
/// duplicates; it is empty when no table qualifies.
///
/// # Examples
///
/// ```
/// use tablebook::booking::compute_slots;
/// use tablebook::{BookingPolicy, Table, TableStatus};
///
/// let tables = vec![Table { id: 1, restaurant_id: 1, number: 1, capacity: 4, status: TableStatus::Free }];
/// let slots = compute_slots(&BookingPolicy::default(), &tables, &[], 4);
/// assert_eq!(slots.len(), 49);
/// assert!(compute_slots(&BookingPolicy::default(), &tables, &[], 5).is_empty());
/// ```
#[must_use]
pub fn compute_slots(
    policy: &BookingPolicy,
    tables: &[Table],
    booked: &[BookedInterval],
    party_size: u32,
) -> Vec<ClockTime> {
    let candidates = tables_in_band(policy, tables, party_size);
    if candidates.is_empty() {
        return Vec::new();
    }

    let index = index_by_table(booked);
    let free_at = |table: &Table, slot: ClockTime| {
        index.get(&table.id).map_or(true, |ranges| {
            ranges
                .iter()
                .all(|range| !slot_blocked(range, slot, policy.lookback_minutes))
        })
    };

    policy
        .candidate_slots()
        .into_iter()
        .filter(|slot| candidates.iter().any(|table| free_at(table, *slot)))
        .collect()
}
