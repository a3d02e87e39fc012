//! Best-fit table selection for a concrete reservation window.

use std::collections::{HashMap, HashSet};

use crate::clock::TimeRange;
use crate::reservation::BookedInterval;
use crate::table::{Table, TableId};

use super::availability::index_by_table;
use super::policy::BookingPolicy;

/// Orders the tables that could hold a reservation over `window`.
///
/// Exact-capacity tables come first, by table number. Tables with up to
/// `extra_seats` spare seats follow, smallest capacity first and then by
/// number. Tables with an overlapping active reservation, or listed in
/// `exclude`, are left out.
#[must_use]
pub fn rank_candidates<'a>(
    policy: &BookingPolicy,
    tables: &'a [Table],
    booked: &[BookedInterval],
    party_size: u32,
    window: &TimeRange,
    exclude: &HashSet<TableId>,
) -> Vec<&'a Table> {
    let index: HashMap<TableId, Vec<TimeRange>> = index_by_table(booked);
    let band = policy.capacity_band(party_size);

    let mut candidates: Vec<&Table> = tables
        .iter()
        .filter(|table| band.contains(&table.capacity))
        .filter(|table| !exclude.contains(&table.id))
        .filter(|table| {
            index
                .get(&table.id)
                .map_or(true, |ranges| ranges.iter().all(|r| !r.overlaps(window)))
        })
        .collect();

    candidates.sort_by_key(|table| (!table.is_exact_fit(party_size), table.capacity, table.number));
    candidates
}

/// Picks the best free table for a reservation over `window`, if any.
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use tablebook::booking::select_table;
/// use tablebook::{BookingPolicy, Table, TableStatus, TimeRange};
///
/// let table = |id, number, capacity| Table { id, restaurant_id: 1, number, capacity, status: TableStatus::Free };
/// let tables = vec![table(1, 1, 6), table(2, 2, 4), table(3, 3, 5)];
/// let window = TimeRange::new("18:00".parse().unwrap(), "20:00".parse().unwrap()).unwrap();
///
/// let chosen = select_table(&BookingPolicy::default(), &tables, &[], 4, &window, &HashSet::new()).unwrap();
/// assert_eq!(chosen.number, 2);
/// ```
#[must_use]
pub fn select_table<'a>(
    policy: &BookingPolicy,
    tables: &'a [Table],
    booked: &[BookedInterval],
    party_size: u32,
    window: &TimeRange,
    exclude: &HashSet<TableId>,
) -> Option<&'a Table> {
    rank_candidates(policy, tables, booked, party_size, window, exclude)
        .into_iter()
        .next()
}
