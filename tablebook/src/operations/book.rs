//! Slot listing and booking against the store.
//!
//! Slot listing is advisory: it reads the store once and may show a slot
//! that is gone by the time the guest confirms. Booking re-reads everything
//! and relies on the store's atomic insert, so the guest sees a conflict at
//! worst, never a double booking.

use std::collections::HashSet;

use chrono::NaiveDateTime;

use crate::booking::{self, select_table, BookingPolicy};
use crate::clock::{ClockTime, ServiceDate};
use crate::database::Database;
use crate::error::{Error, Result};
use crate::reservation::Reservation;
use crate::table::{RestaurantId, Table, TableId};

use super::executor::PlanExecutor;
use super::plan::{BookingRequest, OperationPlan, PlanAction};

fn require_party_size(party_size: u32) -> Result<()> {
    if party_size == 0 {
        return Err(Error::Validation {
            field: "party_size".into(),
            message: "party size must be at least 1".into(),
        });
    }
    Ok(())
}

/// Bookable start times for a party on a date, ascending.
///
/// An unknown restaurant or one without suitable tables yields an empty
/// list rather than an error.
///
/// # Errors
///
/// Returns a validation error for a zero party size, or a store error.
///
/// # Examples
///
/// ```no_run
/// use tablebook::database::{Database, DatabaseConfig};
/// use tablebook::operations::compute_slots;
/// use tablebook::BookingPolicy;
///
/// let db = Database::open(DatabaseConfig::new("/tmp/tablebook.db")).unwrap();
/// let slots = compute_slots(&db, &BookingPolicy::default(), 1, "01.06.2025".parse().unwrap(), 4).unwrap();
/// for slot in slots {
///     println!("{slot}");
/// }
/// ```
pub fn compute_slots(
    db: &Database,
    policy: &BookingPolicy,
    restaurant_id: RestaurantId,
    date: ServiceDate,
    party_size: u32,
) -> Result<Vec<ClockTime>> {
    require_party_size(party_size)?;

    if db.get_restaurant(restaurant_id)?.is_none() {
        log::debug!("no restaurant {restaurant_id}, no slots");
        return Ok(Vec::new());
    }

    let tables = db.list_tables(restaurant_id)?;
    let in_band: Vec<TableId> = booking::tables_in_band(policy, &tables, party_size)
        .iter()
        .map(|t| t.id)
        .collect();
    let booked = db.list_active_reservations(&in_band, date)?;

    let slots = booking::compute_slots(policy, &tables, &booked, party_size);
    log::debug!(
        "{} slot(s) for {party_size} guest(s) on {date} across {} table(s)",
        slots.len(),
        in_band.len()
    );
    Ok(slots)
}

/// The table a booking at `start` would land on right now, if any.
///
/// This is read-only; [`assign_and_book`] repeats the choice under the
/// store's write lock.
///
/// # Errors
///
/// Returns `NotFound` for an unknown restaurant, a validation error for a
/// zero party size or an unrepresentable window, or a store error.
pub fn assign_table(
    db: &Database,
    policy: &BookingPolicy,
    restaurant_id: RestaurantId,
    date: ServiceDate,
    start: ClockTime,
    party_size: u32,
) -> Result<Option<Table>> {
    require_party_size(party_size)?;
    let window = policy.reservation_window(start)?;

    db.require_restaurant(restaurant_id)?;
    let tables = db.list_tables(restaurant_id)?;
    let ids: Vec<TableId> = tables.iter().map(|t| t.id).collect();
    let booked = db.list_active_reservations(&ids, date)?;

    Ok(select_table(policy, &tables, &booked, party_size, &window, &HashSet::new()).cloned())
}

/// A booking plan generator.
pub struct BookingPlan<'a> {
    request: BookingRequest,
    policy: &'a BookingPolicy,
    now: NaiveDateTime,
}

impl<'a> BookingPlan<'a> {
    /// Creates a plan for `request`. `now` bounds the bookable dates and is
    /// used to refresh the table's cached status after the insert.
    #[must_use]
    pub const fn new(request: BookingRequest, policy: &'a BookingPolicy, now: NaiveDateTime) -> Self {
        Self {
            request,
            policy,
            now,
        }
    }

    /// Validates the request and picks the first-choice table.
    ///
    /// Nothing is written. Validation happens before any store access.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input (including a start off the
    /// slot grid or a date outside the bookable range), `NotFound` for an unknown
    /// restaurant and `NoTableAvailable` when no table in the capacity band
    /// is free over the reservation window.
    pub fn build_plan(self, db: &Database) -> Result<OperationPlan> {
        let mut request = self.request;
        require_party_size(request.party_size)?;
        request.contact = request.contact.normalized();
        request.contact.validate()?;

        if !self.policy.is_within_service(request.start) {
            return Err(Error::Validation {
                field: "start".into(),
                message: format!(
                    "{} is outside service hours {}-{}",
                    request.start, self.policy.service_open, self.policy.service_close
                ),
            });
        }
        if !self.policy.is_on_slot_grid(request.start) {
            return Err(Error::Validation {
                field: "start".into(),
                message: format!(
                    "{} is not on the {}-minute slot grid starting at {}",
                    request.start, self.policy.slot_step_minutes, self.policy.service_open
                ),
            });
        }
        self.policy
            .check_booking_date(request.date, ServiceDate::from(self.now.date()))?;
        let window = self.policy.reservation_window(request.start)?;

        db.require_restaurant(request.restaurant_id)?;
        let tables = db.list_tables(request.restaurant_id)?;
        let ids: Vec<TableId> = tables.iter().map(|t| t.id).collect();
        let booked = db.list_active_reservations(&ids, request.date)?;

        let first_choice = select_table(
            self.policy,
            &tables,
            &booked,
            request.party_size,
            &window,
            &HashSet::new(),
        )
        .cloned()
        .ok_or_else(|| Error::NoTableAvailable {
            party_size: request.party_size,
            date: request.date.to_string(),
            time: request.start.to_string(),
        })?;

        let mut plan = OperationPlan::new(format!(
            "Book a table for {} guest(s) on {} at {}",
            request.party_size, request.date, request.start
        ));
        if !first_choice.is_exact_fit(request.party_size) {
            plan = plan.add_warning(format!(
                "no exact fit for {} guest(s); using {first_choice}",
                request.party_size
            ));
        }

        Ok(plan.add_action(PlanAction::AssignTable {
            request,
            window,
            first_choice,
            policy: self.policy.clone(),
            now: self.now,
        }))
    }
}

/// Plans and executes a booking in one call.
///
/// # Errors
///
/// Returns the planning errors of [`BookingPlan::build_plan`], plus
/// `ReservationConflict` when every candidate table is taken concurrently.
///
/// # Examples
///
/// ```no_run
/// use tablebook::database::{Database, DatabaseConfig};
/// use tablebook::operations::{assign_and_book, BookingRequest};
/// use tablebook::{BookingPolicy, CustomerContact};
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/tablebook.db")).unwrap();
/// let contact = CustomerContact::new("Ivan", "Petrenko", "380671112233", None);
/// let request = BookingRequest::new(1, "01.06.2025".parse().unwrap(), "18:00".parse().unwrap(), 4, contact);
///
/// let now = chrono::Local::now().naive_local();
/// let reservation = assign_and_book(&mut db, &BookingPolicy::default(), request, now).unwrap();
/// println!("reservation {} on table id {}", reservation.id(), reservation.table_id());
/// ```
pub fn assign_and_book(
    db: &mut Database,
    policy: &BookingPolicy,
    request: BookingRequest,
    now: NaiveDateTime,
) -> Result<Reservation> {
    let plan = BookingPlan::new(request, policy, now).build_plan(db)?;
    let result = PlanExecutor::new(db).execute(&plan)?;
    result.reservation.ok_or_else(|| Error::NotFound {
        resource: "booked reservation".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{booking, create_test_database, date, seed_restaurant};
    use crate::database::ReservationFilter;
    use crate::reservation::{CustomerContact, ReservationStatus};
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, 20)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    fn contact() -> CustomerContact {
        CustomerContact::new("Olena", "Shevchenko", "380501234567", None)
    }

    fn request(restaurant: RestaurantId, start: &str, party: u32) -> BookingRequest {
        BookingRequest::new(restaurant, date("01.06.2025"), t(start), party, contact())
    }

    #[test]
    fn test_compute_slots_empty_restaurant_and_unknown() {
        let mut db = create_test_database();
        let (restaurant, _) = seed_restaurant(&mut db, &[]);
        let policy = BookingPolicy::default();

        assert!(compute_slots(&db, &policy, restaurant, date("01.06.2025"), 2)
            .unwrap()
            .is_empty());
        assert!(compute_slots(&db, &policy, 999, date("01.06.2025"), 2)
            .unwrap()
            .is_empty());
        assert!(compute_slots(&db, &policy, restaurant, date("01.06.2025"), 0)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_compute_slots_excludes_lookback() {
        let mut db = create_test_database();
        let (restaurant, tables) = seed_restaurant(&mut db, &[(1, 4)]);
        db.create_reservation(&booking(tables[0].id, "01.06.2025", "18:00", "20:00"))
            .unwrap();

        let slots = compute_slots(&db, &BookingPolicy::default(), restaurant, date("01.06.2025"), 4)
            .unwrap();
        assert_eq!(slots.len(), 49 - 16);
        assert!(slots.contains(&t("15:45")));
        assert!(!slots.contains(&t("16:00")));
        assert!(!slots.contains(&t("19:45")));
        assert!(slots.contains(&t("20:00")));
    }

    #[test]
    fn test_assign_table_prefers_exact_fit() {
        let mut db = create_test_database();
        let (restaurant, tables) = seed_restaurant(&mut db, &[(1, 6), (2, 4), (3, 5)]);
        let policy = BookingPolicy::default();

        let chosen = assign_table(&db, &policy, restaurant, date("01.06.2025"), t("18:00"), 4)
            .unwrap()
            .unwrap();
        assert_eq!(chosen.id, tables[1].id);

        db.create_reservation(&booking(tables[1].id, "01.06.2025", "19:00", "21:00"))
            .unwrap();
        let chosen = assign_table(&db, &policy, restaurant, date("01.06.2025"), t("18:00"), 4)
            .unwrap()
            .unwrap();
        assert_eq!(chosen.id, tables[2].id);

        assert!(assign_table(&db, &policy, restaurant, date("01.06.2025"), t("18:00"), 7)
            .unwrap()
            .is_none());
        assert!(assign_table(&db, &policy, 999, date("01.06.2025"), t("18:00"), 4)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_build_plan_validates_before_store() {
        let db = create_test_database();
        let policy = BookingPolicy::default();

        // Unknown restaurant, but the party size is checked first.
        let err = BookingPlan::new(request(999, "18:00", 0), &policy, now())
            .build_plan(&db)
            .unwrap_err();
        assert!(err.is_validation());

        let bad_contact = BookingRequest::new(
            999,
            date("01.06.2025"),
            t("18:00"),
            2,
            CustomerContact::new("I", "Petrenko", "380671112233", None),
        );
        assert!(BookingPlan::new(bad_contact, &policy, now())
            .build_plan(&db)
            .unwrap_err()
            .is_validation());

        assert!(BookingPlan::new(request(999, "23:00", 2), &policy, now())
            .build_plan(&db)
            .unwrap_err()
            .is_validation());

        assert!(BookingPlan::new(request(999, "18:00", 2), &policy, now())
            .build_plan(&db)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_build_plan_rejects_start_off_grid() {
        let mut db = create_test_database();
        let (restaurant, _) = seed_restaurant(&mut db, &[(1, 4)]);
        let policy = BookingPolicy::default();

        let err = BookingPlan::new(request(restaurant, "18:07", 2), &policy, now())
            .build_plan(&db)
            .unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "start"));
        assert!(err.to_string().contains("slot grid"));
    }

    #[test]
    fn test_booking_date_must_be_in_range() {
        let mut db = create_test_database();
        let (restaurant, _) = seed_restaurant(&mut db, &[(1, 4)]);
        let policy = BookingPolicy::default();
        let today = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();

        let on = |day: &str| {
            BookingRequest::new(restaurant, date(day), t("18:00"), 2, contact())
        };
        for day in ["01.01.2020", "01.06.2025", "02.09.2025"] {
            let err = assign_and_book(&mut db, &policy, on(day), today).unwrap_err();
            assert!(
                matches!(err, Error::Validation { ref field, .. } if field == "date"),
                "{day}: {err}"
            );
        }
        assert!(db.list_reservations(&ReservationFilter::default()).unwrap().is_empty());

        assign_and_book(&mut db, &policy, on("02.06.2025"), today).unwrap();
        assign_and_book(&mut db, &policy, on("01.09.2025"), today).unwrap();
    }

    #[test]
    fn test_build_plan_warns_without_exact_fit() {
        let mut db = create_test_database();
        let (restaurant, _) = seed_restaurant(&mut db, &[(1, 6)]);
        let policy = BookingPolicy::default();

        let plan = BookingPlan::new(request(restaurant, "18:00", 4), &policy, now())
            .build_plan(&db)
            .unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.warnings.len(), 1);
    }

    #[test]
    fn test_assign_and_book_then_no_table() {
        let mut db = create_test_database();
        let (restaurant, tables) = seed_restaurant(&mut db, &[(1, 4)]);
        let policy = BookingPolicy::default();

        let reservation =
            assign_and_book(&mut db, &policy, request(restaurant, "18:00", 4), now()).unwrap();
        assert_eq!(reservation.table_id(), tables[0].id);
        assert_eq!(reservation.time().end(), t("20:00"));
        assert_eq!(reservation.status(), ReservationStatus::Active);

        let err = assign_and_book(&mut db, &policy, request(restaurant, "19:00", 4), now())
            .unwrap_err();
        assert!(err.is_unavailable());

        // Touching windows are fine.
        assign_and_book(&mut db, &policy, request(restaurant, "20:00", 4), now()).unwrap();
    }

    #[test]
    fn test_late_booking_end_is_capped() {
        let mut db = create_test_database();
        let (restaurant, _) = seed_restaurant(&mut db, &[(1, 2)]);
        let policy = BookingPolicy::default();

        let reservation =
            assign_and_book(&mut db, &policy, request(restaurant, "22:00", 2), now()).unwrap();
        assert_eq!(reservation.time().end(), t("23:59"));
    }

    #[test]
    fn test_cancel_frees_slot() {
        let mut db = create_test_database();
        let (restaurant, _) = seed_restaurant(&mut db, &[(1, 4)]);
        let policy = BookingPolicy::default();

        let reservation =
            assign_and_book(&mut db, &policy, request(restaurant, "18:00", 4), now()).unwrap();
        let slots = compute_slots(&db, &policy, restaurant, date("01.06.2025"), 4).unwrap();
        assert!(!slots.contains(&t("18:00")));

        db.update_reservation_status(reservation.id(), ReservationStatus::Cancelled)
            .unwrap();
        let slots = compute_slots(&db, &policy, restaurant, date("01.06.2025"), 4).unwrap();
        assert_eq!(slots.len(), 49);
    }
}
