//! Property-based tests for reservation validation.

use super::{CreatedBy, CustomerContact, NewReservation, ReservationStatus};
use crate::clock::{ClockTime, ServiceDate, TimeRange};
use proptest::prelude::*;

fn phone_strategy() -> impl Strategy<Value = String> {
    "[0-9]{9}".prop_map(|digits| format!("380{digits}"))
}

fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-zА-Яа-яІіЇїЄєҐґ'-]{2,50}"
}

fn range_strategy() -> impl Strategy<Value = TimeRange> {
    (0u16..1380, 1u16..60).prop_map(|(start, len)| {
        let start = ClockTime::from_minutes(start).unwrap();
        TimeRange::new(start, start.saturating_add_minutes(len)).unwrap()
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Any well-formed booking form is accepted and preserved.
    #[test]
    fn valid_contacts_build(
        name in name_strategy(),
        surname in name_strategy(),
        phone in phone_strategy(),
        party in 1u32..20,
        range in range_strategy(),
    ) {
        let date: ServiceDate = "01.06.2025".parse().unwrap();
        let contact = CustomerContact::new(name.clone(), surname, phone.clone(), None);
        let booking = NewReservation::builder(1, date, range, party, contact)
            .created_by(CreatedBy::Admin)
            .build()
            .unwrap();

        prop_assert_eq!(&booking.contact().name, &name);
        prop_assert_eq!(&booking.contact().phone, &phone);
        prop_assert_eq!(booking.people_count(), party);
        prop_assert_eq!(booking.time(), range);
    }

    // Phones that do not have exactly twelve digits never validate.
    #[test]
    fn wrong_length_phones_rejected(digits in "[0-9]{0,8}|[0-9]{10,14}") {
        let contact = CustomerContact::new("Ivan", "Petrenko", format!("380{digits}"), None);
        prop_assert!(contact.validate().is_err());
    }

    // A new reservation always lands in the store as active.
    #[test]
    fn persisted_reservations_start_active(id in 1i64..1_000_000, range in range_strategy()) {
        let date: ServiceDate = "02.06.2025".parse().unwrap();
        let contact = CustomerContact::new("Ivan", "Petrenko", "380671112233", None);
        let stored = NewReservation::builder(4, date, range, 2, contact)
            .build()
            .unwrap()
            .into_reservation(id);

        prop_assert_eq!(stored.status(), ReservationStatus::Active);
        prop_assert_eq!(stored.id(), id);
    }
}
