//! Reservation types for table bookings.
//!
//! A [`NewReservation`] is a validated booking that has not been persisted
//! yet; the store turns it into a [`Reservation`] with an identifier. The
//! builder validates customer details the same way for guests and staff.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::clock::{ServiceDate, TimeRange};
use crate::table::TableId;

/// Identifier of a reservation row.
pub type ReservationId = i64;

/// Lifecycle state of a reservation.
///
/// Only `Active` reservations block slots. `Cancelled` and `Completed` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Booked and still pending or in progress.
    Active,
    /// Served; set by staff or by the elapsed-reservation sweep.
    Completed,
    /// Cancelled by the guest or by staff.
    Cancelled,
}

impl ReservationStatus {
    /// The persisted representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether no further transitions are allowed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            other => Err(ValidationError {
                field: "status".into(),
                message: format!(
                    "unknown reservation status '{other}' (expected active, completed or cancelled)"
                ),
            }),
        }
    }
}

/// Who placed a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatedBy {
    /// A guest booking for themselves.
    User,
    /// Restaurant staff booking on a guest's behalf.
    Admin,
}

impl CreatedBy {
    /// The persisted representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for CreatedBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CreatedBy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(ValidationError {
                field: "created_by".into(),
                message: format!("unknown creator '{other}' (expected user or admin)"),
            }),
        }
    }
}

/// Contact details of the guest a reservation is held for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerContact {
    /// First name.
    pub name: String,
    /// Last name.
    pub surname: String,
    /// Phone number, `380` followed by nine digits.
    pub phone: String,
    /// Optional email address.
    pub email: Option<String>,
}

impl CustomerContact {
    /// Creates contact details. Call [`CustomerContact::validate`] or go
    /// through a builder before persisting.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        surname: impl Into<String>,
        phone: impl Into<String>,
        email: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            surname: surname.into(),
            phone: phone.into(),
            email,
        }
    }

    /// Returns a copy with surrounding whitespace removed and an empty email
    /// treated as absent.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            surname: self.surname.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self
                .email
                .as_deref()
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_string),
        }
    }

    /// Checks the booking form rules.
    ///
    /// # Errors
    ///
    /// Returns the first failing field: a name or surname shorter than two
    /// characters or containing anything but letters, `'` and `-`, a phone
    /// that is not `380` plus nine digits, or a malformed email.
    ///
    /// # Examples
    ///
    /// ```
    /// use tablebook::CustomerContact;
    ///
    /// let ok = CustomerContact::new("Olena", "Shevchenko", "380501234567", None);
    /// assert!(ok.validate().is_ok());
    ///
    /// let bad = CustomerContact::new("Olena", "Shevchenko", "0501234567", None);
    /// assert_eq!(bad.validate().unwrap_err().field, "customer_phone");
    /// ```
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_person_name("customer_name", "name", &self.name)?;
        check_person_name("customer_surname", "surname", &self.surname)?;

        if !is_valid_phone(self.phone.trim()) {
            return Err(ValidationError {
                field: "customer_phone".into(),
                message: "phone must be 380 followed by 9 digits".into(),
            });
        }

        if let Some(email) = self.email.as_deref().map(str::trim) {
            if !email.is_empty() && !is_valid_email(email) {
                return Err(ValidationError {
                    field: "email".into(),
                    message: format!("'{email}' is not a valid email address"),
                });
            }
        }

        Ok(())
    }

    /// Full name for display.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

const MAX_NAME_CHARS: usize = 50;

fn check_person_name(field: &str, label: &str, value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    let len = value.chars().count();
    if len < 2 {
        return Err(ValidationError {
            field: field.into(),
            message: format!("{label} must be at least 2 characters"),
        });
    }
    if len > MAX_NAME_CHARS {
        return Err(ValidationError {
            field: field.into(),
            message: format!("{label} must be at most {MAX_NAME_CHARS} characters"),
        });
    }
    if !value.chars().all(is_name_char) {
        return Err(ValidationError {
            field: field.into(),
            message: format!("{label} may contain only letters, apostrophes and hyphens"),
        });
    }
    Ok(())
}

// Latin and Ukrainian/Russian Cyrillic letters.
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphabetic()
        || matches!(
            c,
            'а'..='я' | 'А'..='Я' | 'ё' | 'Ё' | 'і' | 'І' | 'ї' | 'Ї' | 'є' | 'Є' | 'ґ' | 'Ґ' | '\'' | '-'
        )
}

fn is_valid_phone(phone: &str) -> bool {
    phone.len() == 12 && phone.starts_with("380") && phone.bytes().all(|b| b.is_ascii_digit())
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(head, tail)| !head.is_empty() && !tail.is_empty() && !domain.ends_with('.'))
}

/// The occupied interval of an active reservation, as the availability
/// calculator sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedInterval {
    /// Table the reservation holds.
    pub table_id: TableId,
    /// `[start, end)` on the reservation's date.
    pub range: TimeRange,
}

/// A validated booking that has not been written to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReservation {
    table_id: TableId,
    date: ServiceDate,
    time: TimeRange,
    people_count: u32,
    contact: CustomerContact,
    created_by: CreatedBy,
    user_id: Option<i64>,
}

impl NewReservation {
    /// Starts building a reservation for `table_id` on `date` over `time`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tablebook::{ClockTime, CustomerContact, NewReservation, ServiceDate, TimeRange};
    ///
    /// let date: ServiceDate = "01.06.2025".parse().unwrap();
    /// let time = TimeRange::new("18:00".parse().unwrap(), "20:00".parse().unwrap()).unwrap();
    /// let contact = CustomerContact::new("Ivan", "Petrenko", "380671112233", None);
    ///
    /// let booking = NewReservation::builder(1, date, time, 4, contact).build().unwrap();
    /// assert_eq!(booking.people_count(), 4);
    /// ```
    #[must_use]
    pub fn builder(
        table_id: TableId,
        date: ServiceDate,
        time: TimeRange,
        people_count: u32,
        contact: CustomerContact,
    ) -> NewReservationBuilder {
        NewReservationBuilder {
            table_id,
            date,
            time,
            people_count,
            contact,
            created_by: CreatedBy::User,
            user_id: None,
        }
    }

    /// Target table.
    #[must_use]
    pub const fn table_id(&self) -> TableId {
        self.table_id
    }

    /// Reservation date.
    #[must_use]
    pub const fn date(&self) -> ServiceDate {
        self.date
    }

    /// Reserved interval.
    #[must_use]
    pub const fn time(&self) -> TimeRange {
        self.time
    }

    /// Party size.
    #[must_use]
    pub const fn people_count(&self) -> u32 {
        self.people_count
    }

    /// Guest contact details.
    #[must_use]
    pub const fn contact(&self) -> &CustomerContact {
        &self.contact
    }

    /// Who placed the booking.
    #[must_use]
    pub const fn created_by(&self) -> CreatedBy {
        self.created_by
    }

    /// Account of the guest, when booked by a signed-in user.
    #[must_use]
    pub const fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    pub(crate) fn into_reservation(self, id: ReservationId) -> Reservation {
        Reservation {
            id,
            table_id: self.table_id,
            date: self.date,
            time: self.time,
            people_count: self.people_count,
            status: ReservationStatus::Active,
            contact: self.contact,
            created_by: self.created_by,
            user_id: self.user_id,
        }
    }
}

/// Builder for [`NewReservation`].
#[derive(Debug)]
pub struct NewReservationBuilder {
    table_id: TableId,
    date: ServiceDate,
    time: TimeRange,
    people_count: u32,
    contact: CustomerContact,
    created_by: CreatedBy,
    user_id: Option<i64>,
}

impl NewReservationBuilder {
    /// Sets who placed the booking (defaults to [`CreatedBy::User`]).
    #[must_use]
    pub const fn created_by(mut self, created_by: CreatedBy) -> Self {
        self.created_by = created_by;
        self
    }

    /// Links the booking to a user account.
    #[must_use]
    pub const fn user_id(mut self, user_id: Option<i64>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Validates and builds the reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if the party size is zero or the contact details are
    /// invalid.
    pub fn build(self) -> Result<NewReservation, ValidationError> {
        if self.people_count == 0 {
            return Err(ValidationError {
                field: "people_count".into(),
                message: "party size must be at least 1".into(),
            });
        }

        let contact = self.contact.normalized();
        contact.validate()?;

        Ok(NewReservation {
            table_id: self.table_id,
            date: self.date,
            time: self.time,
            people_count: self.people_count,
            contact,
            created_by: self.created_by,
            user_id: self.user_id,
        })
    }
}

/// A persisted reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    table_id: TableId,
    date: ServiceDate,
    time: TimeRange,
    people_count: u32,
    status: ReservationStatus,
    contact: CustomerContact,
    created_by: CreatedBy,
    user_id: Option<i64>,
}

impl Reservation {
    /// Reassembles a stored row. Values are trusted as already validated.
    #[allow(clippy::too_many_arguments)]
    pub(crate) const fn from_parts(
        id: ReservationId,
        table_id: TableId,
        date: ServiceDate,
        time: TimeRange,
        people_count: u32,
        status: ReservationStatus,
        contact: CustomerContact,
        created_by: CreatedBy,
        user_id: Option<i64>,
    ) -> Self {
        Self {
            id,
            table_id,
            date,
            time,
            people_count,
            status,
            contact,
            created_by,
            user_id,
        }
    }

    /// Store identifier.
    #[must_use]
    pub const fn id(&self) -> ReservationId {
        self.id
    }

    /// Assigned table.
    #[must_use]
    pub const fn table_id(&self) -> TableId {
        self.table_id
    }

    /// Reservation date.
    #[must_use]
    pub const fn date(&self) -> ServiceDate {
        self.date
    }

    /// Reserved interval.
    #[must_use]
    pub const fn time(&self) -> TimeRange {
        self.time
    }

    /// Party size.
    #[must_use]
    pub const fn people_count(&self) -> u32 {
        self.people_count
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn status(&self) -> ReservationStatus {
        self.status
    }

    /// Guest contact details.
    #[must_use]
    pub const fn contact(&self) -> &CustomerContact {
        &self.contact
    }

    /// Who placed the booking.
    #[must_use]
    pub const fn created_by(&self) -> CreatedBy {
        self.created_by
    }

    /// Account of the guest, if any.
    #[must_use]
    pub const fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    /// Whether the reservation still blocks its table.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == ReservationStatus::Active
    }

    /// The interval this reservation occupies.
    #[must_use]
    pub const fn interval(&self) -> BookedInterval {
        BookedInterval {
            table_id: self.table_id,
            range: self.time,
        }
    }
}

/// Validation error for a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// A description of the validation failure.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod proptests;
