//! Reservation store operations.
//!
//! The only write path that creates a reservation is
//! [`Database::try_create_reservation_atomic`], which re-checks overlap and
//! inserts inside one IMMEDIATE transaction. Two writers racing for the same
//! table and window are therefore serialized by the store, and the loser sees
//! the winner's row.

use chrono::NaiveDateTime;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, OptionalExtension};

use crate::clock::{ClockTime, ServiceDate, TimeRange};
use crate::error::{Error, Result};
use crate::reservation::{
    is_valid_email, BookedInterval, CreatedBy, CustomerContact, NewReservation, Reservation,
    ReservationId, ReservationStatus,
};
use crate::table::{RestaurantId, TableId};

use super::connection::{busy_to_timeout, Database};
use super::schema::{COUNT_OVERLAPPING_ACTIVE, INSERT_RESERVATION, RESERVATION_COLUMNS};

fn conversion_error(err: impl std::error::Error + Send + Sync + 'static) -> rusqlite::Error {
    rusqlite::Error::ToSqlConversionFailure(Box::new(err))
}

/// Deserializes a reservation from a row selected with
/// [`RESERVATION_COLUMNS`].
pub(super) fn row_to_reservation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reservation> {
    let date: String = row.get(2)?;
    let start: String = row.get(3)?;
    let end: String = row.get(4)?;
    let status: String = row.get(6)?;
    let created_by: String = row.get(11)?;

    let date = date.parse::<ServiceDate>().map_err(conversion_error)?;
    let start = start.parse::<ClockTime>().map_err(conversion_error)?;
    let end = end.parse::<ClockTime>().map_err(conversion_error)?;
    let time = TimeRange::new(start, end).map_err(conversion_error)?;
    let status = status.parse::<ReservationStatus>().map_err(conversion_error)?;
    let created_by = created_by.parse::<CreatedBy>().map_err(conversion_error)?;

    let contact = CustomerContact {
        name: row.get(7)?,
        surname: row.get(8)?,
        phone: row.get(9)?,
        email: row.get(10)?,
    };

    Ok(Reservation::from_parts(
        row.get(0)?,
        row.get(1)?,
        date,
        time,
        row.get(5)?,
        status,
        contact,
        created_by,
        row.get(12)?,
    ))
}

/// Filters for [`Database::list_reservations`]. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationFilter {
    /// Only reservations on tables of this restaurant.
    pub restaurant_id: Option<RestaurantId>,
    /// Only reservations on this table.
    pub table_id: Option<TableId>,
    /// Only reservations on this date.
    pub date: Option<ServiceDate>,
    /// Only reservations in this state.
    pub status: Option<ReservationStatus>,
    /// Only reservations made with this email (case-insensitive).
    pub email: Option<String>,
}

impl ReservationFilter {
    /// Restricts to one restaurant.
    #[must_use]
    pub const fn with_restaurant(mut self, restaurant_id: RestaurantId) -> Self {
        self.restaurant_id = Some(restaurant_id);
        self
    }

    /// Restricts to one table.
    #[must_use]
    pub const fn with_table(mut self, table_id: TableId) -> Self {
        self.table_id = Some(table_id);
        self
    }

    /// Restricts to one date.
    #[must_use]
    pub const fn with_date(mut self, date: ServiceDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Restricts to one status.
    #[must_use]
    pub const fn with_status(mut self, status: ReservationStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to one guest email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

impl Database {
    /// Inserts a reservation unless an active reservation on the same table
    /// and date overlaps it.
    ///
    /// Returns `Ok(None)` when the overlap check fails; nothing is written in
    /// that case.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the table does not exist, `LockTimeout` if the
    /// store stays locked past the busy timeout, or another database error.
    pub fn try_create_reservation_atomic(
        &mut self,
        reservation: &NewReservation,
    ) -> Result<Option<Reservation>> {
        let wait = self.lock_wait_seconds();
        let tx = self.begin_immediate()?;

        let table_exists: bool = tx.query_row(
            "SELECT EXISTS (SELECT 1 FROM dining_tables WHERE id = ?1)",
            [reservation.table_id()],
            |row| row.get(0),
        )?;
        if !table_exists {
            return Err(Error::NotFound {
                resource: format!("table {}", reservation.table_id()),
            });
        }

        let date = reservation.date().to_string();
        let time = reservation.time();
        let overlapping: i64 = tx.query_row(
            COUNT_OVERLAPPING_ACTIVE,
            params![
                reservation.table_id(),
                date,
                time.start().to_string(),
                time.end().to_string()
            ],
            |row| row.get(0),
        )?;
        if overlapping > 0 {
            log::debug!(
                "table {} already booked on {date} within {time}",
                reservation.table_id()
            );
            return Ok(None);
        }

        let contact = reservation.contact();
        tx.execute(
            INSERT_RESERVATION,
            params![
                reservation.table_id(),
                date,
                time.start().to_string(),
                time.end().to_string(),
                reservation.people_count(),
                contact.name,
                contact.surname,
                contact.phone,
                contact.email,
                reservation.created_by().as_str(),
                reservation.user_id(),
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit().map_err(|e| busy_to_timeout(wait, e))?;

        log::info!(
            "reservation {id} created on table {} for {date} {time}",
            reservation.table_id()
        );
        Ok(Some(reservation.clone().into_reservation(id)))
    }

    /// Inserts a reservation, failing on overlap.
    ///
    /// # Errors
    ///
    /// Returns `ReservationConflict` if an active reservation overlaps, plus
    /// the errors of [`Database::try_create_reservation_atomic`].
    pub fn create_reservation(&mut self, reservation: &NewReservation) -> Result<Reservation> {
        self.try_create_reservation_atomic(reservation)?
            .ok_or_else(|| Error::ReservationConflict {
                details: format!(
                    "table {} is already booked on {} within {}",
                    reservation.table_id(),
                    reservation.date(),
                    reservation.time()
                ),
            })
    }

    /// Intervals of active reservations on the given tables and date.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_active_reservations(
        &self,
        table_ids: &[TableId],
        date: ServiceDate,
    ) -> Result<Vec<BookedInterval>> {
        if table_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; table_ids.len()].join(", ");
        let sql = format!(
            "SELECT table_id, start_time, end_time FROM reservations \
             WHERE status = 'active' AND date = ? AND table_id IN ({placeholders}) \
             ORDER BY table_id, start_time"
        );

        let mut values: Vec<Value> = Vec::with_capacity(table_ids.len() + 1);
        values.push(Value::Text(date.to_string()));
        values.extend(table_ids.iter().map(|id| Value::Integer(*id)));

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values), |row| {
            let start: String = row.get(1)?;
            let end: String = row.get(2)?;
            let start = start.parse::<ClockTime>().map_err(conversion_error)?;
            let end = end.parse::<ClockTime>().map_err(conversion_error)?;
            Ok(BookedInterval {
                table_id: row.get(0)?,
                range: TimeRange::new(start, end).map_err(conversion_error)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// Fetches a reservation by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_reservation(&self, id: ReservationId) -> Result<Option<Reservation>> {
        let sql = format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = ?1");
        Ok(self.conn.query_row(&sql, [id], row_to_reservation).optional()?)
    }

    /// Fetches a reservation or fails with [`Error::NotFound`].
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such reservation exists.
    pub fn require_reservation(&self, id: ReservationId) -> Result<Reservation> {
        self.get_reservation(id)?.ok_or_else(|| Error::NotFound {
            resource: format!("reservation {id}"),
        })
    }

    /// Lists reservations matching `filter`, ordered by date, start time and
    /// table.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_reservations(&self, filter: &ReservationFilter) -> Result<Vec<Reservation>> {
        let columns = RESERVATION_COLUMNS
            .split(", ")
            .map(|c| format!("r.{c}"))
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!(
            "SELECT {columns} FROM reservations r \
             JOIN dining_tables t ON t.id = r.table_id WHERE 1 = 1"
        );
        let mut values: Vec<Value> = Vec::new();

        if let Some(restaurant_id) = filter.restaurant_id {
            sql.push_str(" AND t.restaurant_id = ?");
            values.push(Value::Integer(restaurant_id));
        }
        if let Some(table_id) = filter.table_id {
            sql.push_str(" AND r.table_id = ?");
            values.push(Value::Integer(table_id));
        }
        if let Some(date) = filter.date {
            sql.push_str(" AND r.date = ?");
            values.push(Value::Text(date.to_string()));
        }
        if let Some(status) = filter.status {
            sql.push_str(" AND r.status = ?");
            values.push(Value::Text(status.as_str().to_string()));
        }
        if let Some(ref email) = filter.email {
            sql.push_str(" AND lower(r.email) = lower(?)");
            values.push(Value::Text(email.trim().to_string()));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values), row_to_reservation)?;
        let mut reservations = rows.collect::<rusqlite::Result<Vec<_>>>()?;

        // Stored dates are dd.mm.yyyy, so chronological order is applied here.
        reservations.sort_by_key(|r| (r.date(), r.time().start(), r.table_id(), r.id()));
        Ok(reservations)
    }

    /// Moves a reservation to `status`.
    ///
    /// Setting the status a reservation already has is a no-op. Only active
    /// reservations can change; cancelled and completed are final.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id and a validation error for a
    /// transition out of a terminal state.
    pub fn update_reservation_status(
        &mut self,
        id: ReservationId,
        status: ReservationStatus,
    ) -> Result<Reservation> {
        let wait = self.lock_wait_seconds();
        let tx = self.begin_immediate()?;

        let sql = format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = ?1");
        let current = tx
            .query_row(&sql, [id], row_to_reservation)
            .optional()?
            .ok_or_else(|| Error::NotFound {
                resource: format!("reservation {id}"),
            })?;

        if current.status() == status {
            return Ok(current);
        }
        if current.status().is_terminal() {
            return Err(Error::Validation {
                field: "status".into(),
                message: format!(
                    "reservation {id} is {} and cannot become {status}",
                    current.status()
                ),
            });
        }

        tx.execute(
            "UPDATE reservations SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        let updated = tx.query_row(&sql, [id], row_to_reservation)?;
        tx.commit().map_err(|e| busy_to_timeout(wait, e))?;

        log::info!("reservation {id}: {} -> {status}", current.status());
        Ok(updated)
    }

    /// Replaces the guest contact details of a reservation.
    ///
    /// # Errors
    ///
    /// Returns a validation error for invalid details and `NotFound` for an
    /// unknown id.
    pub fn update_contact(
        &mut self,
        id: ReservationId,
        contact: &CustomerContact,
    ) -> Result<Reservation> {
        let contact = contact.normalized();
        contact.validate()?;

        let changed = self.conn.execute(
            "UPDATE reservations SET customer_name = ?1, customer_surname = ?2, \
             customer_phone = ?3, email = ?4 WHERE id = ?5",
            params![contact.name, contact.surname, contact.phone, contact.email, id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound {
                resource: format!("reservation {id}"),
            });
        }

        self.require_reservation(id)
    }

    /// Moves every reservation booked under `old` (case-insensitive) to the
    /// email `new`, whatever its status.
    ///
    /// Returns how many reservations changed; no match is not an error.
    ///
    /// # Errors
    ///
    /// Returns a validation error if either address is malformed.
    pub fn rename_email(&mut self, old: &str, new: &str) -> Result<usize> {
        let (old, new) = (old.trim(), new.trim());
        for (field, email) in [("old_email", old), ("email", new)] {
            if !is_valid_email(email) {
                return Err(Error::Validation {
                    field: field.into(),
                    message: format!("'{email}' is not a valid email address"),
                });
            }
        }

        let changed = self.conn.execute(
            "UPDATE reservations SET email = ?1 WHERE lower(email) = lower(?2)",
            params![new, old],
        )?;
        log::info!("moved {changed} reservation(s) from {old} to {new}");
        Ok(changed)
    }

    /// Active reservations whose end lies before `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_elapsed_active(&self, now: NaiveDateTime) -> Result<Vec<Reservation>> {
        let today = ServiceDate::from(now.date());
        let now_time = ClockTime::from_naive(now.time());

        let active = self.list_reservations(&ReservationFilter {
            status: Some(ReservationStatus::Active),
            ..ReservationFilter::default()
        })?;

        Ok(active
            .into_iter()
            .filter(|r| r.date() < today || (r.date() == today && r.time().end() < now_time))
            .collect())
    }

    /// Runs `PRAGMA integrity_check`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseCorruption` if the check reports problems.
    pub fn verify_integrity(&self) -> Result<()> {
        let result: String = self
            .conn
            .query_row("PRAGMA integrity_check", [], |row| row.get(0))?;

        if result == "ok" {
            Ok(())
        } else {
            Err(Error::DatabaseCorruption {
                details: format!("Integrity check failed: {result}"),
            })
        }
    }
}
