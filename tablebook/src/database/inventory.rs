//! Restaurant and table inventory operations.

use rusqlite::{params, OptionalExtension};

use crate::error::{Error, Result};
use crate::table::{Restaurant, RestaurantId, Table, TableId, TableStatus};

use super::connection::Database;
use super::schema::TABLE_COLUMNS;

/// Deserializes a table from a row selected with [`TABLE_COLUMNS`].
pub(super) fn row_to_table(row: &rusqlite::Row<'_>) -> rusqlite::Result<Table> {
    let status: String = row.get(4)?;
    let status = status
        .parse::<TableStatus>()
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

    Ok(Table {
        id: row.get(0)?,
        restaurant_id: row.get(1)?,
        number: row.get(2)?,
        capacity: row.get(3)?,
        status,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

impl Database {
    /// Creates a restaurant.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name, or a database error.
    pub fn create_restaurant(&mut self, name: &str) -> Result<Restaurant> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation {
                field: "name".into(),
                message: "restaurant name is required".into(),
            });
        }

        self.conn
            .execute("INSERT INTO restaurants (name) VALUES (?1)", [name])?;
        Ok(Restaurant {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    /// Fetches a restaurant by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_restaurant(&self, id: RestaurantId) -> Result<Option<Restaurant>> {
        let restaurant = self
            .conn
            .query_row(
                "SELECT id, name FROM restaurants WHERE id = ?1",
                [id],
                |row| {
                    Ok(Restaurant {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(restaurant)
    }

    /// Fetches a restaurant or fails with [`Error::NotFound`].
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such restaurant exists.
    pub fn require_restaurant(&self, id: RestaurantId) -> Result<Restaurant> {
        self.get_restaurant(id)?.ok_or_else(|| Error::NotFound {
            resource: format!("restaurant {id}"),
        })
    }

    /// Lists all restaurants by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_restaurants(&self) -> Result<Vec<Restaurant>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM restaurants ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Restaurant {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// Adds a table to a restaurant's inventory.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a zero number or capacity or a number
    /// already used in the restaurant, and `NotFound` for an unknown
    /// restaurant.
    pub fn add_table(
        &mut self,
        restaurant_id: RestaurantId,
        number: u32,
        capacity: u32,
    ) -> Result<Table> {
        if number == 0 {
            return Err(Error::Validation {
                field: "number".into(),
                message: "table number must be greater than 0".into(),
            });
        }
        if capacity == 0 {
            return Err(Error::Validation {
                field: "capacity".into(),
                message: "capacity must be greater than 0".into(),
            });
        }
        self.require_restaurant(restaurant_id)?;

        let inserted = self.conn.execute(
            "INSERT INTO dining_tables (restaurant_id, number, capacity, status) \
             VALUES (?1, ?2, ?3, 'free')",
            params![restaurant_id, number, capacity],
        );
        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(Error::Validation {
                    field: "number".into(),
                    message: format!("table {number} already exists in restaurant {restaurant_id}"),
                });
            }
            Err(e) => return Err(e.into()),
        }

        log::debug!("added table {number} ({capacity} seats) to restaurant {restaurant_id}");
        Ok(Table {
            id: self.conn.last_insert_rowid(),
            restaurant_id,
            number,
            capacity,
            status: TableStatus::Free,
        })
    }

    /// Fetches a table by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_table(&self, id: TableId) -> Result<Option<Table>> {
        let sql = format!("SELECT {TABLE_COLUMNS} FROM dining_tables WHERE id = ?1");
        Ok(self.conn.query_row(&sql, [id], row_to_table).optional()?)
    }

    /// Fetches a table by its number within a restaurant.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_table_by_number(
        &self,
        restaurant_id: RestaurantId,
        number: u32,
    ) -> Result<Option<Table>> {
        let sql = format!(
            "SELECT {TABLE_COLUMNS} FROM dining_tables WHERE restaurant_id = ?1 AND number = ?2"
        );
        Ok(self
            .conn
            .query_row(&sql, params![restaurant_id, number], row_to_table)
            .optional()?)
    }

    /// Lists a restaurant's tables by number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_tables(&self, restaurant_id: RestaurantId) -> Result<Vec<Table>> {
        let sql = format!(
            "SELECT {TABLE_COLUMNS} FROM dining_tables WHERE restaurant_id = ?1 ORDER BY number"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([restaurant_id], row_to_table)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// Lists every table of every restaurant.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_all_tables(&self) -> Result<Vec<Table>> {
        let sql = format!(
            "SELECT {TABLE_COLUMNS} FROM dining_tables ORDER BY restaurant_id, number"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], row_to_table)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// Overwrites a table's status. Returns whether the table exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn set_table_status(&mut self, id: TableId, status: TableStatus) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE dining_tables SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        Ok(changed > 0)
    }

    /// Removes a table.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown table and a validation error while
    /// the table still has active reservations.
    pub fn remove_table(&mut self, id: TableId) -> Result<Table> {
        let tx = self.begin_immediate()?;

        let sql = format!("SELECT {TABLE_COLUMNS} FROM dining_tables WHERE id = ?1");
        let table = tx
            .query_row(&sql, [id], row_to_table)
            .optional()?
            .ok_or_else(|| Error::NotFound {
                resource: format!("table {id}"),
            })?;

        let active: i64 = tx.query_row(
            "SELECT COUNT(*) FROM reservations WHERE table_id = ?1 AND status = 'active'",
            [id],
            |row| row.get(0),
        )?;
        if active > 0 {
            return Err(Error::Validation {
                field: "table".into(),
                message: format!("table {} has {active} active reservation(s)", table.number),
            });
        }

        tx.execute("DELETE FROM dining_tables WHERE id = ?1", [id])?;
        tx.commit()?;
        Ok(table)
    }

    /// Sets every table of a restaurant to `free`. Returns the number of
    /// tables whose status changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn free_all_tables(&mut self, restaurant_id: RestaurantId) -> Result<usize> {
        let changed = self.conn.execute(
            "UPDATE dining_tables SET status = 'free' WHERE restaurant_id = ?1 AND status != 'free'",
            [restaurant_id],
        )?;
        Ok(changed)
    }
}
