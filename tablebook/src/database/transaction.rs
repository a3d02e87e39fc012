//! Batch writes that must land together.

use rusqlite::params;

use crate::error::Result;
use crate::reservation::ReservationId;
use crate::table::{TableId, TableStatus};

use super::connection::{busy_to_timeout, Database};

const COMPLETE_ACTIVE: &str =
    "UPDATE reservations SET status = 'completed' WHERE id = ?1 AND status = 'active'";

const SET_TABLE_STATUS: &str =
    "UPDATE dining_tables SET status = ?1 WHERE id = ?2 AND status != ?1";

impl Database {
    /// Marks the given reservations completed in one transaction.
    ///
    /// Ids that are unknown or no longer active are skipped. Returns the
    /// number of reservations that changed.
    ///
    /// # Errors
    ///
    /// Returns `LockTimeout` if the store stays locked, or a database error;
    /// nothing is written in either case.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tablebook::database::{Database, DatabaseConfig};
    ///
    /// let mut db = Database::open(DatabaseConfig::new("/tmp/tablebook.db")).unwrap();
    /// let changed = db.complete_reservations(&[1, 2, 3]).unwrap();
    /// println!("completed {changed}");
    /// ```
    pub fn complete_reservations(&mut self, ids: &[ReservationId]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let wait = self.lock_wait_seconds();
        let tx = self.begin_immediate()?;

        let mut changed = 0;
        {
            let mut stmt = tx.prepare(COMPLETE_ACTIVE)?;
            for id in ids {
                changed += stmt.execute([id])?;
            }
        }

        tx.commit().map_err(|e| busy_to_timeout(wait, e))?;
        Ok(changed)
    }

    /// Writes several cached table statuses in one transaction. Returns the
    /// number of tables whose status changed.
    ///
    /// # Errors
    ///
    /// Returns `LockTimeout` if the store stays locked, or a database error.
    pub fn apply_table_statuses(&mut self, updates: &[(TableId, TableStatus)]) -> Result<usize> {
        if updates.is_empty() {
            return Ok(0);
        }

        let wait = self.lock_wait_seconds();
        let tx = self.begin_immediate()?;

        let mut changed = 0;
        {
            let mut stmt = tx.prepare(SET_TABLE_STATUS)?;
            for (id, status) in updates {
                changed += stmt.execute(params![status.as_str(), id])?;
            }
        }

        tx.commit().map_err(|e| busy_to_timeout(wait, e))?;
        Ok(changed)
    }
}
