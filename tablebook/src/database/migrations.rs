//! Database schema management and migrations.

use rusqlite::Connection;

use crate::error::{Error, Result};

use super::schema::{
    CREATE_EMAIL_INDEX, CREATE_METADATA_TABLE, CREATE_RESERVATIONS_TABLE,
    CREATE_RESTAURANTS_TABLE, CREATE_TABLES_TABLE, CREATE_TABLE_DATE_STATUS_INDEX,
    CURRENT_SCHEMA_VERSION, INSERT_SCHEMA_VERSION, SELECT_SCHEMA_VERSION,
};

/// Initializes the database schema.
///
/// # Errors
///
/// Returns an error if any SQL statement fails to execute.
///
/// # Examples
///
/// ```
/// use rusqlite::Connection;
/// use tablebook::database::migrations::{get_schema_version, initialize_schema};
///
/// let conn = Connection::open_in_memory().unwrap();
/// initialize_schema(&conn).unwrap();
/// assert_eq!(get_schema_version(&conn).unwrap(), 1);
/// ```
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_METADATA_TABLE, [])?;
    conn.execute(CREATE_RESTAURANTS_TABLE, [])?;
    conn.execute(CREATE_TABLES_TABLE, [])?;
    conn.execute(CREATE_RESERVATIONS_TABLE, [])?;

    conn.execute(CREATE_TABLE_DATE_STATUS_INDEX, [])?;
    conn.execute(CREATE_EMAIL_INDEX, [])?;

    conn.execute(INSERT_SCHEMA_VERSION, [CURRENT_SCHEMA_VERSION])?;
    log::info!("initialized store schema version {CURRENT_SCHEMA_VERSION}");

    Ok(())
}

/// Gets the current schema version from the database.
///
/// Returns `Ok(0)` for a database without a metadata table or version row.
///
/// # Errors
///
/// Returns an error if the query fails for another reason.
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    let has_metadata: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'metadata')",
        [],
        |row| row.get(0),
    )?;
    if !has_metadata {
        return Ok(0);
    }

    match conn.query_row(SELECT_SCHEMA_VERSION, [], |row| row.get::<_, String>(0)) {
        Ok(value) => value.parse::<i32>().map_err(|_| Error::DatabaseCorruption {
            details: format!("schema_version is not a number: '{value}'"),
        }),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(e.into()),
    }
}

/// Checks schema compatibility and initializes if needed.
///
/// A fresh database is initialized. Any other version than the current one
/// is rejected, since no migrations exist yet.
///
/// # Errors
///
/// Returns [`Error::UnsupportedSchemaVersion`] for a mismatched version, or
/// a database error if initialization fails.
pub fn check_schema_compatibility(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;

    if version == 0 {
        initialize_schema(conn)?;
    } else if version != CURRENT_SCHEMA_VERSION {
        return Err(Error::UnsupportedSchemaVersion {
            expected: CURRENT_SCHEMA_VERSION,
            found: version,
        });
    }

    Ok(())
}
