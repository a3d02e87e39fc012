//! Database schema definitions and SQL constants.

/// Current schema version for the database.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// SQL statement to create the metadata table.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to create the restaurants table.
pub const CREATE_RESTAURANTS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS restaurants (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL
    )";

/// SQL statement to create the dining tables table.
///
/// `status` is a cache recomputed by reconciliation; it never gates
/// availability.
pub const CREATE_TABLES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS dining_tables (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        restaurant_id INTEGER NOT NULL REFERENCES restaurants(id) ON DELETE CASCADE,
        number INTEGER NOT NULL CHECK (number > 0),
        capacity INTEGER NOT NULL CHECK (capacity > 0),
        status TEXT NOT NULL DEFAULT 'free'
            CHECK (status IN ('free', 'reserved', 'occupied')),
        UNIQUE (restaurant_id, number)
    )";

/// SQL statement to create the reservations table.
///
/// Dates are `dd.mm.yyyy` and times zero-padded `HH:mm`, so comparing
/// times as text on a single date is chronological.
pub const CREATE_RESERVATIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        table_id INTEGER NOT NULL REFERENCES dining_tables(id) ON DELETE CASCADE,
        date TEXT NOT NULL,
        start_time TEXT NOT NULL,
        end_time TEXT NOT NULL,
        people_count INTEGER NOT NULL CHECK (people_count > 0),
        status TEXT NOT NULL DEFAULT 'active'
            CHECK (status IN ('active', 'completed', 'cancelled')),
        customer_name TEXT NOT NULL,
        customer_surname TEXT NOT NULL,
        customer_phone TEXT NOT NULL,
        email TEXT,
        created_by TEXT NOT NULL DEFAULT 'user'
            CHECK (created_by IN ('user', 'admin')),
        user_id INTEGER,
        CHECK (start_time < end_time)
    )";

/// Index used by the overlap check and the per-table listing.
pub const CREATE_TABLE_DATE_STATUS_INDEX: &str = "CREATE INDEX IF NOT EXISTS \
     idx_reservations_table_date_status ON reservations(table_id, date, status)";

/// Index for looking up a guest's bookings.
pub const CREATE_EMAIL_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_email ON reservations(email)";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

/// Columns selected for every reservation read, in `row_to_reservation` order.
pub const RESERVATION_COLUMNS: &str = "id, table_id, date, start_time, end_time, people_count, \
     status, customer_name, customer_surname, customer_phone, email, created_by, user_id";

/// Columns selected for every table read, in `row_to_table` order.
pub const TABLE_COLUMNS: &str = "id, restaurant_id, number, capacity, status";

/// Counts active reservations on a table and date that overlap `[start, end)`.
pub const COUNT_OVERLAPPING_ACTIVE: &str = r"
    SELECT COUNT(*) FROM reservations
    WHERE table_id = ?1 AND date = ?2 AND status = 'active'
      AND start_time < ?4 AND ?3 < end_time
";

/// SQL statement to insert a reservation.
pub const INSERT_RESERVATION: &str = r"
    INSERT INTO reservations
    (table_id, date, start_time, end_time, people_count, status,
     customer_name, customer_surname, customer_phone, email, created_by, user_id)
    VALUES (?1, ?2, ?3, ?4, ?5, 'active', ?6, ?7, ?8, ?9, ?10, ?11)
";
