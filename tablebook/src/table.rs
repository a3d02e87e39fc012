//! Restaurant and dining table types.
//!
//! A table's [`TableStatus`] is a cached projection of reservation state. It
//! is recomputed by reconciliation and never consulted for conflict checks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::reservation::ValidationError;

/// Identifier of a restaurant row.
pub type RestaurantId = i64;

/// Identifier of a dining table row.
pub type TableId = i64;

/// A restaurant whose tables can be booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    /// Store identifier.
    pub id: RestaurantId,
    /// Display name.
    pub name: String,
}

/// Coarse occupancy flag shown to staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    /// No current reservation.
    Free,
    /// A reservation for today covers the current time.
    Reserved,
    /// Guests are seated (set by staff).
    Occupied,
}

impl TableStatus {
    /// The persisted representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Reserved => "reserved",
            Self::Occupied => "occupied",
        }
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "reserved" => Ok(Self::Reserved),
            "occupied" => Ok(Self::Occupied),
            other => Err(ValidationError {
                field: "status".into(),
                message: format!("unknown table status '{other}' (expected free, reserved or occupied)"),
            }),
        }
    }
}

/// A dining table belonging to a restaurant.
///
/// `number` is unique within the restaurant and is what guests and staff
/// see; `id` is the store key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Store identifier.
    pub id: TableId,
    /// Owning restaurant.
    pub restaurant_id: RestaurantId,
    /// Table number shown in the dining room.
    pub number: u32,
    /// Number of seats.
    pub capacity: u32,
    /// Cached status.
    pub status: TableStatus,
}

impl Table {
    /// Whether the table seats exactly `party_size` guests.
    #[must_use]
    pub const fn is_exact_fit(&self, party_size: u32) -> bool {
        self.capacity == party_size
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table {} ({} seats)", self.number, self.capacity)
    }
}
