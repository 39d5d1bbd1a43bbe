//! Employee entity - row of the `employee` table

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Youngest age accepted for an employee (inclusive)
pub const MIN_AGE: i16 = 17;
/// Oldest age accepted for an employee (inclusive)
pub const MAX_AGE: i16 = 90;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, FromRow)]
pub struct Employee {
    // assigned by the database identity column, ignored on input
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub age: i16,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    /// True when nothing at all was submitted (every field at its default)
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Mirrors the `CHECK (age > 16 AND age < 91)` constraint of the table
    pub fn has_valid_age(&self) -> bool {
        (MIN_AGE..=MAX_AGE).contains(&self.age)
    }
}
