//! Typed identifier for users.
//!
//! User rows are keyed by a `BIGSERIAL`, so the identifier wraps an `i64`.
//! The zero value never names a real user and is treated as "no identity"
//! wherever an identity is resolved. When the `sqlx` feature is enabled the
//! newtype encodes and decodes as a PostgreSQL `BIGINT`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Unique identifier for a user.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type), sqlx(transparent))]
pub struct UserId(pub i64);

impl UserId {
    /// Wrap a raw database key.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Return the raw database key.
    pub const fn get(self) -> i64 {
        self.0
    }

    /// `false` for the zero value.
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}

impl From<i64> for UserId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl From<UserId> for i64 {
    fn from(id: UserId) -> i64 {
        id.0
    }
}
