//! Millisecond timestamps.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Latest instant chrono can represent.
fn max_millis() -> i64 {
    DateTime::<Utc>::MAX_UTC.timestamp_millis()
}

/// Milliseconds since the Unix epoch (UTC), within chrono's representable
/// range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct TimeMillis(i64);

impl TimeMillis {
    pub fn new(millis: i64) -> Result<Self, DomainError> {
        if millis < 0 {
            return Err(DomainError::Validation(format!(
                "timestamp must not be negative, got {}",
                millis
            )));
        }
        if millis > max_millis() {
            return Err(DomainError::Validation(format!(
                "timestamp {} is beyond the supported range",
                millis
            )));
        }
        Ok(Self(millis))
    }

    /// Like [`TimeMillis::new`] but clamps input into the supported range.
    pub fn saturating(millis: i64) -> Self {
        Self(millis.clamp(0, max_millis()))
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn plus_days(&self, days: i64) -> Result<Self, DomainError> {
        days.checked_mul(MILLIS_PER_DAY)
            .and_then(|delta| self.0.checked_add(delta))
            .ok_or_else(|| DomainError::Validation("timestamp overflow".into()))
            .and_then(Self::new)
    }

    pub fn is_after(&self, other: TimeMillis) -> bool {
        self.0 > other.0
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        // `new` and `saturating` keep the value in range, so the fallback is
        // never taken.
        DateTime::from_timestamp_millis(self.0).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Calendar `(year, month)` of this instant in UTC.
    pub fn year_month(&self) -> (i32, u32) {
        let dt = self.to_datetime();
        (dt.year(), dt.month())
    }
}

impl TryFrom<i64> for TimeMillis {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TimeMillis> for i64 {
    fn from(t: TimeMillis) -> Self {
        t.0
    }
}

impl std::fmt::Display for TimeMillis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_datetime().to_rfc3339())
    }
}
