//! Timezone-independent day buckets.
//!
//! # Responsibility
//! - Collapse any instant into the UTC calendar day it falls on.
//! - Provide the join key between "today" and stored check-in records.
//!
//! # Invariants
//! - A `NormalizedDay` always holds a multiple of `DAY_MILLIS`.
//! - Normalization is idempotent and does not depend on the caller's offset.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Milliseconds in one UTC calendar day.
pub const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Epoch milliseconds of a UTC midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub struct NormalizedDay(i64);

impl NormalizedDay {
    /// Buckets an epoch-millisecond instant into its UTC day.
    pub fn from_epoch_ms(epoch_ms: i64) -> Self {
        Self(epoch_ms.div_euclid(DAY_MILLIS) * DAY_MILLIS)
    }

    /// Buckets a zoned instant into its UTC day.
    pub fn from_datetime<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self::from_epoch_ms(instant.timestamp_millis())
    }

    /// Day bucket for a calendar date, read as a UTC date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::from_datetime(&date.and_time(chrono::NaiveTime::MIN).and_utc())
    }

    /// Day bucket containing the current instant.
    pub fn today() -> Self {
        Self::from_datetime(&Utc::now())
    }

    /// Epoch milliseconds of the bucket start.
    pub fn epoch_ms(self) -> i64 {
        self.0
    }

    /// UTC calendar date of the bucket.
    pub fn date(self) -> NaiveDate {
        DateTime::<Utc>::from_timestamp_millis(self.0)
            .map(|instant| instant.date_naive())
            .unwrap_or(NaiveDate::MIN)
    }

    /// Bucket `days` days away from this one.
    pub fn offset_days(self, days: i64) -> Self {
        Self(self.0.saturating_add(days.saturating_mul(DAY_MILLIS)))
    }
}

impl From<i64> for NormalizedDay {
    fn from(value: i64) -> Self {
        Self::from_epoch_ms(value)
    }
}

impl From<NormalizedDay> for i64 {
    fn from(value: NormalizedDay) -> Self {
        value.0
    }
}

impl Display for NormalizedDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.date().format("%Y-%m-%d"))
    }
}

/// Normalizes an epoch-millisecond instant to UTC midnight.
pub fn normalized_day(epoch_ms: i64) -> NormalizedDay {
    NormalizedDay::from_epoch_ms(epoch_ms)
}
