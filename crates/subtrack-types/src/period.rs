//! Month-granularity calendar values
//!
//! A [`Period`] names the first day of a calendar month. It has two textual
//! encodings: the compact `MM-YYYY` form used on the HTTP surface and the ISO
//! `YYYY-MM-01` form persisted by the storage backends.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing a period string
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodParseError {
    /// Wrong number of `-` separated segments in the compact form
    #[error("invalid date string format")]
    InvalidFormat,

    /// Wrong number of `-` separated segments in the ISO form
    #[error("invalid date string ISO format")]
    InvalidIsoFormat,

    /// Month segment is not an integer
    #[error("invalid month")]
    InvalidMonth,

    /// Year segment is not an integer
    #[error("invalid year")]
    InvalidYear,
}

/// A calendar month.
///
/// `month` is meant to be in `1..=12` but is not range-checked on
/// construction or parsing; the storage schemas reject out-of-range values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    pub month: i32,
    pub year: i32,
}

impl Period {
    /// Create a period from its parts
    pub const fn new(month: i32, year: i32) -> Self {
        Self { month, year }
    }

    /// Return a new period shifted by `years` and `months`.
    ///
    /// Months carry into years in both directions, so `months` may be
    /// negative or larger than twelve.
    #[must_use]
    pub fn add_months(&self, years: i32, months: i32) -> Period {
        let index = self.month_index() + i64::from(years) * 12 + i64::from(months);
        Self::from_month_index(index)
    }

    /// Strictly later than `other` (year first, then month)
    pub fn is_after(&self, other: &Period) -> bool {
        self.year > other.year || (self.year == other.year && self.month > other.month)
    }

    /// Same month and year
    pub fn equal_to(&self, other: &Period) -> bool {
        self == other
    }

    /// Absolute number of calendar months between two periods
    pub fn months_between(a: &Period, b: &Period) -> u32 {
        let diff = (a.month_index() - b.month_index()).unsigned_abs();
        u32::try_from(diff).unwrap_or(u32::MAX)
    }

    /// Compact `MM-YYYY` form
    pub fn to_compact_string(&self) -> String {
        self.to_string()
    }

    /// ISO `YYYY-MM-01` form
    pub fn to_iso_string(&self) -> String {
        format!("{:04}-{:02}-01", self.year, self.month)
    }

    /// Parse the compact `MM-YYYY` form
    pub fn parse_compact(s: &str) -> Result<Self, PeriodParseError> {
        let parts: Vec<&str> = s.split('-').collect();
        let [month, year] = parts.as_slice() else {
            return Err(PeriodParseError::InvalidFormat);
        };

        let month = month
            .parse::<i32>()
            .map_err(|_| PeriodParseError::InvalidMonth)?;
        let year = year
            .parse::<i32>()
            .map_err(|_| PeriodParseError::InvalidYear)?;

        Ok(Self { month, year })
    }

    /// Parse the ISO `YYYY-MM-DD` form. The day is ignored.
    pub fn parse_iso(s: &str) -> Result<Self, PeriodParseError> {
        let parts: Vec<&str> = s.split('-').collect();
        let [year, month, _day] = parts.as_slice() else {
            return Err(PeriodParseError::InvalidIsoFormat);
        };

        let year = year
            .parse::<i32>()
            .map_err(|_| PeriodParseError::InvalidYear)?;
        let month = month
            .parse::<i32>()
            .map_err(|_| PeriodParseError::InvalidMonth)?;

        Ok(Self { month, year })
    }

    // Zero-based month count since year 0
    fn month_index(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    fn from_month_index(index: i64) -> Self {
        // Years past the i32 range saturate instead of wrapping
        let year = i32::try_from(index.div_euclid(12)).unwrap_or(if index < 0 {
            i32::MIN
        } else {
            i32::MAX
        });
        let month = i32::try_from(index.rem_euclid(12)).unwrap_or(0) + 1;
        Self { month, year }
    }
}

impl Ord for Period {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.year, self.month).cmp(&(other.year, other.month))
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{}", self.month, self.year)
    }
}

impl FromStr for Period {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_compact(s)
    }
}

impl TryFrom<String> for Period {
    type Error = PeriodParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_compact(&value)
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}
