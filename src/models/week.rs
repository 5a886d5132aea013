//! ISO week identifier
//!
//! A `WeekId` is the textual `YYYY-Wnn` form of an ISO-8601 week. The
//! zero-padded format sorts lexically in date order, and the derived
//! ordering on (year, week) agrees with that lexical order.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{BudgetError, BudgetResult};

/// Largest year representable in the four-digit `YYYY` field
pub const MAX_WEEK_YEAR: i32 = 9999;

/// An ISO week, e.g. "2025-W03"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekId {
    year: i32,
    week: u32,
}

impl WeekId {
    /// Create a validated week identifier
    pub fn new(year: i32, week: u32) -> BudgetResult<Self> {
        let label = format!("{:04}-W{:02}", year, week);

        if !(0..=MAX_WEEK_YEAR).contains(&year) {
            return Err(BudgetError::invalid_week(
                label,
                "year must have four digits",
            ));
        }
        if week == 0 || week > 53 {
            return Err(BudgetError::invalid_week(
                label,
                "week number must be between 01 and 53",
            ));
        }
        let max_week = weeks_in_year(year)?;
        if week > max_week {
            return Err(BudgetError::invalid_week(
                label,
                format!("{} has only {} ISO weeks", year, max_week),
            ));
        }

        Ok(Self { year, week })
    }

    /// Parse a `YYYY-Wnn` string
    pub fn parse(s: &str) -> BudgetResult<Self> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 8
            && bytes[..4].iter().all(u8::is_ascii_digit)
            && bytes[4] == b'-'
            && bytes[5] == b'W'
            && bytes[6..].iter().all(u8::is_ascii_digit);

        if !well_formed {
            return Err(BudgetError::invalid_week(
                s,
                "expected format YYYY-Wnn",
            ));
        }

        let year: i32 = s[..4]
            .parse()
            .map_err(|_| BudgetError::invalid_week(s, "year is not numeric"))?;
        let week: u32 = s[6..]
            .parse()
            .map_err(|_| BudgetError::invalid_week(s, "week is not numeric"))?;

        Self::new(year, week)
    }

    /// Build from parts already known to be a real ISO week
    pub(crate) fn from_iso_parts(year: i32, week: u32) -> BudgetResult<Self> {
        if !(0..=MAX_WEEK_YEAR).contains(&year) {
            return Err(BudgetError::invalid_week(
                format!("{}-W{:02}", year, week),
                "year must have four digits",
            ));
        }
        Ok(Self { year, week })
    }

    /// The ISO week-numbering year
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The ISO week number (1-53)
    pub fn week(&self) -> u32 {
        self.week
    }
}

/// Number of ISO weeks (52 or 53) in the given ISO year.
///
/// December 28 always falls in the last ISO week of its year.
pub fn weeks_in_year(year: i32) -> BudgetResult<u32> {
    NaiveDate::from_ymd_opt(year, 12, 28)
        .map(|d| d.iso_week().week())
        .ok_or_else(|| BudgetError::invalid_week(year.to_string(), "year out of range"))
}

impl fmt::Display for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}

impl FromStr for WeekId {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WeekId {
    type Error = BudgetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WeekId> for String {
    fn from(week: WeekId) -> Self {
        week.to_string()
    }
}

/// Monday-to-Sunday calendar dates of one ISO week (both inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekBounds {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekBounds {
    /// Bounds starting on the given Monday
    pub fn starting(start: NaiveDate) -> Option<Self> {
        let end = start.checked_add_signed(Duration::days(6))?;
        Some(Self { start, end })
    }

    /// Check if a date falls within this week
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}
