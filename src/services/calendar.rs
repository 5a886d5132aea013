//! ISO-8601 week arithmetic
//!
//! Converts calendar dates to `WeekId`s and back. Dates are parsed
//! strictly: a day that does not exist in its month is an error, never
//! silently rolled into the next month.

use chrono::{Datelike, Duration, Local, Months, NaiveDate};

use crate::error::{BudgetError, BudgetResult};
use crate::models::{WeekBounds, WeekId};

/// Parse a strict `YYYY-MM-DD` calendar date
pub fn parse_date(input: &str) -> BudgetResult<NaiveDate> {
    let parts: Vec<&str> = input.split('-').collect();
    let well_formed = parts.len() == 3
        && parts[0].len() == 4
        && parts[1].len() == 2
        && parts[2].len() == 2
        && parts.iter().all(|p| p.bytes().all(|b| b.is_ascii_digit()));

    if !well_formed {
        return Err(BudgetError::invalid_date(input, "expected format YYYY-MM-DD"));
    }

    let year: i32 = parts[0]
        .parse()
        .map_err(|_| BudgetError::invalid_date(input, "year is not numeric"))?;
    let month: u32 = parts[1]
        .parse()
        .map_err(|_| BudgetError::invalid_date(input, "month is not numeric"))?;
    let day: u32 = parts[2]
        .parse()
        .map_err(|_| BudgetError::invalid_date(input, "day is not numeric"))?;

    if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
        return Ok(date);
    }

    let reason = match normalized_date(year, month, day) {
        Some(rolled) => format!(
            "not a real calendar date (would roll over to {})",
            rolled.format("%Y-%m-%d")
        ),
        None => "not a real calendar date".to_string(),
    };
    Err(BudgetError::invalid_date(input, reason))
}

/// The date a lenient parser would produce by carrying overflowing months
/// and days forward.
fn normalized_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let jan_1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let first_of_month = if month == 0 {
        jan_1.checked_sub_months(Months::new(1))?
    } else {
        jan_1.checked_add_months(Months::new(month - 1))?
    };
    first_of_month.checked_add_signed(Duration::days(i64::from(day) - 1))
}

/// The ISO week containing a date.
///
/// Shifts the date to the Thursday of its Monday-based week; that
/// Thursday's year is the ISO year and its day-of-year gives the week.
pub fn week_of(date: NaiveDate) -> BudgetResult<WeekId> {
    let offset = 3 - i64::from(date.weekday().num_days_from_monday());
    let thursday = date.checked_add_signed(Duration::days(offset)).ok_or_else(|| {
        BudgetError::invalid_date(date.to_string(), "outside the supported range")
    })?;

    WeekId::from_iso_parts(thursday.year(), thursday.ordinal0() / 7 + 1)
}

/// The ISO week of a `YYYY-MM-DD` date string
pub fn to_week_id(date: &str) -> BudgetResult<WeekId> {
    week_of(parse_date(date)?)
}

/// Monday and Sunday of an ISO week.
///
/// January 4 is always in week 1, so the week-1 Monday is the Monday on or
/// before January 4.
pub fn week_boundaries(week: &WeekId) -> BudgetResult<WeekBounds> {
    let out_of_range = || BudgetError::invalid_week(week.to_string(), "outside the supported date range");

    let jan_4 = NaiveDate::from_ymd_opt(week.year(), 1, 4).ok_or_else(out_of_range)?;
    let week_1_monday = jan_4
        .checked_sub_signed(Duration::days(i64::from(jan_4.weekday().num_days_from_monday())))
        .ok_or_else(out_of_range)?;
    let start = week_1_monday
        .checked_add_signed(Duration::weeks(i64::from(week.week()) - 1))
        .ok_or_else(out_of_range)?;

    WeekBounds::starting(start).ok_or_else(out_of_range)
}

/// Bounds of a week given as text; malformed input is a typed error
pub fn boundaries_of(input: &str) -> BudgetResult<WeekBounds> {
    week_boundaries(&WeekId::parse(input)?)
}

/// The ISO week containing today (local time)
pub fn current_week() -> BudgetResult<WeekId> {
    week_of(Local::now().date_naive())
}

/// The week after `week`
pub fn next_week(week: &WeekId) -> BudgetResult<WeekId> {
    shift(week, 7).map_err(|e| navigation_error("next", week.to_string(), e))
}

/// The week before `week`
pub fn previous_week(week: &WeekId) -> BudgetResult<WeekId> {
    shift(week, -7).map_err(|e| navigation_error("previous", week.to_string(), e))
}

/// `next_week` for unparsed input
pub fn next_week_of(input: &str) -> BudgetResult<WeekId> {
    WeekId::parse(input)
        .and_then(|w| shift(&w, 7))
        .map_err(|e| navigation_error("next", input.to_string(), e))
}

/// `previous_week` for unparsed input
pub fn previous_week_of(input: &str) -> BudgetResult<WeekId> {
    WeekId::parse(input)
        .and_then(|w| shift(&w, -7))
        .map_err(|e| navigation_error("previous", input.to_string(), e))
}

fn shift(week: &WeekId, days: i64) -> BudgetResult<WeekId> {
    let start = week_boundaries(week)?.start;
    let target = start
        .checked_add_signed(Duration::days(days))
        .ok_or_else(|| BudgetError::invalid_week(week.to_string(), "outside the supported date range"))?;
    week_of(target)
}

fn navigation_error(direction: &'static str, week: String, source: BudgetError) -> BudgetError {
    BudgetError::WeekNavigation {
        direction,
        week,
        source: Box::new(source),
    }
}
