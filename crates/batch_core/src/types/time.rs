//! Calendar types for batch processing.
//!
//! This module provides:
//! - `Date`: Type-safe date wrapper around chrono::NaiveDate
//! - Month-end detection and whole-month arithmetic used by compounding and
//!   tier evaluation
//! - Timezone-aware "today" used by every job trigger
//! - `format_duration`: operator-facing rendering of job run times
//!
//! # Examples
//!
//! ```
//! use batch_core::types::time::Date;
//!
//! let date = Date::from_ymd(2024, 2, 29).unwrap();
//! assert!(date.is_last_day_of_month());
//! assert_eq!(date.month_label(), "February 2024");
//! ```

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;
use std::time::Duration;

use super::error::DateError;

/// Type-safe date wrapper around chrono::NaiveDate.
///
/// All batch comparisons (due dates, snapshot dates, month ends) are
/// date-only; time of day never participates.
///
/// # Examples
///
/// ```
/// use batch_core::types::time::Date;
///
/// let start = Date::from_ymd(2024, 1, 1).unwrap();
/// let end = Date::from_ymd(2024, 1, 11).unwrap();
/// assert_eq!(end - start, 10);
/// assert_eq!(start.add_days(10), end);
///
/// let parsed: Date = "2024-01-11".parse().unwrap();
/// assert_eq!(parsed, end);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a Date from year, month, and day components.
    ///
    /// # Returns
    /// `Ok(Date)` if the date is valid, `Err(DateError::InvalidDate)` otherwise.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Returns the calendar date of `instant` as observed in `tz`.
    ///
    /// Jobs use this to truncate the trigger instant to midnight of the
    /// configured business timezone.
    pub fn at(instant: DateTime<Utc>, tz: Tz) -> Self {
        Date(instant.with_timezone(&tz).date_naive())
    }

    /// Returns today's date in the given timezone.
    pub fn today_in(tz: Tz) -> Self {
        Self::at(Utc::now(), tz)
    }

    /// Parses a date from ISO 8601 format string (YYYY-MM-DD).
    pub fn parse(s: &str) -> Result<Self, DateError> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Date)
            .map_err(|e| DateError::ParseError(e.to_string()))
    }

    /// Returns the underlying NaiveDate.
    pub fn into_inner(self) -> NaiveDate {
        self.0
    }

    /// Returns the year component.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Shifts the date by a signed number of days.
    ///
    /// Saturates at the chrono calendar bounds, which no batch date reaches.
    pub fn add_days(self, days: i64) -> Self {
        Date(
            self.0
                .checked_add_signed(chrono::Duration::days(days))
                .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX }),
        )
    }

    /// Returns the last calendar day of this date's month.
    ///
    /// # Examples
    ///
    /// ```
    /// use batch_core::types::time::Date;
    ///
    /// let feb = Date::from_ymd(2023, 2, 10).unwrap();
    /// assert_eq!(feb.last_day_of_month(), Date::from_ymd(2023, 2, 28).unwrap());
    ///
    /// let dec = Date::from_ymd(2024, 12, 1).unwrap();
    /// assert_eq!(dec.last_day_of_month(), Date::from_ymd(2024, 12, 31).unwrap());
    /// ```
    pub fn last_day_of_month(&self) -> Self {
        let (year, month) = if self.month() == 12 {
            (self.year() + 1, 1)
        } else {
            (self.year(), self.month() + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|first_of_next| first_of_next.pred_opt())
            .map(Date)
            .unwrap_or(*self)
    }

    /// Returns true when this is the final calendar day of its month.
    pub fn is_last_day_of_month(&self) -> bool {
        *self == self.last_day_of_month()
    }

    /// Whole calendar months elapsed from `earlier` to `self`.
    ///
    /// A month counts once the same day-of-month has been reached, so
    /// 2024-01-15 → 2024-07-14 is 5 months and → 2024-07-15 is 6.
    /// Returns 0 when `earlier` is after `self`.
    pub fn months_since(&self, earlier: Date) -> u32 {
        if earlier > *self {
            return 0;
        }
        let mut months =
            (self.year() - earlier.year()) * 12 + self.month() as i32 - earlier.month() as i32;
        if self.day() < earlier.day() && !self.is_last_day_of_month() {
            months -= 1;
        }
        months.max(0) as u32
    }

    /// Human-readable month label such as "October 2026".
    pub fn month_label(&self) -> String {
        self.0.format("%B %Y").to_string()
    }
}

impl Sub for Date {
    type Output = i64;

    /// Returns the number of whole days between two dates.
    fn sub(self, other: Self) -> i64 {
        (self.0 - other.0).num_days()
    }
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, DateError> {
        Date::parse(s)
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl fmt::Display for Date {
    /// Formats the date as ISO 8601 (YYYY-MM-DD).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Renders a run duration for log lines.
///
/// # Examples
///
/// ```
/// use batch_core::types::time::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
/// assert_eq!(format_duration(Duration::from_secs(3725)), "1h 2m 5s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1_000 {
        return format!("{}ms", millis);
    }
    let secs = duration.as_secs();
    if secs < 60 {
        return format!("{:.2}s", duration.as_secs_f64());
    }
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else {
        format!("{}m {}s", minutes, seconds)
    }
}
