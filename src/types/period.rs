//! Calendar period types used to describe fetch windows.
//!
//! A daily analysis targets a single [`chrono::NaiveDate`]; a monthly
//! analysis targets a [`Month`], which resolves to the real first/last day
//! of that month (leap years and 28–31 day months included) through the
//! [`DatePeriod`] trait.

use chrono::{Datelike, Duration, NaiveDate};
use std::fmt;
use std::fmt::{Display, Formatter};

/// A calendar year, e.g. `Year(2023)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Year(pub i32);
impl Year {
    pub fn get(self) -> i32 {
        self.0
    }
}

impl Display for Year {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// A calendar month within a year.
///
/// Stored as `(year, month)`; construct with [`Month::new`] which takes the
/// month number first to match how requests are usually phrased
/// ("July 2023" → `Month::new(7, 2023)`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Month(pub i32, pub u32);
impl Month {
    pub fn year(self) -> i32 {
        self.0
    }
    pub fn month(self) -> u32 {
        self.1
    }
    pub fn new(month: u32, year: i32) -> Self {
        Self(year, month)
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0, self.1)
    }
}

/// An inclusive range of calendar dates.
pub struct StartEndDate {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Resolves a period type to the inclusive date range it spans.
///
/// Returns `None` when the period does not name a real calendar range
/// (month 0 or 13, out-of-range year).
pub trait DatePeriod {
    fn get_date_period(self) -> Option<StartEndDate>;
}

impl DatePeriod for Year {
    fn get_date_period(self) -> Option<StartEndDate> {
        Some(StartEndDate {
            start: NaiveDate::from_ymd_opt(self.0, 1, 1)?,
            end: NaiveDate::from_ymd_opt(self.0, 12, 31)?,
        })
    }
}

impl DatePeriod for Month {
    fn get_date_period(self) -> Option<StartEndDate> {
        let year = self.year();
        let month = self.month();
        Some(StartEndDate {
            start: NaiveDate::from_ymd_opt(year, month, 1)?,
            end: NaiveDate::from_ymd_opt(year, month, days_in_month(year, month)?)?,
        })
    }
}

pub(crate) fn days_in_month(year: i32, month: u32) -> Option<u32> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let (next_month_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    let first_day_of_next_month = NaiveDate::from_ymd_opt(next_month_year, next_month, 1)?;
    let last_day_of_current_month = first_day_of_next_month - Duration::days(1);
    Some(last_day_of_current_month.day())
}

/// First day of the month that follows `month`, used for half-open date
/// range queries against the readings store.
pub(crate) fn first_day_of_next_month(month: Month) -> Option<NaiveDate> {
    let (year, m) = (month.year(), month.month());
    if !(1..=12).contains(&m) {
        return None;
    }
    if m == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, m + 1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_in_month_handles_month_lengths() {
        assert_eq!(days_in_month(2023, 1), Some(31));
        assert_eq!(days_in_month(2023, 4), Some(30));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(2023, 12), Some(31));
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2000, 2), Some(29));
        assert_eq!(days_in_month(1900, 2), Some(28));
    }

    #[test]
    fn days_in_month_rejects_invalid_months() {
        assert_eq!(days_in_month(2023, 0), None);
        assert_eq!(days_in_month(2023, 13), None);
    }

    #[test]
    fn month_period_spans_whole_month() {
        let period = Month::new(2, 2024).get_date_period().unwrap();
        assert_eq!(period.start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(period.end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn year_period_spans_whole_year() {
        let period = Year(2023).get_date_period().unwrap();
        assert_eq!(period.start, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(period.end, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }

    #[test]
    fn invalid_month_has_no_period() {
        assert!(Month::new(13, 2023).get_date_period().is_none());
    }

    #[test]
    fn next_month_rolls_over_december() {
        assert_eq!(
            first_day_of_next_month(Month::new(12, 2023)),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(
            first_day_of_next_month(Month::new(7, 2023)),
            NaiveDate::from_ymd_opt(2023, 8, 1)
        );
    }

    #[test]
    fn month_displays_zero_padded() {
        assert_eq!(Month::new(7, 2023).to_string(), "2023-07");
        assert_eq!(Year(842).to_string(), "0842");
    }
}
