use chrono::{NaiveDate, NaiveTime};

/// One normalized reading after daily processing.
///
/// Temperature and humidity are non-optional: rows that could not be filled
/// by interpolation are dropped during normalization, so a `DailyReading`
/// always carries both values.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyReading {
    pub date: NaiveDate,
    /// Reading time, truncated to minute precision.
    pub time: NaiveTime,
    /// Degrees Celsius, rounded to one decimal.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
}

/// One row per calendar date after monthly aggregation.
///
/// Values stay optional: a date whose observations carried no usable
/// temperature or humidity still produces a row, with the missing side left
/// as `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub humidity_mean: Option<f64>,
}

/// A [`DailyAggregate`] extended with growing degree days.
///
/// `gdd_day` is `None` for dates without both temperature extremes; the
/// cumulative column is likewise undefined for those dates and resumes on
/// the next date with data.
#[derive(Debug, Clone, PartialEq)]
pub struct GddRecord {
    pub date: NaiveDate,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub humidity_mean: Option<f64>,
    pub gdd_day: Option<f64>,
    pub gdd_cumulative: Option<f64>,
}

/// Month-level statistics derived from a sequence of [`GddRecord`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    /// Mean of the daily midpoint temperatures `(min + max) / 2`.
    pub temp_mean: Option<f64>,
    /// Lowest daily minimum of the month.
    pub temp_min: Option<f64>,
    /// Highest daily maximum of the month.
    pub temp_max: Option<f64>,
    pub humidity_mean: Option<f64>,
    /// Sum of all defined daily growing degree days.
    pub total_gdd: f64,
}
