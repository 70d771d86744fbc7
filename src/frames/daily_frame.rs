//! Lazy wrapper around one day of normalized readings.

use crate::analysis::error::AnalysisError;
use crate::frames::{frame_column, opt_f64, str_cell};
use crate::types::reading::DailyReading;
use chrono::{NaiveDate, NaiveTime};
use polars::prelude::{DataFrame, Expr, LazyFrame};

/// A polars `LazyFrame` holding normalized daily readings with the columns
/// `date`, `time`, `temperature` and `humidity`.
///
/// Produced by [`crate::normalize_daily`], usually through
/// [`crate::DailyClient`]. The frame may be empty: an empty day is the
/// regular "no data" outcome, not an error.
///
/// # Example
///
/// ```no_run
/// # use agrometeo::Agrometeo;
/// use chrono::NaiveDate;
/// use polars::prelude::{col, lit};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Agrometeo::new().await?;
/// let day = NaiveDate::from_ymd_opt(2023, 7, 1).unwrap();
/// let frame = client.daily().station("PARIS").date(day).call().await?;
///
/// // Keep only the warm part of the day.
/// let warm = frame.filter(col("temperature").gt(lit(25.0f64)));
/// for reading in warm.readings()? {
///     println!("{} {} {:.1} °C", reading.date, reading.time, reading.temperature);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DailyFrame {
    /// The underlying lazy frame.
    pub frame: LazyFrame,
}

impl DailyFrame {
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// Applies an arbitrary polars predicate, returning a new frame and
    /// leaving this one untouched.
    pub fn filter(&self, predicate: Expr) -> DailyFrame {
        DailyFrame::new(self.frame.clone().filter(predicate))
    }

    /// Runs the lazy plan and returns the materialized frame.
    pub fn collect(&self) -> Result<DataFrame, AnalysisError> {
        self.frame.clone().collect().map_err(AnalysisError::from)
    }

    /// Materializes the frame into typed rows, ordered by (date, time).
    ///
    /// Normalization guarantees non-null temperature and humidity; a null
    /// here means the frame was built from something else and is reported
    /// as an error rather than skipped.
    pub fn readings(&self) -> Result<Vec<DailyReading>, AnalysisError> {
        let df = self.collect()?;
        let dates = frame_column(&df, "date")?;
        let times = frame_column(&df, "time")?;
        let temperatures = frame_column(&df, "temperature")?;
        let humidities = frame_column(&df, "humidity")?;

        let mut readings = Vec::with_capacity(df.height());
        for row in 0..df.height() {
            let date_str = str_cell(dates, row)?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| {
                AnalysisError::MalformedCell {
                    column: "date".to_string(),
                    value: date_str.to_string(),
                }
            })?;
            let time_str = str_cell(times, row)?;
            let time = NaiveTime::parse_from_str(time_str, "%H:%M").map_err(|_| {
                AnalysisError::MalformedCell {
                    column: "time".to_string(),
                    value: time_str.to_string(),
                }
            })?;
            let temperature =
                opt_f64(temperatures, row).ok_or_else(|| AnalysisError::UnexpectedNull {
                    column: "temperature".to_string(),
                    row,
                })?;
            let humidity =
                opt_f64(humidities, row).ok_or_else(|| AnalysisError::UnexpectedNull {
                    column: "humidity".to_string(),
                    row,
                })?;
            readings.push(DailyReading {
                date,
                time,
                temperature,
                humidity,
            });
        }
        Ok(readings)
    }
}
