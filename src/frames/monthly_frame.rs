//! Lazy wrapper around one month of aggregated, GDD-annotated rows.

use crate::analysis::error::AnalysisError;
use crate::frames::{frame_column, opt_f64, str_cell};
use crate::types::reading::{GddRecord, MonthlySummary};
use chrono::NaiveDate;
use polars::prelude::*;

/// A polars `LazyFrame` with one row per calendar date and the columns
/// `date`, `temp_min`, `temp_max`, `humidity_mean`, `gdd` and
/// `gdd_cumulative`, which is the exact column order of the monthly
/// CSV/JSON exports.
///
/// Produced by [`crate::MonthlyClient`]. Temperature and GDD cells may be
/// null for dates whose observations carried no usable values.
///
/// # Example
///
/// ```no_run
/// # use agrometeo::{Agrometeo, Month};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Agrometeo::new().await?;
/// let frame = client
///     .monthly()
///     .station("PARIS")
///     .month(Month::new(7, 2023))
///     .call()
///     .await?;
///
/// if let Some(summary) = frame.summary()? {
///     println!("accumulated GDD: {:.1}", summary.total_gdd);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MonthlyFrame {
    /// The underlying lazy frame.
    pub frame: LazyFrame,
}

impl MonthlyFrame {
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// Builds a frame from typed records, preserving their date order.
    pub fn from_records(records: &[GddRecord]) -> Result<MonthlyFrame, AnalysisError> {
        let dates: Vec<String> = records
            .iter()
            .map(|r| r.date.format("%Y-%m-%d").to_string())
            .collect();
        let temp_min: Vec<Option<f64>> = records.iter().map(|r| r.temp_min).collect();
        let temp_max: Vec<Option<f64>> = records.iter().map(|r| r.temp_max).collect();
        let humidity_mean: Vec<Option<f64>> = records.iter().map(|r| r.humidity_mean).collect();
        let gdd: Vec<Option<f64>> = records.iter().map(|r| r.gdd_day).collect();
        let gdd_cumulative: Vec<Option<f64>> = records.iter().map(|r| r.gdd_cumulative).collect();

        let frame = df!(
            "date" => dates,
            "temp_min" => temp_min,
            "temp_max" => temp_max,
            "humidity_mean" => humidity_mean,
            "gdd" => gdd,
            "gdd_cumulative" => gdd_cumulative,
        )?;
        Ok(MonthlyFrame::new(frame.lazy()))
    }

    /// Applies an arbitrary polars predicate, returning a new frame and
    /// leaving this one untouched.
    pub fn filter(&self, predicate: Expr) -> MonthlyFrame {
        MonthlyFrame::new(self.frame.clone().filter(predicate))
    }

    /// Runs the lazy plan and returns the materialized frame.
    pub fn collect(&self) -> Result<DataFrame, AnalysisError> {
        self.frame.clone().collect().map_err(AnalysisError::from)
    }

    /// Materializes the frame into typed rows, ordered by date.
    pub fn records(&self) -> Result<Vec<GddRecord>, AnalysisError> {
        let df = self.collect()?;
        let dates = frame_column(&df, "date")?;
        let temp_mins = frame_column(&df, "temp_min")?;
        let temp_maxs = frame_column(&df, "temp_max")?;
        let humidity_means = frame_column(&df, "humidity_mean")?;
        let gdds = frame_column(&df, "gdd")?;
        let gdd_cumulatives = frame_column(&df, "gdd_cumulative")?;

        let mut records = Vec::with_capacity(df.height());
        for row in 0..df.height() {
            let date_str = str_cell(dates, row)?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| {
                AnalysisError::MalformedCell {
                    column: "date".to_string(),
                    value: date_str.to_string(),
                }
            })?;
            records.push(GddRecord {
                date,
                temp_min: opt_f64(temp_mins, row),
                temp_max: opt_f64(temp_maxs, row),
                humidity_mean: opt_f64(humidity_means, row),
                gdd_day: opt_f64(gdds, row),
                gdd_cumulative: opt_f64(gdd_cumulatives, row),
            });
        }
        Ok(records)
    }

    /// Month-level statistics over the collected rows, or `None` for an
    /// empty month.
    pub fn summary(&self) -> Result<Option<MonthlySummary>, AnalysisError> {
        let records = self.records()?;
        if records.is_empty() {
            return Ok(None);
        }

        let midpoints: Vec<f64> = records
            .iter()
            .filter_map(|r| match (r.temp_min, r.temp_max) {
                (Some(min), Some(max)) => Some((min + max) / 2.0),
                _ => None,
            })
            .collect();
        let humidities: Vec<f64> = records.iter().filter_map(|r| r.humidity_mean).collect();

        Ok(Some(MonthlySummary {
            temp_mean: mean(&midpoints),
            temp_min: records
                .iter()
                .filter_map(|r| r.temp_min)
                .reduce(f64::min),
            temp_max: records
                .iter()
                .filter_map(|r| r.temp_max)
                .reduce(f64::max),
            humidity_mean: mean(&humidities),
            total_gdd: records.iter().filter_map(|r| r.gdd_day).sum(),
        }))
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
