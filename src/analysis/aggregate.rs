//! Collapses raw observations into one min/max/mean row per calendar date.

use crate::analysis::error::AnalysisError;
use crate::frames::{frame_column, opt_f64, str_cell};
use crate::observations::record::RawObservation;
use crate::types::reading::DailyAggregate;
use chrono::NaiveDate;
use polars::prelude::*;

/// Groups observations by calendar date and aggregates each group into a
/// [`DailyAggregate`]: minimum of the 12-hour temperature minima, maximum of
/// the maxima, mean humidity. Null values are ignored inside each
/// aggregate, so a date whose observations carried no usable temperature
/// still produces a row with `None` on the temperature side. The result is
/// sorted by date ascending regardless of input order.
pub fn aggregate_monthly(
    observations: &[RawObservation],
) -> Result<Vec<DailyAggregate>, AnalysisError> {
    let mut dates = Vec::new();
    let mut temp_mins = Vec::new();
    let mut temp_maxs = Vec::new();
    let mut humidities = Vec::new();
    for obs in observations {
        let Some(timestamp) = obs.timestamp else {
            continue;
        };
        dates.push(timestamp.format("%Y-%m-%d").to_string());
        temp_mins.push(obs.temp_min_12h);
        temp_maxs.push(obs.temp_max_12h);
        humidities.push(obs.humidity_pct);
    }

    let frame = df!(
        "date" => dates,
        "temp_min" => temp_mins,
        "temp_max" => temp_maxs,
        "humidity" => humidities,
    )?;

    let grouped = frame
        .lazy()
        .group_by([col("date")])
        .agg([
            col("temp_min").min(),
            col("temp_max").max(),
            col("humidity").mean().alias("humidity_mean"),
        ])
        .sort(["date"], Default::default())
        .collect()?;

    let date_column = frame_column(&grouped, "date")?;
    let min_column = frame_column(&grouped, "temp_min")?;
    let max_column = frame_column(&grouped, "temp_max")?;
    let humidity_column = frame_column(&grouped, "humidity_mean")?;

    let mut aggregates = Vec::with_capacity(grouped.height());
    for row in 0..grouped.height() {
        let date_str = str_cell(date_column, row)?;
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| {
            AnalysisError::MalformedCell {
                column: "date".to_string(),
                value: date_str.to_string(),
            }
        })?;
        aggregates.push(DailyAggregate {
            date,
            temp_min: opt_f64(min_column, row),
            temp_max: opt_f64(max_column, row),
            humidity_mean: opt_f64(humidity_column, row),
        });
    }
    Ok(aggregates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn obs(
        day: u32,
        hour: u32,
        temp_min: Option<f64>,
        temp_max: Option<f64>,
        humidity: Option<f64>,
    ) -> RawObservation {
        RawObservation {
            timestamp: Some(Utc.with_ymd_and_hms(2023, 7, day, hour, 0, 0).unwrap()),
            station_name: Some("PARIS".to_string()),
            temperature_c: None,
            humidity_pct: humidity,
            rainfall_mm: None,
            temp_min_12h: temp_min,
            temp_max_12h: temp_max,
        }
    }

    #[test]
    fn groups_by_date_and_sorts_ascending() {
        let aggregates = aggregate_monthly(&[
            obs(2, 6, Some(12.0), Some(18.0), Some(70.0)),
            obs(1, 6, Some(10.0), Some(20.0), Some(60.0)),
            obs(1, 18, Some(11.0), Some(22.0), Some(50.0)),
        ])
        .unwrap();

        assert_eq!(aggregates.len(), 2);
        assert_eq!(
            aggregates[0].date,
            NaiveDate::from_ymd_opt(2023, 7, 1).unwrap()
        );
        assert_eq!(aggregates[0].temp_min, Some(10.0));
        assert_eq!(aggregates[0].temp_max, Some(22.0));
        assert_eq!(aggregates[0].humidity_mean, Some(55.0));
        assert_eq!(aggregates[1].temp_min, Some(12.0));
    }

    #[test]
    fn min_never_exceeds_max() {
        let aggregates = aggregate_monthly(&[
            obs(1, 6, Some(10.0), Some(20.0), Some(60.0)),
            obs(1, 18, Some(14.0), Some(16.0), Some(60.0)),
            obs(2, 6, Some(15.0), Some(15.0), Some(60.0)),
        ])
        .unwrap();

        for aggregate in &aggregates {
            let (Some(min), Some(max)) = (aggregate.temp_min, aggregate.temp_max) else {
                panic!("expected both extremes");
            };
            assert!(min <= max);
        }
    }

    #[test]
    fn single_reading_collapses_to_equal_extremes() {
        let aggregates =
            aggregate_monthly(&[obs(1, 6, Some(15.0), Some(15.0), Some(60.0))]).unwrap();
        assert_eq!(aggregates[0].temp_min, aggregates[0].temp_max);
    }

    #[test]
    fn nulls_are_ignored_within_a_group() {
        let aggregates = aggregate_monthly(&[
            obs(1, 6, None, None, Some(40.0)),
            obs(1, 18, Some(12.0), Some(19.0), None),
        ])
        .unwrap();

        assert_eq!(aggregates[0].temp_min, Some(12.0));
        assert_eq!(aggregates[0].temp_max, Some(19.0));
        assert_eq!(aggregates[0].humidity_mean, Some(40.0));
    }

    #[test]
    fn all_null_group_still_produces_a_row() {
        let aggregates = aggregate_monthly(&[obs(1, 6, None, None, None)]).unwrap();
        assert_eq!(aggregates.len(), 1);
        assert_eq!(aggregates[0].temp_min, None);
        assert_eq!(aggregates[0].temp_max, None);
        assert_eq!(aggregates[0].humidity_mean, None);
    }

    #[test]
    fn empty_input_yields_no_rows() {
        assert!(aggregate_monthly(&[]).unwrap().is_empty());
    }
}
