//! Turns raw per-observation records into a clean per-minute daily table.

use crate::analysis::error::AnalysisError;
use crate::frames::daily_frame::DailyFrame;
use crate::observations::record::RawObservation;
use polars::prelude::*;

struct MinuteRow {
    date: String,
    time: String,
    temperature: Option<f64>,
    humidity: Option<f64>,
}

/// Normalizes raw observations into a [`DailyFrame`].
///
/// Each observation is split into a `date` and a `time` truncated to the
/// minute, temperature is rounded to one decimal, and rows are sorted by
/// (date, time) with duplicate timestamps collapsed to their first record.
/// Missing temperature and humidity values are filled by linear
/// interpolation between the nearest known neighbours; rows that still lack
/// a value afterwards (gaps at the start or end of the sequence, which have
/// no bounding value on one side) are dropped.
///
/// An empty input produces an empty frame: that is the regular "no usable
/// data for that day" outcome, not an error.
pub fn normalize_daily(observations: &[RawObservation]) -> Result<DailyFrame, AnalysisError> {
    let mut rows: Vec<MinuteRow> = observations
        .iter()
        .filter_map(|obs| {
            let timestamp = obs.timestamp?;
            Some(MinuteRow {
                date: timestamp.format("%Y-%m-%d").to_string(),
                time: timestamp.format("%H:%M").to_string(),
                temperature: obs.temperature_c.map(|t| (t * 10.0).round() / 10.0),
                humidity: obs.humidity_pct,
            })
        })
        .collect();

    rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.time.cmp(&b.time)));
    rows.dedup_by(|a, b| a.date == b.date && a.time == b.time);

    let dates: Vec<&str> = rows.iter().map(|r| r.date.as_str()).collect();
    let times: Vec<&str> = rows.iter().map(|r| r.time.as_str()).collect();
    let temperatures: Vec<Option<f64>> = rows.iter().map(|r| r.temperature).collect();
    let humidities: Vec<Option<f64>> = rows.iter().map(|r| r.humidity).collect();

    let frame = df!(
        "date" => dates,
        "time" => times,
        "temperature" => temperatures,
        "humidity" => humidities,
    )?;

    let lazy = frame
        .lazy()
        .with_columns([
            col("temperature").interpolate(InterpolationMethod::Linear),
            col("humidity").interpolate(InterpolationMethod::Linear),
        ])
        .filter(
            col("temperature")
                .is_not_null()
                .and(col("humidity").is_not_null()),
        );

    Ok(DailyFrame::new(lazy))
}
