//! CSV/JSON export of processed readings.
//!
//! Monthly artifacts live under a single flat data directory and are named
//! `weather_<station>_<year>_<month>.<ext>`; regenerating a month
//! overwrites the previous file. Daily exports are plain byte streams
//! (the routing layer serves them as attachments).

use crate::store::error::StoreError;
use crate::store::readings_db::ClimateRow;
use crate::types::period::Month;
use polars::prelude::*;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Supported export encodings.
///
/// PDF reports share the artifact naming convention but are rendered by a
/// separate presentation component; pass `"pdf"` to [`artifact_file_name`]
/// to locate them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// `;`-separated values, UTF-8, `.` as decimal separator.
    Csv,
    /// An array of objects, one key per column.
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Deterministic file name for a per-month artifact.
pub fn artifact_file_name(station: &str, month: Month, extension: &str) -> String {
    format!(
        "weather_{}_{}_{}.{}",
        station,
        month.year(),
        month.month(),
        extension
    )
}

/// Serializes a materialized frame into `writer` in the requested format.
///
/// Columns are written in the frame's own order, so frames built by the
/// pipeline keep the fixed export column layout.
pub fn write_frame<W: Write>(
    frame: &DataFrame,
    format: ExportFormat,
    writer: W,
) -> Result<(), PolarsError> {
    let mut frame = frame.clone();
    match format {
        ExportFormat::Csv => CsvWriter::new(writer)
            .include_header(true)
            .with_separator(b';')
            .finish(&mut frame),
        ExportFormat::Json => JsonWriter::new(writer)
            .with_json_format(JsonFormat::Json)
            .finish(&mut frame),
    }
}

/// Exports daily readings as a byte stream with the fixed column order
/// `[time, temperature, humidity, gdd, city]`.
pub fn export_daily<W: Write>(
    rows: &[ClimateRow],
    format: ExportFormat,
    writer: W,
) -> Result<(), StoreError> {
    let frame = daily_rows_frame(rows)?;
    write_frame(&frame, format, writer).map_err(StoreError::Payload)
}

fn daily_rows_frame(rows: &[ClimateRow]) -> Result<DataFrame, StoreError> {
    let times: Vec<String> = rows
        .iter()
        .map(|r| r.time.format("%H:%M").to_string())
        .collect();
    let temperatures: Vec<Option<f64>> = rows.iter().map(|r| r.temperature).collect();
    let humidities: Vec<Option<f64>> = rows.iter().map(|r| r.humidity).collect();
    let gdds: Vec<Option<f64>> = rows.iter().map(|r| r.gdd).collect();
    let cities: Vec<&str> = rows.iter().map(|r| r.city.as_str()).collect();

    df!(
        "time" => times,
        "temperature" => temperatures,
        "humidity" => humidities,
        "gdd" => gdds,
        "city" => cities,
    )
    .map_err(StoreError::Payload)
}

/// Writes per-month artifacts into the flat data directory.
pub struct Exporter {
    data_folder: PathBuf,
}

impl Exporter {
    pub fn new(data_folder: PathBuf) -> Self {
        Self { data_folder }
    }

    /// Path the artifact for `station`/`month` is written to.
    pub fn monthly_path(&self, station: &str, month: Month, format: ExportFormat) -> PathBuf {
        self.data_folder
            .join(artifact_file_name(station, month, format.extension()))
    }

    /// Writes the materialized monthly frame as an artifact, overwriting
    /// any previous file for the same station and month, and returns the
    /// path written.
    pub fn write_monthly(
        &self,
        frame: &DataFrame,
        station: &str,
        month: Month,
        format: ExportFormat,
    ) -> Result<PathBuf, StoreError> {
        std::fs::create_dir_all(&self.data_folder)
            .map_err(|e| StoreError::ArtifactIo(self.data_folder.clone(), e))?;
        let path = self.monthly_path(station, month, format);
        let file = File::create(&path).map_err(|e| StoreError::ArtifactIo(path.clone(), e))?;
        write_frame(frame, format, file)
            .map_err(|e| StoreError::ArtifactEncode(path.clone(), e))?;
        Ok(path)
    }
}

/// Lets callers resolve artifact locations without an [`Exporter`], e.g. the
/// download route checking for a previously rendered PDF.
pub fn artifact_path(data_folder: &Path, station: &str, month: Month, extension: &str) -> PathBuf {
    data_folder.join(artifact_file_name(station, month, extension))
}
