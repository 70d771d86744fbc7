use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One raw record from the SYNOP open-data catalog, immutable once fetched.
///
/// Field names mirror the dataset's own short codes: `tc` is the air
/// temperature in °C, `u` the relative humidity, `rr1` the rainfall over the
/// last hour, `tn12c`/`tx12c` the 12-hour temperature extremes and `nom` the
/// reporting station name. Every value may be absent in a given record.
///
/// A record can also arrive without a timestamp; such records are skipped by
/// the analysis stages rather than failing the whole batch.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawObservation {
    #[serde(rename = "date", default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "nom", default)]
    pub station_name: Option<String>,
    #[serde(rename = "tc", default)]
    pub temperature_c: Option<f64>,
    #[serde(rename = "u", default)]
    pub humidity_pct: Option<f64>,
    #[serde(rename = "rr1", default)]
    pub rainfall_mm: Option<f64>,
    #[serde(rename = "tn12c", default)]
    pub temp_min_12h: Option<f64>,
    #[serde(rename = "tx12c", default)]
    pub temp_max_12h: Option<f64>,
}

/// Envelope of the paginated `records` endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct RecordsPage {
    #[serde(default)]
    pub results: Vec<RawObservation>,
}
