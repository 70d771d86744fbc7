//! HTTP access to the SYNOP open-data catalog.
//!
//! The daily path walks the paginated `records` endpoint with a fixed page
//! size; the monthly path issues a single bulk export request for the whole
//! month window. Both degrade to the data collected so far on timeout or
//! transport failure instead of raising: callers treat an empty result as
//! "no data available", never as a hard error.

use crate::observations::error::FetchError;
use crate::observations::record::{RawObservation, RecordsPage};
use crate::types::period::StartEndDate;
use async_trait::async_trait;
use chrono::NaiveDate;
use log::{info, warn};
use reqwest::Client;
use std::time::Duration;

const DATASET_PATH: &str = "catalog/datasets/donnees-synop-essentielles-omm@public";
const DEFAULT_BASE_URL: &str = "https://data.opendatasoft.com/api/explore/v2.1";

/// Connection parameters for [`ObservationFetcher`].
///
/// The defaults match the public Opendatasoft catalog: pages of 100 records
/// with a 25 s timeout per page request, and a 30 s timeout for the monthly
/// bulk export.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub base_url: String,
    pub page_size: usize,
    pub daily_timeout: Duration,
    pub monthly_timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: 100,
            daily_timeout: Duration::from_secs(25),
            monthly_timeout: Duration::from_secs(30),
        }
    }
}

/// Why a pagination walk stopped. Only `Exhausted` means the catalog
/// actually ran out of records; the public API collapses all three to the
/// records collected so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Termination {
    Exhausted,
    TimedOut,
    TransportFailed,
}

#[derive(Debug)]
pub(crate) struct FetchOutcome {
    pub records: Vec<RawObservation>,
    pub termination: Termination,
}

/// Source of observation pages, separated from the HTTP client so the
/// pagination loop can be exercised against a stub.
#[async_trait]
pub(crate) trait ObservationSource: Sync {
    async fn day_page(
        &self,
        station: &str,
        date: NaiveDate,
        offset: usize,
    ) -> Result<Vec<RawObservation>, FetchError>;
}

/// Client for the external observation catalog.
pub struct ObservationFetcher {
    client: Client,
    config: FetchConfig,
}

impl ObservationFetcher {
    pub fn new(config: FetchConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Fetches every observation of `station` on `date`, walking the
    /// paginated endpoint until it returns an empty page.
    ///
    /// A timeout or transport error terminates the walk early; the records
    /// collected up to that point are returned. The result is post-filtered
    /// to records whose station name contains `station` (case-insensitive),
    /// since the catalog's name match can be fuzzy. An empty vector means
    /// "no data for that day".
    pub async fn fetch_day(&self, station: &str, date: NaiveDate) -> Vec<RawObservation> {
        let outcome = collect_day_pages(self, station, date).await;
        match outcome.termination {
            Termination::Exhausted => {}
            Termination::TimedOut => {
                warn!(
                    "daily fetch for {station} on {date} timed out; keeping {} records",
                    outcome.records.len()
                );
            }
            Termination::TransportFailed => {
                warn!(
                    "daily fetch for {station} on {date} failed mid-pagination; keeping {} records",
                    outcome.records.len()
                );
            }
        }
        filter_station(outcome.records, station)
    }

    /// Fetches every observation of `station` inside the inclusive date
    /// `window` with a single bulk export request.
    ///
    /// Network errors degrade to an empty vector, logged but not raised.
    pub async fn fetch_month(&self, station: &str, window: &StartEndDate) -> Vec<RawObservation> {
        match self.month_export(station, window).await {
            Ok(records) => filter_station(records, station),
            Err(err) => {
                warn!(
                    "monthly export for {station} ({}..{}) failed: {err}",
                    window.start, window.end
                );
                Vec::new()
            }
        }
    }

    /// Strict variant of [`fetch_month`](Self::fetch_month): returns the
    /// transport error instead of degrading to an empty result. The records
    /// are not station-filtered.
    pub async fn month_export(
        &self,
        station: &str,
        window: &StartEndDate,
    ) -> Result<Vec<RawObservation>, FetchError> {
        let url = format!("{}/{}/exports/json", self.config.base_url, DATASET_PATH);
        let where_clause = format!(
            "date >= '{}T00:00:00Z' AND date <= '{}T23:59:59Z'",
            window.start.format("%Y-%m-%d"),
            window.end.format("%Y-%m-%d"),
        );
        info!("requesting monthly export from {url} for {station}");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("refine.nom", station),
                ("where", where_clause.as_str()),
                ("timezone", "UTC"),
            ])
            .timeout(self.config.monthly_timeout)
            .send()
            .await
            .map_err(|e| classify_send_error(url.clone(), e))?;
        let response = check_status(url.clone(), response)?;

        response
            .json::<Vec<RawObservation>>()
            .await
            .map_err(|e| FetchError::Payload(url, e))
    }
}

#[async_trait]
impl ObservationSource for ObservationFetcher {
    async fn day_page(
        &self,
        station: &str,
        date: NaiveDate,
        offset: usize,
    ) -> Result<Vec<RawObservation>, FetchError> {
        let url = format!("{}/{}/records", self.config.base_url, DATASET_PATH);
        let day = date.format("%Y-%m-%d");
        let where_clause =
            format!("date >= '{day}T00:00:00Z' AND date <= '{day}T23:59:59Z' AND nom = '{station}'");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("limit", self.config.page_size.to_string()),
                ("offset", offset.to_string()),
                ("where", where_clause),
                ("sort", "date".to_string()),
            ])
            .timeout(self.config.daily_timeout)
            .send()
            .await
            .map_err(|e| classify_send_error(url.clone(), e))?;
        let response = check_status(url.clone(), response)?;

        let page = response
            .json::<RecordsPage>()
            .await
            .map_err(|e| FetchError::Payload(url, e))?;
        Ok(page.results)
    }
}

/// Walks pages from `offset` 0 until an empty page or the first error.
///
/// Partial results are always kept; the tag records whether the walk ended
/// because the catalog was exhausted or because a request failed, which is
/// indistinguishable through the public API but matters for tests.
pub(crate) async fn collect_day_pages<S>(source: &S, station: &str, date: NaiveDate) -> FetchOutcome
where
    S: ObservationSource + ?Sized,
{
    let mut records = Vec::new();
    let mut offset = 0;
    loop {
        match source.day_page(station, date, offset).await {
            Ok(page) => {
                if page.is_empty() {
                    return FetchOutcome {
                        records,
                        termination: Termination::Exhausted,
                    };
                }
                offset += page.len();
                records.extend(page);
            }
            Err(FetchError::Timeout(url)) => {
                warn!("page request to {url} timed out");
                return FetchOutcome {
                    records,
                    termination: Termination::TimedOut,
                };
            }
            Err(err) => {
                warn!("page request failed: {err}");
                return FetchOutcome {
                    records,
                    termination: Termination::TransportFailed,
                };
            }
        }
    }
}

fn classify_send_error(url: String, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout(url)
    } else {
        FetchError::Network(url, err)
    }
}

fn check_status(url: String, response: reqwest::Response) -> Result<reqwest::Response, FetchError> {
    match response.error_for_status() {
        Ok(resp) => Ok(resp),
        Err(e) => Err(if let Some(status) = e.status() {
            FetchError::HttpStatus {
                url,
                status,
                source: e,
            }
        } else {
            FetchError::Network(url, e)
        }),
    }
}

fn filter_station(records: Vec<RawObservation>, station: &str) -> Vec<RawObservation> {
    let needle = station.to_uppercase();
    records
        .into_iter()
        .filter(|record| {
            record
                .station_name
                .as_deref()
                .map(|name| name.to_uppercase().contains(&needle))
                .unwrap_or(false)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn observation(station: &str) -> RawObservation {
        RawObservation {
            timestamp: None,
            station_name: Some(station.to_string()),
            temperature_c: Some(20.0),
            humidity_pct: Some(60.0),
            rainfall_mm: None,
            temp_min_12h: None,
            temp_max_12h: None,
        }
    }

    /// Serves `pages` in order, then empty pages forever.
    struct ScriptedSource {
        pages: Vec<Result<Vec<RawObservation>, FetchError>>,
        requests: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(pages: Vec<Result<Vec<RawObservation>, FetchError>>) -> Self {
            Self {
                pages,
                requests: AtomicUsize::new(0),
            }
        }

        fn request_count(&self) -> usize {
            self.requests.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ObservationSource for ScriptedSource {
        async fn day_page(
            &self,
            _station: &str,
            _date: NaiveDate,
            _offset: usize,
        ) -> Result<Vec<RawObservation>, FetchError> {
            let index = self.requests.fetch_add(1, Ordering::SeqCst);
            match self.pages.get(index) {
                Some(Ok(page)) => Ok(page.clone()),
                Some(Err(FetchError::Timeout(url))) => Err(FetchError::Timeout(url.clone())),
                Some(Err(_)) => unreachable!("scripted errors are timeouts"),
                None => Ok(Vec::new()),
            }
        }
    }

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 7, 1).unwrap()
    }

    #[tokio::test]
    async fn pagination_stops_after_empty_page() {
        let full_page: Vec<_> = (0..100).map(|_| observation("PARIS")).collect();
        let source = ScriptedSource::new(vec![Ok(full_page), Ok(Vec::new())]);

        let outcome = collect_day_pages(&source, "PARIS", test_date()).await;

        assert_eq!(source.request_count(), 2);
        assert_eq!(outcome.records.len(), 100);
        assert_eq!(outcome.termination, Termination::Exhausted);
    }

    #[tokio::test]
    async fn timeout_keeps_partial_results() {
        let source = ScriptedSource::new(vec![
            Ok(vec![observation("PARIS"), observation("PARIS")]),
            Err(FetchError::Timeout("http://example.invalid".to_string())),
        ]);

        let outcome = collect_day_pages(&source, "PARIS", test_date()).await;

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.termination, Termination::TimedOut);
    }

    #[tokio::test]
    async fn empty_first_page_is_exhausted_immediately() {
        let source = ScriptedSource::new(vec![]);

        let outcome = collect_day_pages(&source, "PARIS", test_date()).await;

        assert_eq!(source.request_count(), 1);
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.termination, Termination::Exhausted);
    }

    #[test]
    fn station_filter_matches_substrings_case_insensitively() {
        let records = vec![
            observation("PARIS-MONTSOURIS"),
            observation("paris orly"),
            observation("LYON-BRON"),
            RawObservation {
                station_name: None,
                ..observation("x")
            },
        ];
        let kept = filter_station(records, "Paris");
        assert_eq!(kept.len(), 2);
        assert!(kept
            .iter()
            .all(|r| r.station_name.as_deref().unwrap().to_uppercase().contains("PARIS")));
    }

    #[test]
    fn default_config_matches_catalog_limits() {
        let config = FetchConfig::default();
        assert_eq!(config.page_size, 100);
        assert_eq!(config.daily_timeout, Duration::from_secs(25));
        assert_eq!(config.monthly_timeout, Duration::from_secs(30));
    }
}
