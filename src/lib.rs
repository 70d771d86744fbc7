//! Weather ingestion and agronomic summaries from open SYNOP data.
//!
//! The pipeline fetches raw observations for a station (paginated per day,
//! bulk per month), normalizes or aggregates them into per-day tables, and
//! derives growing degree days. Results are polars frames with typed
//! extraction, persistable to a flat SQLite table and exportable as CSV or
//! JSON artifacts.
//!
//! ```no_run
//! use agrometeo::{Agrometeo, ExportFormat, Month};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Agrometeo::new().await?;
//! let month = Month::new(7, 2023);
//!
//! let frame = client.monthly().station("PARIS").month(month).call().await?;
//! if let Some(summary) = frame.summary()? {
//!     println!("July accumulated {:.1} GDD", summary.total_gdd);
//! }
//!
//! let df = frame.collect()?;
//! client.exporter().write_monthly(&df, "PARIS", month, ExportFormat::Csv)?;
//! # Ok(())
//! # }
//! ```

mod agrometeo;
mod analysis;
mod clients;
mod error;
mod frames;
mod generator;
mod observations;
mod store;
mod types;
mod utils;

pub use agrometeo::Agrometeo;
pub use error::AgrometeoError;

pub use clients::daily_client::DailyClient;
pub use clients::monthly_client::MonthlyClient;

pub use analysis::aggregate::aggregate_monthly;
pub use analysis::error::AnalysisError;
pub use analysis::gdd::{compute_gdd, DEFAULT_BASE_TEMP};
pub use analysis::normalize::normalize_daily;

pub use frames::daily_frame::DailyFrame;
pub use frames::monthly_frame::MonthlyFrame;

pub use observations::error::FetchError;
pub use observations::fetcher::{FetchConfig, ObservationFetcher};
pub use observations::record::RawObservation;

pub use store::error::StoreError;
pub use store::export::{artifact_file_name, artifact_path, ExportFormat, Exporter};
pub use store::readings_db::{ClimateRow, ReadingStore};

pub use generator::{generate_readings, ClimateProfile, GeneratorConfig, GeneratorError};

pub use types::period::{DatePeriod, Month, StartEndDate, Year};
pub use types::reading::{DailyAggregate, DailyReading, GddRecord, MonthlySummary};
