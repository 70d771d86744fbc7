//! Provides the `MonthlyClient` for running a whole-month analysis.
//!
//! Obtained via [`Agrometeo::monthly()`], the client fetches a month of raw
//! observations in one bulk request, aggregates them per calendar date and
//! annotates the result with growing degree days.

use crate::agrometeo::Agrometeo;
use crate::analysis::aggregate::aggregate_monthly;
use crate::analysis::gdd::{compute_gdd, DEFAULT_BASE_TEMP};
use crate::error::AgrometeoError;
use crate::frames::monthly_frame::MonthlyFrame;
use crate::types::period::{DatePeriod, Month};
use bon::bon;

/// A client builder for per-month weather analysis.
///
/// Instances are created by [`Agrometeo::monthly()`]. The station name and
/// [`Month`] are required; `.base_temp(f64)` optionally overrides the
/// default 10 °C GDD base before `.call().await` executes the pipeline.
pub struct MonthlyClient<'a> {
    client: &'a Agrometeo,
}

#[bon]
impl<'a> MonthlyClient<'a> {
    pub(crate) fn new(client: &'a Agrometeo) -> Self {
        Self { client }
    }

    /// Fetches, aggregates and GDD-annotates one month for a station.
    ///
    /// The fetch window spans the real month: first day 00:00 UTC through
    /// last day 23:59 UTC, leap years included. An empty frame means the
    /// catalog had no data for the window (or the request failed and
    /// degraded); callers present that as "no data", not as an error.
    ///
    /// # Errors
    ///
    /// [`AgrometeoError::PeriodResolution`] if the month number does not
    /// name a real calendar month (e.g. month 13); analysis errors only for
    /// malformed internal frames.
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
    ///     .base_temp(8.0) // vines accumulate from 8 °C
    ///     .call()
    ///     .await?;
    ///
    /// for record in frame.records()? {
    ///     println!("{} -> {:?}", record.date, record.gdd_cumulative);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[builder(start_fn = station)]
    #[doc(hidden)]
    pub async fn build_station(
        &self,
        #[builder(start_fn)] station: &str,
        month: Month,
        base_temp: Option<f64>,
    ) -> Result<MonthlyFrame, AgrometeoError> {
        let window = month
            .get_date_period()
            .ok_or(AgrometeoError::PeriodResolution(month))?;
        let records = self.client.fetcher().fetch_month(station, &window).await;
        let aggregates = aggregate_monthly(&records)?;
        let annotated = compute_gdd(&aggregates, base_temp.unwrap_or(DEFAULT_BASE_TEMP));
        MonthlyFrame::from_records(&annotated).map_err(AgrometeoError::from)
    }
}
