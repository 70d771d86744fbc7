//! Provides the `DailyClient` for running a single-day analysis.
//!
//! Obtained via [`Agrometeo::daily()`], the client fetches every raw
//! observation of a station for one date and normalizes it into a
//! [`DailyFrame`].

use crate::agrometeo::Agrometeo;
use crate::analysis::normalize::normalize_daily;
use crate::error::AgrometeoError;
use crate::frames::daily_frame::DailyFrame;
use bon::bon;
use chrono::NaiveDate;

/// A client builder for per-day weather analysis.
///
/// Instances are created by [`Agrometeo::daily()`]. The station name and
/// date must both be supplied before `.call().await` executes the fetch and
/// normalization.
pub struct DailyClient<'a> {
    client: &'a Agrometeo,
}

#[bon]
impl<'a> DailyClient<'a> {
    pub(crate) fn new(client: &'a Agrometeo) -> Self {
        Self { client }
    }

    /// Fetches and normalizes one day of observations for a station.
    ///
    /// The date must already be validated by the caller (the routing layer
    /// checks the `YYYY-MM-DD` form before resolving it to a `NaiveDate`).
    /// An empty frame is the regular "no data for that day" outcome:
    /// network failures and timeouts during the paginated fetch degrade to
    /// whatever was collected, and days the catalog does not cover simply
    /// produce no rows.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use agrometeo::Agrometeo;
    /// use chrono::NaiveDate;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Agrometeo::new().await?;
    /// let frame = client
    ///     .daily()
    ///     .station("PARIS")
    ///     .date(NaiveDate::from_ymd_opt(2023, 7, 1).unwrap())
    ///     .call()
    ///     .await?;
    ///
    /// let readings = frame.readings()?;
    /// if readings.is_empty() {
    ///     println!("no data for that day");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[builder(start_fn = station)]
    #[doc(hidden)]
    pub async fn build_station(
        &self,
        #[builder(start_fn)] station: &str,
        date: NaiveDate,
    ) -> Result<DailyFrame, AgrometeoError> {
        let records = self.client.fetcher().fetch_day(station, date).await;
        let frame = normalize_daily(&records)?;
        Ok(frame)
    }
}
