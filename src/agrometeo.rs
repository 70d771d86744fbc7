//! Main entry point of the crate: the [`Agrometeo`] client ties the
//! observation fetcher, the analysis pipeline and the persistence layer
//! together around one flat data directory.

use crate::clients::daily_client::DailyClient;
use crate::clients::monthly_client::MonthlyClient;
use crate::error::AgrometeoError;
use crate::observations::fetcher::{FetchConfig, ObservationFetcher};
use crate::store::export::Exporter;
use crate::store::readings_db::ReadingStore;
use crate::utils::{ensure_data_dir_exists, get_data_dir};
use std::path::{Path, PathBuf};

const READINGS_DB_FILE: &str = "climate_data.db";

/// Client for fetching open weather observations and deriving daily and
/// monthly agronomic summaries.
///
/// All analyses run to completion within the calling task: one request, one
/// fetch, one result, no background jobs. Artifacts and the readings
/// database live under a single flat data directory.
///
/// Create an instance with [`Agrometeo::new()`] for the default data
/// directory or [`Agrometeo::with_data_folder()`] to control the location.
///
/// # Examples
///
/// ```no_run
/// # use agrometeo::{Agrometeo, AgrometeoError};
/// # async fn run() -> Result<(), AgrometeoError> {
/// let client = Agrometeo::new().await?;
/// // ... fetch daily or monthly data ...
/// # Ok(())
/// # }
/// ```
pub struct Agrometeo {
    fetcher: ObservationFetcher,
    data_folder: PathBuf,
}

impl Agrometeo {
    /// Creates a client using the default data directory (via the `dirs`
    /// crate, e.g. `~/.local/share/agrometeo` on Linux).
    ///
    /// # Errors
    ///
    /// [`AgrometeoError::DataDirResolution`] if the platform data directory
    /// cannot be determined, [`AgrometeoError::DataDirCreation`] if it
    /// cannot be created.
    pub async fn new() -> Result<Self, AgrometeoError> {
        let data_folder = get_data_dir().map_err(AgrometeoError::DataDirResolution)?;
        Self::with_data_folder(data_folder).await
    }

    /// Creates a client rooted at `data_folder`, creating the directory if
    /// needed. Catalog access uses the default [`FetchConfig`].
    pub async fn with_data_folder(data_folder: PathBuf) -> Result<Self, AgrometeoError> {
        Self::with_config(data_folder, FetchConfig::default()).await
    }

    /// Creates a client with full control over the catalog connection
    /// parameters, e.g. for pointing at a mirror or tightening the
    /// timeouts.
    pub async fn with_config(
        data_folder: PathBuf,
        config: FetchConfig,
    ) -> Result<Self, AgrometeoError> {
        ensure_data_dir_exists(&data_folder)
            .await
            .map_err(|e| AgrometeoError::DataDirCreation(data_folder.clone(), e))?;
        Ok(Self {
            fetcher: ObservationFetcher::new(config),
            data_folder,
        })
    }

    /// Starts a per-day analysis:
    /// `client.daily().station("PARIS").date(d).call().await`.
    pub fn daily(&self) -> DailyClient {
        DailyClient::new(self)
    }

    /// Starts a per-month analysis:
    /// `client.monthly().station("PARIS").month(Month::new(7, 2023)).call().await`.
    pub fn monthly(&self) -> MonthlyClient {
        MonthlyClient::new(self)
    }

    /// Opens the readings database inside the data folder, creating the
    /// file and schema on first use. Each call hands out an independent
    /// pool; close it by dropping.
    pub async fn store(&self) -> Result<ReadingStore, AgrometeoError> {
        ReadingStore::open(&self.data_folder.join(READINGS_DB_FILE))
            .await
            .map_err(AgrometeoError::from)
    }

    /// Artifact writer rooted at the data folder.
    pub fn exporter(&self) -> Exporter {
        Exporter::new(self.data_folder.clone())
    }

    /// The flat directory holding the database and per-month artifacts.
    pub fn data_folder(&self) -> &Path {
        &self.data_folder
    }

    pub(crate) fn fetcher(&self) -> &ObservationFetcher {
        &self.fetcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::export::ExportFormat;
    use crate::types::period::Month;

    #[tokio::test]
    async fn creates_the_data_folder_on_construction() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("nested").join("agrometeo");

        let client = Agrometeo::with_data_folder(folder.clone()).await.unwrap();
        assert!(folder.is_dir());
        assert_eq!(client.data_folder(), folder.as_path());
    }

    #[tokio::test]
    async fn store_and_exporter_share_the_data_folder() {
        let dir = tempfile::tempdir().unwrap();
        let client = Agrometeo::with_data_folder(dir.path().to_path_buf())
            .await
            .unwrap();

        let store = client.store().await.unwrap();
        drop(store);
        assert!(dir.path().join("climate_data.db").exists());

        let path = client
            .exporter()
            .monthly_path("PARIS", Month::new(7, 2023), ExportFormat::Csv);
        assert!(path.starts_with(dir.path()));
    }

    #[tokio::test]
    async fn rejects_a_file_in_place_of_the_data_folder() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not_a_dir");
        std::fs::write(&file, b"x").unwrap();

        let result = Agrometeo::with_data_folder(file).await;
        assert!(matches!(
            result,
            Err(AgrometeoError::DataDirCreation(_, _))
        ));
    }
}
