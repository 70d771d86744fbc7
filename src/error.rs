use crate::analysis::error::AnalysisError;
use crate::generator::GeneratorError;
use crate::observations::error::FetchError;
use crate::store::error::StoreError;
use crate::types::period::Month;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgrometeoError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error("could not resolve {0} to a calendar month window")]
    PeriodResolution(Month),

    #[error("failed to create data directory '{0}'")]
    DataDirCreation(PathBuf, #[source] std::io::Error),

    #[error("failed to determine data directory")]
    DataDirResolution(#[source] std::io::Error),
}
