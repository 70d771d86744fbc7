use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open readings database '{0}'")]
    Open(PathBuf, #[source] sqlx::Error),

    #[error("database operation failed")]
    Database(#[from] sqlx::Error),

    #[error("malformed value '{value}' in stored column '{column}'")]
    MalformedRow { column: String, value: String },

    #[error("failed to build export payload")]
    Payload(#[source] PolarsError),

    #[error("failed to write artifact '{0}'")]
    ArtifactIo(PathBuf, #[source] std::io::Error),

    #[error("failed to encode artifact '{0}'")]
    ArtifactEncode(PathBuf, #[source] PolarsError),
}
