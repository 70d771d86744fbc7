use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("failed processing observation frame")]
    Frame(#[from] PolarsError),

    #[error("required column '{0}' missing from frame")]
    ColumnNotFound(String, #[source] PolarsError),

    #[error("unexpected null in column '{column}' at row {row}")]
    UnexpectedNull { column: String, row: usize },

    #[error("could not parse '{value}' in column '{column}'")]
    MalformedCell { column: String, value: String },
}
