pub mod daily_frame;
pub mod monthly_frame;

use crate::analysis::error::AnalysisError;
use polars::prelude::*;

pub(crate) fn frame_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, AnalysisError> {
    df.column(name)
        .map_err(|e| AnalysisError::ColumnNotFound(name.to_string(), e))
}

pub(crate) fn opt_f64(column: &Column, idx: usize) -> Option<f64> {
    column.f64().ok().and_then(|ca| ca.get(idx))
}

pub(crate) fn str_cell<'a>(column: &'a Column, idx: usize) -> Result<&'a str, AnalysisError> {
    column
        .str()
        .map_err(AnalysisError::Frame)?
        .get(idx)
        .ok_or_else(|| AnalysisError::UnexpectedNull {
            column: column.name().to_string(),
            row: idx,
        })
}
