// error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Fatal failures of the visualization pipeline.
///
/// "Nothing to do" outcomes (no plottable numeric columns, an empty category,
/// an all-missing column) are not errors; they are reported through
/// [`crate::viz_utils::VizOutcome`] or skipped with a diagnostic so that the
/// rest of the run can proceed.
#[derive(Debug, Error)]
pub enum VizError {
    /// The input path does not exist. Aborts the whole run, no partial output.
    #[error("source file not found: {0}")]
    SourceNotFound(PathBuf),

    /// The input parsed to zero usable rows or columns.
    #[error("no usable rows or columns in: {0}")]
    EmptyData(PathBuf),

    #[error("csv parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Wraps failures raised by the chart backend while drawing or writing.
    #[error("render error: {0}")]
    Render(String),
}
