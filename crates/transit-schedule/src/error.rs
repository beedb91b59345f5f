//! Error types for schedule loading.

use thiserror::Error;

/// Errors that can occur while building a [`crate::ScheduleIndex`].
///
/// Malformed rows are not errors; they are dropped and only show up in
/// [`crate::ScheduleStats::skipped_rows`].
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// The schedule source could not be opened or read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV reader failed (e.g. invalid UTF-8 or an unreadable header).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row.
    #[error("Required column '{column}' not found in schedule header")]
    MissingColumn { column: &'static str },
}
