//! Output sink trait and error types
//!
//! This module defines the trait interface for table sinks, the destinations
//! the aggregated listing records are exported to.

use crate::record::ListingRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A destination for the aggregated record table
///
/// Implementations receive the whole result set at once. Columns are the
/// union of record keys in first-seen order; a record missing a column gets
/// an empty cell.
pub trait TableSink {
    /// Writes every record as one table
    fn write_table(&mut self, records: &[ListingRecord]) -> OutputResult<()>;
}
