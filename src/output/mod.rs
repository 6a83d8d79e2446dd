//! Output module for exporting harvested listings
//!
//! This module handles:
//! - Building the column set of the exported table
//! - Naming the dated export file
//! - Writing the CSV export
//! - Summarising a completed run

mod csv_output;
pub mod stats;
mod traits;

pub use csv_output::{write_csv_file, CsvTableSink};
pub use stats::RunSummary;
pub use traits::{OutputError, OutputResult, TableSink};

use crate::record::ListingRecord;
use chrono::NaiveDate;
use indexmap::IndexSet;
use std::path::{Path, PathBuf};

/// Date format embedded in export file names
pub const FILE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Returns every key seen across `records`, in first-seen order
///
/// # Example
///
/// ```
/// use watch_harvest::output::column_union;
/// use watch_harvest::ListingRecord;
///
/// let a = ListingRecord::assemble("A".into(), vec![("Case".into(), "36mm".into())], "$1".into());
/// let b = ListingRecord::assemble("B".into(), vec![("Year".into(), "2020".into())], "$2".into());
/// assert_eq!(column_union(&[a, b]), vec!["name", "Case", "price", "Year"]);
/// ```
pub fn column_union(records: &[ListingRecord]) -> Vec<String> {
    let columns: IndexSet<&str> = records.iter().flat_map(|record| record.keys()).collect();
    columns.into_iter().map(str::to_string).collect()
}

/// Builds the export file name `<prefix>_<YYYY-MM-DD>.csv`
///
/// ```
/// use chrono::NaiveDate;
/// use watch_harvest::output::dated_file_name;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
/// assert_eq!(dated_file_name("watches", date), "watches_2024-03-09.csv");
/// ```
pub fn dated_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}_{}.csv", prefix, date.format(FILE_DATE_FORMAT))
}

/// Full path of the export for a run on `date`
pub fn export_path(directory: &Path, prefix: &str, date: NaiveDate) -> PathBuf {
    directory.join(dated_file_name(prefix, date))
}
