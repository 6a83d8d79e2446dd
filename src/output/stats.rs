//! Run summary reporting
//!
//! This module provides the summary of a completed harvest run and its
//! human-readable rendering.

use std::path::PathBuf;
use std::time::Duration;

/// Summary of a completed harvest run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Number of listing pages fetched
    pub pages: u32,

    /// Number of records written
    pub records: usize,

    /// Wall-clock time from start to finished export
    pub elapsed: Duration,

    /// Path of the export file
    pub output_path: PathBuf,
}

impl RunSummary {
    /// Elapsed time split into whole minutes and remaining seconds
    pub fn minutes_and_seconds(&self) -> (u64, u64) {
        let secs = self.elapsed.as_secs();
        (secs / 60, secs % 60)
    }

    /// One-line completion message
    pub fn message(&self) -> String {
        let (minutes, seconds) = self.minutes_and_seconds();
        format!(
            "Harvest completed successfully, scraping {} listings from {} pages in {} minutes and {} seconds",
            self.records, self.pages, minutes, seconds
        )
    }
}

/// Prints a run summary to stdout in a formatted manner
pub fn print_summary(summary: &RunSummary) {
    let (minutes, seconds) = summary.minutes_and_seconds();

    println!("=== Harvest Summary ===\n");
    println!("  Pages fetched: {}", summary.pages);
    println!("  Listings exported: {}", summary.records);
    println!("  Elapsed: {}m {}s", minutes, seconds);
    println!("  Output: {}", summary.output_path.display());
}
