//! Crawler module for listing page fetching and processing
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching without retries
//! - Page count discovery from the pagination control
//! - Listing extraction from page markup
//! - Overall harvest coordination

mod coordinator;
mod fetcher;
mod pagination;
mod parser;

pub use coordinator::{run_harvest, Coordinator};
pub use fetcher::{build_http_client, fetch_page};
pub use pagination::{parse_page_count, probe_page_count};
pub use parser::{extract_listings, split_info_cell, stripped_text, ListingSelectors};

use crate::config::Config;
use crate::output::RunSummary;
use crate::HarvestError;

/// Runs a complete harvest operation
///
/// This is the main entry point for starting a harvest. It will:
/// 1. Build the HTTP client and compile the selectors
/// 2. Probe the first page for the page count
/// 3. Fetch and parse every page with bounded concurrency
/// 4. Write the dated CSV export
///
/// # Returns
///
/// * `Ok(RunSummary)` - Harvest completed and the export was written
/// * `Err(HarvestError)` - Harvest failed; no export was written
pub async fn harvest(config: Config) -> Result<RunSummary, HarvestError> {
    run_harvest(config).await
}
