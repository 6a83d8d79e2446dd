//! Harvest coordinator - main orchestration logic
//!
//! This module drives one harvest run:
//! - Probing the first page for the page count
//! - Fetching and parsing every page with bounded concurrency
//! - Merging per-page records into one result set
//! - Writing the dated CSV export

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::pagination::probe_page_count;
use crate::crawler::parser::{extract_listings, ListingSelectors};
use crate::output::{export_path, write_csv_file, RunSummary};
use crate::record::ListingRecord;
use crate::state::{RunState, RunTracker};
use crate::url::listing_url;
use crate::HarvestError;
use chrono::Local;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::path::Path;
use std::time::Instant;

/// Timestamp format of the start-of-run log line
const START_TIME_FORMAT: &str = "%m/%d/%y %H:%M:%S";

/// Main harvest coordinator structure
pub struct Coordinator {
    config: Config,
    client: Client,
    selectors: ListingSelectors,
    tracker: RunTracker,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The harvest configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - Selectors failed to compile or the HTTP
    ///   client could not be built
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let selectors = ListingSelectors::compile(&config.selectors)?;
        let client = build_http_client(&config.http)?;

        Ok(Self {
            config,
            client,
            selectors,
            tracker: RunTracker::new(),
        })
    }

    /// Current phase of the run
    pub fn state(&self) -> RunState {
        self.tracker.state()
    }

    /// Runs the harvest to completion
    ///
    /// The first error from the probe, any page, or the export aborts the
    /// run. Records gathered before the failure are discarded and no export
    /// file is written.
    ///
    /// A coordinator runs once; calling this again after it returns fails
    /// with `HarvestError::InvalidTransition`.
    pub async fn run(&mut self) -> Result<RunSummary, HarvestError> {
        let result = self.run_phases().await;
        if let Err(e) = &result {
            // A finished run rejects the restart without touching its state
            if !self.tracker.state().is_terminal() {
                tracing::error!("Harvest aborted during {}: {}", self.tracker.state(), e);
                self.tracker.fail();
            }
        }
        result
    }

    async fn run_phases(&mut self) -> Result<RunSummary, HarvestError> {
        self.tracker.advance(RunState::ProbingPageCount)?;

        let started_at = Local::now();
        let start_time = Instant::now();

        tracing::info!(
            "Starting harvest as of {}",
            started_at.format(START_TIME_FORMAT)
        );
        tracing::info!("Using {} workers", self.config.scraper.workers);

        let pages = self.probe().await?;
        tracing::info!(
            "Found {} pages to scrape from {}",
            pages,
            self.config.site.base_url
        );

        self.tracker.advance(RunState::FetchingPages)?;
        let records = self.fetch_all(pages).await?;

        self.tracker.advance(RunState::Writing)?;
        let output_path = export_path(
            Path::new(&self.config.output.directory),
            &self.config.output.file_prefix,
            started_at.date_naive(),
        );
        write_csv_file(&records, &output_path)?;
        tracing::info!(
            "Wrote {} records to {}",
            records.len(),
            output_path.display()
        );

        self.tracker.advance(RunState::Done)?;

        let summary = RunSummary {
            pages,
            records: records.len(),
            elapsed: start_time.elapsed(),
            output_path,
        };
        tracing::info!("{}", summary.message());

        Ok(summary)
    }

    /// Fetches the first page and returns the page count
    pub async fn probe(&self) -> Result<u32, HarvestError> {
        let url = listing_url(&self.config.site, None)?;
        probe_page_count(&self.client, url.as_str(), &self.selectors).await
    }

    /// Fetches and parses pages `1..=pages`, at most `workers` at a time
    ///
    /// Records are appended in the order pages complete, not page order.
    /// Page URLs are built as each page is scheduled.
    pub async fn fetch_all(&self, pages: u32) -> Result<Vec<ListingRecord>, HarvestError> {
        let mut results = stream::iter(1..=pages)
            .map(|page| self.scrape_page(page))
            .buffer_unordered(self.config.scraper.workers);

        let mut records = Vec::new();
        while let Some(result) = results.next().await {
            records.extend(result?);
        }

        Ok(records)
    }

    /// Fetches one page and extracts its listings
    async fn scrape_page(&self, page: u32) -> Result<Vec<ListingRecord>, HarvestError> {
        let url = listing_url(&self.config.site, Some(page))?;
        tracing::info!("Scraping page {}", page);

        let body = fetch_page(&self.client, url.as_str()).await?;
        let records = extract_listings(&body, &self.selectors, &format!("page {}", page))?;

        tracing::info!(
            "Finished scraping page {} ({} listings)",
            page,
            records.len()
        );
        Ok(records)
    }
}

/// Runs a complete harvest with the given configuration
///
/// # Example
///
/// ```no_run
/// use watch_harvest::config::Config;
/// use watch_harvest::crawler::run_harvest;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = run_harvest(Config::default()).await?;
/// println!("{} listings", summary.records);
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(config: Config) -> Result<RunSummary, HarvestError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
