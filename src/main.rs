//! Watch-Harvest main entry point
//!
//! This is the command-line interface for the Watch-Harvest listing exporter.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use watch_harvest::config::{load_or_default, Config};
use watch_harvest::crawler::harvest;
use watch_harvest::output::stats::print_summary;
use watch_harvest::url::listing_url;

/// Watch-Harvest: a marketplace listing exporter
///
/// Watch-Harvest fetches every listing page of a marketplace category,
/// extracts one record per listing, and writes them to a dated CSV file.
#[derive(Parser, Debug)]
#[command(name = "watch-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A marketplace listing exporter", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Number of pages fetched concurrently
    #[arg(short, long, value_name = "N")]
    workers: Option<usize>,

    /// Directory the CSV export is written to
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show the resolved configuration without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }
    let config = match load_or_default(cli.config.as_deref())
        .and_then(|config| config.with_overrides(cli.workers, cli.output_dir.clone()))
    {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_harvest(config, cli.quiet).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("watch_harvest=info,warn"),
            1 => EnvFilter::new("watch_harvest=debug,info"),
            2 => EnvFilter::new("watch_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles the --dry-run mode: shows what would be harvested
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Watch-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Category: {}", config.site.category_path);
    println!("  Brand: {}", config.site.brand);
    println!("  Page size: {}", config.site.page_size);

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    match config.http.timeout_secs {
        Some(secs) => println!("  Timeout: {}s", secs),
        None => println!("  Timeout: none"),
    }

    println!("\nWorkers: {}", config.scraper.workers);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!("  File prefix: {}", config.output.file_prefix);

    println!("\nSelectors:");
    println!("  Container: {}", config.selectors.container);
    println!("  Listing: {}", config.selectors.listing);
    println!("  Name: {}", config.selectors.name);
    println!("  Info table: {}", config.selectors.info_table);
    println!("  Info cell: {}", config.selectors.info_cell);
    println!("  Price: {}", config.selectors.price);
    println!(
        "  Pagination: {} {}",
        config.selectors.pagination, config.selectors.pagination_link
    );

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would probe page count at {}",
        listing_url(&config.site, None)?
    );

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config, quiet: bool) -> Result<(), Box<dyn std::error::Error>> {
    match harvest(config).await {
        Ok(summary) => {
            if !quiet {
                print_summary(&summary);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
