//! Configuration module for Watch-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every value has a built-in default, so a configuration file is optional.
//!
//! # Example
//!
//! ```no_run
//! use watch_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Harvesting brand: {}", config.site.brand);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, HttpConfig, OutputConfig, ScraperConfig, SelectorConfig, SiteConfig,
    DEFAULT_USER_AGENT, DEFAULT_WORKERS,
};

// Re-export parser functions
pub use parser::{load_config, load_or_default, parse_config};
pub use validation::validate;
