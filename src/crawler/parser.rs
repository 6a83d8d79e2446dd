//! HTML extractor for marketplace listing pages
//!
//! This module turns the markup of one listing page into flat records:
//! - Locates the listing container
//! - Finds every listing inside it
//! - Extracts the name, the key/value info table and the price of each listing

use crate::config::SelectorConfig;
use crate::record::ListingRecord;
use crate::{ConfigError, HarvestError};
use scraper::{ElementRef, Html, Selector};

/// Compiled form of [`SelectorConfig`]
#[derive(Debug, Clone)]
pub struct ListingSelectors {
    pub container: Selector,
    pub listing: Selector,
    pub name: Selector,
    pub info_table: Selector,
    pub info_cell: Selector,
    pub price: Selector,
    pub pagination: Selector,
    pub pagination_link: Selector,
}

impl ListingSelectors {
    /// Compiles every selector of the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSelector` naming the first selector that
    /// fails to parse.
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            container: compile_selector(&config.container)?,
            listing: compile_selector(&config.listing)?,
            name: compile_selector(&config.name)?,
            info_table: compile_selector(&config.info_table)?,
            info_cell: compile_selector(&config.info_cell)?,
            price: compile_selector(&config.price)?,
            pagination: compile_selector(&config.pagination)?,
            pagination_link: compile_selector(&config.pagination_link)?,
        })
    }
}

fn compile_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

/// Extracts every listing on a page
///
/// A page whose container holds no listings yields an empty list.
///
/// # Arguments
///
/// * `html` - The page markup
/// * `selectors` - Compiled extraction rules
/// * `source` - Page identifier used in error messages
///
/// # Errors
///
/// Returns `HarvestError::Parse` if the container is missing, or if any
/// listing lacks its name, info table or price, or has an info cell without
/// a colon.
///
/// # Example
///
/// ```
/// use watch_harvest::config::SelectorConfig;
/// use watch_harvest::crawler::{extract_listings, ListingSelectors};
///
/// let selectors = ListingSelectors::compile(&SelectorConfig::default()).unwrap();
/// let html = r#"<html><body><div id="wt-watches"></div></body></html>"#;
/// let records = extract_listings(html, &selectors, "page 1").unwrap();
/// assert!(records.is_empty());
/// ```
pub fn extract_listings(
    html: &str,
    selectors: &ListingSelectors,
    source: &str,
) -> Result<Vec<ListingRecord>, HarvestError> {
    let document = Html::parse_document(html);

    let container = document
        .select(&selectors.container)
        .next()
        .ok_or_else(|| HarvestError::parse(source, "listing container not found"))?;

    container
        .select(&selectors.listing)
        .enumerate()
        .map(|(index, listing)| {
            extract_listing(listing, selectors).map_err(|message| {
                HarvestError::parse(format!("{}, listing {}", source, index + 1), message)
            })
        })
        .collect()
}

/// Extracts one record from a listing element
fn extract_listing(
    listing: ElementRef<'_>,
    selectors: &ListingSelectors,
) -> Result<ListingRecord, String> {
    let name = listing
        .select(&selectors.name)
        .next()
        .map(stripped_text)
        .ok_or("name element not found")?;

    let info = extract_info(listing, selectors)?;

    let price = listing
        .select(&selectors.price)
        .next()
        .map(stripped_text)
        .ok_or("price element not found")?;

    Ok(ListingRecord::assemble(name, info, price))
}

/// Extracts the key/value cells of a listing's info table, in document order
fn extract_info(
    listing: ElementRef<'_>,
    selectors: &ListingSelectors,
) -> Result<Vec<(String, String)>, String> {
    let table = listing
        .select(&selectors.info_table)
        .next()
        .ok_or("info table not found")?;

    table
        .select(&selectors.info_cell)
        .map(|cell| {
            let text = stripped_text(cell);
            split_info_cell(&text)
                .ok_or_else(|| format!("info cell '{}' has no key/value separator", text))
        })
        .collect()
}

/// Splits an info cell on its first colon into a trimmed (key, value) pair
///
/// Values may contain colons themselves, so only the first one separates.
///
/// ```
/// use watch_harvest::crawler::split_info_cell;
///
/// assert_eq!(
///     split_info_cell("Ref: AB-12:34"),
///     Some(("Ref".to_string(), "AB-12:34".to_string()))
/// );
/// assert_eq!(split_info_cell("no separator"), None);
/// ```
pub fn split_info_cell(text: &str) -> Option<(String, String)> {
    text.split_once(':')
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
}

/// Text of an element with every text node trimmed and empty nodes dropped
pub fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
