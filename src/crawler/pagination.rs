//! Page count discovery
//!
//! The first listing page carries a pagination control whose anchors are
//! page numbers (plus "Next"/"Previous" style links). The largest number is
//! the page count.

use crate::crawler::fetcher::fetch_page;
use crate::crawler::parser::{stripped_text, ListingSelectors};
use crate::HarvestError;
use reqwest::Client;
use scraper::Html;

/// Reads the page count from first-page markup
///
/// # Errors
///
/// Returns `HarvestError::Parse` if the pagination control is missing, none
/// of its anchors is a page number, or a page number does not fit in a `u32`.
///
/// # Example
///
/// ```
/// use watch_harvest::config::SelectorConfig;
/// use watch_harvest::crawler::{parse_page_count, ListingSelectors};
///
/// let selectors = ListingSelectors::compile(&SelectorConfig::default()).unwrap();
/// let html = r#"<ul class="pagination"><li><a>1</a></li><li><a>2</a></li><li><a>10</a></li><li><a>Next</a></li></ul>"#;
/// assert_eq!(parse_page_count(html, &selectors).unwrap(), 10);
/// ```
pub fn parse_page_count(html: &str, selectors: &ListingSelectors) -> Result<u32, HarvestError> {
    let document = Html::parse_document(html);

    let pagination = document
        .select(&selectors.pagination)
        .next()
        .ok_or_else(|| HarvestError::parse("pagination", "pagination control not found"))?;

    let mut last_page = None;
    for anchor in pagination.select(&selectors.pagination_link) {
        if let Some(page) = parse_page_number(&stripped_text(anchor))? {
            last_page = last_page.max(Some(page));
        }
    }

    last_page.ok_or_else(|| HarvestError::parse("pagination", "no numeric page links found"))
}

/// Parses anchor text consisting only of decimal digits
///
/// Returns `Ok(None)` for text that is not a page number at all, such as
/// "Next". A digit string too large for a `u32` is an error.
fn parse_page_number(text: &str) -> Result<Option<u32>, HarvestError> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return Ok(None);
    }
    text.parse().map(Some).map_err(|_| {
        HarvestError::parse("pagination", format!("page number out of range: {}", text))
    })
}

/// Fetches the first listing page and returns the page count
pub async fn probe_page_count(
    client: &Client,
    url: &str,
    selectors: &ListingSelectors,
) -> Result<u32, HarvestError> {
    tracing::debug!("Probing page count at {}", url);
    let body = fetch_page(client, url).await?;
    parse_page_count(&body, selectors)
}
