use serde::Deserialize;

/// Default browser identification sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36";

/// Default number of pages fetched concurrently
pub const DEFAULT_WORKERS: usize = 16;

/// Main configuration structure for Watch-Harvest
///
/// Every section is optional; a missing section falls back to the built-in
/// marketplace defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub http: HttpConfig,
    pub scraper: ScraperConfig,
    pub output: OutputConfig,
    pub selectors: SelectorConfig,
}

/// Marketplace listing endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Scheme and host of the marketplace
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the category listing page, relative to the base URL
    #[serde(rename = "category-path")]
    pub category_path: String,

    /// Value of the `man` (manufacturer) query parameter
    pub brand: String,

    /// Value of the `pageSize` query parameter
    #[serde(rename = "page-size")]
    pub page_size: u32,

    /// Value of the `resultview` query parameter
    #[serde(rename = "result-view")]
    pub result_view: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.chrono24.com".to_string(),
            category_path: "rolex/index.htm".to_string(),
            brand: "rolex".to_string(),
            page_size: 120,
            result_view: "list".to_string(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Optional whole-request timeout; unset means the client default (none)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: None,
        }
    }
}

/// Worker pool configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Maximum number of pages in flight at once
    pub workers: usize,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the CSV export is written to
    pub directory: String,

    /// File name prefix; the run date and `.csv` are appended
    #[serde(rename = "file-prefix")]
    pub file_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            file_prefix: "watches".to_string(),
        }
    }
}

/// CSS selectors describing the listing page markup
///
/// Class signatures use exact attribute matches (`[class="..."]`) so that an
/// element whose class list is a superset of another's is not picked up by
/// mistake.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Element holding every listing on the page
    pub container: String,

    /// One listing, relative to the container
    pub listing: String,

    /// Listing title, relative to a listing
    pub name: String,

    /// Key/value table, relative to a listing
    #[serde(rename = "info-table")]
    pub info_table: String,

    /// One `key: value` cell, relative to the info table
    #[serde(rename = "info-cell")]
    pub info_cell: String,

    /// Listing price, relative to a listing
    pub price: String,

    /// Pagination control on the first page
    pub pagination: String,

    /// Page links, relative to the pagination control
    #[serde(rename = "pagination-link")]
    pub pagination_link: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            container: "div#wt-watches".to_string(),
            listing: r#"div[class="media-flex-body d-flex flex-column justify-content-between"]"#
                .to_string(),
            name: r#"div[class="text-xlg text-bold text-ellipsis"]"#.to_string(),
            info_table: r#"div[class="d-none d-sm-flex flex-wrap m-b-2"]"#.to_string(),
            info_cell: "div.w-50".to_string(),
            price: r#"div[class="text-xlg text-bold"]"#.to_string(),
            pagination: "ul.pagination".to_string(),
            pagination_link: "a".to_string(),
        }
    }
}
