//! URL construction for marketplace listing pages
//!
//! Listing pages share one endpoint and differ only in the `showpage` query
//! parameter. The first page is requested without it.

use crate::config::SiteConfig;
use url::Url;

/// Query parameter selecting the page number
pub const PAGE_PARAM: &str = "showpage";

/// Builds the listing URL for the given page
///
/// `None` produces the bare category URL used to probe the page count.
///
/// # Examples
///
/// ```
/// use watch_harvest::config::SiteConfig;
/// use watch_harvest::url::listing_url;
///
/// let site = SiteConfig::default();
/// let url = listing_url(&site, Some(3)).unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://www.chrono24.com/rolex/index.htm?man=rolex&pageSize=120&resultview=list&showpage=3"
/// );
/// ```
pub fn listing_url(site: &SiteConfig, page: Option<u32>) -> Result<Url, url::ParseError> {
    let mut base = Url::parse(&site.base_url)?;

    // Url::join drops the last path segment unless it ends with a slash
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    let mut url = base.join(site.category_path.trim_start_matches('/'))?;
    url.set_query(None);

    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("man", &site.brand)
            .append_pair("pageSize", &site.page_size.to_string())
            .append_pair("resultview", &site.result_view);
        if let Some(page) = page {
            query.append_pair(PAGE_PARAM, &page.to_string());
        }
    }

    Ok(url)
}
