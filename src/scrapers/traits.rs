use anyhow::Result;
use async_trait::async_trait;
use scraper::{ElementRef, Selector};

/// Source of search-result HTML.
///
/// Any non-success response or transport failure is an `Err`.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch one search-result page as HTML
    async fn fetch_page(&self, url: &str, query: &[(String, String)]) -> Result<String>;
}

/// Reads one listing out of a search-result page.
///
/// Everything that depends on the site's markup lives behind this trait so the
/// HTML contract can change without touching normalization or estimation.
pub trait ListingExtractor: Send + Sync {
    type Listing: Send;

    /// Selector matching each listing element on a result page
    fn listing_selector(&self) -> &Selector;

    /// `Ok(None)` for listings that are filtered out; `Err` for listings that
    /// could not be read. Neither should stop the page.
    fn extract(&self, element: ElementRef<'_>) -> Result<Option<Self::Listing>>;

    /// Name used in log lines
    fn kind(&self) -> &'static str;
}
