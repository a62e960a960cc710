use crate::scrapers::traits::{ListingExtractor, PageSource};
use crate::scrapers::types::SearchParams;
use scraper::Html;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(1);

/// Listings read from a single result page
struct PageOutcome<L> {
    elements: usize,
    listings: Vec<L>,
}

/// Walks result pages one at a time until the cap is reached, a page comes
/// back empty, or a fetch fails
pub struct PaginatedFetcher {
    source: Arc<dyn PageSource>,
    page_delay: Duration,
}

impl PaginatedFetcher {
    pub fn new(source: Arc<dyn PageSource>) -> Self {
        Self::with_delay(source, DEFAULT_PAGE_DELAY)
    }

    pub fn with_delay(source: Arc<dyn PageSource>, page_delay: Duration) -> Self {
        Self { source, page_delay }
    }

    /// Collect up to `max_listings` listings from `base_url`.
    ///
    /// Never fails: whatever was gathered before a stop condition is returned.
    pub async fn fetch<E: ListingExtractor>(
        &self,
        base_url: &str,
        params: &SearchParams,
        max_listings: usize,
        extractor: &E,
    ) -> Vec<E::Listing> {
        let mut listings = Vec::new();
        let mut page: u32 = 1;

        while listings.len() < max_listings {
            let query = params.page_query(page);

            let html = match self.source.fetch_page(base_url, &query).await {
                Ok(html) => html,
                Err(e) => {
                    warn!("Error fetching {} listings on page {}: {:#}", extractor.kind(), page, e);
                    break;
                }
            };

            let outcome = read_page(&html, extractor, max_listings - listings.len());
            if outcome.elements == 0 {
                info!("No articles found on page {}. Ending pagination.", page);
                break;
            }

            info!(
                "Processed {} page {} with {} listings ({} kept)",
                extractor.kind(),
                page,
                outcome.elements,
                outcome.listings.len()
            );
            listings.extend(outcome.listings);
            page += 1;

            if listings.len() >= max_listings {
                break;
            }
            tokio::time::sleep(self.page_delay).await;
        }

        listings
    }
}

/// Parse one page and hand each listing element to the extractor.
///
/// Kept synchronous so the parsed document never lives across an await.
fn read_page<E: ListingExtractor>(html: &str, extractor: &E, remaining: usize) -> PageOutcome<E::Listing> {
    let document = Html::parse_document(html);
    let elements: Vec<_> = document.select(extractor.listing_selector()).collect();

    let mut listings = Vec::new();
    for element in &elements {
        if listings.len() >= remaining {
            break;
        }
        match extractor.extract(*element) {
            Ok(Some(listing)) => listings.push(listing),
            Ok(None) => {}
            Err(e) => debug!("Error parsing {} listing: {:#}", extractor.kind(), e),
        }
    }

    PageOutcome {
        elements: elements.len(),
        listings,
    }
}
