use crate::models::{Amount, RentalListing, SaleListing, NOT_AVAILABLE};
use crate::scrapers::filter::is_unwanted;
use crate::scrapers::traits::ListingExtractor;
use anyhow::{Context, Result};
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

pub const DEFAULT_ORIGIN: &str = "https://www.finn.no";
const SALE_SEARCH_PATH: &str = "/realestate/homes/search.html";
const RENTAL_SEARCH_PATH: &str = "/realestate/lettings/search.html";

static ARTICLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article.sf-search-ad").unwrap());
static TITLE_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2.sf-realestate-heading a").unwrap());
static LOCATION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.sf-realestate-location span.text-s").unwrap());
static SIZE_PRICE_ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.flex.justify-between").unwrap());
static SPAN: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span").unwrap());
static DETAILS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.text-xs.s-text-subtle").unwrap());
static VIEWING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r"div.mt-8.sm\:ml-16 span").unwrap());

static TOTAL_PRICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Totalpris:\s*([\d\s]+) kr").unwrap());
static SHARED_COSTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Fellesutgifter:\s*([\d\s]+) kr").unwrap());
static FREEHOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Eier\s*\(Selveier\)").unwrap());
static BEDROOMS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\s+soverom").unwrap());

/// Search endpoints of the classifieds site
#[derive(Debug, Clone)]
pub struct FinnSite {
    origin: Url,
}

impl FinnSite {
    pub fn new(origin: &str) -> Result<Self> {
        let origin = Url::parse(origin).with_context(|| format!("Invalid site origin '{origin}'"))?;
        Ok(Self { origin })
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    pub fn sale_search_url(&self) -> Result<String> {
        self.endpoint(SALE_SEARCH_PATH)
    }

    pub fn rental_search_url(&self) -> Result<String> {
        self.endpoint(RENTAL_SEARCH_PATH)
    }

    pub fn sale_extractor(&self) -> FinnSaleExtractor {
        FinnSaleExtractor {
            origin: self.origin.clone(),
        }
    }

    pub fn rental_extractor(&self) -> FinnRentalExtractor {
        FinnRentalExtractor {
            origin: self.origin.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> Result<String> {
        Ok(self
            .origin
            .join(path)
            .with_context(|| format!("Failed to build search URL for {path}"))?
            .to_string())
    }
}

/// Fields shared by sale and rental result cards
struct CardBasics {
    title: String,
    listing_url: String,
    address: String,
    size_m2: String,
    price_kr: String,
    details: String,
}

/// Reads the parts of a card both searches have in common.
///
/// Returns `Ok(None)` for unwanted titles before touching any other field.
fn read_card(element: ElementRef<'_>, origin: &Url) -> Result<Option<CardBasics>> {
    let title_link = element.select(&TITLE_LINK).next();
    let title = title_link
        .map(text_of)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    if is_unwanted(&title) {
        debug!("Skipping unwanted listing: {}", title);
        return Ok(None);
    }

    let listing_url = match title_link.and_then(|link| link.value().attr("href")) {
        Some(href) => origin
            .join(href)
            .with_context(|| format!("Unusable listing href '{href}'"))?
            .to_string(),
        None => NOT_AVAILABLE.to_string(),
    };

    let address = first_text(element, &LOCATION).unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let (size_m2, price_kr) = match element.select(&SIZE_PRICE_ROW).next() {
        Some(row) => {
            let spans: Vec<ElementRef<'_>> = row.select(&SPAN).collect();
            let size = spans.first().map(|span| strip_unit(&text_of(*span), "m²"));
            let price = spans.last().map(|span| strip_unit(&text_of(*span), "kr"));
            (or_not_available(size), or_not_available(price))
        }
        None => (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string()),
    };

    let details = element
        .select(&DETAILS)
        .map(text_of)
        .collect::<String>()
        .replace(['\u{a0}', '\u{202f}'], " ");

    Ok(Some(CardBasics {
        title,
        listing_url,
        address,
        size_m2,
        price_kr,
        details,
    }))
}

/// Reads cards from the homes-for-sale search
#[derive(Debug, Clone)]
pub struct FinnSaleExtractor {
    origin: Url,
}

impl ListingExtractor for FinnSaleExtractor {
    type Listing = SaleListing;

    fn listing_selector(&self) -> &Selector {
        &ARTICLE
    }

    fn extract(&self, element: ElementRef<'_>) -> Result<Option<SaleListing>> {
        let Some(card) = read_card(element, &self.origin)? else {
            return Ok(None);
        };

        let ownership_type = if FREEHOLD.is_match(&card.details) {
            "Eier (Selveier)".to_string()
        } else {
            NOT_AVAILABLE.to_string()
        };

        let viewing_info = element
            .select(&VIEWING)
            .map(text_of)
            .collect::<String>()
            .trim()
            .to_string();

        Ok(Some(SaleListing {
            title: card.title,
            listing_url: card.listing_url,
            address: card.address,
            size_m2: card.size_m2,
            price_kr: card.price_kr,
            total_price_kr: captured_amount(&TOTAL_PRICE, &card.details),
            fellesutgifter_kr: captured_amount(&SHARED_COSTS, &card.details),
            ownership_type,
            number_of_rooms: bedrooms(&card.details),
            viewing_info: or_not_available(Some(viewing_info)),
            estimated_rent_kr: None,
            annual_rent_kr: None,
            yield_percentage: None,
        }))
    }

    fn kind(&self) -> &'static str {
        "sale"
    }
}

/// Reads cards from the lettings search
#[derive(Debug, Clone)]
pub struct FinnRentalExtractor {
    origin: Url,
}

impl ListingExtractor for FinnRentalExtractor {
    type Listing = RentalListing;

    fn listing_selector(&self) -> &Selector {
        &ARTICLE
    }

    fn extract(&self, element: ElementRef<'_>) -> Result<Option<RentalListing>> {
        let Some(card) = read_card(element, &self.origin)? else {
            return Ok(None);
        };

        let ownership_type = if card.details.contains("Leilighet") {
            "Leilighet".to_string()
        } else {
            NOT_AVAILABLE.to_string()
        };

        Ok(Some(RentalListing {
            title: card.title,
            listing_url: card.listing_url,
            address: card.address,
            size_m2: card.size_m2,
            rental_price_kr: card.price_kr,
            ownership_type,
            number_of_rooms: bedrooms(&card.details),
            price_per_sqm: None,
        }))
    }

    fn kind(&self) -> &'static str {
        "rental"
    }
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(text_of)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Drops all whitespace (including no-break variants) and the first unit suffix
fn strip_unit(text: &str, unit: &str) -> String {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    compact.replacen(unit, "", 1).trim().to_string()
}

fn or_not_available(value: Option<String>) -> String {
    value
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn captured_amount(pattern: &Regex, details: &str) -> Amount {
    pattern
        .captures(details)
        .and_then(|caps| caps.get(1))
        .map(|digits| {
            digits
                .as_str()
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
        })
        .and_then(|digits| digits.parse::<u64>().ok())
        .map(Amount::from_kr)
        .unwrap_or(Amount::NotAvailable)
}

fn bedrooms(details: &str) -> String {
    BEDROOMS
        .captures(details)
        .and_then(|caps| caps.get(1))
        .map(|count| count.as_str().to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
