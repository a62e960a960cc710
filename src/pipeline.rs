//! The listings query: validate a point search, fetch sales and rentals
//! around it, and estimate yield for every sale.

use crate::analysis::{estimate_yield, normalize_rentals, summarize, MarketSummary};
use crate::error::QueryError;
use crate::models::{RentalListing, SaleListing};
use crate::scrapers::{FinnSite, PaginatedFetcher, PropertyType, SearchParams};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const MIN_RADIUS: u32 = 100;
pub const MAX_RADIUS: u32 = 1000;

/// Raw query string of `GET /listings`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingsQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub radius: Option<String>,
    pub property_type: Option<String>,
}

/// A query that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedQuery {
    pub lat: String,
    pub lon: String,
    pub radius: u32,
    pub property_type: PropertyType,
}

impl ListingsQuery {
    pub fn validate(&self, default_radius: u32) -> Result<ValidatedQuery, QueryError> {
        let (Some(lat), Some(lon)) = (present(&self.lat), present(&self.lon)) else {
            return Err(QueryError::MissingCoordinates);
        };
        check_coordinate(lat, 90.0)?;
        check_coordinate(lon, 180.0)?;

        let radius = match present(&self.radius) {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|radius| (MIN_RADIUS..=MAX_RADIUS).contains(radius))
                .ok_or(QueryError::InvalidRadius)?,
            None => default_radius,
        };

        let property_type = match present(&self.property_type) {
            Some(code) => code
                .parse::<PropertyType>()
                .map_err(|_| QueryError::InvalidPropertyType(code.to_string()))?,
            None => PropertyType::default(),
        };

        Ok(ValidatedQuery {
            lat: lat.to_string(),
            lon: lon.to_string(),
            radius,
            property_type,
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

fn check_coordinate(raw: &str, bound: f64) -> Result<(), QueryError> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value.abs() <= bound => Ok(()),
        _ => Err(QueryError::InvalidCoordinate(raw.to_string())),
    }
}

/// Body of a successful listings query
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingsResponse {
    pub buy_listings: Vec<SaleListing>,
    pub rental_listings: Vec<RentalListing>,
    pub best_option: Option<SaleListing>,
    pub summary: MarketSummary,
    pub generated_at: DateTime<Utc>,
}

impl ListingsResponse {
    pub fn empty() -> Self {
        Self {
            buy_listings: Vec::new(),
            rental_listings: Vec::new(),
            best_option: None,
            summary: MarketSummary {
                avg_rent_per_sqm: 0.0,
                avg_asking_price: 0.0,
                avg_rental_price: 0.0,
                sale_count: 0,
                rental_count: 0,
            },
            generated_at: Utc::now(),
        }
    }
}

/// Runs sale and rental searches against the site and combines them
pub struct ListingsService {
    fetcher: PaginatedFetcher,
    site: FinnSite,
    max_listings: usize,
}

impl ListingsService {
    pub fn new(fetcher: PaginatedFetcher, site: FinnSite, max_listings: usize) -> Self {
        Self {
            fetcher,
            site,
            max_listings,
        }
    }

    pub async fn search(&self, query: &ValidatedQuery) -> Result<ListingsResponse> {
        let sale_params = SearchParams::around(&query.lat, &query.lon, query.radius, query.property_type);

        info!(
            "Searching sale listings around {},{} within {} m",
            query.lat, query.lon, query.radius
        );
        let sales = self
            .fetcher
            .fetch(
                &self.site.sale_search_url()?,
                &sale_params,
                self.max_listings,
                &self.site.sale_extractor(),
            )
            .await;
        if sales.is_empty() {
            info!("No sale listings found");
            return Ok(ListingsResponse::empty());
        }

        let rental_params = sale_params.to_rental_params();
        let rentals = self
            .fetcher
            .fetch(
                &self.site.rental_search_url()?,
                &rental_params,
                self.max_listings,
                &self.site.rental_extractor(),
            )
            .await;
        if rentals.is_empty() {
            info!("No rental listings found");
            return Ok(ListingsResponse::empty());
        }

        let rentals = normalize_rentals(rentals);
        let estimate = estimate_yield(sales, &rentals);
        let summary = summarize(&estimate, &rentals);

        info!(
            "Estimated yield for {} sale listings from {} rentals",
            estimate.sales.len(),
            rentals.len()
        );

        Ok(ListingsResponse {
            buy_listings: estimate.sales,
            rental_listings: rentals,
            best_option: estimate.best_option,
            summary,
            generated_at: Utc::now(),
        })
    }
}
