use crate::analysis::rent::digits_value;
use crate::models::{RentalListing, SaleListing};
use serde::Serialize;
use tracing::info;

/// Sale listings annotated with estimated rent and yield
#[derive(Debug, Clone, PartialEq)]
pub struct YieldEstimate {
    pub sales: Vec<SaleListing>,
    /// Highest yield; the earliest listing wins a tie
    pub best_option: Option<SaleListing>,
    pub avg_rent_per_sqm: f64,
}

/// Aggregate figures for the landing-page highlights
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketSummary {
    pub avg_rent_per_sqm: f64,
    pub avg_asking_price: f64,
    pub avg_rental_price: f64,
    pub sale_count: usize,
    pub rental_count: usize,
}

/// Mean price per m² over rentals with a positive, readable value; 0 when none qualify
pub fn average_rent_per_sqm(rentals: &[RentalListing]) -> f64 {
    let valid: Vec<f64> = rentals
        .iter()
        .filter_map(|rental| rental.price_per_sqm.as_deref())
        .filter_map(|value| value.trim().parse::<f64>().ok())
        .filter(|value| *value > 0.0)
        .collect();

    mean(&valid)
}

/// Apply the rentals' average price per m² to every sale listing.
///
/// `rentals` should already have been through
/// [`normalize_rentals`](crate::analysis::rent::normalize_rentals).
pub fn estimate_yield(sales: Vec<SaleListing>, rentals: &[RentalListing]) -> YieldEstimate {
    let avg_rent_per_sqm = average_rent_per_sqm(rentals);
    info!(
        "Average Rent per m² from Rental Listings: {:.2} kr/m²",
        avg_rent_per_sqm
    );

    let sales: Vec<SaleListing> = sales
        .into_iter()
        .map(|sale| annotate(sale, avg_rent_per_sqm))
        .collect();

    let mut best: Option<(&SaleListing, f64)> = None;
    for sale in &sales {
        let yield_pct = yield_of(sale);
        match best {
            Some((_, best_yield)) if yield_pct <= best_yield => {}
            _ => best = Some((sale, yield_pct)),
        }
    }
    let best_option = best.map(|(sale, _)| sale.clone());

    YieldEstimate {
        sales,
        best_option,
        avg_rent_per_sqm,
    }
}

pub fn summarize(estimate: &YieldEstimate, rentals: &[RentalListing]) -> MarketSummary {
    let asking: Vec<f64> = estimate
        .sales
        .iter()
        .map(|sale| digits_value(&sale.price_kr) as f64)
        .collect();
    let rents: Vec<f64> = rentals
        .iter()
        .map(|rental| digits_value(&rental.rental_price_kr) as f64)
        .collect();

    MarketSummary {
        avg_rent_per_sqm: round2(estimate.avg_rent_per_sqm),
        avg_asking_price: mean(&asking).round(),
        avg_rental_price: mean(&rents).round(),
        sale_count: estimate.sales.len(),
        rental_count: rentals.len(),
    }
}

fn annotate(mut sale: SaleListing, avg_rent_per_sqm: f64) -> SaleListing {
    let size = digits_value(&sale.size_m2) as f64;
    let total_price = sale.total_price_kr.kr().unwrap_or(0) as f64;

    let estimated_rent = size * avg_rent_per_sqm;
    let annual_rent = estimated_rent * 12.0;
    let yield_pct = if total_price > 0.0 {
        annual_rent / total_price * 100.0
    } else {
        0.0
    };

    sale.estimated_rent_kr = Some(format!("{estimated_rent:.2}"));
    sale.annual_rent_kr = Some(format!("{annual_rent:.2}"));
    sale.yield_percentage = Some(format!("{yield_pct:.2}"));
    sale
}

/// Yield as published, so ranking matches the two-decimal figures
fn yield_of(sale: &SaleListing) -> f64 {
    sale.yield_percentage
        .as_deref()
        .and_then(|value| value.parse().ok())
        .unwrap_or(0.0)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
