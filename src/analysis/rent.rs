use crate::models::RentalListing;

/// Keep only the ASCII digits and read them as a whole number, 0 when there are none
pub fn digits_value(text: &str) -> u64 {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// Rewrite rent and size as bare integers and attach the price per m².
///
/// Every input listing comes back, in order. Listings without a usable size
/// get a price per m² of `0.00`.
pub fn normalize_rentals(listings: Vec<RentalListing>) -> Vec<RentalListing> {
    listings.into_iter().map(normalize_rental).collect()
}

fn normalize_rental(mut listing: RentalListing) -> RentalListing {
    let rental_price = digits_value(&listing.rental_price_kr);
    let size = digits_value(&listing.size_m2);

    let price_per_sqm = if size > 0 {
        rental_price as f64 / size as f64
    } else {
        0.0
    };

    listing.rental_price_kr = rental_price.to_string();
    listing.size_m2 = size.to_string();
    listing.price_per_sqm = Some(format!("{price_per_sqm:.2}"));
    listing
}
