use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const LAT: &str = "lat";
pub const LON: &str = "lon";
pub const RADIUS: &str = "radius";
pub const PROPERTY_TYPE: &str = "property_type";
pub const PAGE: &str = "page";

/// Radius used for rental searches when the sale search carried none
pub const DEFAULT_RENTAL_RADIUS: &str = "1000";

/// Sale-only filters that have no meaning on the lettings search
const SALE_ONLY_KEYS: [&str; 5] = [
    "ownership_type",
    "rent_to",
    "lifecycle",
    "total_price_kr",
    "fellesutgifter_kr",
];

/// Property type codes understood by the search endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    House,
    Duplex,
    #[default]
    Apartment,
    RowHouse,
}

impl PropertyType {
    pub fn code(&self) -> &'static str {
        match self {
            PropertyType::House => "1",
            PropertyType::Duplex => "2",
            PropertyType::Apartment => "3",
            PropertyType::RowHouse => "4",
        }
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code.trim() {
            "1" => Ok(PropertyType::House),
            "2" => Ok(PropertyType::Duplex),
            "3" => Ok(PropertyType::Apartment),
            "4" => Ok(PropertyType::RowHouse),
            other => Err(format!("unknown property type code '{other}'")),
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Query parameters sent verbatim to a search endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchParams(BTreeMap<String, String>);

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sale search around a point
    pub fn around(lat: &str, lon: &str, radius: u32, property_type: PropertyType) -> Self {
        let mut params = Self::new();
        params.insert(LAT, lat);
        params.insert(LON, lon);
        params.insert(RADIUS, radius.to_string());
        params.insert(PROPERTY_TYPE, property_type.code());
        params
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Query pairs for one result page
    pub fn page_query(&self, page: u32) -> Vec<(String, String)> {
        let mut query: Vec<(String, String)> = self
            .0
            .iter()
            .filter(|(key, _)| key.as_str() != PAGE)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        query.push((PAGE.to_string(), page.to_string()));
        query
    }

    /// Derive the equivalent lettings search from a sale search.
    ///
    /// The radius carries over (falling back to 1000 m), the property type is
    /// always the apartment code, and sale-only filters are dropped.
    pub fn to_rental_params(&self) -> SearchParams {
        let mut rental = self.clone();

        let radius = self
            .get(RADIUS)
            .filter(|radius| !radius.is_empty())
            .unwrap_or(DEFAULT_RENTAL_RADIUS)
            .to_string();
        rental.insert(RADIUS, radius);
        rental.insert(PROPERTY_TYPE, PropertyType::Apartment.code());

        for key in SALE_ONLY_KEYS {
            rental.remove(key);
        }

        rental
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SearchParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}
