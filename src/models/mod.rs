use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Placeholder written for any field that is missing or could not be read
pub const NOT_AVAILABLE: &str = "N/A";

/// A kroner amount that serializes as a bare number, or as `"N/A"` when absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Amount {
    Kr(u64),
    #[default]
    NotAvailable,
}

impl Amount {
    /// Zero is treated as "not listed", the same as a missing amount.
    pub fn from_kr(value: u64) -> Self {
        if value > 0 {
            Amount::Kr(value)
        } else {
            Amount::NotAvailable
        }
    }

    pub fn kr(&self) -> Option<u64> {
        match self {
            Amount::Kr(value) => Some(*value),
            Amount::NotAvailable => None,
        }
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Amount::Kr(value) => serializer.serialize_u64(*value),
            Amount::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(value) => Amount::from_kr(value),
            Raw::Text(text) => text
                .trim()
                .parse::<u64>()
                .map(Amount::from_kr)
                .unwrap_or(Amount::NotAvailable),
        })
    }
}

/// A property offered for purchase
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaleListing {
    pub title: String,
    /// Absolute listing URL, the natural key of a listing
    pub listing_url: String,
    pub address: String,
    pub size_m2: String,
    pub price_kr: String,
    pub total_price_kr: Amount,
    pub fellesutgifter_kr: Amount,
    pub ownership_type: String,
    pub number_of_rooms: String,
    pub viewing_info: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_rent_kr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_rent_kr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yield_percentage: Option<String>,
}

/// A property offered for lease
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RentalListing {
    pub title: String,
    pub listing_url: String,
    pub address: String,
    pub size_m2: String,
    pub rental_price_kr: String,
    pub ownership_type: String,
    pub number_of_rooms: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_sqm: Option<String>,
}
