pub mod rent;
pub mod yield_estimate;

pub use rent::normalize_rentals;
pub use yield_estimate::{estimate_yield, summarize, MarketSummary, YieldEstimate};
