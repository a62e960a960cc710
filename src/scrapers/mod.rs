pub mod fetcher;
pub mod filter;
pub mod finn;
pub mod http;
pub mod traits;
pub mod types;

pub use fetcher::PaginatedFetcher;
pub use finn::{FinnRentalExtractor, FinnSaleExtractor, FinnSite};
pub use http::HttpPageSource;
pub use traits::{ListingExtractor, PageSource};
pub use types::{PropertyType, SearchParams};
