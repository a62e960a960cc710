//! Rental-yield estimates for homes for sale around a point, built from
//! the sale and lettings searches of a classifieds site.

pub mod analysis;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod scrapers;
pub mod server;

pub use config::Config;
pub use error::QueryError;
pub use pipeline::{ListingsQuery, ListingsResponse, ListingsService};
