//! # Textbook Catalogue
//!
//! A client for an open textbook repository's REST search API. Queries by
//! subject, keyword, contributing institution or free text are paged through
//! the API (at most 50 records per response) and flattened into one ordered
//! result set.
//!
//! ## Architecture
//!
//! - [`models`]: Search criteria, response pages and the aggregated result
//! - [`catalogue`]: URL construction, the pagination loop and the [`Catalogue`] trait
//! - [`utils`]: HTTP client, comma-separated value helpers and result rendering
//! - [`config`]: Configuration management

pub mod catalogue;
pub mod config;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use catalogue::{Catalogue, CatalogueFetcher, FetchError};
pub use models::{AggregatedResult, SearchCriteria, SearchMode};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
