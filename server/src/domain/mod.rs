//! Domain logic for the listings directory
//!
//! - `catalog` - static services catalog
//! - `filters` - filter state, store and query translation
//! - `search` - filter commits driving listing queries

pub mod catalog;
pub mod filters;
pub mod search;

pub use filters::{FilterState, FilterStore, ListingQuery, translate};
pub use search::{ListingSource, SearchResults, SearchSession, SearchStatus};
