//! Shared data types for the listing store

mod directory;
mod listing;

pub use directory::{City, District};
pub use listing::{Listing, ListingFields, ListingRow};
