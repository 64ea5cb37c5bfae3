//! SQLite repositories
//!
//! Types (Listing, City, etc.) should be imported from `crate::data::types`.

pub mod city;
pub mod listing;

pub use city::{
    create_city, delete_city, get_city, list_cities, list_districts, replace_districts,
    update_city,
};
pub use listing::{
    count_for_city, create_listing, delete_listing, get_listing, list_listings, search_listings,
    toggle_active, toggle_verified, update_listing,
};
