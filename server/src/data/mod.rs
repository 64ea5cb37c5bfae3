//! Data storage layer
//!
//! - `sqlite` - listing store (listings, cities, districts)
//! - `cache` - in-memory cache for reference data
//! - `types` - row and domain data types
//! - `traits` - repository trait used by the API
//! - `error` - unified error type

pub mod cache;
pub mod error;
pub mod sqlite;
pub mod traits;
pub mod types;

pub use error::DataError;
pub use sqlite::SqliteService;
pub use traits::DirectoryRepository;
