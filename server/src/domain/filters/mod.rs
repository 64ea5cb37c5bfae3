//! Listing filter model
//!
//! - `schema` - filter state shape, bounds and validation
//! - `store` - single active state with group-wise atomic replacement
//! - `query` - storage-neutral query descriptor
//! - `translator` - state to descriptor

pub mod query;
pub mod schema;
pub mod store;
pub mod translator;

pub use query::{
    Criterion, ListingFlag, ListingOrder, ListingQuery, NumericColumn, PageWindow, SortColumn,
    TextColumn,
};
pub use schema::{
    Appearance, FilterError, FilterState, NumericRange, OtherTag, PriceFilter, VerificationTag,
};
pub use store::{FilterGroup, FilterStore, GroupChange, GroupDraft, Snapshot};
pub use translator::translate;
