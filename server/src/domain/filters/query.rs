//! Storage-neutral listing query descriptor
//!
//! Produced by the translator and consumed by a listing source. Nothing here
//! knows about SQL; the SQLite backend maps columns and flags to its own names.

/// Categorical listing attributes matched by set membership
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColumn {
    Gender,
    District,
    Nationality,
    HairColor,
    BikiniZone,
}

/// Numeric listing attributes matched by range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericColumn {
    Age,
    Height,
    Weight,
    BreastSize,
    Price1Hour,
    PriceExpress,
}

/// Boolean listing flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ListingFlag {
    Verified,
    VerifiedPhotos,
    Video,
    Reviews,
    NonSmoking,
    New,
    WaitingCall,
    AroundTheClock,
    Alone,
    WithFriend,
    WithFriends,
    OutCall,
}

/// One ANDed term of a listing query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    /// Column value is one of `values`
    In {
        column: TextColumn,
        values: Vec<String>,
    },
    /// Listing services array shares at least one tag with `values`
    ServicesAny(Vec<String>),
    /// Inclusive `min <= column <= max`
    Between {
        column: NumericColumn,
        min: i64,
        max: i64,
    },
    AtLeast {
        column: NumericColumn,
        value: i64,
    },
    AtMost {
        column: NumericColumn,
        value: i64,
    },
    /// Column is present and strictly positive
    Positive(NumericColumn),
    /// At least one of the flags is set
    AnyFlag(Vec<ListingFlag>),
    Flag(ListingFlag),
}

/// Sortable listing columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    CreatedAt,
    Price1Hour,
    Age,
}

impl SortColumn {
    /// API field names accepted by `orderBy`
    pub const ALLOWED: &'static [&'static str] = &["createdAt", "price1Hour", "age"];

    pub fn from_field(field: &str) -> Option<Self> {
        match field {
            "createdAt" => Some(Self::CreatedAt),
            "price1Hour" => Some(Self::Price1Hour),
            "age" => Some(Self::Age),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingOrder {
    pub column: SortColumn,
    pub descending: bool,
}

impl Default for ListingOrder {
    /// Newest first
    fn default() -> Self {
        Self {
            column: SortColumn::CreatedAt,
            descending: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: u32,
    pub offset: u32,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

pub const DEFAULT_PAGE_LIMIT: u32 = 100;
pub const MAX_PAGE_LIMIT: u32 = 500;

/// Complete description of one public listing search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub city_id: Option<i64>,
    pub criteria: Vec<Criterion>,
    pub order: ListingOrder,
    pub page: PageWindow,
}

impl ListingQuery {
    pub fn with_order(mut self, order: ListingOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_page(mut self, page: PageWindow) -> Self {
        self.page = page;
        self
    }
}
