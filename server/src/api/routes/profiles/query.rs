//! Query-string form of the public listing filter

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::api::types::{ApiError, OrderBy};
use crate::domain::filters::query::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use crate::domain::filters::schema::{
    AGE_DOMAIN, BREAST_SIZE_DOMAIN, HEIGHT_DOMAIN, RangeDomain, WEIGHT_DOMAIN,
};
use crate::domain::filters::{
    Appearance, FilterError, FilterState, ListingOrder, ListingQuery, NumericRange, OtherTag,
    PageWindow, PriceFilter, SortColumn, VerificationTag, translate,
};

/// `GET /profiles` parameters. Set fields are comma-separated; a missing
/// range bound falls back to its domain bound.
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProfilesQuery {
    #[validate(range(min = 1, message = "City id must be positive"))]
    pub city_id: Option<i64>,

    pub gender: Option<String>,
    pub district: Option<String>,
    pub nationality: Option<String>,
    pub hair_color: Option<String>,
    pub bikini_zone: Option<String>,
    pub services: Option<String>,
    pub verification: Option<String>,
    pub other: Option<String>,

    pub age_min: Option<u32>,
    pub age_max: Option<u32>,
    pub height_min: Option<u32>,
    pub height_max: Option<u32>,
    pub weight_min: Option<u32>,
    pub weight_max: Option<u32>,
    pub breast_size_min: Option<u32>,
    pub breast_size_max: Option<u32>,

    pub price_from: Option<u32>,
    pub price_to: Option<u32>,
    pub has_express: Option<bool>,
    pub outcall: Option<bool>,

    /// `createdAt`, `price1Hour` or `age`, optionally suffixed `:asc`/`:desc`
    pub order_by: Option<String>,

    #[validate(range(min = 1, max = MAX_PAGE_LIMIT, message = "Limit must be 1-500"))]
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ProfilesQuery {
    /// Parse into a validated filter state
    pub fn filter_state(&self) -> Result<FilterState, FilterError> {
        let state = FilterState {
            gender: csv(&self.gender),
            appearance: Appearance {
                age: range(self.age_min, self.age_max, AGE_DOMAIN),
                height: range(self.height_min, self.height_max, HEIGHT_DOMAIN),
                weight: range(self.weight_min, self.weight_max, WEIGHT_DOMAIN),
                breast_size: range(self.breast_size_min, self.breast_size_max, BREAST_SIZE_DOMAIN),
                nationality: csv(&self.nationality),
                hair_color: csv(&self.hair_color),
                bikini_zone: csv(&self.bikini_zone),
            },
            district: csv(&self.district),
            price: PriceFilter {
                from: self.price_from,
                to: self.price_to,
                has_express: self.has_express.unwrap_or(false),
            },
            services: csv(&self.services),
            verification: parse_tags::<VerificationTag>(&self.verification)?,
            other: parse_tags::<OtherTag>(&self.other)?,
            outcall: self.outcall.unwrap_or(false),
        };
        state.validate()?;
        Ok(state)
    }

    /// Build the repository query: filter criteria, order and page window
    pub fn to_listing_query(&self) -> Result<ListingQuery, ApiError> {
        let state = self.filter_state()?;

        let order = match &self.order_by {
            Some(raw) => {
                let order_by = OrderBy::parse(raw, SortColumn::ALLOWED)?;
                let column = SortColumn::from_field(&order_by.column).ok_or_else(|| {
                    ApiError::bad_request("INVALID_ORDER_COLUMN", "Unsupported order column")
                })?;
                ListingOrder {
                    column,
                    descending: order_by.is_descending(),
                }
            }
            None => ListingOrder::default(),
        };

        let page = PageWindow {
            limit: self.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
            offset: self.offset.unwrap_or(0),
        };

        Ok(translate(&state, self.city_id)
            .with_order(order)
            .with_page(page))
    }
}

fn csv(raw: &Option<String>) -> BTreeSet<String> {
    raw.as_deref()
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_tags<T>(raw: &Option<String>) -> Result<BTreeSet<T>, FilterError>
where
    T: FromStr<Err = FilterError> + Ord,
{
    csv(raw).iter().map(|t| t.parse()).collect()
}

fn range(min: Option<u32>, max: Option<u32>, domain: RangeDomain) -> NumericRange {
    NumericRange::new(min.unwrap_or(domain.min), max.unwrap_or(domain.max))
}
