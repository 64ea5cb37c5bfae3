//! Filter state shape and domain bounds

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::catalog;

/// Fixed inclusive bounds a numeric range may span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeDomain {
    pub min: u32,
    pub max: u32,
}

pub const AGE_DOMAIN: RangeDomain = RangeDomain { min: 18, max: 70 };
pub const HEIGHT_DOMAIN: RangeDomain = RangeDomain { min: 140, max: 200 };
pub const WEIGHT_DOMAIN: RangeDomain = RangeDomain { min: 40, max: 120 };
pub const BREAST_SIZE_DOMAIN: RangeDomain = RangeDomain { min: 1, max: 6 };

/// Maximum length of a free-form categorical tag (gender, district, ...)
pub const MAX_TAG_LENGTH: usize = 64;

/// Inclusive `[min, max]` range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: u32,
    pub max: u32,
}

impl NumericRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// The range covering the whole domain (no constraint)
    pub const fn full(domain: RangeDomain) -> Self {
        Self {
            min: domain.min,
            max: domain.max,
        }
    }

    pub fn is_full(&self, domain: RangeDomain) -> bool {
        self.min == domain.min && self.max == domain.max
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn check(&self, field: &'static str, domain: RangeDomain) -> Result<(), FilterError> {
        if self.min > self.max {
            return Err(FilterError::InvertedRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        if self.min < domain.min || self.max > domain.max {
            return Err(FilterError::RangeOutOfBounds {
                field,
                min: self.min,
                max: self.max,
                lower: domain.min,
                upper: domain.max,
            });
        }
        Ok(())
    }
}

/// Physical appearance filters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Appearance {
    pub age: NumericRange,
    pub height: NumericRange,
    pub weight: NumericRange,
    pub breast_size: NumericRange,
    pub nationality: BTreeSet<String>,
    pub hair_color: BTreeSet<String>,
    pub bikini_zone: BTreeSet<String>,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            age: NumericRange::full(AGE_DOMAIN),
            height: NumericRange::full(HEIGHT_DOMAIN),
            weight: NumericRange::full(WEIGHT_DOMAIN),
            breast_size: NumericRange::full(BREAST_SIZE_DOMAIN),
            nationality: BTreeSet::new(),
            hair_color: BTreeSet::new(),
            bikini_zone: BTreeSet::new(),
        }
    }
}

/// One-hour price bounds plus the express requirement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriceFilter {
    pub from: Option<u32>,
    pub to: Option<u32>,
    pub has_express: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationTag {
    Verified,
    VerifiedPhotos,
    WithVideo,
    WithReviews,
}

impl VerificationTag {
    pub const ALL: [Self; 4] = [
        Self::Verified,
        Self::VerifiedPhotos,
        Self::WithVideo,
        Self::WithReviews,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::VerifiedPhotos => "verified_photos",
            Self::WithVideo => "with_video",
            Self::WithReviews => "with_reviews",
        }
    }
}

/// Availability and group-composition tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OtherTag {
    #[serde(rename = "non_smoking")]
    NonSmoking,
    #[serde(rename = "new")]
    New,
    #[serde(rename = "waiting_call")]
    WaitingCall,
    #[serde(rename = "24_hours")]
    AroundTheClock,
    #[serde(rename = "alone")]
    Alone,
    #[serde(rename = "with_friend")]
    WithFriend,
    #[serde(rename = "with_friends")]
    WithFriends,
}

impl OtherTag {
    pub const ALL: [Self; 7] = [
        Self::NonSmoking,
        Self::New,
        Self::WaitingCall,
        Self::AroundTheClock,
        Self::Alone,
        Self::WithFriend,
        Self::WithFriends,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NonSmoking => "non_smoking",
            Self::New => "new",
            Self::WaitingCall => "waiting_call",
            Self::AroundTheClock => "24_hours",
            Self::Alone => "alone",
            Self::WithFriend => "with_friend",
            Self::WithFriends => "with_friends",
        }
    }
}

macro_rules! tag_enum_str {
    ($ty:ty, $field:literal) => {
        impl FromStr for $ty {
            type Err = FilterError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .into_iter()
                    .find(|tag| tag.as_str() == s)
                    .ok_or_else(|| FilterError::UnknownTag {
                        field: $field,
                        value: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

tag_enum_str!(VerificationTag, "verification");
tag_enum_str!(OtherTag, "other");

/// The complete set of applied search criteria.
///
/// Treated as an immutable value: the store replaces it wholesale instead of
/// mutating nested fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub gender: BTreeSet<String>,
    pub appearance: Appearance,
    pub district: BTreeSet<String>,
    pub price: PriceFilter,
    pub services: BTreeSet<String>,
    pub verification: BTreeSet<VerificationTag>,
    pub other: BTreeSet<OtherTag>,
    pub outcall: bool,
}

impl FilterState {
    /// Check every invariant the translator relies on.
    ///
    /// Called at the edges (query parsing, draft commit in the editing UI);
    /// the store and translator assume a state that already passed.
    pub fn validate(&self) -> Result<(), FilterError> {
        let a = &self.appearance;
        a.age.check("age", AGE_DOMAIN)?;
        a.height.check("height", HEIGHT_DOMAIN)?;
        a.weight.check("weight", WEIGHT_DOMAIN)?;
        a.breast_size.check("breastSize", BREAST_SIZE_DOMAIN)?;

        if let (Some(from), Some(to)) = (self.price.from, self.price.to)
            && from > to
        {
            return Err(FilterError::InvertedPrice { from, to });
        }

        check_tags("gender", &self.gender)?;
        check_tags("district", &self.district)?;
        check_tags("nationality", &a.nationality)?;
        check_tags("hairColor", &a.hair_color)?;
        check_tags("bikiniZone", &a.bikini_zone)?;

        if let Some(unknown) = catalog::unknown_services(self.services.iter().map(String::as_str))
            .into_iter()
            .next()
        {
            return Err(FilterError::UnknownService(unknown.to_string()));
        }

        Ok(())
    }
}

fn check_tags(field: &'static str, tags: &BTreeSet<String>) -> Result<(), FilterError> {
    if tags
        .iter()
        .any(|t| t.trim().is_empty() || t.chars().count() > MAX_TAG_LENGTH)
    {
        return Err(FilterError::InvalidTag {
            field,
            max: MAX_TAG_LENGTH,
        });
    }
    Ok(())
}

/// Reasons a filter state is rejected before it reaches the store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("{field}: {min}-{max} must lie within {lower}-{upper}")]
    RangeOutOfBounds {
        field: &'static str,
        min: u32,
        max: u32,
        lower: u32,
        upper: u32,
    },

    #[error("{field}: min ({min}) must not exceed max ({max})")]
    InvertedRange {
        field: &'static str,
        min: u32,
        max: u32,
    },

    #[error("price: from ({from}) must not exceed to ({to})")]
    InvertedPrice { from: u32, to: u32 },

    #[error("services: unknown service '{0}'")]
    UnknownService(String),

    #[error("{field}: unknown tag '{value}'")]
    UnknownTag { field: &'static str, value: String },

    #[error("{field}: tags must be 1-{max} characters")]
    InvalidTag { field: &'static str, max: usize },

    #[error("{0}: group is not a tag set")]
    NotToggleable(&'static str),

    #[error("expected a {expected} change, got {actual}")]
    GroupMismatch {
        expected: &'static str,
        actual: &'static str,
    },
}
