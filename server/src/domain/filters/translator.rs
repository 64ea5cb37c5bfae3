//! FilterState to listing query translation

use std::collections::BTreeSet;

use super::query::{Criterion, ListingFlag, ListingQuery, NumericColumn, TextColumn};
use super::schema::{
    AGE_DOMAIN, BREAST_SIZE_DOMAIN, FilterState, HEIGHT_DOMAIN, NumericRange, OtherTag,
    RangeDomain, VerificationTag, WEIGHT_DOMAIN,
};

/// Build the query descriptor for a filter state.
///
/// Pure and total. Groups are ANDed, tags within a group are ORed, and a group
/// left at its default contributes nothing. Order and page use their defaults;
/// callers override them with [`ListingQuery::with_order`] / [`ListingQuery::with_page`].
pub fn translate(state: &FilterState, city_id: Option<i64>) -> ListingQuery {
    let mut criteria = Vec::new();
    let appearance = &state.appearance;

    push_in(&mut criteria, TextColumn::Gender, &state.gender);

    push_range(&mut criteria, NumericColumn::Age, appearance.age, AGE_DOMAIN);
    push_range(&mut criteria, NumericColumn::Height, appearance.height, HEIGHT_DOMAIN);
    push_range(&mut criteria, NumericColumn::Weight, appearance.weight, WEIGHT_DOMAIN);
    push_range(
        &mut criteria,
        NumericColumn::BreastSize,
        appearance.breast_size,
        BREAST_SIZE_DOMAIN,
    );
    push_in(&mut criteria, TextColumn::Nationality, &appearance.nationality);
    push_in(&mut criteria, TextColumn::HairColor, &appearance.hair_color);
    push_in(&mut criteria, TextColumn::BikiniZone, &appearance.bikini_zone);

    push_in(&mut criteria, TextColumn::District, &state.district);

    let price = NumericColumn::Price1Hour;
    match (state.price.from, state.price.to) {
        (Some(min), Some(max)) => criteria.push(Criterion::Between {
            column: price,
            min: min.into(),
            max: max.into(),
        }),
        (Some(value), None) => criteria.push(Criterion::AtLeast {
            column: price,
            value: value.into(),
        }),
        (None, Some(value)) => criteria.push(Criterion::AtMost {
            column: price,
            value: value.into(),
        }),
        (None, None) => {}
    }
    if state.price.has_express {
        criteria.push(Criterion::Positive(NumericColumn::PriceExpress));
    }

    if !state.services.is_empty() {
        criteria.push(Criterion::ServicesAny(
            state.services.iter().cloned().collect(),
        ));
    }

    if !state.verification.is_empty() {
        criteria.push(Criterion::AnyFlag(
            state.verification.iter().map(|t| verification_flag(*t)).collect(),
        ));
    }
    if !state.other.is_empty() {
        criteria.push(Criterion::AnyFlag(
            state.other.iter().map(|t| other_flag(*t)).collect(),
        ));
    }

    if state.outcall {
        criteria.push(Criterion::Flag(ListingFlag::OutCall));
    }

    ListingQuery {
        city_id,
        criteria,
        ..Default::default()
    }
}

fn push_in(criteria: &mut Vec<Criterion>, column: TextColumn, values: &BTreeSet<String>) {
    if !values.is_empty() {
        criteria.push(Criterion::In {
            column,
            values: values.iter().cloned().collect(),
        });
    }
}

fn push_range(
    criteria: &mut Vec<Criterion>,
    column: NumericColumn,
    range: NumericRange,
    domain: RangeDomain,
) {
    if !range.is_full(domain) {
        criteria.push(Criterion::Between {
            column,
            min: range.min.into(),
            max: range.max.into(),
        });
    }
}

fn verification_flag(tag: VerificationTag) -> ListingFlag {
    match tag {
        VerificationTag::Verified => ListingFlag::Verified,
        VerificationTag::VerifiedPhotos => ListingFlag::VerifiedPhotos,
        VerificationTag::WithVideo => ListingFlag::Video,
        VerificationTag::WithReviews => ListingFlag::Reviews,
    }
}

fn other_flag(tag: OtherTag) -> ListingFlag {
    match tag {
        OtherTag::NonSmoking => ListingFlag::NonSmoking,
        OtherTag::New => ListingFlag::New,
        OtherTag::WaitingCall => ListingFlag::WaitingCall,
        OtherTag::AroundTheClock => ListingFlag::AroundTheClock,
        OtherTag::Alone => ListingFlag::Alone,
        OtherTag::WithFriend => ListingFlag::WithFriend,
        OtherTag::WithFriends => ListingFlag::WithFriends,
    }
}
