//! Listing query descriptor to SQLite SQL
//!
//! Produces a WHERE clause with `?` placeholders plus the values to bind, in
//! order. Column names come only from the fixed mappings below, never from
//! caller input.

use crate::domain::filters::{
    Criterion, ListingFlag, ListingOrder, ListingQuery, NumericColumn, SortColumn, TextColumn,
};

/// A value bound to one `?` placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Int(i64),
    Text(String),
}

/// Bind values collected while building a clause
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlParams {
    pub values: Vec<SqlValue>,
}

impl SqlParams {
    fn int(&mut self, value: i64) {
        self.values.push(SqlValue::Int(value));
    }

    fn texts(&mut self, values: &[String]) -> String {
        self.values
            .extend(values.iter().cloned().map(SqlValue::Text));
        placeholders(values.len())
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

fn text_column(column: TextColumn) -> &'static str {
    match column {
        TextColumn::Gender => "gender",
        TextColumn::District => "district",
        TextColumn::Nationality => "nationality",
        TextColumn::HairColor => "hair_color",
        TextColumn::BikiniZone => "bikini_zone",
    }
}

fn numeric_column(column: NumericColumn) -> &'static str {
    match column {
        NumericColumn::Age => "age",
        NumericColumn::Height => "height",
        NumericColumn::Weight => "weight",
        NumericColumn::BreastSize => "breast_size",
        NumericColumn::Price1Hour => "price_1_hour",
        NumericColumn::PriceExpress => "price_express",
    }
}

fn flag_column(flag: ListingFlag) -> &'static str {
    match flag {
        ListingFlag::Verified => "is_verified",
        ListingFlag::VerifiedPhotos => "has_verified_photos",
        ListingFlag::Video => "has_video",
        ListingFlag::Reviews => "has_reviews",
        ListingFlag::NonSmoking => "is_non_smoking",
        ListingFlag::New => "is_new",
        ListingFlag::WaitingCall => "is_waiting_call",
        ListingFlag::AroundTheClock => "is_24_hours",
        ListingFlag::Alone => "is_alone",
        ListingFlag::WithFriend => "with_friend",
        ListingFlag::WithFriends => "with_friends",
        ListingFlag::OutCall => "out_call",
    }
}

fn sort_column(column: SortColumn) -> &'static str {
    match column {
        SortColumn::CreatedAt => "created_at",
        SortColumn::Price1Hour => "price_1_hour",
        SortColumn::Age => "age",
    }
}

/// SQL fragment for one criterion. Empty value lists match everything.
pub fn criterion_to_sql(criterion: &Criterion, params: &mut SqlParams) -> String {
    match criterion {
        Criterion::In { values, .. } | Criterion::ServicesAny(values) if values.is_empty() => {
            "1=1".to_string()
        }
        Criterion::AnyFlag(flags) if flags.is_empty() => "1=1".to_string(),
        Criterion::In { column, values } => {
            format!("{} IN ({})", text_column(*column), params.texts(values))
        }
        Criterion::ServicesAny(values) => {
            // A services column that is not a JSON array never matches and never errors
            format!(
                "(CASE WHEN json_valid(services) AND json_type(services) = 'array' \
                 THEN EXISTS (SELECT 1 FROM json_each(services) WHERE json_each.value IN ({})) \
                 ELSE 0 END)",
                params.texts(values)
            )
        }
        Criterion::Between { column, min, max } => {
            params.int(*min);
            params.int(*max);
            format!("{} BETWEEN ? AND ?", numeric_column(*column))
        }
        Criterion::AtLeast { column, value } => {
            params.int(*value);
            format!("{} >= ?", numeric_column(*column))
        }
        Criterion::AtMost { column, value } => {
            params.int(*value);
            format!("{} <= ?", numeric_column(*column))
        }
        Criterion::Positive(column) => {
            let col = numeric_column(*column);
            format!("({} IS NOT NULL AND {} > 0)", col, col)
        }
        Criterion::AnyFlag(flags) => {
            let conditions: Vec<String> = flags
                .iter()
                .map(|f| format!("{} = 1", flag_column(*f)))
                .collect();
            format!("({})", conditions.join(" OR "))
        }
        Criterion::Flag(flag) => format!("{} = 1", flag_column(*flag)),
    }
}

/// WHERE clause (without the keyword) for a public search.
///
/// Inactive listings are excluded unconditionally.
pub fn build_public_where(query: &ListingQuery, params: &mut SqlParams) -> String {
    let mut clauses = vec!["is_active = 1".to_string()];

    if let Some(city_id) = query.city_id {
        params.int(city_id);
        clauses.push("city_id = ?".to_string());
    }

    clauses.extend(query.criteria.iter().map(|c| criterion_to_sql(c, params)));
    clauses.join(" AND ")
}

/// ORDER BY clause (without the keyword); `id` breaks ties in the same direction
pub fn order_by_sql(order: ListingOrder) -> String {
    let dir = if order.descending { "DESC" } else { "ASC" };
    format!("{} {}, id {}", sort_column(order.column), dir, dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_query_only_requires_active() {
        let mut params = SqlParams::default();
        let sql = build_public_where(&ListingQuery::default(), &mut params);
        assert_eq!(sql, "is_active = 1");
        assert!(params.values.is_empty());
    }

    #[test]
    fn test_city_and_price_window() {
        let query = ListingQuery {
            city_id: Some(1),
            criteria: vec![Criterion::Between {
                column: NumericColumn::Price1Hour,
                min: 3000,
                max: 5000,
            }],
            ..Default::default()
        };
        let mut params = SqlParams::default();
        let sql = build_public_where(&query, &mut params);

        assert_eq!(
            sql,
            "is_active = 1 AND city_id = ? AND price_1_hour BETWEEN ? AND ?"
        );
        assert_eq!(
            params.values,
            vec![SqlValue::Int(1), SqlValue::Int(3000), SqlValue::Int(5000)]
        );
    }

    #[test]
    fn test_in_clause() {
        let mut params = SqlParams::default();
        let sql = criterion_to_sql(
            &Criterion::In {
                column: TextColumn::HairColor,
                values: texts(&["blonde", "red"]),
            },
            &mut params,
        );
        assert_eq!(sql, "hair_color IN (?, ?)");
        assert_eq!(
            params.values,
            vec![SqlValue::Text("blonde".into()), SqlValue::Text("red".into())]
        );
    }

    #[test]
    fn test_services_any_is_guarded() {
        let mut params = SqlParams::default();
        let sql = criterion_to_sql(
            &Criterion::ServicesAny(texts(&["classic", "massage_thai"])),
            &mut params,
        );
        assert!(sql.starts_with("(CASE WHEN json_valid(services)"));
        assert!(sql.contains("json_each.value IN (?, ?)"));
        assert!(sql.ends_with("ELSE 0 END)"));
        assert_eq!(params.values.len(), 2);
    }

    #[test]
    fn test_flags() {
        let mut params = SqlParams::default();
        assert_eq!(
            criterion_to_sql(
                &Criterion::AnyFlag(vec![ListingFlag::Verified, ListingFlag::Video]),
                &mut params
            ),
            "(is_verified = 1 OR has_video = 1)"
        );
        assert_eq!(
            criterion_to_sql(&Criterion::Flag(ListingFlag::OutCall), &mut params),
            "out_call = 1"
        );
        assert_eq!(
            criterion_to_sql(
                &Criterion::Positive(NumericColumn::PriceExpress),
                &mut params
            ),
            "(price_express IS NOT NULL AND price_express > 0)"
        );
        assert!(params.values.is_empty());
    }

    #[test]
    fn test_empty_lists_match_everything() {
        let mut params = SqlParams::default();
        assert_eq!(
            criterion_to_sql(&Criterion::ServicesAny(vec![]), &mut params),
            "1=1"
        );
        assert_eq!(criterion_to_sql(&Criterion::AnyFlag(vec![]), &mut params), "1=1");
        assert!(params.values.is_empty());
    }

    #[test]
    fn test_order_by() {
        assert_eq!(
            order_by_sql(ListingOrder::default()),
            "created_at DESC, id DESC"
        );
        assert_eq!(
            order_by_sql(ListingOrder {
                column: SortColumn::Price1Hour,
                descending: false
            }),
            "price_1_hour ASC, id ASC"
        );
    }
}
