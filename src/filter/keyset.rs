use serde_json::{Map, Value};

use super::types::{Direction, KeysetPage, KeysetSpec};
use crate::database::models::scalar_text;
use crate::database::query_builder::{quote_identifier, Param, SqlQuery};
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::validation::{self, FieldErrors};

impl KeysetPage {
    /// Validate `direction`, `last` and `show` from query parameters.
    ///
    /// `last` is deliberately permissive: anything that is not a number acts
    /// as cursor 0, giving an empty page going forward and everything going
    /// back. `show` must be a positive integer and is capped at `max_show`.
    pub fn from_params(params: &Map<String, Value>, max_show: i64) -> Result<Self, ApiError> {
        validation::check([
            validation::required(params, "direction"),
            validation::required(params, "last"),
            validation::required(params, "show"),
        ])
        .into_result()?;

        let text = |key: &str| params.get(key).and_then(scalar_text).unwrap_or_default();

        let direction = Direction::parse(&text("direction"));

        let show = match text("show").trim().parse::<i64>() {
            Ok(n) if n > 0 => n.min(max_show.max(1)),
            _ => {
                let mut errors = FieldErrors::new();
                errors.insert("show".to_string(), "invalid".to_string());
                return Err(ApiError::Validation(errors));
            }
        };

        Ok(Self {
            direction,
            last: parse_cursor(&text("last"), direction),
            show,
            name: text("name"),
            find: text("find"),
        })
    }
}

/// Integer cursor equivalent to comparing against the raw value. Rounding
/// towards the comparison keeps `order < 5.5` and `order < 6` identical for
/// integer order values; the `as` cast saturates infinities and maps NaN to 0.
fn parse_cursor(raw: &str, direction: Direction) -> i64 {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<i64>() {
        return n;
    }
    match raw.parse::<f64>() {
        Ok(f) => match direction {
            Direction::Next => f.ceil() as i64,
            Direction::Previous => f.floor() as i64,
        },
        Err(_) => 0,
    }
}

/// Build the page query:
///
/// ```sql
/// SELECT * FROM "t" WHERE "deleted_at" IS NULL
///   AND (<name columns> ILIKE $1) AND (<find columns> ILIKE $2)
///   AND "created_at_order" < $3
///   ORDER BY "created_at_order" DESC LIMIT $4
/// ```
pub fn keyset_query(spec: &KeysetSpec, page: &KeysetPage) -> Result<SqlQuery, DatabaseError> {
    let mut query = SqlQuery::new("");

    let name_placeholder = query.bind(contains_pattern(&page.name));
    let name_group = ilike_group(spec.name_columns, &name_placeholder)?;

    let find_placeholder = query.bind(contains_pattern(&page.find));
    let find_group = ilike_group(spec.find_columns, &find_placeholder)?;

    let order_column = quote_identifier(spec.order_column)?;
    let last = query.bind(Param::Int(page.last));
    let show = query.bind(Param::Int(page.show));

    query.sql = format!(
        "SELECT * FROM {table} WHERE \"deleted_at\" IS NULL AND ({name}) AND ({find}) \
         AND {order} {op} {last} ORDER BY {order} DESC LIMIT {show}",
        table = quote_identifier(spec.table)?,
        name = name_group,
        find = find_group,
        order = order_column,
        op = page.direction.to_sql(),
        last = last,
        show = show,
    );
    Ok(query)
}

fn ilike_group(columns: &[&str], placeholder: &str) -> Result<String, DatabaseError> {
    let parts = columns
        .iter()
        .map(|column| Ok(format!("{} ILIKE {} ESCAPE '\\'", quote_identifier(column)?, placeholder)))
        .collect::<Result<Vec<_>, DatabaseError>>()?;
    if parts.is_empty() {
        return Ok("TRUE".to_string());
    }
    Ok(parts.join(" OR "))
}

/// `%term%` with LIKE metacharacters escaped, so the term matches literally
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
