pub mod branch;
pub mod user;

pub use branch::Branch;
pub use user::User;

use serde_json::{Map, Value};

use crate::database::query_builder::{Fields, Param};

/// Scalar request values as column text. Numbers are accepted for text
/// columns (zip codes arrive as either); objects, arrays and booleans are not.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Collect whitelisted columns present in a request body. An explicit `null`
/// clears the column; any other non-scalar value is skipped.
pub fn fields_from_body(body: &Map<String, Value>, columns: &[&'static str]) -> Fields {
    columns
        .iter()
        .filter_map(|column| match body.get(*column) {
            Some(Value::Null) => Some((*column, Param::Null)),
            Some(value) => scalar_text(value).map(|text| (*column, Param::Text(text))),
            None => None,
        })
        .collect()
}
