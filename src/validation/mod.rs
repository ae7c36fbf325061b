//! Declarative request validation.
//!
//! Each rule looks at one field and reports `"valid"` or a failure reason;
//! [`check`] folds a batch of rules into a pass/fail verdict plus the map of
//! failing fields. Everything here is pure.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::database::models::scalar_text;
use crate::error::ApiError;

pub const VALID: &str = "valid";
pub const REQUIRED: &str = "required";

/// Failing field name → reason
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    pub key: String,
    pub value: String,
}

impl Rule {
    fn new(key: &str, value: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            value: value.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.value == VALID
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub pass: bool,
    pub result: FieldErrors,
}

impl Validation {
    pub fn into_result(self) -> Result<(), ApiError> {
        if self.pass {
            Ok(())
        } else {
            Err(ApiError::Validation(self.result))
        }
    }
}

/// The field must be present and truthy
pub fn required(data: &Map<String, Value>, field: &str) -> Rule {
    if data.get(field).is_some_and(is_truthy) {
        Rule::new(field, VALID)
    } else {
        Rule::new(field, REQUIRED)
    }
}

/// The field's value must not already appear in `existing`. Values compare as
/// text, so `1200` and `"1200"` collide. An absent field is never a duplicate.
pub fn unique<'a>(data: &Map<String, Value>, existing: impl IntoIterator<Item = &'a Value>, field: &str) -> Rule {
    let Some(wanted) = data.get(field).and_then(scalar_text) else {
        return Rule::new(field, VALID);
    };

    let taken = existing
        .into_iter()
        .any(|row| row.get(field).and_then(scalar_text).as_deref() == Some(wanted.as_str()));

    if taken {
        Rule::new(field, format!("{} is existing", field))
    } else {
        Rule::new(field, VALID)
    }
}

/// Fold rule results. `pass` is true iff no rule failed; `result` holds exactly
/// the failing keys. When a key fails more than once the last reason wins.
pub fn check(rules: impl IntoIterator<Item = Rule>) -> Validation {
    let result: FieldErrors = rules
        .into_iter()
        .filter(|rule| !rule.is_valid())
        .map(|rule| (rule.key, rule.value))
        .collect();

    Validation {
        pass: result.is_empty(),
        result,
    }
}

/// JSON truthiness: null, false, 0 and "" are falsy; everything else,
/// including empty arrays and objects, is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn required_reports_presence() {
        let data = map(json!({ "name": "Main", "city": "" }));
        assert_eq!(required(&data, "name"), Rule::new("name", "valid"));
        assert_eq!(required(&data, "city"), Rule::new("city", "required"));
        assert_eq!(required(&data, "state"), Rule::new("state", "required"));
    }

    #[test]
    fn falsy_values_count_as_missing() {
        let data = map(json!({ "a": null, "b": false, "c": 0, "d": "", "e": 0.0 }));
        for key in ["a", "b", "c", "d", "e"] {
            assert_eq!(required(&data, key).value, REQUIRED, "{}", key);
        }
        let truthy = map(json!({ "a": "0", "b": true, "c": 7, "d": [], "e": {} }));
        for key in ["a", "b", "c", "d", "e"] {
            assert!(required(&truthy, key).is_valid(), "{}", key);
        }
    }

    #[test]
    fn check_passes_when_everything_is_present() {
        let data = map(json!({ "direction": "next", "last": "0", "show": "10" }));
        let v = check(["direction", "last", "show"].map(|f| required(&data, f)));
        assert!(v.pass);
        assert!(v.result.is_empty());
    }

    #[test]
    fn check_collects_exactly_the_failures() {
        let data = map(json!({ "name": "Main" }));
        let fields = ["name", "zip_code", "city", "state", "opening", "closing"];
        let v = check(fields.map(|f| required(&data, f)));
        assert!(!v.pass);
        let expected: FieldErrors = ["zip_code", "city", "state", "opening", "closing"]
            .iter()
            .map(|f| (f.to_string(), "required".to_string()))
            .collect();
        assert_eq!(v.result, expected);
    }

    #[test]
    fn check_is_deterministic() {
        let data = map(json!({ "b": 1 }));
        let first = check(["a", "b", "c"].map(|f| required(&data, f)));
        let second = check(["a", "b", "c"].map(|f| required(&data, f)));
        assert_eq!(first, second);
    }

    #[test]
    fn unique_detects_existing_values() {
        let data = map(json!({ "email": "ada@example.com" }));
        let rows = vec![json!({ "email": "grace@example.com" }), json!({ "email": "ada@example.com" })];
        assert_eq!(unique(&data, &rows, "email").value, "email is existing");
        assert!(unique(&data, &rows[..1], "email").is_valid());
        assert!(unique(&map(json!({})), &rows, "email").is_valid());
    }

    #[test]
    fn unique_compares_loosely() {
        let data = map(json!({ "zip_code": 1200 }));
        let rows = vec![json!({ "zip_code": "1200" })];
        assert!(!unique(&data, &rows, "zip_code").is_valid());
    }

    #[test]
    fn failed_validation_converts_to_api_error() {
        let v = check([required(&map(json!({})), "name")]);
        assert!(matches!(v.into_result(), Err(ApiError::Validation(f)) if f["name"] == "required"));
    }
}
