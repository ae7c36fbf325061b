use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query,
    },
    Json,
};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::database::models::scalar_text;
use crate::error::ApiError;

/// Request body as a field map. A missing or non-object body is empty, so
/// validation reports every required field instead of a parse failure.
pub fn body_map(body: Option<Json<Value>>) -> Map<String, Value> {
    match body {
        Some(Json(Value::Object(map))) => map,
        _ => Map::new(),
    }
}

/// Query string as a field map of strings. An undecodable query string is
/// a validation failure rather than axum's plain-text rejection.
pub fn query_map(params: Result<Query<HashMap<String, String>>, QueryRejection>) -> Result<Map<String, Value>, ApiError> {
    let Query(params) = params.map_err(|rejection| {
        tracing::debug!("Rejected query string: {}", rejection);
        ApiError::invalid_field("query", "invalid")
    })?;
    Ok(params.into_iter().map(|(key, value)| (key, Value::String(value))).collect())
}

/// Scalar field as text, empty when absent
pub fn text(data: &Map<String, Value>, field: &str) -> String {
    data.get(field).and_then(scalar_text).unwrap_or_default()
}

/// Path id from a raw segment. Segments axum cannot decode are reported
/// the same way as non-numeric ones.
pub fn path_id(field: &str, path: Result<Path<String>, PathRejection>) -> Result<i64, ApiError> {
    match path {
        Ok(Path(raw)) => parse_id(field, &raw),
        Err(rejection) => {
            tracing::debug!("Rejected {} path segment: {}", field, rejection);
            Err(ApiError::invalid_field(field, "invalid"))
        }
    }
}

/// Positive integer path id, otherwise `{<field>: "invalid"}`
pub fn parse_id(field: &str, raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::invalid_field(field, "invalid"))
}
