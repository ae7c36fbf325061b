// Handler-boundary error. Every variant ends up inside a response envelope;
// nothing here ever reaches the client as a bare HTTP error.
use serde_json::{json, Value};
use thiserror::Error;

use crate::auth::AuthError;
use crate::database::DatabaseError;
use crate::validation::FieldErrors;

/// Client-facing text for failures whose detail stays in the logs
pub const GENERIC_ERROR: &str = "An error occurred while processing your request";

#[derive(Debug, Error)]
pub enum ApiError {
    // 422 Unprocessable Entity
    #[error("validation failed: {0:?}")]
    Validation(FieldErrors),

    // 401 Unauthorized
    #[error("{0}")]
    Unauthorized(String),

    // 403 Forbidden
    #[error("{0}")]
    Forbidden(String),

    // 500 Internal Server Error
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    /// A single `field → reason` validation failure
    pub fn invalid_field(field: &str, reason: &str) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), reason.to_string());
        ApiError::Validation(errors)
    }

    /// Status carried in the envelope body
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Validation(_) => 422,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::Database(_) | ApiError::Auth(_) => 500,
        }
    }

    /// Envelope payload. Server-side failures only carry their detail when
    /// `expose_detail` is set.
    pub fn payload(&self, expose_detail: bool) -> Value {
        match self {
            ApiError::Validation(fields) => json!(fields),
            ApiError::Unauthorized(msg) | ApiError::Forbidden(msg) => json!(msg),
            ApiError::Database(_) | ApiError::Auth(_) if expose_detail => json!(self.to_string()),
            ApiError::Database(_) | ApiError::Auth(_) => json!(GENERIC_ERROR),
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_payload_is_the_field_map() {
        let err = ApiError::invalid_field("branch_id", "invalid");
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.payload(false), json!({ "branch_id": "invalid" }));
    }

    #[test]
    fn database_detail_is_hidden_unless_exposed() {
        let err = ApiError::from(DatabaseError::InvalidIdentifier("bad\"table".into()));
        assert_eq!(err.status_code(), 500);
        assert!(err.is_server_error());
        assert_eq!(err.payload(false), json!(GENERIC_ERROR));
        assert_eq!(err.payload(true), json!("Invalid identifier: bad\"table"));
    }

    #[test]
    fn auth_failures_carry_their_message() {
        assert_eq!(ApiError::unauthorized("Missing token").payload(false), json!("Missing token"));
        assert_eq!(ApiError::forbidden("Admins only").status_code(), 403);
    }
}
