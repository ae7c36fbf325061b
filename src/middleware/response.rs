use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{request::Parts, Method, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::convert::Infallible;
use uuid::Uuid;

use super::auth::AuthUser;
use crate::config;
use crate::error::{ApiError, GENERIC_ERROR};
use crate::logging::{ERROR_CHANNEL, OUT_CHANNEL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(pub Uuid);

/// Request details carried into every log line
#[derive(Debug, Clone)]
pub struct RequestMeta {
    pub request_id: Uuid,
    pub method: Method,
    pub uri: Uri,
    pub user_id: Option<i64>,
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestMeta
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Middleware and handler share one id per request
        let request_id = match parts.extensions.get::<RequestId>() {
            Some(RequestId(id)) => *id,
            None => {
                let id = Uuid::new_v4();
                parts.extensions.insert(RequestId(id));
                id
            }
        };

        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| original.0.clone())
            .unwrap_or_else(|| parts.uri.clone());

        Ok(Self {
            request_id,
            method: parts.method.clone(),
            uri,
            user_id: parts.extensions.get::<AuthUser>().map(|user| user.id),
        })
    }
}

/// The fixed response shape: `{ "status": <code>, "<key>": <payload> }`.
///
/// The HTTP status is 200 regardless of outcome unless status mirroring is
/// configured; clients read `status` from the body.
#[derive(Debug)]
pub struct Envelope {
    pub status: u16,
    pub key: &'static str,
    pub payload: Value,
    pub meta: RequestMeta,
    /// Server-side failure text, logged but not necessarily sent
    detail: Option<String>,
}

impl Envelope {
    pub fn success(meta: RequestMeta, key: &'static str, payload: impl Serialize) -> Self {
        match serde_json::to_value(payload) {
            Ok(payload) => Self {
                status: 200,
                key,
                payload,
                meta,
                detail: None,
            },
            Err(e) => Self {
                status: 500,
                key: "error",
                payload: json!(GENERIC_ERROR),
                meta,
                detail: Some(format!("Failed to serialize response data: {}", e)),
            },
        }
    }

    pub fn failure(meta: RequestMeta, error: ApiError) -> Self {
        Self::failure_with(meta, error, config::config().api.expose_error_detail)
    }

    pub fn failure_with(meta: RequestMeta, error: ApiError, expose_detail: bool) -> Self {
        Self {
            status: error.status_code(),
            key: "error",
            payload: error.payload(expose_detail),
            meta,
            detail: error.is_server_error().then(|| error.to_string()),
        }
    }

    pub fn from_result<T: Serialize>(meta: RequestMeta, key: &'static str, result: Result<T, ApiError>) -> Self {
        match result {
            Ok(payload) => Self::success(meta, key, payload),
            Err(error) => Self::failure(meta, error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status < 400
    }

    pub fn body(&self) -> Value {
        let mut body = Map::new();
        body.insert("status".to_string(), json!(self.status));
        body.insert(self.key.to_string(), self.payload.clone());
        Value::Object(body)
    }

    /// Successes go to the out channel, failures to the error channel
    pub fn log(&self) {
        let meta = &self.meta;
        if self.is_success() {
            tracing::info!(
                target: OUT_CHANNEL,
                request_id = %meta.request_id,
                method = %meta.method,
                uri = %meta.uri,
                user_id = ?meta.user_id,
                status = self.status,
                key = self.key,
                "{}",
                self.body()
            );
        } else {
            tracing::error!(
                target: ERROR_CHANNEL,
                request_id = %meta.request_id,
                method = %meta.method,
                uri = %meta.uri,
                user_id = ?meta.user_id,
                status = self.status,
                key = self.key,
                detail = self.detail.as_deref().unwrap_or_default(),
                "{}",
                self.body()
            );
        }
    }

    pub fn into_response_with(self, mirror_status: bool) -> Response {
        self.log();

        let status = if mirror_status {
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        } else {
            StatusCode::OK
        };
        (status, Json(self.body())).into_response()
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        let mirror_status = config::config().api.mirror_status;
        self.into_response_with(mirror_status)
    }
}
