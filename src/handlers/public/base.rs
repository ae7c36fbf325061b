// handlers/public/base.rs - liveness and health endpoints

use axum::extract::State;
use chrono::Utc;
use serde_json::json;

use crate::middleware::{Envelope, RequestMeta};
use crate::server::AppState;

/// GET / - liveness, no database access
pub async fn base(meta: RequestMeta) -> Envelope {
    Envelope::success(
        meta,
        "message",
        json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// GET /health - database round trip
pub async fn health(State(state): State<AppState>, meta: RequestMeta) -> Envelope {
    let result = state
        .db
        .health_check()
        .await
        .map(|_| json!({ "database": "ok", "timestamp": Utc::now() }))
        .map_err(Into::into);

    Envelope::from_result(meta, "health", result)
}
