// handlers/admin/branches.rs - branch writes, admin tokens only

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use serde_json::{Map, Value};

use crate::database::models::{fields_from_body, Branch};
use crate::database::Database;
use crate::error::ApiError;
use crate::handlers::utils::{body_map, path_id};
use crate::middleware::{Envelope, RequestMeta};
use crate::server::AppState;
use crate::validation::{self, Validation};

/// POST /admin/branches - returns the new branch id
pub async fn create(
    State(state): State<AppState>,
    meta: RequestMeta,
    body: Option<Json<Value>>,
) -> Envelope {
    let result = insert(&state.db, body_map(body)).await;
    Envelope::from_result(meta, "branch", result)
}

/// PUT /admin/branches/:branch_id - returns rows affected, 0 for deleted or unknown ids
pub async fn update(
    State(state): State<AppState>,
    meta: RequestMeta,
    branch_id: Result<Path<String>, PathRejection>,
    body: Option<Json<Value>>,
) -> Envelope {
    let result = replace(&state.db, path_id("branch_id", branch_id), body_map(body)).await;
    Envelope::from_result(meta, "updated", result)
}

/// DELETE /admin/branches/:branch_id - soft delete, returns rows affected
pub async fn delete(
    State(state): State<AppState>,
    meta: RequestMeta,
    branch_id: Result<Path<String>, PathRejection>,
) -> Envelope {
    let result = match path_id("branch_id", branch_id) {
        Ok(id) => remove(&state.db, id).await,
        Err(err) => Err(err),
    };
    Envelope::from_result(meta, "deleted", result)
}

fn required_fields(body: &Map<String, Value>) -> Validation {
    validation::check(Branch::REQUIRED.iter().map(|field| validation::required(body, field)))
}

async fn insert(db: &Database, body: Map<String, Value>) -> Result<i64, ApiError> {
    required_fields(&body).into_result()?;

    let id = db.create(Branch::TABLE, fields_from_body(&body, Branch::WRITABLE)).await?;
    tracing::info!(branch_id = id, "Created branch");
    Ok(id)
}

async fn replace(
    db: &Database,
    branch_id: Result<i64, ApiError>,
    body: Map<String, Value>,
) -> Result<u64, ApiError> {
    let mut validation = required_fields(&body);

    // Report a bad id alongside any missing fields
    let id = match branch_id {
        Ok(id) => id,
        Err(ApiError::Validation(invalid)) => {
            validation.result.extend(invalid);
            return Err(ApiError::Validation(validation.result));
        }
        Err(other) => return Err(other),
    };
    validation.into_result()?;

    Ok(db.update(Branch::TABLE, id, fields_from_body(&body, Branch::WRITABLE)).await?)
}

async fn remove(db: &Database, id: i64) -> Result<u64, ApiError> {
    let deleted = db.delete(Branch::TABLE, id).await?;
    if deleted == 0 {
        tracing::debug!(branch_id = id, "Delete matched no live branch");
    }
    Ok(deleted)
}
