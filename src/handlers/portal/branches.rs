// handlers/portal/branches.rs - branch reads for signed-in callers

use axum::extract::{
    rejection::{PathRejection, QueryRejection},
    Path, Query, State,
};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::config;
use crate::database::models::Branch;
use crate::database::{Database, SqlQuery};
use crate::error::ApiError;
use crate::filter::{keyset_query, KeysetPage};
use crate::handlers::utils::{path_id, query_map};
use crate::middleware::{Envelope, RequestMeta};
use crate::server::AppState;

/// GET /portal/branches - keyset page filtered by `name` and `find`
///
/// `direction=next` walks towards older rows (`created_at_order < last`),
/// anything else towards newer ones. Either way rows come back newest first.
pub async fn list(
    State(state): State<AppState>,
    meta: RequestMeta,
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Envelope {
    let result = match query_map(params) {
        Ok(params) => page(&state.db, params).await,
        Err(err) => Err(err),
    };
    Envelope::from_result(meta, "branches", result)
}

/// GET /portal/branches/all - every live branch, unpaginated
pub async fn all(State(state): State<AppState>, meta: RequestMeta) -> Envelope {
    let result = all_live(&state.db).await;
    Envelope::from_result(meta, "branches", result)
}

/// GET /portal/branches/:branch_id - one live branch, `null` when absent
pub async fn show(
    State(state): State<AppState>,
    meta: RequestMeta,
    branch_id: Result<Path<String>, PathRejection>,
) -> Envelope {
    let result = match path_id("branch_id", branch_id) {
        Ok(id) => find(&state.db, id).await,
        Err(err) => Err(err),
    };
    Envelope::from_result(meta, "branch", result)
}

async fn page(db: &Database, params: Map<String, Value>) -> Result<Vec<Branch>, ApiError> {
    let page = KeysetPage::from_params(&params, config::config().pagination.max_show)?;
    let query = keyset_query(&Branch::KEYSET, &page)?;
    Ok(db.select(&query).await?)
}

async fn all_live(db: &Database) -> Result<Vec<Branch>, ApiError> {
    let query = SqlQuery::all_live(Branch::TABLE)?;
    Ok(db.select(&query).await?)
}

async fn find(db: &Database, id: i64) -> Result<Option<Branch>, ApiError> {
    let query = SqlQuery::find_live(Branch::TABLE, id)?;
    Ok(db.select_optional(&query).await?)
}
