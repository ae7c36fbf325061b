// handlers/portal/users.rs - user listing and creation for signed-in callers

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use serde_json::{json, Map, Value};
use std::collections::HashMap;

use crate::auth::hash_password;
use crate::config;
use crate::database::models::{fields_from_body, User};
use crate::database::{Database, Param, SqlQuery};
use crate::error::ApiError;
use crate::filter::{keyset_query, KeysetPage};
use crate::handlers::utils::{body_map, query_map, text};
use crate::middleware::{AuthUser, Envelope, RequestMeta};
use crate::server::AppState;
use crate::validation;

/// GET /portal/users - keyset page of live users, newest first
pub async fn list(
    State(state): State<AppState>,
    meta: RequestMeta,
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Envelope {
    let result = match query_map(params) {
        Ok(params) => page(&state.db, params).await,
        Err(err) => Err(err),
    };
    Envelope::from_result(meta, "users", result)
}

/// POST /portal/users - create a user. Only admins choose the type; anyone
/// else creates a plain `user`.
pub async fn create(
    State(state): State<AppState>,
    meta: RequestMeta,
    Extension(caller): Extension<AuthUser>,
    body: Option<Json<Value>>,
) -> Envelope {
    let result = insert_user(&state.db, body_map(body), forced_type(&caller)).await;
    Envelope::from_result(meta, "user", result)
}

/// GET /portal/users-count - number of live users
pub async fn count(State(state): State<AppState>, meta: RequestMeta) -> Envelope {
    let result = count_live(&state.db).await;
    Envelope::from_result(meta, "count", result)
}

fn forced_type(caller: &AuthUser) -> Option<&'static str> {
    if caller.is_admin() {
        None
    } else {
        Some(User::DEFAULT_TYPE)
    }
}

async fn page(db: &Database, params: Map<String, Value>) -> Result<Vec<User>, ApiError> {
    let page = KeysetPage::from_params(&params, config::config().pagination.max_show)?;
    let query = keyset_query(&User::KEYSET, &page)?;
    Ok(db.select(&query).await?)
}

async fn count_live(db: &Database) -> Result<i64, ApiError> {
    let query = SqlQuery::count_live(User::TABLE)?;
    Ok(db.count(&query).await?)
}

/// Validate and store a user, returning the new id. `forced_type` overrides
/// whatever `type` the body carries.
pub(crate) async fn insert_user(
    db: &Database,
    mut body: Map<String, Value>,
    forced_type: Option<&str>,
) -> Result<i64, ApiError> {
    if let Some(user_type) = forced_type {
        body.insert("type".to_string(), json!(user_type));
    }

    let mut rules: Vec<_> = User::REQUIRED
        .iter()
        .map(|field| validation::required(&body, field))
        .collect();

    // Deleted accounts keep their email, so the lookup covers every row
    let email = text(&body, "email");
    if !email.is_empty() {
        let query = SqlQuery::find_by(User::TABLE, "email", email, false)?;
        let existing: Vec<Value> = db
            .select::<User>(&query)
            .await?
            .into_iter()
            .map(|user| json!({ "email": user.email }))
            .collect();
        rules.push(validation::unique(&body, &existing, "email"));
    }

    validation::check(rules).into_result()?;

    let mut fields = fields_from_body(&body, User::WRITABLE);
    fields.push(("password", Param::Text(hash_password(&text(&body, "password"))?)));

    // A concurrent insert can pass the lookup above; the constraint decides
    let id = match db.create(User::TABLE, fields).await {
        Ok(id) => id,
        Err(err) if err.is_unique_violation() => {
            tracing::debug!("Email taken by a concurrent insert");
            return Err(ApiError::invalid_field("email", "email is existing"));
        }
        Err(err) => return Err(err.into()),
    };
    tracing::info!(user_id = id, "Created user");
    Ok(id)
}
