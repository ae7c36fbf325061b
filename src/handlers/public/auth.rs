// handlers/public/auth.rs - registration, login and token introspection

use axum::{extract::State, Extension, Json};
use serde_json::{json, Map, Value};

use crate::auth::{generate_jwt, verify_password, Claims};
use crate::config;
use crate::database::models::User;
use crate::database::{Database, SqlQuery};
use crate::error::ApiError;
use crate::handlers::portal::users::insert_user;
use crate::handlers::utils::{body_map, text};
use crate::middleware::{AuthUser, Envelope, RequestMeta};
use crate::server::AppState;
use crate::validation;

/// POST /register - self sign-up; the account type is always the default
pub async fn register(
    State(state): State<AppState>,
    meta: RequestMeta,
    body: Option<Json<Value>>,
) -> Envelope {
    let result = insert_user(&state.db, body_map(body), Some(User::DEFAULT_TYPE)).await;
    Envelope::from_result(meta, "user", result)
}

/// POST /login - exchange email and password for a bearer token
pub async fn login(
    State(state): State<AppState>,
    meta: RequestMeta,
    body: Option<Json<Value>>,
) -> Envelope {
    let result = issue_token(&state.db, body_map(body)).await;
    Envelope::from_result(meta, "token", result)
}

/// GET /authenticated - the caller's token claims
pub async fn authenticated(meta: RequestMeta, Extension(user): Extension<AuthUser>) -> Envelope {
    Envelope::success(meta, "user", user)
}

async fn issue_token(db: &Database, body: Map<String, Value>) -> Result<Value, ApiError> {
    validation::check([
        validation::required(&body, "email"),
        validation::required(&body, "password"),
    ])
    .into_result()?;

    let query = SqlQuery::find_by(User::TABLE, "email", text(&body, "email"), true)?;
    let user = match db.select_optional::<User>(&query).await? {
        Some(user) if verify_password(&text(&body, "password"), &user.password) => user,
        // Same answer for unknown email and wrong password
        _ => return Err(ApiError::unauthorized("Invalid credentials")),
    };

    let security = &config::config().security;
    let claims = Claims::new(&user, security.jwt_expiry_hours);
    let token = generate_jwt(&claims, &security.jwt_secret)?;

    tracing::info!(user_id = user.id, "Issued token");
    Ok(json!({ "token": token, "user": user }))
}
