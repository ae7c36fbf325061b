use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::database::Database;
use crate::handlers::{admin, portal, public};
use crate::middleware::{require_admin, require_auth};

/// Shared per-request state. Cloning is cheap: the pool is reference counted.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

pub fn app(state: AppState, security: &SecurityConfig) -> Router {
    Router::new()
        .merge(public_routes())
        .nest("/portal", portal_routes())
        .nest("/admin", admin_routes())
        // /authenticated sits at the root but needs a token
        .merge(
            Router::new()
                .route("/authenticated", get(public::authenticated))
                .route_layer(middleware::from_fn(require_auth)),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&security.cors_origins)),
        )
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::base))
        .route("/health", get(public::health))
        .route("/register", post(public::register))
        .route("/login", post(public::login))
}

fn portal_routes() -> Router<AppState> {
    Router::new()
        .route("/branches", get(portal::branches::list))
        .route("/branches/all", get(portal::branches::all))
        .route("/branches/:branch_id", get(portal::branches::show))
        .route("/users", get(portal::users::list).post(portal::users::create))
        .route("/users-count", get(portal::users::count))
        .route_layer(middleware::from_fn(require_auth))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/branches", post(admin::branches::create))
        .route(
            "/branches/:branch_id",
            put(admin::branches::update).delete(admin::branches::delete),
        )
        // Outermost layer runs first: authenticate, then check the role
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn(require_auth))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|origin| origin == "*") {
        AllowOrigin::from(Any)
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
}

/// Serve until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> std::io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await
}
