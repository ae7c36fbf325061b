use anyhow::Context;
use tokio::net::TcpListener;

use revive_branch_api::{
    config,
    database::Database,
    logging,
    server::{self, AppState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL and friends
    let _ = dotenvy::dotenv();

    let config = config::config();
    logging::init_subscriber(&config.logging);
    tracing::info!("Starting branch service in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        tracing::warn!("SECURITY_JWT_SECRET is not set; authenticated routes will fail");
    }

    let db = Database::connect_lazy(config).context("failed to configure database pool")?;
    if let Err(e) = db.health_check().await {
        tracing::warn!("Database not reachable at startup: {}", e);
    }

    let app = server::app(AppState::new(db.clone()), &config.security);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Listening on http://{}", bind_addr);

    server::serve(listener, app, shutdown_signal()).await.context("server error")?;

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
