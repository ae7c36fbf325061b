use chrono::FixedOffset;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::AppConfig;

/// Errors from the data-access layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("No writable columns supplied for {0}")]
    EmptyData(String),

    #[error("Unknown migration statement: {0}")]
    UnknownStatement(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// A write rejected by a UNIQUE constraint
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DatabaseError::Sqlx(sqlx::Error::Database(err)) => err.is_unique_violation(),
            _ => false,
        }
    }
}

/// Owns the connection pool. Built once at the application root and handed to
/// the router through `AppState`; cloning shares the same pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
    offset: FixedOffset,
    log_queries: bool,
}

impl Database {
    pub fn new(pool: PgPool, offset: FixedOffset) -> Self {
        Self {
            pool,
            offset,
            log_queries: false,
        }
    }

    pub fn with_query_logging(mut self, enabled: bool) -> Self {
        self.log_queries = enabled;
        self
    }

    /// Connect eagerly, failing if the database is unreachable
    pub async fn connect(config: &AppConfig) -> Result<Self, DatabaseError> {
        let url = Self::database_url(config)?;
        let pool = Self::pool_options(config).connect(url).await?;
        info!("Connected database pool: {}", redact_url(url)?);
        Ok(Self::new(pool, config.server.offset()).with_query_logging(config.database.enable_query_logging))
    }

    /// Build the pool without opening a connection; connections are made on first use
    pub fn connect_lazy(config: &AppConfig) -> Result<Self, DatabaseError> {
        let url = Self::database_url(config)?;
        let pool = Self::pool_options(config).connect_lazy(url)?;
        info!("Created database pool: {}", redact_url(url)?);
        Ok(Self::new(pool, config.server.offset()).with_query_logging(config.database.enable_query_logging))
    }

    fn database_url(config: &AppConfig) -> Result<&str, DatabaseError> {
        config
            .database
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))
    }

    fn pool_options(config: &AppConfig) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(config.database.connection_timeout))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub(crate) fn log_queries(&self) -> bool {
        self.log_queries
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}

/// Render a connection string with the password masked, for logs
pub fn redact_url(raw: &str) -> Result<String, DatabaseError> {
    let mut url = url::Url::parse(raw).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
    if url.password().is_some() {
        url.set_password(Some("****"))
            .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
    }
    Ok(url.into())
}
