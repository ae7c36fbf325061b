use anyhow::Context;
use serde_json::json;

use crate::cli::{utils, OutputFormat};
use crate::config;
use crate::database::{migration, Database};

pub async fn handle(only: Option<&str>, output_format: OutputFormat) -> anyhow::Result<()> {
    // Reject unknown names before touching the database
    migration::plan(only)?;

    let db = Database::connect(config::config())
        .await
        .context("failed to connect to database")?;

    let result = migration::run(&db, only).await;
    db.close().await;
    let applied = result.context("migration aborted")?;

    utils::output_success(
        output_format,
        &format!("Applied {} statement(s)", applied.len()),
        Some(json!({ "applied": applied })),
    )
}
