mod common;

use anyhow::Result;
use serde_json::json;

#[tokio::test]
async fn base_route_answers_without_a_database() -> Result<()> {
    let server = common::spawn_server().await?;

    let body = common::envelope(server.get("/")).await?;

    assert_eq!(body["status"], 200);
    assert_eq!(body["message"]["name"], "revive-branch-api");
    Ok(())
}

#[tokio::test]
async fn unknown_routes_are_plain_404s() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.get("/portal/classes").send().await?;

    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn register_reports_missing_fields() -> Result<()> {
    let server = common::spawn_server().await?;

    let body = common::envelope(server.post("/register").json(&json!({ "first_name": "Ada" }))).await?;

    assert_eq!(body["status"], 422);
    assert_eq!(
        body["error"],
        json!({
            "last_name": "required",
            "email": "required",
            "password": "required"
        })
    );
    Ok(())
}

#[tokio::test]
async fn login_requires_email_and_password() -> Result<()> {
    let server = common::spawn_server().await?;

    // No body at all is treated like an empty one
    let body = common::envelope(server.post("/login")).await?;

    assert_eq!(body["status"], 422);
    assert_eq!(body["error"], json!({ "email": "required", "password": "required" }));
    Ok(())
}

#[tokio::test]
async fn database_failures_are_enveloped() -> Result<()> {
    let server = common::spawn_server().await?;

    let body = common::envelope(
        server
            .post("/login")
            .json(&json!({ "email": "ada@example.com", "password": "secret" })),
    )
    .await?;

    assert_eq!(body["status"], 500);
    assert!(body["error"].is_string(), "body: {}", body);
    Ok(())
}
