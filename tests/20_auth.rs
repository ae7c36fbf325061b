mod common;

use anyhow::Result;
use serde_json::json;

#[tokio::test]
async fn portal_requires_a_token() -> Result<()> {
    let server = common::spawn_server().await?;

    let body = common::envelope(server.get("/portal/branches/all")).await?;

    assert_eq!(body["status"], 401);
    assert_eq!(body["error"], "Missing Authorization header");
    Ok(())
}

#[tokio::test]
async fn forged_tokens_are_rejected() -> Result<()> {
    let server = common::spawn_server().await?;

    let forged = revive_branch_api::auth::generate_jwt(
        &revive_branch_api::auth::Claims {
            sub: 1,
            email: "root@example.com".into(),
            user_type: "admin".into(),
            exp: chrono::Utc::now().timestamp() + 600,
            iat: chrono::Utc::now().timestamp(),
        },
        "not-the-server-secret",
    )?;

    let body = common::envelope(server.get("/portal/users-count").bearer_auth(forged)).await?;

    assert_eq!(body["status"], 401);
    assert_eq!(body["error"], "Invalid or expired token");
    Ok(())
}

#[tokio::test]
async fn admin_routes_reject_regular_users() -> Result<()> {
    let server = common::spawn_server().await?;

    let body = common::envelope(
        server
            .post("/admin/branches")
            .bearer_auth(common::user_token())
            .json(&json!({ "name": "Main" })),
    )
    .await?;

    assert_eq!(body["status"], 403);
    assert_eq!(body["error"], "Admin access required");
    Ok(())
}

#[tokio::test]
async fn admin_routes_check_the_token_before_the_role() -> Result<()> {
    let server = common::spawn_server().await?;

    let body = common::envelope(server.delete("/admin/branches/1")).await?;

    assert_eq!(body["status"], 401);
    Ok(())
}

#[tokio::test]
async fn authenticated_echoes_the_claims() -> Result<()> {
    let server = common::spawn_server().await?;

    let body = common::envelope(server.get("/authenticated").bearer_auth(common::token(7, "user"))).await?;

    assert_eq!(body["status"], 200);
    assert_eq!(
        body["user"],
        json!({ "id": 7, "email": "user7@example.com", "user_type": "user" })
    );
    Ok(())
}
