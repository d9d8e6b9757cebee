mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn register_creates_user_and_verification_token() {
    let (server, pool) = common::setup().await;

    let response = server
        .post("/api/v1/auth/register")
        .json(&common::register_payload("alice42", "alice@example.com"))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["username"], "alice42");
    assert_eq!(body["data"]["email"], "alice@example.com");
    assert_eq!(body["data"]["status"], "active");
    let user_id = body["data"]["userId"].as_str().unwrap().to_string();

    // A verification token is written even when email sending is disabled.
    let token_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM email_verification_tokens WHERE user_id = ?",
    )
    .bind(&user_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(token_count, 1);
}

#[tokio::test]
async fn duplicate_email_is_rejected_with_conflict() {
    let (server, _pool) = common::setup().await;

    let first = server
        .post("/api/v1/auth/register")
        .json(&common::register_payload("alice42", "alice@example.com"))
        .await;
    assert_eq!(first.status_code(), StatusCode::CREATED);

    let second = server
        .post("/api/v1/auth/register")
        .json(&common::register_payload("bob99", "alice@example.com"))
        .await;
    assert_eq!(second.status_code(), StatusCode::CONFLICT);

    let third = server
        .post("/api/v1/auth/register")
        .json(&common::register_payload("alice42", "other@example.com"))
        .await;
    assert_eq!(third.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn weak_password_fails_validation_with_field_details() {
    let (server, _pool) = common::setup().await;

    let mut payload = common::register_payload("alice42", "alice@example.com");
    payload["password"] = json!("alllowercase1");
    payload["confirmPassword"] = json!("alllowercase1");

    let response = server.post("/api/v1/auth/register").json(&payload).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = serde_json::from_str(&response.text()).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["error_type"], "validation_error");
    let details = body["error"]["details"].as_array().unwrap();
    assert!(details.iter().any(|d| d["field"] == "password"));
}

#[tokio::test]
async fn login_returns_token_pair_and_user_info() {
    let (server, _pool) = common::setup().await;

    let response = server
        .post("/api/v1/auth/register")
        .json(&common::register_payload("alice42", "alice@example.com"))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({ "username": "alice42", "password": "Sup3rSecret" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["user"]["username"], "alice42");
    assert_eq!(body["data"]["token"]["tokenType"], "Bearer");
    assert_eq!(body["data"]["token"]["expiresIn"], 3600);
    assert!(!body["data"]["token"]["accessToken"].as_str().unwrap().is_empty());
    assert!(!body["data"]["token"]["refreshToken"].as_str().unwrap().is_empty());
    assert!(body["data"]["user"]["lastLoginAt"].is_string());
}

#[tokio::test]
async fn login_by_email_works() {
    let (server, _pool) = common::setup().await;

    server
        .post("/api/v1/auth/register")
        .json(&common::register_payload("alice42", "alice@example.com"))
        .await;

    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "alice@example.com", "password": "Sup3rSecret" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn bad_credentials_yield_uniform_unauthorized() {
    let (server, _pool) = common::setup().await;

    server
        .post("/api/v1/auth/register")
        .json(&common::register_payload("alice42", "alice@example.com"))
        .await;

    let wrong_password = server
        .post("/api/v1/auth/login")
        .json(&json!({ "username": "alice42", "password": "WrongSecret1" }))
        .await;
    assert_eq!(wrong_password.status_code(), StatusCode::UNAUTHORIZED);

    let unknown_user = server
        .post("/api/v1/auth/login")
        .json(&json!({ "username": "nobody", "password": "Sup3rSecret" }))
        .await;
    assert_eq!(unknown_user.status_code(), StatusCode::UNAUTHORIZED);

    // Both failures carry the same message so accounts cannot be probed.
    let a: serde_json::Value = serde_json::from_str(&wrong_password.text()).unwrap();
    let b: serde_json::Value = serde_json::from_str(&unknown_user.text()).unwrap();
    assert_eq!(a["message"], b["message"]);
}

#[tokio::test]
async fn login_without_identifier_is_rejected() {
    let (server, _pool) = common::setup().await;

    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({ "password": "Sup3rSecret" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn refresh_issues_a_new_token_pair() {
    let (server, _pool) = common::setup().await;

    server
        .post("/api/v1/auth/register")
        .json(&common::register_payload("alice42", "alice@example.com"))
        .await;

    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({ "username": "alice42", "password": "Sup3rSecret" }))
        .await;
    let body: serde_json::Value = response.json();
    let access_token = body["data"]["token"]["accessToken"].as_str().unwrap();
    let refresh_token = body["data"]["token"]["refreshToken"].as_str().unwrap();

    let response = server
        .post("/api/v1/auth/refresh")
        .authorization_bearer(access_token)
        .json(&json!({ "refreshToken": refresh_token }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["tokenType"], "Bearer");
    assert!(!body["data"]["accessToken"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn refresh_rejects_garbage_token() {
    let (server, _pool) = common::setup().await;

    let access_token =
        common::register_and_login(&server, "alice42", "alice@example.com").await;

    let response = server
        .post("/api/v1/auth/refresh")
        .authorization_bearer(&access_token)
        .json(&json!({ "refreshToken": "not-a-jwt" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_denylists_the_access_token() {
    let (server, pool) = common::setup().await;

    let access_token =
        common::register_and_login(&server, "alice42", "alice@example.com").await;

    // Token works before logout.
    let before = server
        .get("/api/v1/users/profile")
        .authorization_bearer(&access_token)
        .await;
    assert_eq!(before.status_code(), StatusCode::OK);

    let response = server
        .post("/api/v1/auth/logout")
        .authorization_bearer(&access_token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let revoked: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM revoked_tokens WHERE token = ?")
        .bind(&access_token)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(revoked, 1);

    // Same token is now rejected by the middleware.
    let after = server
        .get("/api/v1/users/profile")
        .authorization_bearer(&access_token)
        .await;
    assert_eq!(after.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn verify_email_consumes_the_token() {
    let (server, pool) = common::setup().await;

    let response = server
        .post("/api/v1/auth/register")
        .json(&common::register_payload("alice42", "alice@example.com"))
        .await;
    let body: serde_json::Value = response.json();
    let user_id = body["data"]["userId"].as_str().unwrap().to_string();

    let token: String = sqlx::query_scalar(
        "SELECT token FROM email_verification_tokens WHERE user_id = ?",
    )
    .bind(&user_id)
    .fetch_one(&pool)
    .await
    .unwrap();

    let response = server
        .post("/api/v1/auth/verify-email")
        .json(&json!({ "token": token }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let verified: bool = sqlx::query_scalar("SELECT email_verified FROM users WHERE id = ?")
        .bind(&user_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(verified);

    // Single use: replaying the token fails.
    let replay = server
        .post("/api/v1/auth/verify-email")
        .json(&json!({ "token": token }))
        .await;
    assert_eq!(replay.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_verification_token_is_rejected() {
    let (server, _pool) = common::setup().await;

    let response = server
        .post("/api/v1/auth/verify-email")
        .json(&json!({ "token": "definitely-not-issued" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn forgot_password_never_reveals_account_existence() {
    let (server, _pool) = common::setup().await;

    server
        .post("/api/v1/auth/register")
        .json(&common::register_payload("alice42", "alice@example.com"))
        .await;

    let known = server
        .post("/api/v1/auth/forgot-password")
        .json(&json!({ "email": "alice@example.com" }))
        .await;
    assert_eq!(known.status_code(), StatusCode::OK);

    let unknown = server
        .post("/api/v1/auth/forgot-password")
        .json(&json!({ "email": "stranger@example.com" }))
        .await;
    assert_eq!(unknown.status_code(), StatusCode::OK);

    let a: serde_json::Value = known.json();
    let b: serde_json::Value = unknown.json();
    assert_eq!(a["message"], b["message"]);
}

#[tokio::test]
async fn reset_password_flow_replaces_the_credential() {
    let (server, pool) = common::setup().await;

    server
        .post("/api/v1/auth/register")
        .json(&common::register_payload("alice42", "alice@example.com"))
        .await;

    server
        .post("/api/v1/auth/forgot-password")
        .json(&json!({ "email": "alice@example.com" }))
        .await;

    let token: String =
        sqlx::query_scalar("SELECT token FROM password_reset_tokens ORDER BY created_at DESC")
            .fetch_one(&pool)
            .await
            .unwrap();

    let response = server
        .post("/api/v1/auth/reset-password")
        .json(&json!({
            "token": token,
            "newPassword": "Fresh3rSecret",
            "confirmPassword": "Fresh3rSecret",
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    // Old password no longer works, the new one does.
    let old = server
        .post("/api/v1/auth/login")
        .json(&json!({ "username": "alice42", "password": "Sup3rSecret" }))
        .await;
    assert_eq!(old.status_code(), StatusCode::UNAUTHORIZED);

    let new = server
        .post("/api/v1/auth/login")
        .json(&json!({ "username": "alice42", "password": "Fresh3rSecret" }))
        .await;
    assert_eq!(new.status_code(), StatusCode::OK);

    // The reset token is single use.
    let replay = server
        .post("/api/v1/auth/reset-password")
        .json(&json!({
            "token": token,
            "newPassword": "Anoth3rSecret",
            "confirmPassword": "Anoth3rSecret",
        }))
        .await;
    assert_eq!(replay.status_code(), StatusCode::BAD_REQUEST);
}
