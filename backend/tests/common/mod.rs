//! Shared setup for integration tests: an in-memory database with
//! migrations applied, and a `TestServer` over the full router.

use axum_test::TestServer;
use backend::config::Config;
use backend::database::run_migrations;
use backend::router::build_router;
use serde_json::json;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        max_connections: 1,
        acquire_timeout_seconds: 3,
        jwt_secret: "integration-test-secret".to_string(),
        jwt_access_expires_in_seconds: 3600,
        jwt_refresh_expires_in_seconds: 604800,
        server_port: 0,
        // Minimum bcrypt cost keeps the test suite fast.
        bcrypt_cost: 4,
        app_name: "Accounts API".to_string(),
        frontend_url: "http://localhost:3000".to_string(),
        cors_allowed_origins: vec!["http://localhost:3000".to_string()],
        smtp_host: None,
        smtp_port: 587,
        smtp_username: None,
        smtp_password: None,
        from_email: None,
    }
}

/// Builds a server over a fresh in-memory database.
///
/// The pool is limited to one connection so every query sees the same
/// in-memory database.
pub async fn setup() -> (TestServer, SqlitePool) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    run_migrations(&pool).await.expect("migrations apply");

    let server =
        TestServer::new(build_router(pool.clone(), test_config())).expect("test server");
    (server, pool)
}

/// A registration payload that passes validation.
pub fn register_payload(username: &str, email: &str) -> serde_json::Value {
    json!({
        "username": username,
        "email": email,
        "password": "Sup3rSecret",
        "confirmPassword": "Sup3rSecret",
        "firstName": "Test",
        "lastName": "User",
        "acceptTerms": true,
    })
}

/// Registers and logs a user in, returning the access token.
pub async fn register_and_login(server: &TestServer, username: &str, email: &str) -> String {
    let response = server
        .post("/api/v1/auth/register")
        .json(&register_payload(username, email))
        .await;
    assert_eq!(response.status_code(), 201);

    login(server, username).await
}

/// Logs in with the default test password and returns the access token.
pub async fn login(server: &TestServer, username: &str) -> String {
    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({ "username": username, "password": "Sup3rSecret" }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    body["data"]["token"]["accessToken"]
        .as_str()
        .expect("access token in login response")
        .to_string()
}
