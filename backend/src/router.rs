//! Axum router construction.
//!
//! Composes the full application router with CORS and the shared pool and
//! config extensions, separate from `main` so tests can drive the API
//! without binding a socket.

use crate::api::common::ApiResponse;
use crate::config::Config;
use axum::{Extension, Router, http::HeaderValue, response::Json, routing::get};
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};

/// Build the Axum application router.
pub fn build_router(pool: SqlitePool, config: Config) -> Router {
    let cors = cors_layer(&config.cors_allowed_origins);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/api/v1", get(api_index_handler))
        .nest("/api/v1/auth", crate::auth::routes::auth_router())
        .nest("/api/v1/users", crate::api::user::routes::user_router())
        .layer(cors)
        .layer(Extension(pool))
        .layer(Extension(config))
}

/// Create the CORS layer from the configured allowed origins.
///
/// A literal `*` switches to wildcard mode, which cannot carry credentials.
fn cors_layer(origins: &[String]) -> CorsLayer {
    use axum::http::{Method, header};

    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::new()
            .allow_methods(Any)
            .allow_headers(Any)
            .allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
        .allow_origin(origins)
}

async fn root_handler(
    Extension(config): Extension<Config>,
) -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        serde_json::json!({
            "service": config.app_name,
            "version": env!("CARGO_PKG_VERSION"),
            "docs": "/api/v1"
        }),
        format!("Welcome to {}", config.app_name),
    ))
}

async fn health_handler() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        serde_json::json!({ "status": "running" }),
        "Server is healthy",
    ))
}

async fn api_index_handler() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        serde_json::json!({
            "auth": {
                "register": "POST /api/v1/auth/register",
                "login": "POST /api/v1/auth/login",
                "verify-email": "POST /api/v1/auth/verify-email",
                "forgot-password": "POST /api/v1/auth/forgot-password",
                "reset-password": "POST /api/v1/auth/reset-password",
                "refresh": "POST /api/v1/auth/refresh",
                "logout": "POST /api/v1/auth/logout",
            },
            "users": {
                "profile": "GET /api/v1/users/profile",
                "update-profile": "PUT /api/v1/users/profile",
                "change-password": "POST /api/v1/users/change-password",
            },
        }),
        "Accounts API v1",
    ))
}
