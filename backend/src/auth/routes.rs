//! Defines the HTTP routes specifically for authentication.
//!
//! These routes handle endpoints like registration, login, email
//! verification, password reset, and token lifecycle. They are designed to
//! be integrated into the main Axum router.

use crate::auth::handlers::*;
use crate::auth::middleware::jwt_auth;
use axum::{Router, middleware, routing::post};

/// Creates the authentication router with all auth-related routes
pub fn auth_router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/verify-email", post(verify_email))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .route(
            "/refresh",
            post(refresh_token).layer(middleware::from_fn(jwt_auth)),
        )
        .route("/logout", post(logout).layer(middleware::from_fn(jwt_auth)))
}
