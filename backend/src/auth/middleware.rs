//! Middleware for protecting authenticated routes and handling authorization.
//!
//! This module contains logic for validating authentication tokens
//! and enforcing user permissions across the API endpoints.

use crate::config::Config;
use crate::repositories::revoked_token_repository::RevokedTokenRepository;
use crate::repositories::user_repository::UserRepository;
use crate::utils::jwt::{Claims, JwtUtils};
use axum::{
    extract::Request,
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use sqlx::SqlitePool;

/// JWT authentication middleware.
///
/// Order matters: the denylist is consulted before signature validation so
/// a revoked-but-otherwise-valid token is reported as revoked, and the user
/// row is loaded last so deactivated accounts lose access immediately.
pub async fn jwt_auth(mut request: Request, next: Next) -> Result<Response, StatusCode> {
    // Extract Authorization header
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // Check if it's a Bearer token
    if !auth_header.starts_with("Bearer ") {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let token = auth_header[7..].to_string(); // Remove "Bearer " prefix

    let pool = request
        .extensions()
        .get::<SqlitePool>()
        .cloned()
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
    let config = request
        .extensions()
        .get::<Config>()
        .cloned()
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

    // Check the denylist before anything else
    let revoked_repo = RevokedTokenRepository::new(&pool);
    match revoked_repo.is_revoked(&token).await {
        Ok(true) => {
            tracing::info!("Rejected revoked token");
            return Err(StatusCode::UNAUTHORIZED);
        }
        Ok(false) => {}
        Err(e) => {
            tracing::error!("Denylist lookup failed: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    // Validate JWT token
    let jwt_utils = JwtUtils::new(&config);
    let claims = jwt_utils
        .validate_token(&token)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    // Check that the user still exists and is active
    let user_repo = UserRepository::new(&pool);
    match user_repo.get_user_by_id(&claims.sub).await {
        Ok(Some(user)) if user.is_active() => {}
        Ok(_) => return Err(StatusCode::UNAUTHORIZED),
        Err(e) => {
            tracing::error!("User lookup failed: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    // Add claims to request extensions for use in handlers
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Admin role authorization middleware.
///
/// Must be layered after `jwt_auth`, which populates the claims.
pub async fn admin_auth(request: Request, next: Next) -> Result<Response, StatusCode> {
    let claims = request
        .extensions()
        .get::<Claims>()
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !claims.is_admin() {
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next.run(request).await)
}
