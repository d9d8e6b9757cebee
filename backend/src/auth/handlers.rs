//! Handler functions for authentication-related API endpoints.
//!
//! These functions process incoming HTTP requests for user authentication
//! (registration, login, token refresh, logout) and the email verification
//! and password reset flows, parse request data, validate input, and
//! interact with the `auth::service` for core business logic.

use crate::api::common::{ApiResponse, service_error_to_http, validation_error_response};
use crate::auth::models::*;
use crate::auth::service::AuthService;
use crate::config::Config;
use axum::{
    extract::{Extension, Json},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;
use validator::Validate;

/// Handle user registration request
#[axum::debug_handler]
pub async fn register(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<RegisterResponse>>), (StatusCode, String)> {
    if let Err(errors) = payload.validate() {
        return Err(validation_error_response(errors));
    }

    let auth_service = AuthService::new(&pool, &config);

    match auth_service.register(payload).await {
        Ok(response) => Ok((
            StatusCode::CREATED,
            ResponseJson(ApiResponse::success(
                response,
                "User registered successfully. Please check your email for verification.",
            )),
        )),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<ResponseJson<ApiResponse<LoginResponse>>, (StatusCode, String)> {
    if let Err(errors) = payload.validate() {
        return Err(validation_error_response(errors));
    }

    let auth_service = AuthService::new(&pool, &config);

    match auth_service.login(payload).await {
        Ok(response) => Ok(ResponseJson(ApiResponse::success(
            response,
            "Login successful",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle token refresh request
#[axum::debug_handler]
pub async fn refresh_token(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<ResponseJson<ApiResponse<TokenPair>>, (StatusCode, String)> {
    if let Err(errors) = payload.validate() {
        return Err(validation_error_response(errors));
    }

    let auth_service = AuthService::new(&pool, &config);

    match auth_service.refresh_token(payload).await {
        Ok(response) => Ok(ResponseJson(ApiResponse::success(
            response,
            "Token refreshed successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle logout request by denylisting the presented access token
#[axum::debug_handler]
pub async fn logout(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    headers: HeaderMap,
) -> Result<ResponseJson<ApiResponse<()>>, (StatusCode, String)> {
    let bearer_token = headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "));

    if let Some(token) = bearer_token {
        let auth_service = AuthService::new(&pool, &config);
        if let Err(error) = auth_service.logout(token).await {
            return Err(service_error_to_http(error));
        }
    }

    Ok(ResponseJson(ApiResponse::<()>::message("Logout successful")))
}

/// Handle email verification request
#[axum::debug_handler]
pub async fn verify_email(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Json(payload): Json<VerifyEmailRequest>,
) -> Result<ResponseJson<ApiResponse<()>>, (StatusCode, String)> {
    if let Err(errors) = payload.validate() {
        return Err(validation_error_response(errors));
    }

    let auth_service = AuthService::new(&pool, &config);

    match auth_service.verify_email(payload).await {
        Ok(()) => Ok(ResponseJson(ApiResponse::<()>::message(
            "Email verified successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle password reset initiation request
#[axum::debug_handler]
pub async fn forgot_password(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<ResponseJson<ApiResponse<()>>, (StatusCode, String)> {
    if let Err(errors) = payload.validate() {
        return Err(validation_error_response(errors));
    }

    let auth_service = AuthService::new(&pool, &config);

    match auth_service.forgot_password(payload).await {
        Ok(()) => Ok(ResponseJson(ApiResponse::<()>::message(
            "If the email exists, a password reset link has been sent",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle password reset completion request
#[axum::debug_handler]
pub async fn reset_password(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<ResponseJson<ApiResponse<()>>, (StatusCode, String)> {
    if let Err(errors) = payload.validate() {
        return Err(validation_error_response(errors));
    }

    let auth_service = AuthService::new(&pool, &config);

    match auth_service.reset_password(payload).await {
        Ok(()) => Ok(ResponseJson(ApiResponse::<()>::message(
            "Password reset successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
