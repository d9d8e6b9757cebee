//! Handler functions for user profile and management API endpoints.
//!
//! These functions process requests for user data, interact with the
//! database through the user service, and return user-specific information.

use crate::api::common::{ApiResponse, service_error_to_http, validation_error_response};
use crate::api::user::models::{ChangePasswordRequest, ProfileResponse, UpdateProfileRequest};
use crate::config::Config;
use crate::services::user_service::UserService;
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
};
use sqlx::SqlitePool;
use validator::Validate;

/// Retrieves the authenticated user's profile.
#[axum::debug_handler]
pub async fn get_profile(
    Extension(claims): Extension<Claims>,
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
) -> Result<Json<ApiResponse<ProfileResponse>>, (StatusCode, String)> {
    let user_service = UserService::new(&pool, &config);

    match user_service.get_user_required(&claims.sub).await {
        Ok(user) => Ok(Json(ApiResponse::success(
            ProfileResponse::from(user),
            "Profile retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Updates the authenticated user's profile.
///
/// Only fields present in the payload are changed.
#[axum::debug_handler]
pub async fn update_profile(
    Extension(claims): Extension<Claims>,
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<ProfileResponse>>, (StatusCode, String)> {
    if let Err(errors) = payload.validate() {
        return Err(validation_error_response(errors));
    }

    let user_service = UserService::new(&pool, &config);

    match user_service
        .update_profile(&claims.sub, payload.into_changes())
        .await
    {
        Ok(user) => Ok(Json(ApiResponse::success(
            ProfileResponse::from(user),
            "Profile updated successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Changes the authenticated user's password.
#[axum::debug_handler]
pub async fn change_password(
    Extension(claims): Extension<Claims>,
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, String)> {
    if let Err(errors) = payload.validate() {
        return Err(validation_error_response(errors));
    }

    let user_service = UserService::new(&pool, &config);

    match user_service
        .change_password(
            &claims.sub,
            &payload.current_password,
            &payload.new_password,
        )
        .await
    {
        Ok(()) => Ok(Json(ApiResponse::<()>::message(
            "Password changed successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
