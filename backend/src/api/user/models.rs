//! Request and response models for the user profile endpoints.

use crate::auth::models::{
    validate_date_of_birth, validate_password_strength, validate_phone,
};
use crate::database::models::{ProfileChanges, User};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Full profile view returned by the profile endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub bio: Option<String>,
    pub role: String,
    pub status: String,
    pub email_verified: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        ProfileResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            date_of_birth: user.date_of_birth,
            bio: user.bio,
            role: user.role,
            status: user.status,
            email_verified: user.email_verified,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Partial profile update. Absent fields keep their stored values.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50, message = "First name must be between 1-50 characters"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Last name must be between 1-50 characters"))]
    pub last_name: Option<String>,

    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,

    #[validate(custom(function = "validate_date_of_birth"))]
    pub date_of_birth: Option<String>,

    #[validate(length(max = 500, message = "Maximum length is 500 characters"))]
    pub bio: Option<String>,
}

impl UpdateProfileRequest {
    /// Converts the validated request into repository-level changes.
    pub fn into_changes(self) -> ProfileChanges {
        let date_of_birth = self
            .date_of_birth
            .as_deref()
            .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok());

        ProfileChanges {
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            date_of_birth,
            bio: self.bio,
        }
    }
}

/// Password change for an authenticated user.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(
        length(min = 8, max = 128, message = "Password must be at least 8 characters long"),
        custom(function = "validate_password_strength")
    )]
    pub new_password: String,

    #[validate(must_match(other = "new_password", message = "New passwords do not match"))]
    pub confirm_password: String,
}
