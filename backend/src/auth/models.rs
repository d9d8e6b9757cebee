//! Data structures for authentication-related entities.
//!
//! This module defines request and response models for registration, login,
//! email verification, password reset, and token refresh, used for data
//! transfer within the authentication flow. All wire names are camelCase.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Registration request payload
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(
        length(min = 3, max = 30, message = "Username must be between 3-30 characters"),
        custom(function = "validate_alphanumeric")
    )]
    pub username: String,

    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    #[validate(
        length(min = 8, max = 128, message = "Password must be at least 8 characters long"),
        custom(function = "validate_password_strength")
    )]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,

    #[validate(length(min = 1, max = 50, message = "First name must be between 1-50 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "Last name must be between 1-50 characters"))]
    pub last_name: String,

    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,

    #[validate(custom(function = "validate_date_of_birth"))]
    pub date_of_birth: Option<String>,

    #[validate(custom(function = "validate_accept_terms"))]
    #[serde(default)]
    pub accept_terms: bool,
}

impl RegisterRequest {
    /// Parses the optional `YYYY-MM-DD` date of birth.
    ///
    /// Only called after validation, so a malformed value cannot reach here.
    pub fn parsed_date_of_birth(&self) -> Option<NaiveDate> {
        self.date_of_birth
            .as_deref()
            .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
    }
}

/// Registration response payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Login request payload. Either `username` or `email` identifies the user.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: Option<String>,

    pub username: Option<String>,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    // Accepted for wire compatibility; token lifetimes are fixed by config.
    #[serde(default)]
    pub remember_me: bool,
}

/// Login response containing tokens and user info
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserInfo,
    pub token: TokenPair,
}

/// User information returned in login response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub status: String,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Access/refresh token pair
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token expiration in seconds
    pub expires_in: u64,
    pub token_type: String,
}

/// Token refresh request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Email verification request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
}

/// Password reset initiation request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
}

/// Password reset completion request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,

    #[validate(
        length(min = 8, max = 128, message = "Password must be at least 8 characters long"),
        custom(function = "validate_password_strength")
    )]
    pub new_password: String,

    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

// Custom validation functions

fn validate_alphanumeric(username: &str) -> Result<(), ValidationError> {
    if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
        let mut error = ValidationError::new("alphanumeric");
        error.message = Some("Only alphanumeric characters are allowed".into());
        return Err(error);
    }
    Ok(())
}

/// Requires at least one uppercase letter, one lowercase letter, and one digit.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !has_upper || !has_lower || !has_digit {
        let mut error = ValidationError::new("password_strength");
        error.message = Some(
            "Password must contain at least one uppercase letter, one lowercase letter, and one number"
                .into(),
        );
        return Err(error);
    }
    Ok(())
}

/// Loose E.164 check: leading `+`, 8-15 characters total.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if !phone.starts_with('+') || phone.len() < 8 || phone.len() > 15 {
        let mut error = ValidationError::new("phone");
        error.message =
            Some("Please enter a valid international phone number (e.g., +8613800138000)".into());
        return Err(error);
    }
    Ok(())
}

/// `YYYY-MM-DD`, not in the future.
pub fn validate_date_of_birth(date_of_birth: &str) -> Result<(), ValidationError> {
    let parsed = NaiveDate::parse_from_str(date_of_birth, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date_of_birth");
        error.message = Some("Please enter a valid date (YYYY-MM-DD)".into());
        error
    })?;

    if parsed > Utc::now().date_naive() {
        let mut error = ValidationError::new("date_of_birth");
        error.message = Some("Date of birth cannot be in the future".into());
        return Err(error);
    }
    Ok(())
}

fn validate_accept_terms(accept_terms: &bool) -> Result<(), ValidationError> {
    if !accept_terms {
        let mut error = ValidationError::new("accept_terms");
        error.message = Some("You must accept the terms and conditions".into());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_register_request() -> RegisterRequest {
        RegisterRequest {
            username: "alice42".to_string(),
            email: "alice@example.com".to_string(),
            password: "Sup3rSecret".to_string(),
            confirm_password: "Sup3rSecret".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            phone: None,
            date_of_birth: None,
            accept_terms: true,
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert!(valid_register_request().validate().is_ok());
    }

    #[test]
    fn password_without_digit_fails() {
        let request = RegisterRequest {
            password: "NoDigitsHere".to_string(),
            confirm_password: "NoDigitsHere".to_string(),
            ..valid_register_request()
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn password_too_short_fails() {
        let request = RegisterRequest {
            password: "Ab1".to_string(),
            confirm_password: "Ab1".to_string(),
            ..valid_register_request()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn mismatched_confirmation_fails() {
        let request = RegisterRequest {
            confirm_password: "Different1".to_string(),
            ..valid_register_request()
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("confirm_password"));
    }

    #[test]
    fn username_with_symbols_fails() {
        let request = RegisterRequest {
            username: "alice!".to_string(),
            ..valid_register_request()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn phone_must_look_like_e164() {
        assert!(validate_phone("+8613800138000").is_ok());
        assert!(validate_phone("8613800138000").is_err());
        assert!(validate_phone("+123").is_err());
        assert!(validate_phone("+1234567890123456").is_err());
    }

    #[test]
    fn future_date_of_birth_fails() {
        let future = (Utc::now().date_naive() + chrono::Duration::days(2))
            .format("%Y-%m-%d")
            .to_string();
        assert!(validate_date_of_birth(&future).is_err());
        assert!(validate_date_of_birth("1990-06-15").is_ok());
        assert!(validate_date_of_birth("not-a-date").is_err());
    }

    #[test]
    fn terms_must_be_accepted() {
        let request = RegisterRequest {
            accept_terms: false,
            ..valid_register_request()
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("accept_terms"));
    }
}
