//! JWT token utilities for authentication and authorization.
//!
//! Provides secure token creation, validation, and claims management for
//! user authentication. Access and refresh tokens share one signing secret
//! and differ only in lifetime.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::database::models::User;
use crate::errors::ServiceError;

/// JWT Claims structure containing user authentication data
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Username at issue time
    pub username: String,
    /// Email at issue time
    pub email: String,
    /// User role
    pub role: String,
    /// Token issuer
    pub iss: String,
    /// Token expiration timestamp
    pub exp: usize,
    /// Token issued at timestamp
    pub iat: usize,
}

/// JWT token utility for creating and validating tokens
pub struct JwtUtils {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    access_expires_in: u64,
    refresh_expires_in: u64,
}

impl JwtUtils {
    /// Create a new JwtUtils instance from the application config.
    pub fn new(config: &Config) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        JwtUtils {
            encoding_key,
            decoding_key,
            validation,
            issuer: config.app_name.clone(),
            access_expires_in: config.jwt_access_expires_in_seconds,
            refresh_expires_in: config.jwt_refresh_expires_in_seconds,
        }
    }

    /// Generate a short-lived access token for the given user.
    pub fn generate_access_token(&self, user: &User) -> Result<String, ServiceError> {
        self.generate_token(user, self.access_expires_in)
    }

    /// Generate a refresh token (longer expiration, same claims).
    pub fn generate_refresh_token(&self, user: &User) -> Result<String, ServiceError> {
        self.generate_token(user, self.refresh_expires_in)
    }

    fn generate_token(&self, user: &User, expires_in: u64) -> Result<String, ServiceError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(expires_in as i64);

        let claims = Claims {
            sub: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            iss: self.issuer.clone(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::internal_error(format!("Token generation failed: {}", e)))
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| ServiceError::unauthorized(format!("Token validation failed: {}", e)))
    }

    /// Access-token lifetime in seconds, surfaced in token pair responses.
    pub fn access_expires_in(&self) -> u64 {
        self.access_expires_in
    }
}

impl Claims {
    pub fn user_id(&self) -> &str {
        &self.sub
    }

    /// Check if token has expired
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as usize;
        now > self.exp
    }

    /// Check if user has specific role
    pub fn has_role(&self, role: &str) -> bool {
        self.role == role
    }

    /// Check if user is admin
    pub fn is_admin(&self) -> bool {
        self.has_role("admin")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn test_user() -> User {
        let now = Utc::now();
        User {
            id: "0190a0b0-0000-7000-8000-000000000001".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$2b$04$invalid".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            phone: None,
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1),
            bio: None,
            role: "user".to_string(),
            status: "active".to_string(),
            email_verified: false,
            email_verified_at: None,
            last_login_at: None,
            password_changed_at: None,
            created_at: now,
            updated_at: now,
            is_deleted: false,
            deleted_at: None,
        }
    }

    fn test_jwt_utils() -> JwtUtils {
        JwtUtils::new(&crate::config::tests::test_config())
    }

    #[test]
    fn access_token_round_trips() {
        let jwt_utils = test_jwt_utils();
        let user = test_user();

        let token = jwt_utils.generate_access_token(&user).unwrap();
        let claims = jwt_utils.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.role, "user");
        assert!(!claims.is_expired());
        assert!(!claims.is_admin());
    }

    #[test]
    fn refresh_token_outlives_access_token() {
        let jwt_utils = test_jwt_utils();
        let user = test_user();

        let access = jwt_utils.generate_access_token(&user).unwrap();
        let refresh = jwt_utils.generate_refresh_token(&user).unwrap();

        let access_claims = jwt_utils.validate_token(&access).unwrap();
        let refresh_claims = jwt_utils.validate_token(&refresh).unwrap();
        assert!(refresh_claims.exp > access_claims.exp);
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt_utils = test_jwt_utils();
        let now = Utc::now();

        // Encode a token that expired well beyond the default leeway.
        let claims = Claims {
            sub: "someone".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            role: "user".to_string(),
            iss: "Accounts API".to_string(),
            exp: (now - Duration::minutes(10)).timestamp() as usize,
            iat: (now - Duration::hours(1)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(jwt_utils.validate_token(&token).is_err());
        assert!(claims.is_expired());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let jwt_utils = test_jwt_utils();
        let user = test_user();

        let token = jwt_utils.generate_access_token(&user).unwrap();
        let other = JwtUtils::new(&crate::config::Config {
            jwt_secret: "different-secret".to_string(),
            ..crate::config::tests::test_config()
        });

        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn admin_role_is_recognized() {
        let jwt_utils = test_jwt_utils();
        let user = User {
            role: "admin".to_string(),
            ..test_user()
        };

        let token = jwt_utils.generate_access_token(&user).unwrap();
        let claims = jwt_utils.validate_token(&token).unwrap();
        assert!(claims.is_admin());
        assert!(claims.has_role("admin"));
    }
}
