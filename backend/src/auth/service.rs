//! Core business logic for the authentication system.

use crate::auth::models::*;
use crate::config::Config;
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::password_reset_repository::PasswordResetRepository;
use crate::repositories::revoked_token_repository::RevokedTokenRepository;
use crate::repositories::user_repository::UserRepository;
use crate::repositories::verification_token_repository::VerificationTokenRepository;
use crate::services::email_service::EmailService;
use crate::services::user_service::UserService;
use crate::utils::generate_random_string::generate_random_string;
use crate::utils::jwt::JwtUtils;
use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::SqlitePool;

/// Opaque token length for verification and reset tokens.
const TOKEN_LENGTH: usize = 64;

/// Authentication service for registration, login, token lifecycle, and the
/// email-verification and password-reset flows.
pub struct AuthService<'a> {
    pool: &'a SqlitePool,
    jwt_utils: JwtUtils,
    user_service: UserService<'a>,
    email_service: Option<EmailService>,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService instance.
    ///
    /// A missing or broken SMTP configuration disables outgoing email; the
    /// affected flows log instead of failing.
    pub fn new(pool: &'a SqlitePool, config: &Config) -> Self {
        let email_service = match config.email_config() {
            Some(email_config) => match EmailService::new(email_config) {
                Ok(service) => Some(service),
                Err(e) => {
                    tracing::warn!(
                        "Failed to initialize email service: {}. Email notifications will be disabled.",
                        e
                    );
                    None
                }
            },
            None => {
                tracing::warn!(
                    "Email configuration not found. Email notifications will be disabled."
                );
                None
            }
        };

        AuthService {
            pool,
            jwt_utils: JwtUtils::new(config),
            user_service: UserService::new(pool, config),
            email_service,
        }
    }

    /// Registers a new user and kicks off email verification.
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<RegisterResponse> {
        let user = self.user_service.create_user(&request).await?;

        let token = generate_random_string(TOKEN_LENGTH);
        let expires_at = Utc::now() + Duration::hours(24);

        let token_repo = VerificationTokenRepository::new(self.pool);
        token_repo
            .create_token(&user.id, &token, expires_at)
            .await?;

        if let Some(ref email_service) = self.email_service {
            match email_service
                .send_verification_email(&user.email, &user.username, &token)
                .await
            {
                Ok(_) => tracing::info!("Verification email sent to {}", user.email),
                Err(e) => {
                    tracing::error!("Failed to send verification email to {}: {}", user.email, e)
                }
            }
        } else {
            tracing::warn!(
                "Email service not configured. Verification email not sent to {}",
                user.email
            );
        }

        Ok(RegisterResponse {
            user_id: user.id,
            username: user.username,
            email: user.email,
            status: user.status,
            created_at: user.created_at,
        })
    }

    /// Authenticate user and generate JWT tokens.
    pub async fn login(&self, login_request: LoginRequest) -> ServiceResult<LoginResponse> {
        let user = self.user_service.authenticate_user(&login_request).await?;

        if !user.is_active() {
            return Err(ServiceError::unauthorized("User account is inactive"));
        }

        let now = Utc::now();
        let user_repo = UserRepository::new(self.pool);
        user_repo.update_last_login(&user.id, now).await?;

        let token = self.generate_token_pair(&user)?;

        Ok(LoginResponse {
            user: UserInfo {
                id: user.id,
                username: user.username,
                email: user.email,
                first_name: user.first_name,
                last_name: user.last_name,
                role: user.role,
                status: user.status,
                last_login_at: Some(now),
            },
            token,
        })
    }

    /// Issues a fresh token pair against a valid refresh token.
    ///
    /// The referenced user must still exist and be active.
    pub async fn refresh_token(&self, request: RefreshTokenRequest) -> ServiceResult<TokenPair> {
        let claims = self.jwt_utils.validate_token(&request.refresh_token)?;

        let user = self.user_service.get_user_required(&claims.sub).await?;

        if !user.is_active() {
            return Err(ServiceError::unauthorized("User account is inactive"));
        }

        self.generate_token_pair(&user)
    }

    /// Revokes the presented access token.
    ///
    /// An unparseable token is ignored: the caller is logging out either
    /// way, and the token could never pass the middleware again.
    pub async fn logout(&self, bearer_token: &str) -> ServiceResult<()> {
        if let Ok(claims) = self.jwt_utils.validate_token(bearer_token) {
            let expires_at: DateTime<Utc> = Utc
                .timestamp_opt(claims.exp as i64, 0)
                .single()
                .unwrap_or_else(Utc::now);

            let repo = RevokedTokenRepository::new(self.pool);
            repo.revoke(bearer_token, expires_at).await?;
        }

        Ok(())
    }

    /// Confirms an email address from a mailed verification token.
    pub async fn verify_email(&self, request: VerifyEmailRequest) -> ServiceResult<()> {
        let token_repo = VerificationTokenRepository::new(self.pool);

        let token = token_repo
            .get_by_token(&request.token)
            .await?
            .filter(|t| !t.used && t.expires_at > Utc::now())
            .ok_or_else(|| {
                ServiceError::validation("Invalid or expired verification token")
            })?;

        let user_repo = UserRepository::new(self.pool);
        if !user_repo.mark_email_verified(&token.user_id).await? {
            return Err(ServiceError::not_found("User", &token.user_id));
        }

        token_repo.mark_used(&token.id).await?;

        Ok(())
    }

    /// Starts the password-reset flow for an email address.
    ///
    /// Succeeds whether or not the address is registered, so the endpoint
    /// cannot be used to enumerate accounts.
    pub async fn forgot_password(&self, request: ForgotPasswordRequest) -> ServiceResult<()> {
        let user_repo = UserRepository::new(self.pool);
        let Some(user) = user_repo.get_user_by_email(&request.email).await? else {
            tracing::info!("Password reset requested for unknown email");
            return Ok(());
        };

        let token = generate_random_string(TOKEN_LENGTH);
        let expires_at = Utc::now() + Duration::hours(1);

        let reset_repo = PasswordResetRepository::new(self.pool);
        reset_repo.create_token(&user.id, &token, expires_at).await?;

        if let Some(ref email_service) = self.email_service {
            match email_service
                .send_password_reset_email(&user.email, &user.username, &token)
                .await
            {
                Ok(_) => tracing::info!("Password reset email sent to {}", user.email),
                Err(e) => {
                    tracing::error!("Failed to send reset email to {}: {}", user.email, e)
                }
            }
        } else {
            tracing::warn!(
                "Email service not configured. Password reset email not sent to {}",
                user.email
            );
        }

        Ok(())
    }

    /// Completes a password reset from a mailed token.
    pub async fn reset_password(&self, request: ResetPasswordRequest) -> ServiceResult<()> {
        let reset_repo = PasswordResetRepository::new(self.pool);

        let token = reset_repo
            .get_by_token(&request.token)
            .await?
            .filter(|t| !t.used && t.expires_at > Utc::now())
            .ok_or_else(|| ServiceError::validation("Invalid or expired reset token"))?;

        self.user_service
            .set_password(&token.user_id, &request.new_password)
            .await?;

        reset_repo.mark_used(&token.id).await?;

        Ok(())
    }

    fn generate_token_pair(&self, user: &crate::database::models::User) -> ServiceResult<TokenPair> {
        let access_token = self.jwt_utils.generate_access_token(user)?;
        let refresh_token = self.jwt_utils.generate_refresh_token(user)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.jwt_utils.access_expires_in(),
            token_type: "Bearer".to_string(),
        })
    }
}
