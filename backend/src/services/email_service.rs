//! Transactional email dispatch over SMTP.
//!
//! Builds and sends the verification and password-reset messages. Every
//! message is multipart text + HTML with links pointing at the frontend.

use crate::config::EmailConfig;
use crate::errors::{ServiceError, ServiceResult};
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::str::FromStr;

pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    config: EmailConfig,
}

impl EmailService {
    /// Creates a new EmailService instance
    pub fn new(config: EmailConfig) -> ServiceResult<Self> {
        let creds = Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| ServiceError::validation(format!("Invalid SMTP host: {e}")))?
            .port(config.smtp_port)
            .credentials(creds)
            .build();

        Ok(Self { mailer, config })
    }

    /// Sends the address-confirmation email after registration.
    pub async fn send_verification_email(
        &self,
        recipient_email: &str,
        username: &str,
        token: &str,
    ) -> ServiceResult<()> {
        let subject = format!("Verify Your Email - {}", self.config.app_name);
        let verification_url = format!(
            "{}/verify-email?token={}",
            self.config.frontend_url, token
        );

        let html_content = self.build_verification_html(username, &verification_url);
        let text_content = self.build_verification_text(username, &verification_url);

        self.send_email(recipient_email, &subject, &html_content, &text_content)
            .await
    }

    /// Sends the password-reset email with a one-hour link.
    pub async fn send_password_reset_email(
        &self,
        recipient_email: &str,
        username: &str,
        token: &str,
    ) -> ServiceResult<()> {
        let subject = format!("Reset Your Password - {}", self.config.app_name);
        let reset_url = format!(
            "{}/reset-password?token={}",
            self.config.frontend_url, token
        );

        let html_content = self.build_reset_html(username, &reset_url);
        let text_content = self.build_reset_text(username, &reset_url);

        self.send_email(recipient_email, &subject, &html_content, &text_content)
            .await
    }

    /// Sends a generic email
    pub async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        html_content: &str,
        text_content: &str,
    ) -> ServiceResult<()> {
        let from_mailbox = Mailbox::from_str(&format!(
            "{} <{}>",
            self.config.from_name, self.config.from_email
        ))
        .map_err(|e| ServiceError::validation(format!("Invalid from email: {e}")))?;

        let to_mailbox = Mailbox::from_str(to_email)
            .map_err(|e| ServiceError::validation(format!("Invalid recipient email: {e}")))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                lettre::message::MultiPart::alternative()
                    .singlepart(
                        lettre::message::SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_content.to_string()),
                    )
                    .singlepart(
                        lettre::message::SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_content.to_string()),
                    ),
            )
            .map_err(|e| ServiceError::validation(format!("Failed to build email: {e}")))?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| ServiceError::external_service(format!("Failed to send email: {e}")))?;

        Ok(())
    }

    fn build_verification_html(&self, username: &str, verification_url: &str) -> String {
        format!(
            r#"
            <!DOCTYPE html>
            <html>
            <head>
                <meta charset="UTF-8">
                <title>Verify your email address</title>
            </head>
            <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
                <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
                    <h2 style="color: #2c3e50;">Welcome to {}!</h2>

                    <p>Hi {},</p>

                    <p>Thank you for registering with us. Please click the button below to verify your email address:</p>

                    <div style="text-align: center; margin: 30px 0;">
                        <a href="{}"
                           style="background-color: #3498db; color: white; padding: 12px 30px;
                                  text-decoration: none; border-radius: 5px; display: inline-block;">
                            Verify Email Address
                        </a>
                    </div>

                    <p>If the link doesn't work, copy and paste this URL into your browser:</p>
                    <p style="word-break: break-all; color: #7f8c8d;">{}</p>

                    <hr style="border: none; border-top: 1px solid #ecf0f1; margin: 30px 0;">

                    <p style="font-size: 12px; color: #7f8c8d;">
                        This link will expire in 24 hours. If you didn't create an account,
                        you can safely ignore this email.
                    </p>
                </div>
            </body>
            </html>
            "#,
            self.config.app_name, username, verification_url, verification_url
        )
    }

    fn build_verification_text(&self, username: &str, verification_url: &str) -> String {
        format!(
            r#"Welcome to {}!

Hi {},

Thank you for registering with us. Open the link below to verify your email address:
{}

This link will expire in 24 hours. If you didn't create an account, you can safely ignore this email.
            "#,
            self.config.app_name, username, verification_url
        )
    }

    fn build_reset_html(&self, username: &str, reset_url: &str) -> String {
        format!(
            r#"
            <!DOCTYPE html>
            <html>
            <head>
                <meta charset="UTF-8">
                <title>Password reset request</title>
            </head>
            <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
                <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
                    <h2 style="color: #2c3e50;">Password Reset Request</h2>

                    <p>Hi {},</p>

                    <p>We received a request to reset your password. Click the button below to create a new password:</p>

                    <div style="text-align: center; margin: 30px 0;">
                        <a href="{}"
                           style="background-color: #3498db; color: white; padding: 12px 30px;
                                  text-decoration: none; border-radius: 5px; display: inline-block;">
                            Reset Password
                        </a>
                    </div>

                    <p>If the link doesn't work, copy and paste this URL into your browser:</p>
                    <p style="word-break: break-all; color: #7f8c8d;">{}</p>

                    <hr style="border: none; border-top: 1px solid #ecf0f1; margin: 30px 0;">

                    <p style="font-size: 12px; color: #7f8c8d;">
                        This link will expire in 1 hour. If you didn't request this password reset,
                        please ignore this email.
                    </p>
                </div>
            </body>
            </html>
            "#,
            username, reset_url, reset_url
        )
    }

    fn build_reset_text(&self, username: &str, reset_url: &str) -> String {
        format!(
            r#"Password Reset Request

Hi {},

We received a request to reset your password. Open the link below to create a new password:
{}

This link will expire in 1 hour. If you didn't request this password reset, please ignore this email.
            "#,
            username, reset_url
        )
    }
}
