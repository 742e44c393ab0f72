use crate::config::EmailConfig;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to_email: String,
    pub to_name: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: EmailMessage) -> AppResult<()>;
}

/// Transactional mail through a SendGrid-compatible HTTP API.
#[derive(Clone)]
pub struct EmailService {
    client: Client,
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Mailer for EmailService {
    async fn send(&self, message: EmailMessage) -> AppResult<()> {
        let url = format!("{}/v3/mail/send", self.config.api_base.trim_end_matches('/'));

        let body = json!({
            "personalizations": [{
                "to": [{ "email": message.to_email, "name": message.to_name }]
            }],
            "from": { "email": self.config.from_email, "name": self.config.from_name },
            "subject": message.subject,
            "content": [
                { "type": "text/plain", "value": message.text },
                { "type": "text/html", "value": message.html }
            ]
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if response.status().is_success() {
            log::info!("Email \"{}\" sent to {}", message.subject, message.to_email);
            Ok(())
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::error!(
                "Email \"{}\" to {} failed: {}",
                message.subject,
                message.to_email,
                error_text
            );
            Err(AppError::ExternalApiError(format!(
                "Email sending failed: {error_text}"
            )))
        }
    }
}

pub fn password_reset_email(to_email: &str, name: &str, reset_url: &str) -> EmailMessage {
    EmailMessage {
        to_email: to_email.to_string(),
        to_name: name.to_string(),
        subject: "Password Reset Request".to_string(),
        text: format!(
            "Hi {name},\n\n\
             You requested to reset your password. Visit the link below to create a new password:\n\n\
             {reset_url}\n\n\
             This link will expire in 1 hour.\n\n\
             If you didn't request a password reset, please ignore this email.\n"
        ),
        html: format!(
            "<h2>Password Reset Request</h2>\
             <p>Hi {name},</p>\
             <p>You requested to reset your password. Click the link below to create a new password:</p>\
             <p><a href=\"{reset_url}\">Reset Password</a></p>\
             <p>{reset_url}</p>\
             <p><strong>This link will expire in 1 hour.</strong></p>\
             <p>If you didn't request a password reset, please ignore this email.</p>"
        ),
    }
}

pub fn welcome_email(to_email: &str, name: &str) -> EmailMessage {
    EmailMessage {
        to_email: to_email.to_string(),
        to_name: name.to_string(),
        subject: "Welcome to Diner!".to_string(),
        text: format!(
            "Hi {name},\n\n\
             Thank you for joining Diner! We're excited to have you on board.\n\n\
             You can now start exploring our menu and placing orders.\n"
        ),
        html: format!(
            "<h2>Welcome to Diner!</h2>\
             <p>Hi {name},</p>\
             <p>Thank you for joining us! We're excited to have you on board.</p>\
             <p>You can now start exploring our menu and placing orders.</p>"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_reset_email_contains_link() {
        let msg = password_reset_email(
            "guest@diner.com",
            "Ana",
            "http://localhost:3000/reset-password/abc",
        );
        assert_eq!(msg.to_email, "guest@diner.com");
        assert!(msg.text.contains("http://localhost:3000/reset-password/abc"));
        assert!(msg.html.contains("href=\"http://localhost:3000/reset-password/abc\""));
        assert!(msg.text.contains("1 hour"));
    }

    #[test]
    fn test_welcome_email_greets_by_name() {
        let msg = welcome_email("guest@diner.com", "Ana");
        assert!(msg.text.starts_with("Hi Ana,"));
    }
}
