//! # Email Integration
//!
//! Email dispatch for the password reset flow.

use std::sync::Arc;

use super::errors::{AuthError, AuthResult};

/// Email configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server host
    pub smtp_host: String,

    /// SMTP server port
    pub smtp_port: u16,

    /// SMTP username
    pub smtp_user: String,

    /// SMTP password (should come from secrets)
    pub smtp_password: String,

    /// From email address
    pub from_email: String,

    /// From name
    pub from_name: String,

    /// Base URL for links
    pub base_url: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_user: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@campdir.local".to_string(),
            from_name: "campdir".to_string(),
            base_url: "http://localhost:5000".to_string(),
        }
    }
}

/// Email template types
#[derive(Debug, Clone)]
pub enum EmailTemplate {
    /// Password reset
    PasswordReset { token: String, user_email: String },

    /// Password changed notification
    PasswordChanged { user_email: String },
}

/// Email sender trait for abstraction
pub trait EmailSender: Send + Sync {
    /// Send an email
    fn send(&self, template: EmailTemplate) -> AuthResult<()>;
}

/// Mock email sender for testing
#[derive(Debug, Default)]
pub struct MockEmailSender {
    /// Sent emails (for testing)
    pub sent: std::sync::RwLock<Vec<EmailTemplate>>,
}

impl MockEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get number of sent emails
    pub fn sent_count(&self) -> usize {
        self.sent.read().unwrap().len()
    }
}

impl EmailSender for MockEmailSender {
    fn send(&self, template: EmailTemplate) -> AuthResult<()> {
        self.sent.write().unwrap().push(template);
        Ok(())
    }
}

/// SMTP email sender
pub struct SmtpEmailSender {
    config: EmailConfig,
}

impl SmtpEmailSender {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn render_template(&self, template: &EmailTemplate) -> (String, String, String) {
        match template {
            EmailTemplate::PasswordReset { token, user_email } => {
                let subject = "Reset your password".to_string();
                let link = format!(
                    "{}/api/v1/auth/reset-password/{}",
                    self.config.base_url, token
                );
                let body = format!(
                    "Hello,\n\n\
                    You requested to reset your password. Make a PUT request to:\n\n\
                    {}\n\n\
                    This link will expire in 10 minutes.\n\n\
                    If you didn't request this, you can ignore this email.\n\n\
                    Thanks,\n\
                    The campdir Team",
                    link
                );
                (user_email.clone(), subject, body)
            }
            EmailTemplate::PasswordChanged { user_email } => {
                let subject = "Your password was changed".to_string();
                let body = "Hello,\n\n\
                    Your password was successfully changed.\n\n\
                    If you didn't make this change, please contact support immediately.\n\n\
                    Thanks,\n\
                    The campdir Team"
                    .to_string();
                (user_email.clone(), subject, body)
            }
        }
    }
}

impl EmailSender for SmtpEmailSender {
    fn send(&self, template: EmailTemplate) -> AuthResult<()> {
        use lettre::{
            message::header::ContentType, transport::smtp::authentication::Credentials, Message,
            SmtpTransport, Transport,
        };

        let (to, subject, body) = self.render_template(&template);

        let email = Message::builder()
            .from(
                format!("{} <{}>", self.config.from_name, self.config.from_email)
                    .parse()
                    .map_err(|e| AuthError::EmailError(format!("Invalid from address: {}", e)))?,
            )
            .to(to
                .parse()
                .map_err(|e| AuthError::EmailError(format!("Invalid to address: {}", e)))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| AuthError::EmailError(format!("Failed to build email: {}", e)))?;

        let mailer = if self.config.smtp_user.is_empty() {
            // No authentication (for local development SMTP servers)
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_user.clone(),
                self.config.smtp_password.clone(),
            );

            SmtpTransport::relay(&self.config.smtp_host)
                .map_err(|e| AuthError::EmailError(format!("SMTP relay error: {}", e)))?
                .credentials(creds)
                .port(self.config.smtp_port)
                .build()
        };

        mailer
            .send(&email)
            .map_err(|e| AuthError::EmailError(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}

/// Create a boxed email sender based on config
pub fn create_email_sender(config: Option<EmailConfig>) -> Arc<dyn EmailSender> {
    match config {
        Some(cfg) => Arc::new(SmtpEmailSender::new(cfg)),
        None => Arc::new(MockEmailSender::new()),
    }
}
