//! # Server Configuration
//!
//! Configuration with serde-level defaults, loadable from the environment.
//! A `.env` file in the working directory is honored when present.

use serde::{Deserialize, Serialize};

use crate::auth::EmailConfig;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 5000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins (empty = permissive, for development)
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// JWT signing secret
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// JWT lifetime in days (default: 30)
    #[serde(default = "default_jwt_expire_days")]
    pub jwt_expire_days: i64,

    /// Directory uploaded photos are written to
    #[serde(default = "default_upload_path")]
    pub file_upload_path: String,

    /// Upload size cap in bytes (default: 1 MB)
    #[serde(default = "default_max_file_upload")]
    pub max_file_upload: u64,

    /// SMTP host; empty disables outbound email
    #[serde(default)]
    pub smtp_host: String,

    /// SMTP port
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// SMTP username
    #[serde(default)]
    pub smtp_user: String,

    /// SMTP password
    #[serde(default)]
    pub smtp_password: String,

    /// From address on outbound mail
    #[serde(default = "default_from_email")]
    pub from_email: String,

    /// Base URL used in emailed links
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_jwt_secret() -> String {
    "CHANGE_THIS_SECRET_IN_PRODUCTION".to_string()
}

fn default_jwt_expire_days() -> i64 {
    30
}

fn default_upload_path() -> String {
    "./public/uploads".to_string()
}

fn default_max_file_upload() -> u64 {
    1_000_000
}

fn default_smtp_port() -> u16 {
    1025
}

fn default_from_email() -> String {
    "noreply@campdir.local".to_string()
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        // Serde fills every field from its default fn
        serde_json::from_value(serde_json::json!({})).expect("defaults are complete")
    }
}

impl ServerConfig {
    /// Load configuration from the environment (and `.env`, when present)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(host) = std::env::var("HOST") {
            config.host = host;
        }
        if let Some(port) = env_parse("PORT") {
            config.port = port;
        }
        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            config.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            config.jwt_secret = secret;
        }
        if let Some(days) = env_parse("JWT_EXPIRE_DAYS") {
            config.jwt_expire_days = days;
        }
        if let Ok(path) = std::env::var("FILE_UPLOAD_PATH") {
            config.file_upload_path = path;
        }
        if let Some(max) = env_parse("MAX_FILE_UPLOAD") {
            config.max_file_upload = max;
        }
        if let Ok(host) = std::env::var("SMTP_HOST") {
            config.smtp_host = host;
        }
        if let Some(port) = env_parse("SMTP_PORT") {
            config.smtp_port = port;
        }
        if let Ok(user) = std::env::var("SMTP_USER") {
            config.smtp_user = user;
        }
        if let Ok(password) = std::env::var("SMTP_PASSWORD") {
            config.smtp_password = password;
        }
        if let Ok(email) = std::env::var("FROM_EMAIL") {
            config.from_email = email;
        }
        if let Ok(url) = std::env::var("BASE_URL") {
            config.base_url = url;
        }

        config
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// SMTP settings, when outbound email is configured
    pub fn email_config(&self) -> Option<EmailConfig> {
        if self.smtp_host.is_empty() {
            return None;
        }
        Some(EmailConfig {
            smtp_host: self.smtp_host.clone(),
            smtp_port: self.smtp_port,
            smtp_user: self.smtp_user.clone(),
            smtp_password: self.smtp_password.clone(),
            from_email: self.from_email.clone(),
            from_name: "campdir".to_string(),
            base_url: self.base_url.clone(),
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
