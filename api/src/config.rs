//! Centralized configuration management.
//!
//! All environment variables are read once at startup into an explicit
//! struct that travels through `AppState`. No global config singleton.

use shelfpost::SmtpSettings;

/// Root of the scanned library. Deliberately a constant, not an env var:
/// the scanner is pinned to the NAS mount this server was built around.
pub const LIBRARY_ROOT: &str = "/mnt/nas/media/Books";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SMTP relay hostname (default: "smtp.gmail.com")
    pub smtp_host: String,
    /// SMTP relay port (default: 587)
    pub smtp_port: u16,
    /// SMTP username (default: empty - mail endpoints disabled)
    pub smtp_user: String,
    /// SMTP password (default: empty)
    pub smtp_pass: String,
    /// Sender address for outgoing mail (default: SMTP_USER)
    pub smtp_sender: String,
    /// HTTP server port (default: 5678)
    pub port: u16,
    /// HTTP server bind address (default: "0.0.0.0")
    pub ip: String,
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults above. Nothing here is required: a box with no relay still
    /// serves scans and deletes.
    pub fn from_env() -> Self {
        let smtp_user = std::env::var("SMTP_USER").unwrap_or_default();
        Self {
            smtp_host: std::env::var("SMTP_HOST")
                .unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(587),
            smtp_pass: std::env::var("SMTP_PASS").unwrap_or_default(),
            smtp_sender: std::env::var("SMTP_SENDER").unwrap_or_else(|_| smtp_user.clone()),
            smtp_user,
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5678),
            ip: std::env::var("IP").unwrap_or_else(|_| "0.0.0.0".to_string()),
        }
    }

    /// The slice of the config the mail dispatcher cares about.
    pub fn smtp_settings(&self) -> SmtpSettings {
        SmtpSettings {
            host: self.smtp_host.clone(),
            port: self.smtp_port,
            user: self.smtp_user.clone(),
            pass: self.smtp_pass.clone(),
            sender: self.smtp_sender.clone(),
        }
    }
}
