//! Environment-driven settings for the server binary.
//!
//! # Environment Variables
//!
//! - `PORT`           — HTTP port (default: 8080)
//! - `CONTRACTS_DB`   — SQLite database path (default: "contracts.db")
//! - `MAIL_RELAY_URL` — HTTP mail relay endpoint; mail is dropped when unset
//! - `MAIL_FROM`      — Sender address (default: "contracts@localhost")
//! - `MAIL_FROM_NAME` — Sender display name (default: "Contracts System")
//! - `MAIL_CC`        — Optional CC address added to every notification
//! - `MAIL_TOKEN`     — Optional bearer token for the relay

use std::path::PathBuf;

/// Mail relay settings.
#[derive(Debug, Clone)]
pub struct MailSettings {
    /// Relay endpoint; `None` disables delivery.
    pub relay_url: Option<String>,
    pub from_email: String,
    pub from_name: String,
    pub cc_email: Option<String>,
    pub api_token: Option<String>,
}

/// Full server settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub db_path: PathBuf,
    pub mail: MailSettings,
}

impl Settings {
    /// Read settings from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let db_path =
            PathBuf::from(std::env::var("CONTRACTS_DB").unwrap_or_else(|_| "contracts.db".into()));

        let mail = MailSettings {
            relay_url: non_empty_var("MAIL_RELAY_URL"),
            from_email: std::env::var("MAIL_FROM").unwrap_or_else(|_| "contracts@localhost".into()),
            from_name: std::env::var("MAIL_FROM_NAME")
                .unwrap_or_else(|_| "Contracts System".into()),
            cc_email: non_empty_var("MAIL_CC"),
            api_token: non_empty_var("MAIL_TOKEN"),
        };

        Self {
            port,
            db_path,
            mail,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
