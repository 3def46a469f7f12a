use std::net::SocketAddr;

use crate::users::AllowedUser;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Service account credentials and endpoints for the Google Sheets API.
#[derive(Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub api_base: String,
    pub token_url: String,
    pub client_email: String,
    pub private_key: String,
    pub project_id: Option<String>,
    pub client_id: Option<String>,
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("api_base", &self.api_base)
            .field("token_url", &self.token_url)
            .field("client_email", &self.client_email)
            .field("private_key", &"[redacted]")
            .field("project_id", &self.project_id)
            .field("client_id", &self.client_id)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub sheets: SheetsConfig,
    pub jwt_secret: String,
    pub allowed_users: Vec<AllowedUser>,
}

impl AppConfig {
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.env == Environment::Production
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("sheets", &self.sheets)
            .field("jwt_secret", &"[redacted]")
            .field("allowed_users", &self.allowed_users.len())
            .finish()
    }
}
