//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `DATA_DIR` (optional): directory for JSON documents, defaults to `data`
/// - `PUBLIC_DIR` (optional): static directory, uploads go to `<PUBLIC_DIR>/uploads`
/// - `ADMIN_SESSION_SECRET` (optional): HMAC key for admin sessions. Without it
///   nobody can log in.
/// - `ADMIN_PASSWORD` (optional): bootstrap password, ignored once a hash is stored
/// - `TG_BOT_TOKEN` / `TG_CHAT_ID` (optional): notification relay
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,

    #[serde(default)]
    pub admin_session_secret: Option<String>,

    #[serde(default)]
    pub admin_password: Option<String>,

    #[serde(default = "default_session_ttl_days")]
    pub session_ttl_days: i64,

    #[serde(default = "default_cookie_secure")]
    pub cookie_secure: bool,

    #[serde(default)]
    pub tg_bot_token: Option<String>,

    #[serde(default)]
    pub tg_chat_id: Option<String>,

    #[serde(default = "default_tg_api_base")]
    pub tg_api_base: String,

    #[serde(default = "default_site_name")]
    pub site_name: String,

    #[serde(default = "default_site_domain")]
    pub site_domain: String,

    #[serde(default = "default_site_url")]
    pub site_url: String,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

const MAX_SESSION_TTL_DAYS: i64 = 365;
const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

fn default_session_ttl_days() -> i64 {
    7
}

fn default_cookie_secure() -> bool {
    true
}

fn default_tg_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_site_name() -> String {
    "Site".to_string()
}

fn default_site_domain() -> String {
    "localhost".to_string()
}

fn default_site_url() -> String {
    "http://localhost:3000".to_string()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if environment variable values cannot be parsed into
    /// expected types (e.g. a non-numeric `SERVER_PORT`).
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are automatically converted: data_dir -> DATA_DIR
        envy::from_env::<Config>()
    }

    /// Session secret, treating an empty value as absent.
    pub fn session_secret(&self) -> Option<&str> {
        non_empty(self.admin_session_secret.as_deref())
    }

    /// Bootstrap password, treating an empty value as absent.
    pub fn bootstrap_password(&self) -> Option<&str> {
        non_empty(self.admin_password.as_deref())
    }

    /// Directory where uploaded images are stored.
    pub fn uploads_dir(&self) -> PathBuf {
        self.public_dir.join("uploads")
    }

    /// Session lifetime, with `SESSION_TTL_DAYS` clamped to 1..=365.
    pub fn session_ttl_millis(&self) -> i64 {
        self.session_ttl_days.clamp(1, MAX_SESSION_TTL_DAYS) * DAY_MILLIS
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: default_port(),
            data_dir: default_data_dir(),
            public_dir: default_public_dir(),
            admin_session_secret: None,
            admin_password: None,
            session_ttl_days: default_session_ttl_days(),
            cookie_secure: default_cookie_secure(),
            tg_bot_token: None,
            tg_chat_id: None,
            tg_api_base: default_tg_api_base(),
            site_name: default_site_name(),
            site_domain: default_site_domain(),
            site_url: default_site_url(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
