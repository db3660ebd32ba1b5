//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SUPABASE_URL` - Base URL of the hosted backend project
//! - `SUPABASE_ANON_KEY` - Publishable API key for the project
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `ADMIN_BASE_URL` - Public URL of the admin panel (default:
//!   `http://127.0.0.1:3001`; an `https://` value enables Secure cookies)
//! - `STORE_PHONE` - Fallback WhatsApp number used when an order has no
//!   usable phone number
//! - `SETTINGS_PATH` - Path of the store-settings JSON file (default:
//!   `store-settings.json`)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use bude_peyek_core::Phone;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the admin panel
    pub base_url: String,
    /// Hosted backend configuration
    pub supabase: SupabaseConfig,
    /// Fallback WhatsApp number for orders without a usable phone
    pub store_phone: Option<Phone>,
    /// Where the store-settings JSON file lives
    pub settings_path: PathBuf,
}

/// Hosted backend (tables + auth + storage) configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project base URL (e.g., `https://abc123.supabase.co`)
    pub url: Url,
    /// Publishable (anon) API key; row-level security on the backend is the
    /// actual authorization boundary
    pub anon_key: SecretString,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url.as_str())
            .field("anon_key", &"[REDACTED]")
            .finish()
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a required variable is missing, a value
    /// fails to parse, or the API key looks like an unfilled placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        let supabase_url = require_env("SUPABASE_URL")?;
        let url = Url::parse(&supabase_url).map_err(|e| {
            ConfigError::InvalidEnvVar("SUPABASE_URL".to_string(), e.to_string())
        })?;

        let anon_key = require_env("SUPABASE_ANON_KEY")?;
        check_not_placeholder("SUPABASE_ANON_KEY", &anon_key)?;

        let host: IpAddr = optional_env("ADMIN_HOST")
            .unwrap_or_else(|| "127.0.0.1".to_string())
            .parse()
            .map_err(|_| {
                ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), "not an IP address".into())
            })?;

        let port: u16 = optional_env("ADMIN_PORT")
            .unwrap_or_else(|| "3001".to_string())
            .parse()
            .map_err(|_| {
                ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), "not a port number".into())
            })?;

        let base_url =
            optional_env("ADMIN_BASE_URL").unwrap_or_else(|| "http://127.0.0.1:3001".to_string());

        let store_phone = optional_env("STORE_PHONE")
            .map(|raw| {
                Phone::parse(&raw).map_err(|e| {
                    ConfigError::InvalidEnvVar("STORE_PHONE".to_string(), e.to_string())
                })
            })
            .transpose()?;

        let settings_path = optional_env("SETTINGS_PATH")
            .map_or_else(|| PathBuf::from("store-settings.json"), PathBuf::from);

        Ok(Self {
            host,
            port,
            base_url,
            supabase: SupabaseConfig {
                url,
                anon_key: SecretString::from(anon_key),
            },
            store_phone,
            settings_path,
        })
    }

    /// Socket address to bind the server to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the panel is served over HTTPS (controls Secure cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingEnvVar(name.to_string())),
    }
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn check_not_placeholder(name: &str, value: &str) -> Result<(), ConfigError> {
    let lower = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                name.to_string(),
                format!("value looks like a placeholder ({pattern})"),
            ));
        }
    }
    Ok(())
}
