use anyhow::{Context, Result};

use crate::billing::paypal::PayPalMode;

pub const DEFAULT_MODEL: &str = "google/gemini-2.0-flash-001";

/// Application configuration loaded from environment variables.
///
/// Storage settings are required at startup. Vendor credentials are optional
/// here: a missing key fails only the request that needs it.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub openrouter_api_key: Option<String>,
    pub openrouter_model: String,
    pub paypal_client_id: Option<String>,
    pub paypal_secret_key: Option<String>,
    pub paypal_mode: PayPalMode,
    pub app_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            openrouter_api_key: optional_env("OPENROUTER_API_KEY"),
            openrouter_model: optional_env("OPENROUTER_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            paypal_client_id: optional_env("PAYPAL_CLIENT_ID"),
            paypal_secret_key: optional_env("PAYPAL_SECRET_KEY"),
            paypal_mode: optional_env("PAYPAL_MODE")
                .map(|m| m.parse::<PayPalMode>())
                .transpose()?
                .unwrap_or_default(),
            app_url: optional_env("APP_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Treats an empty value the same as an unset one.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
