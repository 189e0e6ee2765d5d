use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Caller-side limit on each oracle call.
    pub oracle_timeout_secs: u64,
    /// Maximum number of scans returned by the history endpoint.
    pub history_limit: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            oracle_timeout_secs: std::env::var("ORACLE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "45".to_string())
                .parse::<u64>()
                .context("ORACLE_TIMEOUT_SECS must be a whole number of seconds")?,
            history_limit: std::env::var("HISTORY_LIMIT")
                .unwrap_or_else(|_| "50".to_string())
                .parse::<i64>()
                .context("HISTORY_LIMIT must be an integer")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
