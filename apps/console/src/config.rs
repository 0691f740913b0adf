use anyhow::{Context, Result};

/// Application configuration loaded from environment variables, with
/// individual fields overridable from the command line.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote directory service, e.g. `http://0.0.0.0:3000/api`.
    pub api_url: String,
    /// Roster poll cadence in seconds.
    pub poll_interval_secs: u64,
    /// Per-request timeout for directory calls, in seconds.
    pub request_timeout_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_url: require_env("CONSOLE_API_URL")?,
            poll_interval_secs: std::env::var("POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<u64>()
                .context("POLL_INTERVAL_SECS must be a number of seconds")?,
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u64>()
                .context("REQUEST_TIMEOUT_SECS must be a number of seconds")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
