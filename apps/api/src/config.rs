use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub openai_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// When false, plan limits on chat, template listing and upload listing are
    /// not enforced. `/api/uploads/context` and `/api/check-feature` always check.
    pub enforce_plan_limits: bool,
    /// Idle lifetime of an in-memory conversation. `None` keeps conversations
    /// for the lifetime of the process.
    pub conversation_ttl: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            openai_api_key: require_env("OPENAI_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            enforce_plan_limits: parse_flag(std::env::var("ENFORCE_PLAN_LIMITS").ok().as_deref()),
            conversation_ttl: std::env::var("CONVERSATION_TTL_SECS")
                .ok()
                .map(|raw| {
                    raw.parse::<u64>()
                        .context("CONVERSATION_TTL_SECS must be a whole number of seconds")
                })
                .transpose()?
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_truthy_values() {
        for v in ["1", "true", "TRUE", " yes ", "on"] {
            assert!(parse_flag(Some(v)), "{v} should be truthy");
        }
    }

    #[test]
    fn test_parse_flag_defaults_to_false() {
        assert!(!parse_flag(None));
        assert!(!parse_flag(Some("0")));
        assert!(!parse_flag(Some("nope")));
    }
}
