use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Unset means narrative generation is disabled and every roadmap uses fallback text.
    pub anthropic_api_key: Option<String>,
    pub narrative_timeout: Duration,
    /// Also ask the generator for per-step strategies and resources.
    pub narrative_enrich_steps: bool,
    pub default_rank_limit: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let default_rank_limit = parse_env("DEFAULT_RANK_LIMIT", 10usize)?;
        if default_rank_limit == 0 {
            anyhow::bail!("DEFAULT_RANK_LIMIT must be at least 1");
        }

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            narrative_timeout: Duration::from_secs(parse_env("NARRATIVE_TIMEOUT_SECS", 15u64)?),
            narrative_enrich_steps: parse_env("NARRATIVE_ENRICH_STEPS", false)?,
            default_rank_limit,
            port: parse_env("PORT", 8080u16)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/pathwise_test".to_string(),
            anthropic_api_key: None,
            narrative_timeout: Duration::from_secs(1),
            narrative_enrich_steps: false,
            default_rank_limit: 10,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
