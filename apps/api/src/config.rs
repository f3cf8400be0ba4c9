use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{LlmSettings, DEFAULT_API_URL, DEFAULT_MODEL};

/// Upper bound on `LLM_MAX_RETRIES`.
const MAX_LLM_RETRIES: u32 = 10;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub llm_api_key: String,
    pub llm_api_url: String,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    pub llm_max_retries: u32,
    pub llm_retry_base_ms: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            llm_api_key: require_env("LLM_API_KEY")?,
            llm_api_url: std::env::var("LLM_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            llm_model: std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 60)?,
            llm_max_retries: parse_env::<u32>("LLM_MAX_RETRIES", 2)?.min(MAX_LLM_RETRIES),
            llm_retry_base_ms: parse_env("LLM_RETRY_BASE_MS", 1000)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn llm_settings(&self) -> LlmSettings {
        LlmSettings {
            api_url: self.llm_api_url.clone(),
            api_key: self.llm_api_key.clone(),
            model: self.llm_model.clone(),
            timeout: Duration::from_secs(self.llm_timeout_secs),
            max_retries: self.llm_max_retries.min(MAX_LLM_RETRIES),
            retry_base_delay: Duration::from_millis(self.llm_retry_base_ms),
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
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u32 = parse_env("HORSECOACH_TEST_UNSET_VAR", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("HORSECOACH_TEST_BAD_PORT", "eighty");
        let result: Result<u16> = parse_env("HORSECOACH_TEST_BAD_PORT", 8080);
        assert!(result.is_err());
    }

    #[test]
    fn test_llm_settings_follow_config() {
        let config = Config {
            database_url: "postgres://localhost/horsecoach".to_string(),
            llm_api_key: "key".to_string(),
            llm_api_url: "http://localhost:1234/v1/chat/completions".to_string(),
            llm_model: "small".to_string(),
            llm_timeout_secs: 5,
            llm_max_retries: 4,
            llm_retry_base_ms: 250,
            port: 8080,
            rust_log: "debug".to_string(),
        };
        let settings = config.llm_settings();
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.max_retries, 4);
        assert_eq!(settings.retry_base_delay, Duration::from_millis(250));
        assert_eq!(settings.model, "small");
    }

    #[test]
    fn test_llm_retries_are_capped() {
        std::env::set_var("DATABASE_URL", "postgres://localhost/horsecoach");
        std::env::set_var("LLM_API_KEY", "key");
        std::env::set_var("LLM_MAX_RETRIES", "4000000000");
        let config = Config::from_env().unwrap();
        std::env::remove_var("LLM_MAX_RETRIES");
        assert_eq!(config.llm_max_retries, MAX_LLM_RETRIES);
        assert_eq!(config.llm_settings().max_retries, MAX_LLM_RETRIES);
    }
}
