//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub allowed_origin: String,
    /// When unset, the offline demo responder stands in for the language model.
    pub openai_api_key: Option<String>,
    pub chat_model: String,
    pub chat_temperature: f32,
    pub chat_max_tokens: u32,
    pub storage_dir: PathBuf,
    pub storage_key: String,
    /// When set, the project is kept in Postgres instead of a file.
    pub database_url: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server Settings ---
        let bind_address = parse_or("BIND_ADDRESS", &lookup, "0.0.0.0:3001")?;
        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;
        let allowed_origin =
            lookup("ALLOWED_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string());

        // --- Language Model Settings ---
        let openai_api_key = lookup("OPENAI_API_KEY").filter(|key| !key.is_empty());
        let chat_model = lookup("CHAT_MODEL").unwrap_or_else(|| "gpt-3.5-turbo".to_string());
        let chat_temperature = parse_or("CHAT_TEMPERATURE", &lookup, "0.7")?;
        let chat_max_tokens = parse_or("CHAT_MAX_TOKENS", &lookup, "500")?;

        // --- Storage Settings ---
        let storage_dir = lookup("STORAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data"));
        let storage_key =
            lookup("STORAGE_KEY").unwrap_or_else(|| "thought-partner-project".to_string());
        if storage_key.is_empty() {
            return Err(ConfigError::MissingVar("STORAGE_KEY".to_string()));
        }
        let database_url = lookup("DATABASE_URL").filter(|url| !url.is_empty());

        Ok(Self {
            bind_address,
            log_level,
            allowed_origin,
            openai_api_key,
            chat_model,
            chat_temperature,
            chat_max_tokens,
            storage_dir,
            storage_key,
            database_url,
        })
    }
}

fn parse_or<T, F>(name: &str, lookup: &F, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name).unwrap_or_else(|| default.to_string());
    raw.parse::<T>()
        .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_with(&[]).expect("defaults are valid");
        assert_eq!(config.bind_address.port(), 3001);
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.chat_model, "gpt-3.5-turbo");
        assert_eq!(config.chat_max_tokens, 500);
        assert_eq!(config.storage_key, "thought-partner-project");
        assert!(config.openai_api_key.is_none());
        assert!(config.database_url.is_none());
    }

    #[test]
    fn empty_api_key_counts_as_unset() {
        let config = config_with(&[("OPENAI_API_KEY", "")]).expect("valid");
        assert!(config.openai_api_key.is_none());
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = config_with(&[("CHAT_MAX_TOKENS", "lots")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref name, _) if name == "CHAT_MAX_TOKENS"));

        let err = config_with(&[("RUST_LOG", "chatty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref name, _) if name == "RUST_LOG"));
    }
}
