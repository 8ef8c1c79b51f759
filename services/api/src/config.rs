use minimi_core::chat::{DEFAULT_CHAT_API_BASE, DEFAULT_CHAT_MODEL};
use secrecy::SecretString;
use std::net::SocketAddr;
use tracing::Level;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_STABILITY_HOST: &str = "https://api.stability.ai";
const DEFAULT_STABILITY_ENGINE: &str = "stable-diffusion-xl-1024-v1-0";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub chat_api_base: String,
    pub chat_model: String,
    pub chat_api_key: Option<SecretString>,
    pub stability_api_key: Option<SecretString>,
    pub stability_api_host: String,
    pub stability_engine: String,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// This function will look for a `.env` file in the current directory
    /// and load the following variables:
    ///
    /// *   `BIND_ADDRESS`: The address and port to bind the server to. Defaults to "0.0.0.0:3000".
    /// *   `CHAT_API_BASE`: Base URL of the chat-completion proxy. Defaults to "http://localhost:1337/v1".
    /// *   `CHAT_MODEL`: (Optional) The model to request. Defaults to "gpt-4".
    /// *   `CHAT_API_KEY`: (Optional) Bearer key for the chat proxy.
    /// *   `STABILITY_API_KEY`: (Optional) Key for image generation. Without it only
    ///     image requests fail, and they fail when made.
    /// *   `STABILITY_API_HOST` / `STABILITY_ENGINE`: (Optional) Image service overrides.
    /// *   `RUST_LOG`: (Optional) The logging level. Defaults to "INFO".
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset.
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_address_str =
            var("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let chat_api_base =
            var("CHAT_API_BASE").unwrap_or_else(|| DEFAULT_CHAT_API_BASE.to_string());
        let chat_model = var("CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string());
        let chat_api_key = var("CHAT_API_KEY").map(SecretString::from);

        let stability_api_key = var("STABILITY_API_KEY").map(SecretString::from);
        let stability_api_host =
            var("STABILITY_API_HOST").unwrap_or_else(|| DEFAULT_STABILITY_HOST.to_string());
        let stability_engine =
            var("STABILITY_ENGINE").unwrap_or_else(|| DEFAULT_STABILITY_ENGINE.to_string());

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            bind_address,
            chat_api_base,
            chat_model,
            chat_api_key,
            stability_api_key,
            stability_api_host,
            stability_engine,
            log_level,
        })
    }
}
