//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Connection details for the hosted video provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoProviderConfig {
    pub base_url: String,
    pub api_key: String,
    pub server_token: String,
    pub call_type: String,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    /// Base for join links and for the fallback feedback path.
    pub public_base_url: String,
    /// When unset, feedback is posted to `<public_base_url>/api/feedback`.
    pub feedback_api_base_url: Option<String>,
    pub feedback_timeout: Duration,
    /// Feedback forms untouched for this long are closed.
    pub feedback_session_ttl: Duration,
    /// When unset, rooms are kept by the in-memory provider.
    pub video_provider: Option<VideoProviderConfig>,
    pub provider_timeout: Duration,
    pub cors_origin: String,
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

    /// Builds the configuration from any variable lookup.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let optional = |name: &str| var(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        // --- Server Settings ---
        let bind_address_str = optional("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = optional("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let public_base_url = optional("PUBLIC_BASE_URL")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();
        let cors_origin =
            optional("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string());

        // --- Feedback API ---
        let feedback_api_base_url = optional("FEEDBACK_API_BASE_URL");
        let seconds = |name: &str, default: u64| -> Result<Duration, ConfigError> {
            match optional(name) {
                Some(raw) => raw
                    .parse::<u64>()
                    .ok()
                    .filter(|s| *s > 0)
                    .map(Duration::from_secs)
                    .ok_or_else(|| {
                        ConfigError::InvalidValue(
                            name.to_string(),
                            format!("'{}' is not a positive number of seconds", raw),
                        )
                    }),
                None => Ok(Duration::from_secs(default)),
            }
        };
        let feedback_timeout = seconds("FEEDBACK_TIMEOUT_SECS", 15)?;
        let feedback_session_ttl = seconds("FEEDBACK_SESSION_TTL_SECS", 3600)?;

        // --- Video Provider (all or nothing once the URL is given) ---
        let video_provider = match optional("VIDEO_PROVIDER_URL") {
            Some(base_url) => Some(VideoProviderConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                api_key: optional("VIDEO_PROVIDER_API_KEY")
                    .ok_or_else(|| ConfigError::MissingVar("VIDEO_PROVIDER_API_KEY".to_string()))?,
                server_token: optional("VIDEO_PROVIDER_TOKEN")
                    .ok_or_else(|| ConfigError::MissingVar("VIDEO_PROVIDER_TOKEN".to_string()))?,
                call_type: optional("VIDEO_CALL_TYPE").unwrap_or_else(|| "default".to_string()),
            }),
            None => None,
        };
        let provider_timeout = seconds("VIDEO_PROVIDER_TIMEOUT_SECS", 30)?;

        Ok(Self {
            bind_address,
            log_level,
            public_base_url,
            feedback_api_base_url,
            feedback_timeout,
            feedback_session_ttl,
            video_provider,
            provider_timeout,
            cors_origin,
        })
    }

    /// The generic path used when no feedback API base is configured.
    pub fn fallback_feedback_url(&self) -> String {
        format!("{}/api/feedback", self.public_base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_address.port(), 3000);
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.feedback_timeout, Duration::from_secs(15));
        assert_eq!(config.provider_timeout, Duration::from_secs(30));
        assert_eq!(config.feedback_session_ttl, Duration::from_secs(3600));
        assert!(config.feedback_api_base_url.is_none());
        assert!(config.video_provider.is_none());
        assert_eq!(config.fallback_feedback_url(), "http://localhost:3000/api/feedback");
    }

    #[test]
    fn video_provider_requires_credentials() {
        let err = load(&[("VIDEO_PROVIDER_URL", "https://video.example.com")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(v) if v == "VIDEO_PROVIDER_API_KEY"));

        let config = load(&[
            ("VIDEO_PROVIDER_URL", "https://video.example.com/"),
            ("VIDEO_PROVIDER_API_KEY", "key"),
            ("VIDEO_PROVIDER_TOKEN", "token"),
        ])
        .unwrap();
        let provider = config.video_provider.unwrap();
        assert_eq!(provider.base_url, "https://video.example.com");
        assert_eq!(provider.call_type, "default");
    }

    #[test]
    fn invalid_values_are_reported() {
        assert!(matches!(
            load(&[("FEEDBACK_TIMEOUT_SECS", "0")]),
            Err(ConfigError::InvalidValue(..))
        ));
        assert!(matches!(
            load(&[("FEEDBACK_SESSION_TTL_SECS", "soon")]),
            Err(ConfigError::InvalidValue(..))
        ));
        assert!(matches!(
            load(&[("BIND_ADDRESS", "nowhere")]),
            Err(ConfigError::InvalidValue(..))
        ));
        assert!(matches!(
            load(&[("RUST_LOG", "chatty")]),
            Err(ConfigError::InvalidValue(..))
        ));
    }
}
