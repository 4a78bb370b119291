//! Tracing subscriber setup.

use crate::config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Tracing configuration.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Service name attached to the startup event
    pub service_name: String,
    /// Log level filter, used when `RUST_LOG` is unset
    pub log_level: String,
    /// Whether to output JSON format
    pub json_output: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            service_name: "login-service".to_string(),
            log_level: "info".to_string(),
            json_output: false,
        }
    }
}

impl TracingConfig {
    /// Derive tracing settings from service configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            service_name: config.service_name.clone(),
            log_level: config.log_level.clone(),
            json_output: config.log_json,
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level))
    }
}

/// Install the global subscriber. Call once at startup.
///
/// A second call is a no-op (the existing subscriber stays installed).
pub fn init_tracing(config: &TracingConfig) {
    let result = if config.json_output {
        tracing_subscriber::registry()
            .with(config.filter())
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(config.filter())
            .with(tracing_subscriber::fmt::layer())
            .try_init()
    };

    if result.is_ok() {
        tracing::debug!(service = %config.service_name, "Tracing initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let config = Config {
            log_level: "debug".to_string(),
            log_json: true,
            ..Config::default()
        };
        let tracing = TracingConfig::from_config(&config);

        assert_eq!(tracing.service_name, "login-service");
        assert_eq!(tracing.log_level, "debug");
        assert!(tracing.json_output);
    }

    #[test]
    fn test_default_is_plain_info() {
        let config = TracingConfig::default();

        assert_eq!(config.log_level, "info");
        assert!(!config.json_output);
    }
}
