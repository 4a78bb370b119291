//! Centralized configuration for the Login Service.
//!
//! All configuration is loaded from environment variables and validated
//! at startup.

use crate::error::TokenError;
use chrono::Duration;
use secrecy::{ExposeSecret, SecretString};
use std::env;
use std::str::FromStr;

const DEFAULT_SECRET: &str = "CHANGE_ME_TO_A_LONG_RANDOM_SECRET_FOR_REAL_USE";

/// Upper bound for `ACCESS_TOKEN_MINUTES` (one day).
pub const MAX_ACCESS_TOKEN_MINUTES: i64 = 24 * 60;
/// Upper bound for `REFRESH_TOKEN_DAYS` (ten years).
pub const MAX_REFRESH_TOKEN_DAYS: i64 = 3650;

/// JWT signing algorithm. Only HMAC variants are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JwtAlgorithm {
    /// HMAC with SHA-256
    HS256,
    /// HMAC with SHA-384
    HS384,
    /// HMAC with SHA-512
    HS512,
}

impl FromStr for JwtAlgorithm {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "HS256" => Ok(Self::HS256),
            "HS384" => Ok(Self::HS384),
            "HS512" => Ok(Self::HS512),
            _ => Err(TokenError::config(format!("Invalid JWT algorithm: {s}"))),
        }
    }
}

impl JwtAlgorithm {
    /// Get algorithm name for JWT header.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HS256 => "HS256",
            Self::HS384 => "HS384",
            Self::HS512 => "HS512",
        }
    }

    /// Matching `jsonwebtoken` algorithm.
    #[must_use]
    pub const fn to_jsonwebtoken(self) -> jsonwebtoken::Algorithm {
        match self {
            Self::HS256 => jsonwebtoken::Algorithm::HS256,
            Self::HS384 => jsonwebtoken::Algorithm::HS384,
            Self::HS512 => jsonwebtoken::Algorithm::HS512,
        }
    }
}

/// Login Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    // Server settings
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Service name reported by the health endpoint
    pub service_name: String,

    // JWT / OIDC settings
    /// Issuer URL, used as the `iss` claim
    pub issuer_url: String,
    /// Symmetric signing secret
    pub jwt_secret: SecretString,
    /// JWT signing algorithm
    pub jwt_algorithm: JwtAlgorithm,
    /// Key id placed in the JWT header and JWKS
    pub jwt_key_id: String,
    /// Access and ID token TTL
    pub access_token_ttl: Duration,
    /// Refresh token TTL
    pub refresh_token_ttl: Duration,

    // Ledger
    /// Run an expiry sweep every this many inserts (0 disables)
    pub ledger_sweep_interval: u64,

    // Logging
    /// Log level filter
    pub log_level: String,
    /// Emit JSON log lines
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            service_name: "login-service".to_string(),
            issuer_url: "http://localhost:8000".to_string(),
            jwt_secret: SecretString::from(DEFAULT_SECRET),
            jwt_algorithm: JwtAlgorithm::HS256,
            jwt_key_id: "demo-symmetric-key".to_string(),
            access_token_ttl: Duration::minutes(30),
            refresh_token_ttl: Duration::days(7),
            ledger_sweep_interval: 256,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if variables are invalid.
    pub fn from_env() -> Result<Self, TokenError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if values are invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TokenError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let host = get("HOST", &defaults.host);
        let port = parse_var(&lookup, "PORT", defaults.port)?;
        let service_name = get("SERVICE_NAME", &defaults.service_name);

        let issuer_url = get("ISSUER_URL", &defaults.issuer_url);
        let jwt_secret = SecretString::from(get("JWT_SECRET", DEFAULT_SECRET));
        let jwt_algorithm = get("JWT_ALGORITHM", defaults.jwt_algorithm.as_str()).parse()?;
        let jwt_key_id = get("JWT_KEY_ID", &defaults.jwt_key_id);

        let access_minutes: i64 = parse_var(&lookup, "ACCESS_TOKEN_MINUTES", 30)?;
        let refresh_days: i64 = parse_var(&lookup, "REFRESH_TOKEN_DAYS", 7)?;
        let ledger_sweep_interval =
            parse_var(&lookup, "LEDGER_SWEEP_INTERVAL", defaults.ledger_sweep_interval)?;

        let log_level = get("LOG_LEVEL", &defaults.log_level).to_lowercase();
        let log_json = parse_var(&lookup, "LOG_JSON", false)?;

        let access_token_ttl = Duration::try_minutes(access_minutes)
            .ok_or_else(|| TokenError::config("ACCESS_TOKEN_MINUTES out of range"))?;
        let refresh_token_ttl = Duration::try_days(refresh_days)
            .ok_or_else(|| TokenError::config("REFRESH_TOKEN_DAYS out of range"))?;

        let config = Self {
            host,
            port,
            service_name,
            issuer_url,
            jwt_secret,
            jwt_algorithm,
            jwt_key_id,
            access_token_ttl,
            refresh_token_ttl,
            ledger_sweep_interval,
            log_level,
            log_json,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check invariants the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns an error on an empty secret or key id, or a TTL outside
    /// `(0, MAX]`.
    pub fn validate(&self) -> Result<(), TokenError> {
        if self.jwt_secret.expose_secret().is_empty() {
            return Err(TokenError::config("JWT_SECRET must not be empty"));
        }
        if self.jwt_key_id.is_empty() {
            return Err(TokenError::config("JWT_KEY_ID must not be empty"));
        }
        if self.access_token_ttl <= Duration::zero() {
            return Err(TokenError::config("ACCESS_TOKEN_MINUTES must be positive"));
        }
        if self.refresh_token_ttl <= Duration::zero() {
            return Err(TokenError::config("REFRESH_TOKEN_DAYS must be positive"));
        }
        if self.access_token_ttl > Duration::minutes(MAX_ACCESS_TOKEN_MINUTES) {
            return Err(TokenError::config(format!(
                "ACCESS_TOKEN_MINUTES must not exceed {MAX_ACCESS_TOKEN_MINUTES}"
            )));
        }
        if self.refresh_token_ttl > Duration::days(MAX_REFRESH_TOKEN_DAYS) {
            return Err(TokenError::config(format!(
                "REFRESH_TOKEN_DAYS must not exceed {MAX_REFRESH_TOKEN_DAYS}"
            )));
        }
        Ok(())
    }

    /// Issuer URL without a trailing slash.
    #[must_use]
    pub fn issuer_base(&self) -> &str {
        self.issuer_url.trim_end_matches('/')
    }

    /// Socket address string to bind.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse a variable with a default value.
fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T, TokenError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(val) => val
            .trim()
            .parse()
            .map_err(|e| TokenError::config(format!("Invalid {name}: {e}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_jwt_algorithm_parsing() {
        assert_eq!("HS256".parse::<JwtAlgorithm>().unwrap(), JwtAlgorithm::HS256);
        assert_eq!("hs384".parse::<JwtAlgorithm>().unwrap(), JwtAlgorithm::HS384);
        assert_eq!("HS512".parse::<JwtAlgorithm>().unwrap(), JwtAlgorithm::HS512);
        assert!("RS256".parse::<JwtAlgorithm>().is_err());
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();

        assert_eq!(config.port, 8000);
        assert_eq!(config.issuer_url, "http://localhost:8000");
        assert_eq!(config.jwt_algorithm, JwtAlgorithm::HS256);
        assert_eq!(config.jwt_key_id, "demo-symmetric-key");
        assert_eq!(config.access_token_ttl, Duration::minutes(30));
        assert_eq!(config.refresh_token_ttl, Duration::days(7));
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("ISSUER_URL", "https://id.example.com/"),
            ("JWT_ALGORITHM", "HS512"),
            ("ACCESS_TOKEN_MINUTES", "5"),
            ("REFRESH_TOKEN_DAYS", "1"),
            ("LOG_LEVEL", "DEBUG"),
        ]))
        .unwrap();

        assert_eq!(config.issuer_base(), "https://id.example.com");
        assert_eq!(config.jwt_algorithm, JwtAlgorithm::HS512);
        assert_eq!(config.access_token_ttl, Duration::minutes(5));
        assert_eq!(config.refresh_token_ttl, Duration::days(1));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_config_rejects_invalid_values() {
        assert!(Config::from_lookup(lookup_from(&[("ACCESS_TOKEN_MINUTES", "0")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("REFRESH_TOKEN_DAYS", "-1")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("PORT", "not-a-port")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("JWT_SECRET", "")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("JWT_ALGORITHM", "ES256")])).is_err());
    }

    #[test]
    fn test_config_rejects_oversized_ttls() {
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("REFRESH_TOKEN_DAYS", "100000000")])),
            Err(TokenError::Config(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("ACCESS_TOKEN_MINUTES", "1441")])),
            Err(TokenError::Config(_))
        ));

        let at_limit = Config::from_lookup(lookup_from(&[
            ("ACCESS_TOKEN_MINUTES", "1440"),
            ("REFRESH_TOKEN_DAYS", "3650"),
        ]))
        .unwrap();
        assert_eq!(at_limit.refresh_token_ttl, Duration::days(MAX_REFRESH_TOKEN_DAYS));
    }
}
