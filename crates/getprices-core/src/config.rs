//! Client configuration.
//!
//! [`ClientConfig::default`] targets the public getprices endpoint. Values
//! can be overridden from JSON ([`ClientConfig::from_json`]) or from the
//! environment ([`ClientConfig::from_env`]):
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `GETPRICES_BASE_URL` | endpoint the query string is appended to |
//! | `GETPRICES_TIMEOUT_MS` | per-request timeout |

use std::time::Duration;

use serde::Deserialize;

use crate::query::GETPRICES_URL;
use crate::ConfigError;

pub const ENV_BASE_URL: &str = "GETPRICES_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "GETPRICES_TIMEOUT_MS";

/// Settings for [`PriceHistoryClient`](crate::PriceHistoryClient).
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(GETPRICES_URL),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Flat, all-optional mirror of [`ClientConfig`] used for JSON input.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigOverrides {
    base_url: Option<String>,
    timeout_ms: Option<u64>,
}

impl ClientConfig {
    pub fn with_base_url(self, base_url: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: validate_base_url(base_url.into())?,
            ..self
        })
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    /// Defaults overridden by the keys present in a JSON object.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let overrides: ConfigOverrides = serde_json::from_str(input)?;
        Self::default().apply(overrides)
    }

    /// Defaults overridden by `GETPRICES_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable
    /// source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let overrides = ConfigOverrides {
            base_url: lookup(ENV_BASE_URL),
            timeout_ms: parse_env(&lookup, ENV_TIMEOUT_MS)?,
        };
        Self::default().apply(overrides)
    }

    fn apply(mut self, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        if let Some(base_url) = overrides.base_url {
            self.base_url = validate_base_url(base_url)?;
        }
        if let Some(timeout_ms) = overrides.timeout_ms {
            self.timeout = Duration::from_millis(timeout_ms);
        }
        Ok(self)
    }
}

fn parse_env<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(name)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|_| ConfigError::InvalidEnv { name, value })
        })
        .transpose()
}

fn validate_base_url(value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl { value });
    }
    Ok(trimmed.trim_end_matches('?').to_owned())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_target_public_endpoint() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://www.google.com/finance/getprices");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn json_overrides_only_present_keys() {
        let config = ClientConfig::from_json(r#"{"timeout_ms": 250}"#).expect("valid json");

        assert_eq!(config.timeout, Duration::from_millis(250));
        assert_eq!(config.base_url, GETPRICES_URL);
    }

    #[test]
    fn json_rejects_unknown_keys() {
        let err = ClientConfig::from_json(r#"{"max_retries": 2}"#).expect_err("unknown key");
        assert!(matches!(err, ConfigError::Serialization(_)));
    }

    #[test]
    fn env_lookup_overrides_defaults() {
        let vars = HashMap::from([
            (ENV_BASE_URL, "http://localhost:8080/getprices"),
            (ENV_TIMEOUT_MS, " 1500 "),
        ]);
        let config = ClientConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
            .expect("valid env");

        assert_eq!(config.base_url, "http://localhost:8080/getprices");
        assert_eq!(config.timeout, Duration::from_millis(1500));
    }

    #[test]
    fn env_lookup_reports_bad_numbers() {
        let err = ClientConfig::from_lookup(|name| {
            (name == ENV_TIMEOUT_MS).then(|| String::from("soon"))
        })
        .expect_err("not a number");
        assert!(matches!(
            err,
            ConfigError::InvalidEnv {
                name: ENV_TIMEOUT_MS,
                ..
            }
        ));
    }

    #[test]
    fn base_url_requires_http_scheme() {
        let err = ClientConfig::default()
            .with_base_url("ftp://example.test")
            .expect_err("bad scheme");
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
    }
}
