//! Driver configuration loaded from environment variables.

use std::time::Duration;

use fulfillment::RetryPolicy;
use thiserror::Error;

/// Errors raised while reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Endpoints, credentials and timing of a driver run.
///
/// Reads from environment variables:
/// - `IDENTITY_URL`: token endpoint of the identity provider (required)
/// - `CLIENT_ID`: identity login (required)
/// - `CLIENT_SECRET`: identity password (required)
/// - `FULFILLMENT_API_URL`: base URL of the fulfillment API (required)
/// - `POLL_RETRIES`: extra pick job polling attempts (default: `5`)
/// - `POLL_DELAY_MS`: delay between polling attempts (default: `2000`)
/// - `HTTP_TIMEOUT_SECS`: per-request timeout (default: `30`)
#[derive(Clone)]
pub struct DriverConfig {
    pub identity_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub fulfillment_api_url: String,
    pub poll_policy: RetryPolicy,
    pub http_timeout: Duration,
}

impl DriverConfig {
    pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which returns the raw value of a key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let retries = parse_optional(&lookup, "POLL_RETRIES")?.unwrap_or(RetryPolicy::DEFAULT_RETRIES);
        let delay = parse_optional::<u64>(&lookup, "POLL_DELAY_MS")?
            .map(Duration::from_millis)
            .unwrap_or(RetryPolicy::DEFAULT_DELAY);
        let http_timeout = parse_optional::<u64>(&lookup, "HTTP_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(Self::DEFAULT_HTTP_TIMEOUT);

        Ok(Self {
            identity_url: required("IDENTITY_URL")?,
            client_id: required("CLIENT_ID")?,
            client_secret: required("CLIENT_SECRET")?,
            fulfillment_api_url: required("FULFILLMENT_API_URL")?,
            poll_policy: RetryPolicy::fixed(retries, delay),
            http_timeout,
        })
    }
}

impl std::fmt::Debug for DriverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverConfig")
            .field("identity_url", &self.identity_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("fulfillment_api_url", &self.fulfillment_api_url)
            .field("poll_policy", &self.poll_policy)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

fn parse_optional<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::Invalid {
                key,
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("IDENTITY_URL", "https://identity.example.com/token"),
        ("CLIENT_ID", "client@example.com"),
        ("CLIENT_SECRET", "hunter2"),
        ("FULFILLMENT_API_URL", "https://api.example.com/api"),
    ];

    #[test]
    fn test_defaults() {
        let config = DriverConfig::from_lookup(env(REQUIRED)).unwrap();
        assert_eq!(config.fulfillment_api_url, "https://api.example.com/api");
        assert_eq!(config.poll_policy, RetryPolicy::default());
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("POLL_RETRIES", "2"),
            ("POLL_DELAY_MS", "250"),
            ("HTTP_TIMEOUT_SECS", "5"),
        ]);
        let config = DriverConfig::from_lookup(env(&pairs)).unwrap();
        assert_eq!(
            config.poll_policy,
            RetryPolicy::fixed(2, Duration::from_millis(250))
        );
        assert_eq!(config.http_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_missing_required_key() {
        let pairs: Vec<_> = REQUIRED
            .iter()
            .copied()
            .filter(|(k, _)| *k != "CLIENT_SECRET")
            .collect();
        let err = DriverConfig::from_lookup(env(&pairs)).unwrap_err();
        assert_eq!(err, ConfigError::Missing("CLIENT_SECRET"));
    }

    #[test]
    fn test_blank_required_key_counts_as_missing() {
        let mut pairs = REQUIRED.to_vec();
        pairs[0] = ("IDENTITY_URL", "  ");
        let err = DriverConfig::from_lookup(env(&pairs)).unwrap_err();
        assert_eq!(err, ConfigError::Missing("IDENTITY_URL"));
    }

    #[test]
    fn test_invalid_number() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("POLL_RETRIES", "many"));
        let err = DriverConfig::from_lookup(env(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "POLL_RETRIES", .. }));
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = DriverConfig::from_lookup(env(REQUIRED)).unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
