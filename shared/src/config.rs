//! Configuration management for the console.

use std::env;
use std::time::Duration;

use tracing::info;

use crate::{Error, Result};

/// Base URL used when `API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
/// Number of records requested from the feedback endpoint.
pub const DEFAULT_FEEDBACK_LIMIT: u32 = 100;
/// Number of filtered records rendered at once.
pub const DEFAULT_PAGE_SIZE: usize = 20;

const DEFAULT_ANALYTICS_TIMEOUT_SECS: u64 = 10;
const DEFAULT_FEEDBACK_TIMEOUT_SECS: u64 = 30;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the feedback API, without a trailing slash
    pub api_url: String,
    /// Pre-shared key sent as `X-API-Key` and used by the access gate
    pub api_key: String,
    /// Bound on the analytics request
    pub analytics_timeout: Duration,
    /// Bound on the feedback request (heavier payload)
    pub feedback_timeout: Duration,
    /// `limit` query parameter for the feedback request
    pub feedback_limit: u32,
    /// Display page size
    pub page_size: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("API_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| {
                info!("API_URL not set, using default: {}", DEFAULT_API_URL);
                DEFAULT_API_URL.to_string()
            });

        let api_key = lookup("API_KEY")
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::Config("API_KEY not set".to_string()))?;

        Ok(Self {
            api_url: api_url.trim().trim_end_matches('/').to_string(),
            api_key,
            analytics_timeout: Duration::from_secs(parse_or(
                &lookup,
                "ANALYTICS_TIMEOUT_SECS",
                DEFAULT_ANALYTICS_TIMEOUT_SECS,
            )?),
            feedback_timeout: Duration::from_secs(parse_or(
                &lookup,
                "FEEDBACK_TIMEOUT_SECS",
                DEFAULT_FEEDBACK_TIMEOUT_SECS,
            )?),
            feedback_limit: parse_or(&lookup, "FEEDBACK_LIMIT", DEFAULT_FEEDBACK_LIMIT)?,
            page_size: parse_or(&lookup, "PAGE_SIZE", DEFAULT_PAGE_SIZE)?,
        })
    }

    /// Configuration pointing at `api_url` with default tuning.
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            analytics_timeout: Duration::from_secs(DEFAULT_ANALYTICS_TIMEOUT_SECS),
            feedback_timeout: Duration::from_secs(DEFAULT_FEEDBACK_TIMEOUT_SECS),
            feedback_limit: DEFAULT_FEEDBACK_LIMIT,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid {} value {:?}: {}", key, raw, e))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[("API_KEY", "secret")])).unwrap();
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.analytics_timeout, Duration::from_secs(10));
        assert_eq!(config.feedback_timeout, Duration::from_secs(30));
        assert_eq!(config.feedback_limit, 100);
        assert_eq!(config.page_size, 20);
    }

    #[test]
    fn test_missing_api_key() {
        let err = Config::from_lookup(lookup_from(&[("API_URL", "http://api")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = Config::from_lookup(lookup_from(&[("API_KEY", "")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = Config::from_lookup(lookup_from(&[
            ("API_URL", "https://feedback.example.com/"),
            ("API_KEY", "k"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://feedback.example.com");
    }

    #[test]
    fn test_overrides_and_invalid_numbers() {
        let config = Config::from_lookup(lookup_from(&[
            ("API_KEY", "k"),
            ("FEEDBACK_LIMIT", "500"),
            ("PAGE_SIZE", "50"),
            ("FEEDBACK_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.feedback_limit, 500);
        assert_eq!(config.page_size, 50);
        assert_eq!(config.feedback_timeout, Duration::from_secs(5));

        let err = Config::from_lookup(lookup_from(&[("API_KEY", "k"), ("PAGE_SIZE", "many")]))
            .unwrap_err();
        assert!(err.to_string().contains("PAGE_SIZE"));
    }
}
