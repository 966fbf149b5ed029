//! Configuration Module
//!
//! Handles loading and managing proxy configuration from environment variables.

use std::env;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::KeyPolicy;
use crate::error::ConfigError;

/// Default upstream origin.
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://api.themoviedb.org";

/// Longest accepted cache TTL (one year), in seconds.
pub const MAX_CACHE_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Proxy configuration parameters.
///
/// Everything except the cache key policy has a default. The key policy
/// decides whether callers with different credentials share cache entries,
/// so it must always be chosen explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream origin that request paths are appended to
    pub upstream_base_url: String,
    /// Lifetime of cached responses in seconds; also the sweep period
    pub cache_ttl: u64,
    /// Maximum number of cached responses, None = unbounded
    pub max_entries: Option<usize>,
    /// Upstream call timeout in seconds
    pub upstream_timeout: u64,
    /// HTTP server port
    pub server_port: u16,
    /// How cache keys are derived from requests
    pub key_policy: KeyPolicy,
}

impl Config {
    /// Creates a Config with default values and the given key policy.
    pub fn with_key_policy(key_policy: KeyPolicy) -> Self {
        Self {
            upstream_base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            cache_ttl: 600,
            max_entries: Some(1000),
            upstream_timeout: 15,
            server_port: 3000,
            key_policy,
        }
    }

    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_KEY_POLICY` - `path` or `path+credential` (required)
    /// - `UPSTREAM_BASE_URL` - Upstream origin (default: https://api.themoviedb.org)
    /// - `CACHE_TTL` - Cache TTL and sweep interval in seconds, 1 to one year (default: 600)
    /// - `MAX_ENTRIES` - Maximum cache entries, 0 disables the bound (default: 1000)
    /// - `UPSTREAM_TIMEOUT` - Upstream timeout in seconds, at least 1 (default: 15)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key_policy = match lookup("CACHE_KEY_POLICY") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "CACHE_KEY_POLICY",
                value,
            })?,
            None => return Err(ConfigError::Missing("CACHE_KEY_POLICY")),
        };

        let mut config = Self::with_key_policy(key_policy);

        if let Some(url) = lookup("UPSTREAM_BASE_URL").filter(|v| !v.trim().is_empty()) {
            config.upstream_base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(ttl) = parse_var::<u64, _>(&lookup, "CACHE_TTL")? {
            config.cache_ttl = check_range("CACHE_TTL", ttl, 1..=MAX_CACHE_TTL_SECS)?;
        }
        if let Some(max) = parse_var::<usize, _>(&lookup, "MAX_ENTRIES")? {
            config.max_entries = (max > 0).then_some(max);
        }
        if let Some(timeout) = parse_var::<u64, _>(&lookup, "UPSTREAM_TIMEOUT")? {
            config.upstream_timeout = check_range("UPSTREAM_TIMEOUT", timeout, 1..=u64::MAX)?;
        }
        if let Some(port) = parse_var::<u16, _>(&lookup, "SERVER_PORT")? {
            config.server_port = port;
        }

        Ok(config)
    }

    /// Cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    /// Upstream timeout as a Duration.
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }
}

fn parse_var<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(None),
    }
}

fn check_range(
    name: &'static str,
    value: u64,
    range: RangeInclusive<u64>,
) -> Result<u64, ConfigError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        })
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
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::with_key_policy(KeyPolicy::PathOnly);
        assert_eq!(config.upstream_base_url, "https://api.themoviedb.org");
        assert_eq!(config.cache_ttl, 600);
        assert_eq!(config.max_entries, Some(1000));
        assert_eq!(config.upstream_timeout, 15);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cache_ttl(), Duration::from_secs(600));
    }

    #[test]
    fn test_key_policy_is_required() {
        let result = Config::from_lookup(lookup_from(&[]));
        assert_eq!(result.unwrap_err(), ConfigError::Missing("CACHE_KEY_POLICY"));
    }

    #[test]
    fn test_unknown_key_policy_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[("CACHE_KEY_POLICY", "query")]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                name: "CACHE_KEY_POLICY",
                ..
            })
        ));
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = Config::from_lookup(lookup_from(&[("CACHE_KEY_POLICY", "path")])).unwrap();
        assert_eq!(config.key_policy, KeyPolicy::PathOnly);
        assert_eq!(config.cache_ttl, 600);
        assert_eq!(config.max_entries, Some(1000));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("CACHE_KEY_POLICY", "path+credential"),
            ("UPSTREAM_BASE_URL", "http://localhost:9000/"),
            ("CACHE_TTL", "30"),
            ("MAX_ENTRIES", "0"),
            ("UPSTREAM_TIMEOUT", "5"),
            ("SERVER_PORT", "8080"),
        ]))
        .unwrap();

        assert_eq!(config.key_policy, KeyPolicy::PathWithCredential);
        assert_eq!(config.upstream_base_url, "http://localhost:9000");
        assert_eq!(config.cache_ttl, 30);
        assert_eq!(config.max_entries, None);
        assert_eq!(config.upstream_timeout(), Duration::from_secs(5));
        assert_eq!(config.server_port, 8080);
    }

    #[test]
    fn test_malformed_number_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[
            ("CACHE_KEY_POLICY", "path"),
            ("MAX_ENTRIES", "lots"),
        ]));
        assert_eq!(
            result.unwrap_err(),
            ConfigError::Invalid {
                name: "MAX_ENTRIES",
                value: "lots".to_string()
            }
        );
    }

    #[test]
    fn test_zero_ttl_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[
            ("CACHE_KEY_POLICY", "path"),
            ("CACHE_TTL", "0"),
        ]));
        assert_eq!(
            result.unwrap_err(),
            ConfigError::Invalid {
                name: "CACHE_TTL",
                value: "0".to_string()
            }
        );
    }

    #[test]
    fn test_oversized_ttl_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[
            ("CACHE_KEY_POLICY", "path"),
            ("CACHE_TTL", "18446744073709551615"),
        ]));
        assert_eq!(
            result.unwrap_err(),
            ConfigError::Invalid {
                name: "CACHE_TTL",
                value: "18446744073709551615".to_string()
            }
        );

        let longest = MAX_CACHE_TTL_SECS.to_string();
        let config = Config::from_lookup(lookup_from(&[
            ("CACHE_KEY_POLICY", "path"),
            ("CACHE_TTL", &longest),
        ]))
        .unwrap();
        assert_eq!(config.cache_ttl, MAX_CACHE_TTL_SECS);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[
            ("CACHE_KEY_POLICY", "path"),
            ("UPSTREAM_TIMEOUT", "0"),
        ]));
        assert_eq!(
            result.unwrap_err(),
            ConfigError::Invalid {
                name: "UPSTREAM_TIMEOUT",
                value: "0".to_string()
            }
        );
    }
}
