use std::{path::PathBuf, str::FromStr, time::Duration};

use carbon_passport::shared::Locale;
use thiserror::Error;

/// Longest share link lifetime accepted, about a century.
pub const MAX_SHARE_TTL_DAYS: u32 = 36_500;

#[derive(Error, Debug, PartialEq)]
#[error("Invalid value {value:?} for {key}")]
pub struct Error {
    pub key: &'static str,
    pub value: String,
}

/// Bounded exponential backoff for transient gateway failures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Delay before the second attempt, doubled for each one after.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(200),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub base_url: String,
    pub default_locale: Locale,
    /// Station CSV replacing the embedded dataset.
    pub stations_path: Option<PathBuf>,
    /// Zero disables expiry of share links.
    pub share_ttl_days: u32,
    pub retry: RetryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            base_url: "http://localhost:3000".into(),
            default_locale: Locale::Ko,
            stations_path: None,
            share_ttl_days: 365,
            retry: Default::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(port) = parse::<u16, _>(&lookup, "CARBON_PASSPORT_PORT")? {
            config.port = port;
        }
        if let Some(base_url) = lookup("CARBON_PASSPORT_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(locale) = parse::<Locale, _>(&lookup, "CARBON_PASSPORT_DEFAULT_LOCALE")? {
            config.default_locale = locale;
        }
        if let Some(path) = lookup("CARBON_PASSPORT_STATIONS") {
            config.stations_path = Some(PathBuf::from(path));
        }
        if let Some(days) = parse::<u32, _>(&lookup, "CARBON_PASSPORT_SHARE_TTL_DAYS")? {
            if days > MAX_SHARE_TTL_DAYS {
                return Err(Error {
                    key: "CARBON_PASSPORT_SHARE_TTL_DAYS",
                    value: days.to_string(),
                });
            }
            config.share_ttl_days = days;
        }
        if let Some(attempts) = parse::<u32, _>(&lookup, "CARBON_PASSPORT_MAX_ATTEMPTS")? {
            if attempts == 0 {
                return Err(Error {
                    key: "CARBON_PASSPORT_MAX_ATTEMPTS",
                    value: attempts.to_string(),
                });
            }
            config.retry.max_attempts = attempts;
        }
        if let Some(millis) = parse::<u64, _>(&lookup, "CARBON_PASSPORT_RETRY_BACKOFF_MS")? {
            config.retry.backoff = Duration::from_millis(millis);
        }
        Ok(config)
    }

    pub fn share_ttl(&self) -> Option<chrono::Duration> {
        if self.share_ttl_days == 0 {
            return None;
        }
        chrono::Duration::try_days(self.share_ttl_days.into())
    }
}

fn parse<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, Error>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(key) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| Error { key, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        assert_eq!(Config::from_lookup(lookup(&[])), Ok(Config::default()));
    }

    #[test]
    fn overrides() {
        let config = Config::from_lookup(lookup(&[
            ("CARBON_PASSPORT_PORT", "8080"),
            ("CARBON_PASSPORT_BASE_URL", "https://passport.example/"),
            ("CARBON_PASSPORT_DEFAULT_LOCALE", "ja"),
            ("CARBON_PASSPORT_SHARE_TTL_DAYS", "0"),
            ("CARBON_PASSPORT_MAX_ATTEMPTS", "5"),
            ("CARBON_PASSPORT_RETRY_BACKOFF_MS", "10"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.base_url, "https://passport.example");
        assert_eq!(config.default_locale, Locale::Ja);
        assert_eq!(config.share_ttl(), None);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.backoff, Duration::from_millis(10));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert_eq!(
            Config::from_lookup(lookup(&[("CARBON_PASSPORT_DEFAULT_LOCALE", "fr")])),
            Err(Error {
                key: "CARBON_PASSPORT_DEFAULT_LOCALE",
                value: "fr".to_string()
            })
        );
        assert!(Config::from_lookup(lookup(&[("CARBON_PASSPORT_PORT", "http")])).is_err());
        assert!(Config::from_lookup(lookup(&[("CARBON_PASSPORT_MAX_ATTEMPTS", "0")])).is_err());
    }

    #[test]
    fn share_ttl_is_bounded() {
        assert_eq!(
            Config::from_lookup(lookup(&[("CARBON_PASSPORT_SHARE_TTL_DAYS", "200000000")])),
            Err(Error {
                key: "CARBON_PASSPORT_SHARE_TTL_DAYS",
                value: "200000000".to_string()
            })
        );
        let config =
            Config::from_lookup(lookup(&[("CARBON_PASSPORT_SHARE_TTL_DAYS", "36500")])).unwrap();
        assert_eq!(config.share_ttl(), Some(chrono::Duration::days(36_500)));
    }
}
