//! Client configuration.
//!
//! # Environment Variables
//!
//! [`ClientConfig::from_env`] starts from the defaults and applies:
//!
//! - `ZEROD_API_URL` - API base URL (default `https://www.zerod.fr/api/`)
//! - `ZEROD_TIMEOUT_SECS` - request timeout in seconds (default: none)
//! - `ZEROD_LOGIN_EVENT` - event name that never carries credentials (default `login`)
//! - `ZEROD_KEY_SCHEDULE` - `separated` or `legacy` (default `separated`)
//! - `ZEROD_DEV_MODE` - `1`/`true` to log decrypted responses at debug level

use serde::{Deserialize, Serialize};

use crate::signature::KeySchedule;
use crate::{Result, ZerodError};

/// Production API origin and path prefix.
pub const DEFAULT_BASE_URL: &str = "https://www.zerod.fr/api/";

/// Event used to authenticate; it is always sent without credentials.
pub const DEFAULT_LOGIN_EVENT: &str = "login";

/// Environment variable overriding the base URL.
pub const ENV_API_URL: &str = "ZEROD_API_URL";
/// Environment variable setting the request timeout.
pub const ENV_TIMEOUT_SECS: &str = "ZEROD_TIMEOUT_SECS";
/// Environment variable overriding the login event name.
pub const ENV_LOGIN_EVENT: &str = "ZEROD_LOGIN_EVENT";
/// Environment variable selecting the key schedule.
pub const ENV_KEY_SCHEDULE: &str = "ZEROD_KEY_SCHEDULE";
/// Environment variable enabling dev-mode logging.
pub const ENV_DEV_MODE: &str = "ZEROD_DEV_MODE";

/// Configuration for [`ApiClient`](crate::ApiClient).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API base URL; the event name is appended as the last path segment.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds. `None` leaves the transport default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Event name that is never sent with an `Authorization` header.
    #[serde(default = "default_login_event")]
    pub login_event: String,

    /// How the payload encryption key is derived.
    #[serde(default)]
    pub key_schedule: KeySchedule,

    /// Log decrypted responses and failure bodies at debug level.
    #[serde(default)]
    pub dev_mode: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_login_event() -> String {
    DEFAULT_LOGIN_EVENT.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
            login_event: default_login_event(),
            key_schedule: KeySchedule::default(),
            dev_mode: false,
        }
    }
}

impl ClientConfig {
    /// Create a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Set the login event name.
    pub fn with_login_event(mut self, event: impl Into<String>) -> Self {
        self.login_event = event.into();
        self
    }

    /// Set the key schedule.
    pub fn with_key_schedule(mut self, schedule: KeySchedule) -> Self {
        self.key_schedule = schedule;
        self
    }

    /// Enable or disable dev-mode logging.
    pub fn with_dev_mode(mut self, enabled: bool) -> Self {
        self.dev_mode = enabled;
        self
    }

    /// Load the defaults overridden by `ZEROD_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.is_empty()) {
            config.base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS).filter(|v| !v.is_empty()) {
            let secs = raw.trim().parse::<u64>().map_err(|e| {
                ZerodError::invalid_config(ENV_TIMEOUT_SECS, format!("'{}': {}", raw, e))
            })?;
            config.timeout_secs = Some(secs);
        }
        if let Some(event) = lookup(ENV_LOGIN_EVENT).filter(|v| !v.is_empty()) {
            config.login_event = event;
        }
        if let Some(raw) = lookup(ENV_KEY_SCHEDULE).filter(|v| !v.is_empty()) {
            config.key_schedule = raw
                .parse()
                .map_err(|reason: String| ZerodError::invalid_config(ENV_KEY_SCHEDULE, reason))?;
        }
        if let Some(raw) = lookup(ENV_DEV_MODE) {
            config.dev_mode = matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can produce request URLs.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(ZerodError::invalid_config(
                "base_url",
                "base URL cannot be empty",
            ));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ZerodError::invalid_config(
                "base_url",
                format!("'{}' is not an http(s) URL", self.base_url),
            ));
        }
        if self.login_event.is_empty() {
            return Err(ZerodError::invalid_config(
                "login_event",
                "login event cannot be empty",
            ));
        }
        if self.timeout_secs == Some(0) {
            return Err(ZerodError::invalid_config(
                "timeout_secs",
                "timeout must be at least one second",
            ));
        }
        Ok(())
    }

    /// Full URL for an event endpoint, without query string.
    pub fn endpoint_url(&self, event: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            event.trim_start_matches('/')
        )
    }

    /// Whether `event` is the login event.
    pub fn is_login_event(&self, event: &str) -> bool {
        event == self.login_event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, None);
        assert_eq!(config.login_event, "login");
        assert_eq!(config.key_schedule, KeySchedule::Separated);
        assert!(!config.dev_mode);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_endpoint_url_joins_cleanly() {
        let config = ClientConfig::new("https://www.zerod.fr/api/");
        assert_eq!(config.endpoint_url("profile"), "https://www.zerod.fr/api/profile");

        let config = ClientConfig::new("http://localhost:8080/api");
        assert_eq!(config.endpoint_url("/quests"), "http://localhost:8080/api/quests");
    }

    #[test]
    fn test_builders() {
        let config = ClientConfig::new("http://localhost")
            .with_timeout(5)
            .with_login_event("auth")
            .with_key_schedule(KeySchedule::Legacy)
            .with_dev_mode(true);

        assert_eq!(config.timeout_secs, Some(5));
        assert!(config.is_login_event("auth"));
        assert!(!config.is_login_event("login"));
        assert_eq!(config.key_schedule, KeySchedule::Legacy);
        assert!(config.dev_mode);
    }

    #[test]
    fn test_from_lookup_applies_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (ENV_API_URL, "http://127.0.0.1:9000/api/"),
            (ENV_TIMEOUT_SECS, "12"),
            (ENV_LOGIN_EVENT, "signin"),
            (ENV_KEY_SCHEDULE, "legacy"),
            (ENV_DEV_MODE, "true"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "http://127.0.0.1:9000/api/");
        assert_eq!(config.timeout_secs, Some(12));
        assert_eq!(config.login_event, "signin");
        assert_eq!(config.key_schedule, KeySchedule::Legacy);
        assert!(config.dev_mode);
    }

    #[test]
    fn test_from_lookup_without_vars_is_default() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let err = ClientConfig::from_lookup(lookup_from(&[(ENV_TIMEOUT_SECS, "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_TIMEOUT_SECS));

        let err = ClientConfig::from_lookup(lookup_from(&[(ENV_KEY_SCHEDULE, "rot13")]))
            .unwrap_err();
        assert!(err.to_string().contains("rot13"));
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        assert!(ClientConfig::new("").validate().is_err());
        assert!(ClientConfig::new("ftp://zerod.fr").validate().is_err());
        assert!(ClientConfig::new("https://zerod.fr")
            .with_timeout(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url":"http://localhost:3000/api/"}"#).unwrap();
        assert_eq!(config.login_event, DEFAULT_LOGIN_EVENT);
        assert_eq!(config.key_schedule, KeySchedule::Separated);
    }
}
