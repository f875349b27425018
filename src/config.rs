//! Server configuration, loaded from environment variables.

use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid value for {name}: {value:?}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection URL (env: DATABASE_URL)
    pub database_url: String,
    /// Listen address (env: BIND_ADDR)
    pub bind_addr: String,
    /// Login session lifetime in seconds (env: SESSION_TIMEOUT_SECS)
    pub session_timeout_secs: u64,
    /// Mark cookies `Secure` (env: COOKIE_SECURE)
    pub cookie_secure: bool,
    /// Directory served under /static (env: STATIC_DIR)
    pub static_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://hr_system.db".into(),
            bind_addr: "127.0.0.1:8000".into(),
            session_timeout_secs: 24 * 60 * 60,
            cookie_secure: false,
            static_dir: "static".into(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source; unset or empty
    /// variables fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            database_url: get("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            session_timeout_secs: parse_var("SESSION_TIMEOUT_SECS", get("SESSION_TIMEOUT_SECS"))?
                .unwrap_or(defaults.session_timeout_secs),
            cookie_secure: parse_var("COOKIE_SECURE", get("COOKIE_SECURE"))?
                .unwrap_or(defaults.cookie_secure),
            static_dir: get("STATIC_DIR").unwrap_or(defaults.static_dir),
        })
    }
}

fn parse_var<T: FromStr>(name: &'static str, raw: Option<String>) -> Result<Option<T>, ConfigError> {
    raw.map(|value| {
        value
            .trim()
            .parse()
            .map_err(|_| ConfigError { name, value })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.database_url, "sqlite://hr_system.db");
        assert_eq!(config.bind_addr, "127.0.0.1:8000");
        assert_eq!(config.session_timeout_secs, 86400);
        assert!(!config.cookie_secure);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite://other.db"),
            ("SESSION_TIMEOUT_SECS", "60"),
            ("COOKIE_SECURE", "true"),
            ("BIND_ADDR", ""),
        ]))
        .unwrap();
        assert_eq!(config.database_url, "sqlite://other.db");
        assert_eq!(config.session_timeout_secs, 60);
        assert!(config.cookie_secure);
        assert_eq!(config.bind_addr, "127.0.0.1:8000");
    }

    #[test]
    fn test_malformed_number_is_error() {
        let err = Config::from_lookup(lookup(&[("SESSION_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert_eq!(err.name, "SESSION_TIMEOUT_SECS");
    }
}
