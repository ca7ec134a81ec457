//! Service configuration read from environment variables.

use thiserror::Error;

use crate::query::batch::DEFAULT_BATCH_SIZE;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Reads from:
/// - `DATABASE_URL` (required)
/// - `HOST` (default `0.0.0.0`)
/// - `PORT` (default `8080`)
/// - `BATCH_FETCH_SIZE` (default `100`)
/// - `DB_POOL_SIZE` (default `10`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub batch_fetch_size: usize,
    pub db_pool_size: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", 8080)?;
        let batch_fetch_size = parse_or(&lookup, "BATCH_FETCH_SIZE", DEFAULT_BATCH_SIZE)?;
        if batch_fetch_size == 0 {
            return Err(ConfigError::Invalid {
                name: "BATCH_FETCH_SIZE",
                value: "0".into(),
            });
        }
        let db_pool_size = parse_or(&lookup, "DB_POOL_SIZE", 10)?;

        Ok(Self {
            database_url,
            host,
            port,
            batch_fetch_size,
            db_pool_size,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = config(&[("DATABASE_URL", "postgres://localhost/bookstore")]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.batch_fetch_size, 100);
        assert_eq!(config.db_pool_size, 10);
        assert_eq!(config.addr(), "0.0.0.0:8080");
    }

    #[test]
    fn database_url_is_required() {
        assert_eq!(config(&[]), Err(ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = config(&[
            ("DATABASE_URL", "postgres://db/bookstore"),
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("BATCH_FETCH_SIZE", "25"),
            ("DB_POOL_SIZE", "4"),
        ])
        .unwrap();
        assert_eq!(config.addr(), "127.0.0.1:9000");
        assert_eq!(config.batch_fetch_size, 25);
        assert_eq!(config.db_pool_size, 4);
    }

    #[test]
    fn bad_port_is_invalid() {
        assert_eq!(
            config(&[("DATABASE_URL", "x"), ("PORT", "eighty")]),
            Err(ConfigError::Invalid {
                name: "PORT",
                value: "eighty".into()
            })
        );
    }

    #[test]
    fn zero_batch_size_is_invalid() {
        assert!(matches!(
            config(&[("DATABASE_URL", "x"), ("BATCH_FETCH_SIZE", "0")]),
            Err(ConfigError::Invalid { name: "BATCH_FETCH_SIZE", .. })
        ));
    }
}
