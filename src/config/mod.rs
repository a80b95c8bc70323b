//! Runtime configuration from environment variables.

use crate::error::ConfigError;
use std::str::FromStr;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_APP_NAME: &str = "hrApp";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Where the search mirror lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchBackend {
    Postgres,
    Memory,
}

impl FromStr for SearchBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(SearchBackend::Postgres),
            "memory" => Ok(SearchBackend::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    /// Database holding the search documents. Defaults to `database_url`.
    pub search_database_url: String,
    pub search_backend: SearchBackend,
    pub bind_addr: String,
    /// Prefix of the `X-{app}-alert` headers and alert keys.
    pub app_name: String,
    pub max_connections: u32,
    pub default_page_size: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_url: String::new(),
            search_database_url: String::new(),
            search_backend: SearchBackend::Memory,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. `DATABASE_URL` is required.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let search_database_url = get("SEARCH_DATABASE_URL").unwrap_or_else(|| database_url.clone());
        let search_backend = match get("SEARCH_BACKEND") {
            None => SearchBackend::Postgres,
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                key: "SEARCH_BACKEND",
                value: v,
            })?,
        };
        let max_connections = parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), DEFAULT_MAX_CONNECTIONS)?;
        let default_page_size = parse_or("DEFAULT_PAGE_SIZE", get("DEFAULT_PAGE_SIZE"), DEFAULT_PAGE_SIZE)?;
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_MAX_CONNECTIONS",
                value: "0".into(),
            });
        }
        if default_page_size == 0 {
            return Err(ConfigError::Invalid {
                key: "DEFAULT_PAGE_SIZE",
                value: "0".into(),
            });
        }

        Ok(AppConfig {
            database_url,
            search_database_url,
            search_backend,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            app_name: get("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            max_connections,
            default_page_size,
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid { key, value: v }),
    }
}
