//! Configuration management for the server.

use std::env;

/// List provisioned when `LISTS` is not set.
pub const DEFAULT_LIST: &str = "Carousel";

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Titles of the lists that exist at startup
    pub lists: Vec<String>,
    /// Bearer token clients must present. `None` allows anonymous access.
    pub auth_secret: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let lists = parse_lists(&env::var("LISTS").unwrap_or_else(|_| DEFAULT_LIST.to_string()));
        if lists.is_empty() {
            return Err(ConfigError::NoLists);
        }

        let auth_secret = env::var("AUTH_SECRET").ok().filter(|s| !s.is_empty());

        Ok(Self {
            host,
            port,
            lists,
            auth_secret,
        })
    }

    /// Configuration for an anonymous server on an ephemeral local port.
    pub fn local(lists: &[&str]) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            lists: lists.iter().map(|l| l.to_string()).collect(),
            auth_secret: None,
        }
    }
}

fn parse_lists(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORT value")]
    InvalidPort,

    #[error("LISTS must name at least one list")]
    NoLists,
}
