//! Configuration for the HTTP store.

use std::env;
use std::time::Duration;
use url::Url;

/// Default list title when none is configured.
pub const DEFAULT_LIST: &str = "Carousel";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the list service lives and how to talk to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Site the list belongs to, e.g. `https://tenant.example/sites/intranet`
    pub site_url: Url,
    /// Title of the list holding the carousel entries
    pub list: String,
    /// Bearer token sent with every request
    pub access_token: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl StoreConfig {
    /// Create a configuration with defaults for everything but the site.
    pub fn new(site_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            site_url: parse_site_url(site_url)?,
            list: DEFAULT_LIST.to_string(),
            access_token: None,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_list(mut self, list: impl Into<String>) -> Self {
        self.list = list.into();
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// `CAROUSEL_SITE_URL` is required; `CAROUSEL_LIST`, `CAROUSEL_TOKEN` and
    /// `CAROUSEL_TIMEOUT_SECS` are optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        let site_url = env::var("CAROUSEL_SITE_URL").map_err(|_| ConfigError::MissingSiteUrl)?;

        let list = env::var("CAROUSEL_LIST").unwrap_or_else(|_| DEFAULT_LIST.to_string());

        let access_token = env::var("CAROUSEL_TOKEN").ok().filter(|t| !t.is_empty());

        let timeout = match env::var("CAROUSEL_TIMEOUT_SECS") {
            Ok(secs) => Duration::from_secs(secs.parse().map_err(|_| ConfigError::InvalidTimeout)?),
            Err(_) => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            site_url: parse_site_url(&site_url)?,
            list,
            access_token,
            timeout,
        })
    }
}

fn parse_site_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("CAROUSEL_SITE_URL environment variable is required")]
    MissingSiteUrl,

    #[error("Invalid site URL: {0}")]
    InvalidSiteUrl(#[from] url::ParseError),

    #[error("Site URL must be http or https, got {0}")]
    UnsupportedScheme(String),

    #[error("Invalid CAROUSEL_TIMEOUT_SECS value")]
    InvalidTimeout,

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_applies_defaults() {
        let config = StoreConfig::new("https://tenant.example/sites/news").unwrap();
        assert_eq!(config.list, "Carousel");
        assert_eq!(config.access_token, None);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn builders_override() {
        let config = StoreConfig::new("http://localhost:3000")
            .unwrap()
            .with_list("Banners")
            .with_access_token("secret")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.list, "Banners");
        assert_eq!(config.access_token.as_deref(), Some("secret"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn rejects_bad_urls() {
        assert!(matches!(
            StoreConfig::new("not a url"),
            Err(ConfigError::InvalidSiteUrl(_))
        ));
        assert!(matches!(
            StoreConfig::new("ftp://files.example"),
            Err(ConfigError::UnsupportedScheme(s)) if s == "ftp"
        ));
    }
}
