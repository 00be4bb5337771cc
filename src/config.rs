//! Configuration types for the server browser
//!
//! The config file describes where the listing lives, how to page through
//! it, where the bearer token comes from, and how the HTTP client behaves.
//! It is read from YAML (`.yaml`/`.yml`) or JSON (`.json`).
//!
//! ```yaml
//! listing:
//!   endpoint: https://api.example.com/v1/servers
//!   filter:
//!     game: quake3
//!   page_size: 100
//!   records_path: servers
//! auth:
//!   type: env
//!   var: SERVER_BROWSER_TOKEN
//! http:
//!   timeout_secs: 15
//! ```

use crate::auth::CredentialConfig;
use crate::decode::FieldMapping;
use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::{Filter, StringMap};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;
use url::Url;

/// Page size used when none is configured
pub const DEFAULT_PAGE_SIZE: u32 = 100;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete configuration loaded from file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Listing endpoint and pagination
    pub listing: ListingConfig,

    /// Credential source
    #[serde(default)]
    pub auth: CredentialConfig,

    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpConfig,
}

impl AppConfig {
    /// Load and validate a config file, choosing the format by extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read config file: {e}")))
            .with_context(|| path.display().to_string())?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&contents),
            _ => Self::from_yaml_str(&contents),
        }
    }

    /// Parse and validate YAML
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate JSON
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(contents).map_err(|e| Error::Config {
            message: format!("invalid JSON config: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values serde cannot
    pub fn validate(&self) -> Result<()> {
        self.listing.validate()?;
        if self.http.timeout_secs == 0 {
            return Err(Error::invalid_value(
                "http.timeout_secs",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Listing Config
// ============================================================================

/// Where the listing lives and how it is paged
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Absolute URL of the listing endpoint
    #[serde(default)]
    pub endpoint: String,

    /// Fixed query parameters sent with every page
    #[serde(default)]
    pub filter: Filter,

    /// Entries requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Query parameter carrying the page size
    #[serde(default = "default_limit_param")]
    pub limit_param: String,

    /// Query parameter carrying the offset
    #[serde(default = "default_offset_param")]
    pub offset_param: String,

    /// Dot path to the records array in the response
    #[serde(default = "default_records_path")]
    pub records_path: String,

    /// Field locations inside each record
    #[serde(default)]
    pub fields: FieldMapping,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_limit_param() -> String {
    "limit".to_string()
}

fn default_offset_param() -> String {
    "offset".to_string()
}

fn default_records_path() -> String {
    "servers".to_string()
}

impl ListingConfig {
    /// Listing config with defaults for everything but the endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            filter: Filter::new(),
            page_size: default_page_size(),
            limit_param: default_limit_param(),
            offset_param: default_offset_param(),
            records_path: default_records_path(),
            fields: FieldMapping::default(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(Error::missing_field("listing.endpoint"));
        }

        let url = Url::parse(&self.endpoint)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "listing.endpoint",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        if self.limit_param.trim().is_empty() {
            return Err(Error::invalid_value("listing.limit_param", "must not be empty"));
        }
        if self.offset_param.trim().is_empty() {
            return Err(Error::invalid_value(
                "listing.offset_param",
                "must not be empty",
            ));
        }

        if self.page_size == 0 {
            warn!("listing.page_size is 0: the first page will end the listing");
        }

        Ok(())
    }
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Client-side rate limit
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: StringMap,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: None,
            rate_limit: None,
            headers: StringMap::new(),
        }
    }
}

impl HttpConfig {
    /// Translate into the HTTP client's own config
    pub fn client_config(&self) -> HttpClientConfig {
        let mut builder =
            HttpClientConfig::builder().timeout(Duration::from_secs(self.timeout_secs));

        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        if let Some(limit) = self.rate_limit {
            builder = builder.rate_limit(limit);
        }
        for (key, value) in &self.headers {
            builder = builder.header(key.clone(), value.clone());
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    const MINIMAL: &str = "listing:\n  endpoint: https://api.example.com/servers\n";

    #[test]
    fn test_minimal_yaml_defaults() {
        let config = AppConfig::from_yaml_str(MINIMAL).unwrap();

        assert_eq!(config.listing.endpoint, "https://api.example.com/servers");
        assert_eq!(config.listing.page_size, 100);
        assert_eq!(config.listing.limit_param, "limit");
        assert_eq!(config.listing.offset_param, "offset");
        assert_eq!(config.listing.records_path, "servers");
        assert!(config.listing.filter.is_empty());
        assert_eq!(config.auth, CredentialConfig::default());
        assert_eq!(config.http.timeout_secs, 30);
        assert!(config.http.rate_limit.is_none());
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
listing:
  endpoint: https://api.example.com/v1/servers
  filter:
    game: quake3
    region: eu
  page_size: 50
  limit_param: "page[size]"
  offset_param: "page[offset]"
  records_path: data
  fields:
    address: addr
auth:
  type: token
  token: abc
http:
  timeout_secs: 5
  user_agent: browser/1
  rate_limit:
    requests_per_second: 2
    burst_size: 4
  headers:
    X-Client: test
"#;
        let config = AppConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.listing.filter.get("game"), Some(&"quake3".to_string()));
        assert_eq!(config.listing.page_size, 50);
        assert_eq!(config.listing.limit_param, "page[size]");
        assert_eq!(config.listing.fields.address, "addr");
        assert_eq!(
            config.auth,
            CredentialConfig::Token {
                token: "abc".to_string()
            }
        );

        let client = config.http.client_config();
        assert_eq!(client.timeout, Duration::from_secs(5));
        assert_eq!(client.user_agent, "browser/1");
        assert_eq!(client.rate_limit, Some(RateLimiterConfig::new(2, 4)));
        assert_eq!(
            client.default_headers.get("X-Client"),
            Some(&"test".to_string())
        );
    }

    #[test]
    fn test_json_config() {
        let json = r#"{"listing": {"endpoint": "http://localhost:8080/list", "page_size": 10}, "auth": {"type": "none"}}"#;
        let config = AppConfig::from_json_str(json).unwrap();
        assert_eq!(config.listing.page_size, 10);
        assert_eq!(config.auth, CredentialConfig::None);
    }

    #[test]
    fn test_missing_endpoint() {
        let err = AppConfig::from_yaml_str("listing:\n  page_size: 10\n").unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "listing.endpoint"));
    }

    #[test]
    fn test_relative_endpoint_rejected() {
        let err = AppConfig::from_yaml_str("listing:\n  endpoint: /servers\n").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_unsupported_scheme_rejected() {
        let err = AppConfig::from_yaml_str("listing:\n  endpoint: ftp://example.com/list\n")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { .. }));
    }

    #[test]
    fn test_empty_offset_param_rejected() {
        let yaml = "listing:\n  endpoint: https://example.com\n  offset_param: ''\n";
        let err = AppConfig::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("listing.offset_param"));
    }

    #[test]
    fn test_zero_page_size_accepted() {
        let yaml = "listing:\n  endpoint: https://example.com\n  page_size: 0\n";
        let config = AppConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.listing.page_size, 0);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let yaml = format!("{MINIMAL}http:\n  timeout_secs: 0\n");
        assert!(AppConfig::from_yaml_str(&yaml).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.listing.endpoint, "https://api.example.com/servers");
    }

    #[test]
    fn test_load_json_file() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"{"listing": {"endpoint": "https://example.com/s"}}"#)
            .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.listing.endpoint, "https://example.com/s");
    }

    #[test]
    fn test_load_unreadable_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(dir.path()).unwrap_err();

        assert_eq!(err.kind(), crate::error::ErrorKind::Configuration);
        assert!(err.to_string().contains("cannot read config file"));
        assert!(err.to_string().contains(&dir.path().display().to_string()));
    }

    #[test]
    fn test_load_missing_file() {
        let err = AppConfig::load("/nonexistent/server-browser.yaml").unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }
}
