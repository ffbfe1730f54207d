use crate::cache::DEFAULT_CACHE_KEY;
use crate::error::FetchError;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use url::Url;

/// Configuration for the content client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// URL the document is fetched from
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Directory holding the snapshot file (platform cache dir if unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,

    /// Slot name of the snapshot
    #[serde(default = "default_cache_key")]
    pub cache_key: String,

    /// Request timeout in seconds; transport default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// User-Agent header sent with each request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(&default_endpoint())
    }
}

impl ClientConfig {
    /// Create a new configuration with default values
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            cache_dir: None,
            cache_key: default_cache_key(),
            request_timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// The endpoint as a URL, or `BadLocator` if it does not parse
    pub fn endpoint_url(&self) -> Result<Url, FetchError> {
        Url::parse(&self.endpoint)
            .map_err(|e| FetchError::BadLocator(format!("{}: {}", self.endpoint, e)))
    }

    /// Startup check: a misconfigured endpoint is fatal before any fetch
    pub fn validate(&self) -> Result<(), FetchError> {
        let url = self.endpoint_url()?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(FetchError::BadLocator(format!(
                "{}: unsupported scheme {}",
                self.endpoint, other
            ))),
        }
    }

    /// Directory the snapshot lives in
    pub fn resolved_cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(default_cache_dir)
    }
}

/// Default content endpoint
fn default_endpoint() -> String {
    "https://mocki.io/v1/6c823976-465e-401e-ae8d-d657d278e98e".to_string()
}

fn default_cache_key() -> String {
    DEFAULT_CACHE_KEY.to_string()
}

fn default_user_agent() -> String {
    format!("pagefold/{}", env!("CARGO_PKG_VERSION"))
}

/// Platform cache directory, or the temp dir where there is none
fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("pagefold")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchErrorKind;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = ClientConfig::from_json(r#"{"endpoint": "https://example.com/doc"}"#).unwrap();
        assert_eq!(config.endpoint, "https://example.com/doc");
        assert_eq!(config.cache_key, "cached_content");
        assert_eq!(config.cache_dir, None);
        assert_eq!(config.request_timeout_secs, None);
        assert!(config.user_agent.starts_with("pagefold/"));

        let empty = ClientConfig::from_json("{}").unwrap();
        assert!(empty.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.json");
        std::fs::write(
            &path,
            r#"{"endpoint": "http://localhost:8080/doc", "cache_dir": "/tmp/x", "request_timeout_secs": 10}"#,
        )
        .unwrap();

        let config = ClientConfig::from_file(&path).unwrap();
        assert_eq!(config.resolved_cache_dir(), PathBuf::from("/tmp/x"));
        assert_eq!(config.request_timeout_secs, Some(10));
    }

    #[test]
    fn test_validate_rejects_bad_endpoints() {
        let kind = |endpoint: &str| ClientConfig::new(endpoint).validate().unwrap_err().kind();
        assert_eq!(kind("not a url"), FetchErrorKind::BadLocator);
        assert_eq!(kind("ftp://example.com/doc"), FetchErrorKind::BadLocator);
        assert!(ClientConfig::new("https://example.com").validate().is_ok());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(ClientConfig::from_json("{\"endpoint\": 5}").is_err());
    }
}
