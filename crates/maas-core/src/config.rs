//! Configuration structures for MAAS clients.
//!
//! [`MaasClientConfig`] is the serializable description of how to reach a MAAS
//! region controller: its API base address, an optional API key and the TLS
//! and timeout settings of the underlying HTTP client.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Configuration for a MAAS client instance.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MaasClientConfig {
    /// MAAS API base URL (e.g. `http://maas.example.com/MAAS/api/2.0/`)
    #[validate(url)]
    pub url: String,

    /// Optional API key (`<consumer key>:<token key>:<token secret>`)
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Optional path to custom CA certificate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_ca_cert: Option<std::path::PathBuf>,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

const fn default_tls_verify() -> bool {
    true
}

const fn default_request_timeout_secs() -> u64 {
    30
}

impl MaasClientConfig {
    /// Create a new client configuration for the given API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or validation fails.
    pub fn new(url: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            url: url.into(),
            api_key: None,
            tls_verify: default_tls_verify(),
            tls_ca_cert: None,
            request_timeout_secs: default_request_timeout_secs(),
        };

        config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;

        Ok(config)
    }

    /// Set the API key used to sign requests.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set custom CA certificate path.
    #[must_use]
    pub fn with_ca_cert(mut self, path: std::path::PathBuf) -> Self {
        self.tls_ca_cert = Some(path);
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parse the API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_url(&self) -> Result<Url, Error> {
        Url::parse(&self.url).map_err(|e| Error::ParseError(format!("Invalid MAAS URL: {e}")))
    }
}

impl Default for MaasClientConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:5240/MAAS/api/2.0/".to_string(),
            api_key: None,
            tls_verify: default_tls_verify(),
            tls_ca_cert: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maas_client_config_new() {
        let config = MaasClientConfig::new("http://maas.example.com/MAAS/api/2.0/").unwrap();
        assert_eq!(config.url, "http://maas.example.com/MAAS/api/2.0/");
        assert!(config.api_key.is_none());
        assert!(config.tls_verify);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_maas_client_config_invalid_url() {
        let result = MaasClientConfig::new("not-a-url");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_maas_client_config_builder() {
        let config = MaasClientConfig::new("https://maas.example.com/MAAS/api/2.0/")
            .unwrap()
            .with_api_key("ck:tk:ts")
            .with_tls_verify(false)
            .with_timeout(60);

        assert_eq!(config.api_key.as_deref(), Some("ck:tk:ts"));
        assert!(!config.tls_verify);
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_maas_client_config_parse_url() {
        let config = MaasClientConfig::new("https://maas.example.com:5443/MAAS/api/2.0/").unwrap();
        let url = config.parse_url().unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("maas.example.com"));
        assert_eq!(url.port(), Some(5443));
        assert_eq!(url.path(), "/MAAS/api/2.0/");
    }

    #[test]
    fn test_api_key_is_never_serialized() {
        let config = MaasClientConfig::default().with_api_key("ck:tk:ts");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("ck:tk:ts"));
        assert!(!json.contains("api_key"));
    }

    #[test]
    fn test_config_deserialization_defaults() {
        let config: MaasClientConfig = serde_json::from_str(
            r#"{"url": "http://maas.local/MAAS/api/2.0/", "api_key": "a:b:c"}"#,
        )
        .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("a:b:c"));
        assert!(config.tls_verify);
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.tls_ca_cert.is_none());
    }

    #[test]
    fn test_config_validation_timeout_range() {
        let mut config = MaasClientConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.request_timeout_secs = 301;
        assert!(config.validate().is_err());

        config.request_timeout_secs = 30;
        assert!(config.validate().is_ok());
    }
}
