// routedeck-api: Async Rust client for a gateway Admin API (routes + X-API-KEY auth)

pub mod client;
pub mod error;
pub mod routes;
pub mod transport;
pub mod types;

pub use client::{ApiClient, RequestBody};
pub use error::{Error, ErrorKind};
pub use transport::{TlsMode, TransportConfig};

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Connection settings for the Admin API: base URL plus API key.
///
/// Both fields must be non-empty before any request is attempted;
/// [`ApiClient`] checks this on every call and fails fast with
/// [`Error::ConfigurationMissing`] otherwise.
#[derive(Clone)]
pub struct ApiConfig {
    base_url: String,
    api_key: SecretString,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<SecretString>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Base URL exactly as configured (e.g. `http://127.0.0.1:9180/apisix/admin`).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    /// `true` when both the base URL and the API key are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.base_url.is_empty() && !self.api_key.expose_secret().is_empty()
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_requires_both_fields() {
        assert!(ApiConfig::new("http://gw:9180/apisix/admin", "k").is_complete());
        assert!(!ApiConfig::new("", "k").is_complete());
        assert!(!ApiConfig::new("http://gw:9180", "").is_complete());
    }

    #[test]
    fn debug_redacts_api_key() {
        let cfg = ApiConfig::new("http://gw:9180", "super-secret");
        let rendered = format!("{cfg:?}");
        assert!(rendered.contains("http://gw:9180"));
        assert!(!rendered.contains("super-secret"));
    }
}
