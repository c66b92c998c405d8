// Request executor for the gateway Admin API.
//
// Full URL: `{base_url}{path}`, concatenated verbatim.
// Auth: X-API-KEY header on every request.

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::ApiConfig;

const API_KEY_HEADER: &str = "X-API-KEY";
const BODY_PREVIEW_CHARS: usize = 200;

/// Request body: JSON values are serialized, text is sent verbatim.
#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(Value),
    Text(String),
}

impl RequestBody {
    /// Serialize any value into a JSON body.
    pub fn json<B: Serialize + ?Sized>(body: &B) -> Result<Self, Error> {
        Ok(Self::Json(serde_json::to_value(body)?))
    }

    fn into_bytes(self) -> Result<Vec<u8>, Error> {
        match self {
            Self::Json(value) => Ok(serde_json::to_vec(&value)?),
            Self::Text(text) => Ok(text.into_bytes()),
        }
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the Admin API.
///
/// Holds no per-request state: each call is a single best-effort attempt
/// with no retry and no deduplication. The configuration is injected once
/// at construction; an absent or incomplete configuration makes every call
/// fail with [`Error::ConfigurationMissing`] before any I/O.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Option<ApiConfig>,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an optional configuration and transport settings.
    pub fn new(config: Option<ApiConfig>, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, config })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(config: Option<ApiConfig>, http: reqwest::Client) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> Option<&ApiConfig> {
        self.config.as_ref()
    }

    /// `true` when a complete configuration was injected.
    pub fn is_configured(&self) -> bool {
        self.config.as_ref().is_some_and(ApiConfig::is_complete)
    }

    fn require_config(&self) -> Result<&ApiConfig, Error> {
        self.config
            .as_ref()
            .filter(|c| c.is_complete())
            .ok_or(Error::ConfigurationMissing)
    }

    // ── Core request ─────────────────────────────────────────────────

    /// Perform one authenticated call.
    ///
    /// Resolves to `Ok(None)` for 204 or an empty 2xx body, `Ok(Some(T))`
    /// for a JSON body, and [`Error::Api`] for any non-2xx status.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
    ) -> Result<Option<T>, Error> {
        let config = self.require_config()?;
        let url = Url::parse(&format!("{}{path}", config.base_url()))?;

        let mut key = HeaderValue::from_str(config.api_key().expose_secret()).map_err(|e| {
            Error::InvalidConfig {
                field: "api_key",
                reason: format!("not a valid header value: {e}"),
            }
        })?;
        key.set_sensitive(true);

        debug!("{method} {url}");

        let mut req = self
            .http
            .request(method.clone(), url.clone())
            .header(API_KEY_HEADER, key)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(body) = body {
            req = req.body(body.into_bytes()?);
        }

        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(%method, %url, error = %e, "request failed");
                return Err(e.into());
            }
        };

        let result = Self::handle_response(resp).await;
        if let Err(ref e) = result {
            warn!(%method, %url, error = %e, "request failed");
        }
        result
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, Error> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>, Error> {
        self.request(Method::POST, path, Some(RequestBody::json(body)?))
            .await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>, Error> {
        self.request(Method::PUT, path, Some(RequestBody::json(body)?))
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, Error> {
        self.request(Method::DELETE, path, None).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<Option<T>, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&body).map(Some).map_err(|e| {
            let preview: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        if let Ok(data) = serde_json::from_str::<Value>(&raw) {
            let message = ["message", "error_msg"]
                .iter()
                .find_map(|field| data.get(*field).and_then(Value::as_str))
                .filter(|m| !m.is_empty())
                .map_or_else(
                    || format!("API request failed with status {}", status.as_u16()),
                    ToOwned::to_owned,
                );
            Error::Api {
                status: status.as_u16(),
                message,
                data,
            }
        } else {
            let message = status.canonical_reason().map_or_else(
                || format!("API request failed with status {}", status.as_u16()),
                ToOwned::to_owned,
            );
            Error::Api {
                status: status.as_u16(),
                data: json!({ "message": message }),
                message,
            }
        }
    }
}
