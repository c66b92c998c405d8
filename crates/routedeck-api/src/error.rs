use thiserror::Error;

/// Top-level error type for the `routedeck-api` crate.
///
/// Every variant falls into one of the three [`ErrorKind`] categories that
/// callers branch on. `routedeck-core` maps these into workflow errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Configuration ───────────────────────────────────────────────
    /// No base URL or API key set. Raised before any network I/O.
    #[error("Admin API base URL or API key is not configured")]
    ConfigurationMissing,

    /// Configuration present but unusable (e.g. API key not a valid header value).
    #[error("Invalid {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// `base_url` + path did not form a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Non-2xx response from the Admin API.
    #[error("Admin API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        /// Parsed error body, or `{"message": <status line>}` when the body was not JSON.
        data: serde_json::Value,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// Request body could not be encoded.
    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    /// 2xx body that is not valid JSON, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Valid JSON that matches none of the contracts for the endpoint.
    #[error("Unexpected response format: {message}")]
    UnexpectedResponse { message: String },
}

/// Coarse failure category shared by every workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No usable base URL / API key; no request was sent.
    ConfigurationMissing,
    /// Network or HTTP-level failure, including malformed bodies.
    TransportFailure,
    /// The body parsed but does not match the endpoint's contract.
    UnexpectedResponseShape,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigurationMissing | Self::InvalidConfig { .. } | Self::InvalidUrl(_) => {
                ErrorKind::ConfigurationMissing
            }
            Self::UnexpectedResponse { .. } => ErrorKind::UnexpectedResponseShape,
            Self::Transport(_)
            | Self::Tls(_)
            | Self::Api { .. }
            | Self::Encode(_)
            | Self::Deserialization { .. } => ErrorKind::TransportFailure,
        }
    }

    /// HTTP status carried by the error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the Admin API rejected the API key.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if the request never got a response in time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Returns `true` if the host could not be reached at all.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_connect())
    }

    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// Nothing in this crate retries; the flag is for callers that do.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(
            Error::ConfigurationMissing.kind(),
            ErrorKind::ConfigurationMissing
        );
        assert_eq!(
            Error::UnexpectedResponse {
                message: "x".into()
            }
            .kind(),
            ErrorKind::UnexpectedResponseShape
        );
        let api = Error::Api {
            status: 404,
            message: "Not Found".into(),
            data: json!({}),
        };
        assert_eq!(api.kind(), ErrorKind::TransportFailure);
        assert!(api.is_not_found());
        assert!(!api.is_transient());
    }

    #[test]
    fn auth_failure_detects_401_and_403() {
        for status in [401, 403] {
            let err = Error::Api {
                status,
                message: "denied".into(),
                data: json!({}),
            };
            assert!(err.is_auth_failure());
        }
        assert!(!Error::ConfigurationMissing.is_auth_failure());
    }
}
