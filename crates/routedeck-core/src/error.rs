// ── Core error types ──
//
// Errors surfaced to the console. The `From<routedeck_api::Error>` impl
// keeps the HTTP status and failure category so callers can still branch
// on them without touching transport types.

use routedeck_api::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration errors ─────────────────────────────────────────
    #[error("Admin API is not configured (base URL and API key are required)")]
    ConfigurationMissing,

    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the Admin API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to the Admin API timed out")]
    Timeout,

    #[error("Transport error: {message}")]
    Transport { message: String },

    // ── Server errors ────────────────────────────────────────────────
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        data: serde_json::Value,
    },

    /// A list request answered with `{ error_msg }` instead of a page.
    #[error("Request rejected by the gateway: {message}")]
    Rejected { message: String },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("{message}")]
    UnexpectedResponse { message: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Route {target} is already being deleted")]
    DeleteInProgress { target: String },

    #[error("No delete is awaiting confirmation")]
    NoDeletePending,

    /// A newer list request was issued while this one was in flight.
    #[error("List request superseded by a newer one")]
    Superseded,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Failure category for errors that came from the request layer.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::ConfigurationMissing | Self::Config { .. } => Some(ErrorKind::ConfigurationMissing),
            Self::ConnectionFailed { .. }
            | Self::Timeout
            | Self::Transport { .. }
            | Self::Api { .. }
            | Self::MalformedResponse { .. } => Some(ErrorKind::TransportFailure),
            Self::Rejected { .. } | Self::UnexpectedResponse { .. } => {
                Some(ErrorKind::UnexpectedResponseShape)
            }
            Self::ValidationFailed { .. }
            | Self::DeleteInProgress { .. }
            | Self::NoDeletePending
            | Self::Superseded
            | Self::Internal(_) => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<routedeck_api::Error> for CoreError {
    fn from(err: routedeck_api::Error) -> Self {
        use routedeck_api::Error as ApiError;

        match err {
            ApiError::ConfigurationMissing => Self::ConfigurationMissing,
            ApiError::InvalidConfig { field, reason } => Self::Config {
                message: format!("invalid {field}: {reason}"),
            },
            ApiError::InvalidUrl(e) => Self::Config {
                message: format!("invalid base URL: {e}"),
            },
            ApiError::Transport(ref e) => {
                if e.is_timeout() {
                    Self::Timeout
                } else if e.is_connect() {
                    Self::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    Self::Transport {
                        message: e.to_string(),
                    }
                }
            }
            ApiError::Tls(reason) => Self::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {reason}"),
            },
            ApiError::Api {
                status,
                message,
                data,
            } => Self::Api {
                status,
                message,
                data,
            },
            ApiError::Encode(e) => Self::Internal(format!("failed to encode request: {e}")),
            ApiError::Deserialization { message, body: _ } => Self::MalformedResponse { message },
            ApiError::UnexpectedResponse { message } => Self::UnexpectedResponse { message },
        }
    }
}
