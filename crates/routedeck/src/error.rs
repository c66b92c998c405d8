//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use routedeck_config::ConfigError;
use routedeck_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("Admin API is not configured")]
    #[diagnostic(
        code(routedeck::not_configured),
        help(
            "Run: routedeck config init\n\
             Or set ROUTEDECK_BASE_URL and ROUTEDECK_API_KEY.\n\
             Config directory: {path}"
        )
    )]
    NotConfigured { path: String },

    #[error("Invalid Admin API configuration: {message}")]
    #[diagnostic(
        code(routedeck::invalid_config),
        help("Check the stored values with: routedeck config show")
    )]
    InvalidConfig { message: String },

    #[error(transparent)]
    #[diagnostic(code(routedeck::config))]
    Config(ConfigError),

    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the Admin API at {url}")]
    #[diagnostic(
        code(routedeck::connection_failed),
        help(
            "Check that the gateway is running and the Admin API is reachable.\n\
             Reason: {reason}\n\
             Self-signed certificate? Try --insecure (-k)."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to the Admin API timed out")]
    #[diagnostic(
        code(routedeck::timeout),
        help("Increase the timeout with --timeout or check the gateway's responsiveness.")
    )]
    Timeout,

    #[error("Transport error: {message}")]
    #[diagnostic(code(routedeck::transport))]
    Transport { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(routedeck::auth_failed),
        help(
            "Verify the API key (admin_key in the gateway's config.yaml).\n\
             Update it with: routedeck config set api_key <KEY>"
        )
    )]
    AuthFailed { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Route not found: {message}")]
    #[diagnostic(
        code(routedeck::not_found),
        help("Run: routedeck routes list to see available routes")
    )]
    NotFound { message: String },

    #[error("Conflict: {message}")]
    #[diagnostic(code(routedeck::conflict))]
    Conflict { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error (HTTP {status}): {message}")]
    #[diagnostic(code(routedeck::api_error))]
    ApiError { status: u16, message: String },

    #[error("Request rejected by the gateway: {message}")]
    #[diagnostic(code(routedeck::rejected))]
    Rejected { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(routedeck::unexpected_response),
        help("Is the base URL pointing at the Admin API (e.g. http://127.0.0.1:9180/apisix/admin)?")
    )]
    UnexpectedResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(routedeck::validation))]
    Validation { field: String, reason: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(routedeck::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Internal / IO ────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(routedeck::internal))]
    Internal { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(routedeck::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotConfigured { .. } | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Validation { .. }
            | Self::InvalidConfig { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::Json(_) => exit_code::USAGE,
            Self::Config(ConfigError::Validation { .. } | ConfigError::UnknownKey(_)) => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConfigurationMissing => Self::NotConfigured {
                path: routedeck_config::config_dir().display().to_string(),
            },
            CoreError::Config { message } => Self::InvalidConfig { message },

            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout => Self::Timeout,
            CoreError::Transport { message } => Self::Transport { message },

            CoreError::Api {
                status, message, ..
            } => match status {
                401 | 403 => Self::AuthFailed { message },
                404 => Self::NotFound { message },
                409 => Self::Conflict { message },
                _ => Self::ApiError { status, message },
            },
            CoreError::Rejected { message } => Self::Rejected { message },
            CoreError::MalformedResponse { message } | CoreError::UnexpectedResponse { message } => {
                Self::UnexpectedResponse { message }
            }

            CoreError::ValidationFailed { message } => Self::Validation {
                field: "route".into(),
                reason: message,
            },

            other @ (CoreError::DeleteInProgress { .. }
            | CoreError::NoDeletePending
            | CoreError::Superseded
            | CoreError::Internal(_)) => Self::Internal {
                message: other.to_string(),
            },
        }
    }
}
