//! Configuration for the routedeck console.
//!
//! Two files live in the config directory: `api-config.json`, the
//! connection record (see [`store`]), and `settings.toml`, console
//! preferences loaded through figment (defaults, then the file, then
//! `ROUTEDECK_*` environment variables).

pub mod store;

pub use store::{ConfigStore, FileConfigStore, MemoryConfigStore, RECORD_KEY};

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Deserializer, Serialize, de};
use thiserror::Error;

use routedeck_core::{DEFAULT_PAGE_SIZE, TlsMode, TransportConfig};

/// Base URL offered by `config init`.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:9180/apisix/admin";

/// Overrides the config directory.
pub const CONFIG_DIR_ENV: &str = "ROUTEDECK_CONFIG_DIR";

const SETTINGS_FILE: &str = "settings.toml";
const SETTINGS_KEYS: [&str; 6] = ["output", "color", "page_size", "timeout", "insecure", "ca_cert"];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown setting '{0}'")]
    UnknownKey(String),

    #[error("failed to serialize settings: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("invalid connection record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// Console preferences from `settings.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Request timeout in seconds. Unset, `0` and `"none"` mean no timeout.
    #[serde(
        default,
        deserialize_with = "optional_seconds",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<u64>,

    #[serde(default)]
    pub insecure: bool,

    /// PEM bundle for gateways behind a private CA.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            page_size: default_page_size(),
            timeout: None,
            insecure: false,
            ca_cert: None,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Seconds as a number or a string; `0`, `""` and `"none"` become `None`.
fn optional_seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Secs(u64),
        Text(String),
    }

    let secs = match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::Secs(secs)) => Some(secs),
        Some(Raw::Text(text)) => match text.trim() {
            "" | "none" => None,
            other => Some(other.parse::<u64>().map_err(|_| {
                de::Error::custom(format!("expected seconds or \"none\", got '{other}'"))
            })?),
        },
    };
    Ok(secs.filter(|s| *s > 0))
}

impl Settings {
    /// Names accepted by [`Settings::set`].
    pub fn keys() -> &'static [&'static str] {
        &SETTINGS_KEYS
    }

    /// Set one preference from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::Validation {
            field: key.into(),
            reason,
        };
        match key {
            "output" => {
                if !matches!(value, "table" | "json" | "json-compact" | "yaml" | "plain") {
                    return Err(invalid(format!(
                        "expected table, json, json-compact, yaml or plain, got '{value}'"
                    )));
                }
                self.output = value.into();
            }
            "color" => {
                if !matches!(value, "auto" | "always" | "never") {
                    return Err(invalid(format!(
                        "expected auto, always or never, got '{value}'"
                    )));
                }
                self.color = value.into();
            }
            "page_size" => {
                self.page_size = value
                    .parse()
                    .ok()
                    .filter(|n| routedeck_core::PAGE_SIZE_CHOICES.contains(n))
                    .ok_or_else(|| invalid(format!("expected 10, 20, 50 or 100, got '{value}'")))?;
            }
            "timeout" => {
                self.timeout = match value {
                    "" | "none" | "0" => None,
                    secs => Some(
                        secs.parse()
                            .map_err(|_| invalid(format!("expected seconds, got '{secs}'")))?,
                    ),
                };
            }
            "insecure" => {
                self.insecure = value
                    .parse()
                    .map_err(|_| invalid(format!("expected true or false, got '{value}'")))?;
            }
            "ca_cert" => {
                self.ca_cert = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            other => return Err(ConfigError::UnknownKey(other.into())),
        }
        Ok(())
    }

    /// Transport settings for the HTTP client.
    pub fn transport(&self) -> TransportConfig {
        let tls = if self.insecure {
            TlsMode::DangerAcceptInvalid
        } else if let Some(ref ca) = self.ca_cert {
            TlsMode::CustomCa(ca.clone())
        } else {
            TlsMode::System
        };
        TransportConfig {
            tls,
            timeout: self.timeout.filter(|s| *s > 0).map(Duration::from_secs),
        }
    }
}

// ── Paths ───────────────────────────────────────────────────────────

/// Config directory: `$ROUTEDECK_CONFIG_DIR`, else the platform config
/// dir, else `$HOME/.config/routedeck`.
pub fn config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    ProjectDirs::from("io", "routedeck", "routedeck")
        .map_or_else(dirs_fallback, |dirs| dirs.config_dir().to_path_buf())
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("routedeck");
    p
}

pub fn settings_path(dir: &Path) -> PathBuf {
    dir.join(SETTINGS_FILE)
}

// ── Loading / saving ────────────────────────────────────────────────

/// Load settings from `<dir>/settings.toml` and `ROUTEDECK_*` env vars.
pub fn load_settings(dir: &Path) -> Result<Settings, ConfigError> {
    let settings = Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(settings_path(dir)))
        .merge(Env::prefixed("ROUTEDECK_").only(&SETTINGS_KEYS))
        .extract()?;
    Ok(settings)
}

/// Write settings to `<dir>/settings.toml`.
pub fn save_settings(dir: &Path, settings: &Settings) -> Result<(), ConfigError> {
    std::fs::create_dir_all(dir)?;
    let toml_str = toml::to_string_pretty(settings)?;
    std::fs::write(settings_path(dir), toml_str)?;
    Ok(())
}
