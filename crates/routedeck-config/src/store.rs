// ── Connection record stores ──
//
// A single `api-config` record: base URL plus API key. Stores keep the
// loaded record in memory and only replace it after a save succeeded.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use routedeck_core::ApiConfig;

use crate::ConfigError;

/// Fixed key of the connection record.
pub const RECORD_KEY: &str = "api-config";

/// Read/write contract for the connection record.
pub trait ConfigStore: Send + Sync {
    /// The current record, if one was ever saved.
    fn load(&self) -> Option<ApiConfig>;

    /// Validate and persist `config`, replacing the current record.
    fn save(&self, config: &ApiConfig) -> Result<(), ConfigError>;
}

/// Reject records that could never authenticate a request.
pub fn validate(config: &ApiConfig) -> Result<(), ConfigError> {
    let base_url = config.base_url();
    if base_url.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "base_url".into(),
            reason: "must not be empty".into(),
        });
    }
    let parsed = url::Url::parse(base_url).map_err(|e| ConfigError::Validation {
        field: "base_url".into(),
        reason: format!("invalid URL ({e})"),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("expected an http or https URL, got '{}'", parsed.scheme()),
        });
    }
    if config.api_key().expose_secret().trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "api_key".into(),
            reason: "must not be empty".into(),
        });
    }
    Ok(())
}

// ── On-disk shape ───────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct StoredConfig {
    base_url: String,
    api_key: String,
}

impl From<StoredConfig> for ApiConfig {
    fn from(stored: StoredConfig) -> Self {
        ApiConfig::new(stored.base_url, stored.api_key)
    }
}

impl From<&ApiConfig> for StoredConfig {
    fn from(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url().to_owned(),
            api_key: config.api_key().expose_secret().to_owned(),
        }
    }
}

// ── FileConfigStore ─────────────────────────────────────────────────

/// JSON file store: `<dir>/api-config.json`.
pub struct FileConfigStore {
    path: PathBuf,
    current: Mutex<Option<ApiConfig>>,
}

impl FileConfigStore {
    /// Open the store in `dir`, reading the record if it exists.
    pub fn open(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(format!("{RECORD_KEY}.json"));
        let current = match std::fs::read_to_string(&path) {
            Ok(raw) => {
                let stored: StoredConfig = serde_json::from_str(&raw)?;
                debug!(path = %path.display(), "loaded connection record");
                Some(ApiConfig::from(stored))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            current: Mutex::new(current),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomically(&self, contents: &[u8]) -> Result<(), ConfigError> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(contents)?;
        tmp.as_file().sync_all()?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Option<ApiConfig> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, config: &ApiConfig) -> Result<(), ConfigError> {
        validate(config)?;
        let json = serde_json::to_vec_pretty(&StoredConfig::from(config))?;
        self.write_atomically(&json)?;

        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(config.clone());
        info!(path = %self.path.display(), "saved connection record");
        Ok(())
    }
}

// ── MemoryConfigStore ───────────────────────────────────────────────

/// In-process store for tests and embedding.
#[derive(Default)]
pub struct MemoryConfigStore {
    current: Mutex<Option<ApiConfig>>,
}

impl MemoryConfigStore {
    pub fn new(initial: Option<ApiConfig>) -> Self {
        Self {
            current: Mutex::new(initial),
        }
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Option<ApiConfig> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, config: &ApiConfig) -> Result<(), ConfigError> {
        validate(config)?;
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(config.clone());
        Ok(())
    }
}
