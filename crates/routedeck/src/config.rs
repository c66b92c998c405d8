//! Resolution of the effective connection and console settings.
//!
//! Flags and `ROUTEDECK_BASE_URL` / `ROUTEDECK_API_KEY` take precedence
//! over the stored connection record; `--output`, `--color`, `--timeout`
//! and `--insecure` take precedence over `settings.toml`.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use secrecy::ExposeSecret;

use routedeck_config::{ConfigStore, FileConfigStore, Settings};
use routedeck_core::{ApiConfig, TlsMode, TransportConfig};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Everything a command needs after config resolution.
pub struct Context {
    pub dir: PathBuf,
    pub settings: Settings,
    pub store: FileConfigStore,
    pub output: OutputFormat,
    pub color: bool,
    pub quiet: bool,
    pub yes: bool,
}

impl Context {
    pub fn load(global: &GlobalOpts) -> Result<Self, CliError> {
        let dir = routedeck_config::config_dir();
        let settings = routedeck_config::load_settings(&dir)?;
        let store = FileConfigStore::open(&dir)?;
        let output = output_format(global, &settings);
        let color = crate::output::should_color(color_mode(global, &settings));
        Ok(Self {
            dir,
            settings,
            store,
            output,
            color,
            quiet: global.quiet,
            yes: global.yes,
        })
    }

    /// Stored record with flag/env overrides applied. `None` when neither
    /// source supplies anything.
    pub fn api_config(&self, global: &GlobalOpts) -> Option<ApiConfig> {
        let stored = self.store.load();
        if stored.is_none() && global.base_url.is_none() && global.api_key.is_none() {
            return None;
        }
        let base_url = global
            .base_url
            .clone()
            .or_else(|| stored.as_ref().map(|c| c.base_url().to_owned()))
            .unwrap_or_default();
        let api_key = global
            .api_key
            .clone()
            .or_else(|| {
                stored
                    .as_ref()
                    .map(|c| c.api_key().expose_secret().to_owned())
            })
            .unwrap_or_default();
        Some(ApiConfig::new(base_url, api_key))
    }

    pub fn transport(&self, global: &GlobalOpts) -> TransportConfig {
        let mut transport = self.settings.transport();
        if global.insecure {
            transport.tls = TlsMode::DangerAcceptInvalid;
        }
        if let Some(secs) = global.timeout {
            transport = transport.with_timeout((secs > 0).then_some(Duration::from_secs(secs)));
        }
        transport
    }
}

fn output_format(global: &GlobalOpts, settings: &Settings) -> OutputFormat {
    global.output.unwrap_or_else(|| {
        OutputFormat::from_str(&settings.output, true).unwrap_or(OutputFormat::Table)
    })
}

fn color_mode(global: &GlobalOpts, settings: &Settings) -> ColorMode {
    global
        .color
        .unwrap_or_else(|| ColorMode::from_str(&settings.color, true).unwrap_or(ColorMode::Auto))
}
