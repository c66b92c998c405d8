//! Config subcommand handlers.

use std::io::IsTerminal;

use dialoguer::Input;
use secrecy::ExposeSecret;
use serde::Serialize;

use routedeck_config::{ConfigStore, DEFAULT_BASE_URL, Settings};
use routedeck_core::ApiConfig;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

const REDACTED: &str = "****";

/// What `config show` prints.
#[derive(Serialize)]
struct ConfigView<'a> {
    config_dir: String,
    base_url: Option<String>,
    api_key: Option<&'static str>,
    settings: &'a Settings,
}

fn detail(view: &ConfigView<'_>) -> String {
    let s = view.settings;
    [
        format!("Config dir: {}", view.config_dir),
        format!("Base URL:   {}", view.base_url.as_deref().unwrap_or("(not set)")),
        format!("API key:    {}", view.api_key.unwrap_or("(not set)")),
        format!("Output:     {}", s.output),
        format!("Color:      {}", s.color),
        format!("Page size:  {}", s.page_size),
        format!(
            "Timeout:    {}",
            s.timeout.map_or_else(|| "none".into(), |t| format!("{t}s"))
        ),
        format!("Insecure:   {}", s.insecure),
        format!(
            "CA cert:    {}",
            s.ca_cert
                .as_ref()
                .map_or_else(|| "-".into(), |p| p.display().to_string())
        ),
    ]
    .join("\n")
}

/// Value from a flag, else an interactive prompt.
fn value_or_prompt(
    given: Option<&String>,
    field: &str,
    prompt: impl FnOnce() -> Result<String, CliError>,
) -> Result<String, CliError> {
    if let Some(v) = given {
        return Ok(v.clone());
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::Validation {
            field: field.into(),
            reason: format!("pass --{} when not running interactively", field.replace('_', "-")),
        });
    }
    prompt()
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let ctx = Context::load(global)?;

    match args.command {
        // ── Init: store the connection record ───────────────────────
        ConfigCommand::Init => {
            if !ctx.quiet {
                eprintln!("routedeck configuration");
                eprintln!("   Config path: {}\n", ctx.store.path().display());
            }

            let base_url = value_or_prompt(global.base_url.as_ref(), "base_url", || {
                Input::<String>::new()
                    .with_prompt("Admin API base URL")
                    .default(DEFAULT_BASE_URL.to_owned())
                    .interact_text()
                    .map_err(prompt_err)
            })?;
            let api_key = value_or_prompt(global.api_key.as_ref(), "api_key", || {
                rpassword::prompt_password("API key: ").map_err(prompt_err)
            })?;

            ctx.store.save(&ApiConfig::new(base_url, api_key))?;
            output::print_output(
                &format!("Configuration written to {}", ctx.store.path().display()),
                ctx.quiet,
            );
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let record = ctx.store.load();
            let view = ConfigView {
                config_dir: ctx.dir.display().to_string(),
                base_url: record.as_ref().map(|c| c.base_url().to_owned()),
                api_key: record
                    .as_ref()
                    .filter(|c| !c.api_key().expose_secret().is_empty())
                    .map(|_| REDACTED),
                settings: &ctx.settings,
            };
            let out = output::render_single(ctx.output, &view, detail, |v| {
                v.base_url.clone().unwrap_or_default()
            });
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        // ── Set ─────────────────────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            match key.as_str() {
                "base_url" | "api_key" => {
                    let current = ctx.store.load();
                    let keep_url = current.as_ref().map(|c| c.base_url().to_owned());
                    let keep_key = current
                        .as_ref()
                        .map(|c| c.api_key().expose_secret().to_owned());
                    let next = if key == "base_url" {
                        ApiConfig::new(value, keep_key.unwrap_or_default())
                    } else {
                        ApiConfig::new(keep_url.unwrap_or_default(), value)
                    };
                    ctx.store.save(&next)?;
                }
                _ => {
                    let mut settings = ctx.settings.clone();
                    settings.set(&key, &value)?;
                    routedeck_config::save_settings(&ctx.dir, &settings)?;
                }
            }
            output::print_output(&format!("Set {key}"), ctx.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            let out = format!(
                "{}\n{}",
                ctx.store.path().display(),
                routedeck_config::settings_path(&ctx.dir).display()
            );
            output::print_output(&out, ctx.quiet);
            Ok(())
        }
    }
}
