//! Clap derive structures for the `routedeck` CLI.
//!
//! Defines the command tree, global flags, and shared types. Only depends
//! on clap so `build.rs` can include it for man page generation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// routedeck -- operator console for gateway routes
#[derive(Debug, Parser)]
#[command(
    name = "routedeck",
    version,
    about = "Manage gateway routes through the Admin API",
    long_about = "View, create, edit and delete the routing rules stored by an\n\
        APISIX-style Admin API (`/routes`, authenticated with X-API-KEY).",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Admin API base URL (overrides the stored record)
    #[arg(long, env = "ROUTEDECK_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Admin API key (overrides the stored record)
    #[arg(long, env = "ROUTEDECK_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Output format [default: from settings, else table]
    #[arg(long, short = 'o', global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: from settings, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (no timeout unless set)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage routes
    #[command(alias = "route", alias = "r")]
    Routes(RoutesArgs),

    /// Manage the Admin API connection and console settings
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ROUTES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RoutesArgs {
    #[command(subcommand)]
    pub command: RoutesCommand,
}

#[derive(Debug, Subcommand)]
pub enum RoutesCommand {
    /// List one page of routes
    #[command(alias = "ls")]
    List {
        /// Page number (1-based, clamped to the last page)
        #[arg(long, default_value = "1")]
        page: u32,

        /// Routes per page: 10, 20, 50 or 100 [default: from settings]
        #[arg(long, short = 'l', value_parser = parse_page_size)]
        page_size: Option<u32>,
    },

    /// Show one route
    Get {
        /// Route ID
        id: String,
    },

    /// Create a route (PUT when --id is given, else POST)
    Create {
        /// Route ID; the server assigns one when omitted
        #[arg(long)]
        id: Option<String>,

        #[command(flatten)]
        fields: RouteFields,

        /// Start from a route JSON file (flags are applied on top)
        #[arg(long, short = 'F')]
        from_file: Option<PathBuf>,
    },

    /// Update a route (fetches it, applies edits, then PUTs it back)
    Update {
        /// Route ID
        id: String,

        #[command(flatten)]
        fields: RouteFields,

        /// Toggle a method on or off (repeatable)
        #[arg(long, value_enum, ignore_case = true)]
        toggle_method: Vec<MethodArg>,

        /// Replace the stored route with a JSON file (flags are applied on top)
        #[arg(long, short = 'F')]
        from_file: Option<PathBuf>,
    },

    /// Delete a route after confirmation
    #[command(alias = "rm")]
    Delete {
        /// Route ID
        id: String,
    },
}

/// Editable route fields shared by `create` and `update`.
///
/// List flags replace the whole list; pass an empty value to clear it.
#[derive(Debug, Default, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct RouteFields {
    /// Route name
    #[arg(long)]
    pub name: Option<String>,

    /// Description
    #[arg(long)]
    pub desc: Option<String>,

    /// Request path to match (repeatable)
    #[arg(long = "uri", value_name = "URI")]
    pub uris: Vec<String>,

    /// Host to match (repeatable)
    #[arg(long = "host", value_name = "HOST")]
    pub hosts: Vec<String>,

    /// Client address or CIDR to match (repeatable)
    #[arg(long = "remote-addr", value_name = "ADDR")]
    pub remote_addrs: Vec<String>,

    /// HTTP method to match (repeatable; none means any)
    #[arg(long = "method", value_name = "METHOD", value_enum, ignore_case = true)]
    pub methods: Vec<MethodArg>,

    /// Match priority (higher wins)
    #[arg(long, allow_negative_numbers = true)]
    pub priority: Option<i64>,

    /// Disable the route
    #[arg(long, conflicts_with = "enabled")]
    pub disabled: bool,

    /// Enable the route
    #[arg(long)]
    pub enabled: bool,

    /// Upstream ID
    #[arg(long)]
    pub upstream_id: Option<String>,

    /// Service ID
    #[arg(long)]
    pub service_id: Option<String>,

    /// Plugin config ID
    #[arg(long)]
    pub plugin_config_id: Option<String>,

    /// Enable WebSocket proxying
    #[arg(long, conflicts_with = "no_websocket")]
    pub websocket: bool,

    /// Disable WebSocket proxying
    #[arg(long)]
    pub no_websocket: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MethodArg {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Connect,
    Trace,
    Purge,
}

fn parse_page_size(raw: &str) -> Result<u32, String> {
    match raw.parse::<u32>() {
        Ok(n @ (10 | 20 | 50 | 100)) => Ok(n),
        _ => Err(format!("expected 10, 20, 50 or 100, got '{raw}'")),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Store the Admin API base URL and key (prompts unless both are given)
    Init,

    /// Display the connection record (key redacted) and settings
    Show,

    /// Set a value: base_url, api_key, or a console setting
    /// (output, color, page_size, timeout, insecure, ca_cert)
    Set {
        /// Key to set
        key: String,

        /// Value to set
        value: String,
    },

    /// Print the config file locations
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
