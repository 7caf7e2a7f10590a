//! Clap derive structures for the `routemap` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// routemap -- live topology of a Traefik reverse proxy
#[derive(Debug, Parser)]
#[command(
    name = "routemap",
    version,
    about = "Inspect Traefik routing topology from the command line",
    long_about = "Polls the Traefik API (routers, services, entrypoints, middlewares,\n\
        TLS certificates) and prints the frontage tree (entrypoints and routes)\n\
        next to the backend tree (providers, services, servers).",
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
    /// Traefik API base URL (overrides the stored URL and config file)
    #[arg(long, short = 'u', env = "ROUTEMAP_URL", global = true)]
    pub url: Option<String>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "ROUTEMAP_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Free-text filter applied across routers, services and their links
    #[arg(long, short = 'q', global = true)]
    pub query: Option<String>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "ROUTEMAP_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds [default: from config]
    #[arg(long, env = "ROUTEMAP_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Config file to use instead of the platform default
    #[arg(long, env = "ROUTEMAP_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// URL store file to use instead of the platform default
    #[arg(long, env = "ROUTEMAP_STATE", global = true, value_name = "PATH", hide = true)]
    pub state_file: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Trees and tables (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one key per line (scripting)
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

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the frontage and backend trees
    #[command(alias = "tree")]
    Show(ShowArgs),

    /// List HTTP routers
    #[command(alias = "r")]
    Routers,

    /// List HTTP services
    #[command(alias = "svc")]
    Services,

    /// List entrypoints
    #[command(alias = "ep")]
    Entrypoints,

    /// List HTTP middlewares
    #[command(alias = "mw")]
    Middlewares,

    /// List TLS certificates
    #[command(alias = "certificates")]
    Certs,

    /// Show proxy version and entity totals
    Overview,

    /// Manage the stored proxy URL
    Url(UrlArgs),

    /// Manage the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Which tree(s) to print
    #[arg(long, short = 's', default_value = "both")]
    pub side: Side,

    /// Omit the middleware and certificate catalog
    #[arg(long)]
    pub no_catalog: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Side {
    Both,
    /// Entrypoints and routes
    Frontage,
    /// Providers, services and servers
    Backend,
}

// ── URL store ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UrlArgs {
    #[command(subcommand)]
    pub command: UrlCommand,
}

#[derive(Debug, Subcommand)]
pub enum UrlCommand {
    /// Print the stored URL
    Get,

    /// Store a URL (replaces any previous one)
    Set {
        /// Traefik API base URL; a bare host:port gets http://
        url: String,
    },

    /// Remove the stored URL
    #[command(alias = "rm")]
    Clear,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
