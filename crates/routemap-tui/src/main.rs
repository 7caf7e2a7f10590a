//! `routemap-tui`: live terminal view of a Traefik proxy.
//!
//! Built on [ratatui](https://ratatui.rs). A [`Poller`] from `routemap-core`
//! refreshes the snapshot on an interval; the data bridge forwards every new
//! snapshot and polling state into the app's action loop, where it is
//! compiled against the current search query and drawn as two trees.
//!
//! Logs go to a file (default `routemap-tui.log` in the system temp dir) so
//! they never corrupt the terminal.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use routemap_config::UrlStore;
use routemap_core::Poller;

use crate::app::App;

/// Live view of a Traefik proxy's routes and backends.
#[derive(Parser, Debug)]
#[command(name = "routemap-tui", version, about)]
struct Cli {
    /// Traefik API URL (e.g., http://traefik:8080)
    #[arg(short = 'u', long, env = "ROUTEMAP_URL")]
    url: Option<String>,

    /// Time between refreshes (e.g., 5s, 1m)
    #[arg(short = 'p', long, env = "ROUTEMAP_POLL_INTERVAL", value_parser = humantime::parse_duration)]
    poll_interval: Option<Duration>,

    /// Accept invalid TLS certificates
    #[arg(short = 'k', long, env = "ROUTEMAP_INSECURE")]
    insecure: bool,

    /// Log file path (defaults to routemap-tui.log in the temp dir)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-only tracing. Hold the guard for the lifetime of the app so the
/// writer flushes on exit.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "routemap_tui={log_level},routemap_core={log_level}"
        ))
    });

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("routemap-tui.log"));
    let log_dir = log_file
        .parent()
        .map_or_else(std::env::temp_dir, std::path::Path::to_path_buf);
    let log_filename = log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("routemap-tui.log"))
        .to_owned();

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Build the poller from the config file, the URL store and CLI overrides.
///
/// Precedence for the URL: `--url` / `ROUTEMAP_URL`, then the stored URL,
/// then `url` in the config file. No URL at all is fine: the app opens
/// with a prompt.
fn build_poller(cli: &Cli, store: &UrlStore) -> Result<Poller> {
    let cfg = routemap_config::load_config()?;
    let url = routemap_config::resolve_url(cli.url.as_deref(), store, &cfg)?;

    let mut config = cfg.to_poller_config(url)?;
    if let Some(every) = cli.poll_interval {
        config.poll_interval = every;
    }
    if cli.insecure {
        config.tls = routemap_core::TlsVerification::DangerAcceptInvalid;
    }
    Ok(Poller::new(config))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks first so a failure during setup still restores the terminal
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let store = UrlStore::default_location();
    let poller = build_poller(&cli, &store)?;

    info!(
        url = poller.url().map_or_else(|| "(not set)".to_owned(), String::from),
        interval = ?poller.config().poll_interval,
        "starting routemap-tui"
    );

    let mut app = App::new(poller, store);
    app.run().await?;

    Ok(())
}
