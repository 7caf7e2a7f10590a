//! Command dispatch: bridges CLI args -> one snapshot -> output formatting.

pub mod config_cmd;
pub mod entities;
pub mod overview;
pub mod show;
pub mod url;

use tracing::debug;

use routemap_config::Config;
use routemap_core::{Poller, Snapshot};

use crate::cli::{Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

/// Dispatch a proxy-bound command. Config, URL and completions are
/// handled before this point.
pub async fn dispatch(cmd: Command, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let snapshot = fetch(cfg, global).await?;
    let format = config::output_format(global, cfg);
    let query = global.query.as_deref().unwrap_or_default();

    match cmd {
        Command::Show(args) => show::handle(&snapshot, query, &args, format, global),
        Command::Overview => overview::handle(&snapshot, format, global),
        Command::Routers
        | Command::Services
        | Command::Entrypoints
        | Command::Middlewares
        | Command::Certs => entities::handle(&cmd, &snapshot, query, format, global),
        Command::Url(_) | Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}

/// One snapshot, no background task.
async fn fetch(cfg: &Config, global: &GlobalOpts) -> Result<Snapshot, CliError> {
    let poller_config = config::poller_config(global, cfg)?;
    if let Some(ref url) = poller_config.url {
        debug!(%url, "fetching snapshot");
    }
    Ok(Poller::oneshot(poller_config).await?)
}
