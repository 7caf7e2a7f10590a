//! CLI configuration: thin wrapper around `routemap_config`.
//!
//! Adds resolution that respects `GlobalOpts` overrides (--url,
//! --insecure, --timeout, --config, --output).

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use tracing::warn;

use routemap_config::{Config, UrlStore};
use routemap_core::{PollerConfig, TlsVerification};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Config file selected by `--config`, else the platform default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(routemap_config::config_path)
}

pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(routemap_config::load_config_from(&config_file(global))?)
}

/// URL store selected by `--state-file`, else the platform default.
pub fn url_store(global: &GlobalOpts) -> UrlStore {
    global
        .state_file
        .clone()
        .map_or_else(UrlStore::default_location, UrlStore::open)
}

/// Flag wins, then config, then table.
pub fn output_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    global.output.unwrap_or_else(|| {
        OutputFormat::from_str(&config.output, true).unwrap_or_else(|_| {
            warn!(output = %config.output, "unknown output format in config, using table");
            OutputFormat::Table
        })
    })
}

/// Translate config + global flags into a `PollerConfig`.
///
/// URL precedence: --url / ROUTEMAP_URL > stored URL > config file.
pub fn poller_config(global: &GlobalOpts, config: &Config) -> Result<PollerConfig, CliError> {
    let url = routemap_config::resolve_url(global.url.as_deref(), &url_store(global), config)?
        .ok_or(CliError::NoUrl)?;

    let mut poller = config.to_poller_config(Some(url))?;
    if global.insecure {
        poller.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        poller.timeout = Duration::from_secs(secs);
    }
    Ok(poller)
}
