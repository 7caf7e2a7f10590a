//! Shared configuration for the routemap CLI and TUI.
//!
//! Figment-layered TOML config (defaults, file, `ROUTEMAP_*` env), path
//! resolution, the on-disk configured-URL store, and translation to
//! `routemap_core::PollerConfig`. Both binaries depend on this crate; the
//! CLI layers its global flags on top.

mod store;

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use routemap_core::{PollerConfig, TlsVerification};

pub use store::{URL_KEY, UrlStore};

/// Prefix for environment overrides (`ROUTEMAP_URL`, `ROUTEMAP_TIMEOUT`, ...).
pub const ENV_PREFIX: &str = "ROUTEMAP_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

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

// ── TOML config ─────────────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Traefik API base URL (e.g. "http://traefik.local:8080").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Refresh cadence, humantime syntax ("15s", "1m").
    #[serde(default = "default_poll_interval")]
    pub poll_interval: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept invalid TLS certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate (PEM).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Default CLI output format.
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: None,
            poll_interval: default_poll_interval(),
            timeout: default_timeout(),
            insecure: false,
            ca_cert: None,
            output: default_output(),
        }
    }
}

fn default_poll_interval() -> String {
    "15s".into()
}
fn default_timeout() -> u64 {
    10
}
fn default_output() -> String {
    "table".into()
}

impl Config {
    /// Parsed `poll_interval`. Zero is rejected.
    pub fn poll_interval(&self) -> Result<Duration, ConfigError> {
        let interval =
            humantime::parse_duration(&self.poll_interval).map_err(|e| ConfigError::Validation {
                field: "poll_interval".into(),
                reason: format!("'{}': {e}", self.poll_interval),
            })?;
        if interval.is_zero() {
            return Err(ConfigError::Validation {
                field: "poll_interval".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(interval)
    }

    /// TLS verification mode from `insecure` / `ca_cert`.
    pub fn tls(&self) -> TlsVerification {
        if self.insecure {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ref ca) = self.ca_cert {
            TlsVerification::CustomCa(ca.clone())
        } else {
            TlsVerification::SystemDefaults
        }
    }

    /// Build a `PollerConfig` for `url` (already resolved by the caller).
    pub fn to_poller_config(&self, url: Option<Url>) -> Result<PollerConfig, ConfigError> {
        Ok(PollerConfig {
            url,
            tls: self.tls(),
            timeout: Duration::from_secs(self.timeout),
            poll_interval: self.poll_interval()?,
        })
    }
}

// ── Paths ───────────────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Default location of the configured-URL store, next to the config file.
pub fn state_path() -> PathBuf {
    config_dir().join("state.toml")
}

fn config_dir() -> PathBuf {
    ProjectDirs::from("io", "routemap", "routemap").map_or_else(dirs_fallback, |dirs| {
        dirs.config_dir().to_path_buf()
    })
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("routemap");
    p
}

// ── Loading / saving ────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment. A missing file is not
/// an error; defaults apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()?;

    // surface a bad interval at load time, not on first poll
    config.poll_interval()?;
    Ok(config)
}

/// Serialize config to TOML and write it to the canonical path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── URL handling ────────────────────────────────────────────────────

/// Parse a user-supplied proxy URL. A bare `host:port` gets `http://`.
pub fn parse_url(raw: &str) -> Result<Url, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ConfigError::Validation {
            field: "url".into(),
            reason: "must not be empty".into(),
        });
    }

    let candidate = if raw.contains("://") {
        raw.to_owned()
    } else {
        format!("http://{raw}")
    };
    let url = Url::parse(&candidate).map_err(|e| ConfigError::Validation {
        field: "url".into(),
        reason: format!("'{raw}': {e}"),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Validation {
            field: "url".into(),
            reason: format!("unsupported scheme '{other}', expected http or https"),
        }),
    }
}

/// Pick the URL to poll: explicit flag/env, then the stored URL, then
/// `url` from the config file.
pub fn resolve_url(
    explicit: Option<&str>,
    store: &UrlStore,
    config: &Config,
) -> Result<Option<Url>, ConfigError> {
    if let Some(raw) = explicit {
        return parse_url(raw).map(Some);
    }
    if let Some(stored) = store.url()? {
        return parse_url(&stored).map(Some);
    }
    config.url.as_deref().map(parse_url).transpose()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_apply_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(cfg.poll_interval().unwrap(), Duration::from_secs(15));
        assert_eq!(cfg.timeout, 10);
        assert_eq!(cfg.output, "table");
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "url = \"http://traefik.local:8080\"\npoll_interval = \"1m\"\ninsecure = true\n",
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.url.as_deref(), Some("http://traefik.local:8080"));
        assert_eq!(cfg.poll_interval().unwrap(), Duration::from_secs(60));
        assert_eq!(cfg.tls(), TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "poll_interval = \"0s\"\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "poll_interval"));
    }

    #[test]
    fn garbage_interval_is_rejected() {
        let cfg = Config {
            poll_interval: "soon".into(),
            ..Config::default()
        };
        assert!(cfg.poll_interval().is_err());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config {
            url: Some("https://proxy:8443".into()),
            ca_cert: Some(PathBuf::from("/etc/ca.pem")),
            ..Config::default()
        };
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded, cfg);
        assert_eq!(
            loaded.tls(),
            TlsVerification::CustomCa(PathBuf::from("/etc/ca.pem"))
        );
    }

    #[test]
    fn poller_config_carries_settings() {
        let cfg = Config {
            timeout: 3,
            poll_interval: "5s".into(),
            ..Config::default()
        };
        let url = parse_url("traefik:8080").unwrap();
        let poller = cfg.to_poller_config(Some(url)).unwrap();
        assert_eq!(poller.url.unwrap().as_str(), "http://traefik:8080/");
        assert_eq!(poller.timeout, Duration::from_secs(3));
        assert_eq!(poller.poll_interval, Duration::from_secs(5));
        assert_eq!(poller.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn parse_url_rules() {
        assert_eq!(
            parse_url(" https://a.example/ ").unwrap().as_str(),
            "https://a.example/"
        );
        assert!(parse_url("   ").is_err());
        assert!(parse_url("ftp://a.example").is_err());
    }

    #[test]
    fn url_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let store = UrlStore::open(dir.path().join("state.toml"));
        let cfg = Config {
            url: Some("http://from-config:8080".into()),
            ..Config::default()
        };

        let pick = |explicit: Option<&str>| {
            resolve_url(explicit, &store, &cfg)
                .unwrap()
                .map(|u| u.host_str().unwrap().to_owned())
        };

        assert_eq!(pick(None).as_deref(), Some("from-config"));

        store.set_url(&parse_url("http://from-store:8080").unwrap()).unwrap();
        assert_eq!(pick(None).as_deref(), Some("from-store"));
        assert_eq!(pick(Some("http://from-flag")).as_deref(), Some("from-flag"));

        store.clear_url().unwrap();
        let bare = Config::default();
        assert!(resolve_url(None, &store, &bare).unwrap().is_none());
    }
}
