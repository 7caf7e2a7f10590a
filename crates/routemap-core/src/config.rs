// ── Runtime polling configuration ──
//
// These types describe *how* to reach a proxy's API and how often to
// poll it. They never touch disk: the CLI/TUI builds a `PollerConfig`
// from `routemap-config` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// Default interval between poll cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// Bundled root store (strict).
    #[default]
    SystemDefaults,
    /// Trust an extra CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed dashboards).
    DangerAcceptInvalid,
}

/// Configuration for polling a single proxy.
///
/// `url` is optional: a poller without a URL stays idle until
/// [`Poller::set_url`](crate::Poller::set_url) is called.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Proxy API base URL (e.g. `http://traefik:8080`).
    pub url: Option<Url>,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Delay between poll cycles. The first cycle runs immediately.
    pub poll_interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            url: None,
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}
