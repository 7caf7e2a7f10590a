// ── Poller ──
//
// Owns the polling lifecycle for one proxy: builds the API client, runs
// a single interval task that fetches every endpoint in parallel, and
// stores the normalized result. Changing the URL cancels the running
// task and starts a fresh one; at most one task is ever active.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use routemap_api::transport::{TlsMode, TransportConfig};
use routemap_api::TraefikClient;

use crate::config::{PollerConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::EntityKind;
use crate::normalize::{Payloads, Snapshot, normalize};
use crate::store::SnapshotStore;

/// Shortest interval the timer accepts.
const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

// ── PollState ────────────────────────────────────────────────────

/// Polling state observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    /// No URL, or polling stopped.
    Idle,
    /// A cycle is in flight.
    Fetching,
    /// The last cycle stored a snapshot.
    Ready { at: chrono::DateTime<Utc> },
    /// Every endpoint of the last cycle failed. The previous snapshot,
    /// if any, is still in the store.
    Failed { message: String },
}

// ── Poller ───────────────────────────────────────────────────────

/// Cheaply cloneable via `Arc<PollerInner>`.
#[derive(Clone)]
pub struct Poller {
    inner: Arc<PollerInner>,
}

struct PollerInner {
    config: PollerConfig,
    store: Arc<SnapshotStore>,
    url: watch::Sender<Option<Url>>,
    state: watch::Sender<PollState>,
    source: Mutex<Source>,
    task: Mutex<Option<PollTask>>,
}

/// The client cycles fetch through. `generation` moves on every restart,
/// stop and clear; a cycle only stores its result if it still matches.
#[derive(Default)]
struct Source {
    generation: u64,
    client: Option<TraefikClient>,
}

impl Source {
    fn replace(&mut self, client: Option<TraefikClient>) {
        self.generation += 1;
        self.client = client;
    }
}

struct PollTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Poller {
    /// Create a poller. Does NOT start polling -- call
    /// [`start()`](Self::start) or [`set_url()`](Self::set_url).
    pub fn new(config: PollerConfig) -> Self {
        let (url, _) = watch::channel(config.url.clone());
        let (state, _) = watch::channel(PollState::Idle);

        Self {
            inner: Arc::new(PollerInner {
                config,
                store: Arc::new(SnapshotStore::new()),
                url,
                state,
                source: Mutex::new(Source::default()),
                task: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &PollerConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.inner.store
    }

    /// The URL currently polled, if any.
    pub fn url(&self) -> Option<Url> {
        self.inner.url.borrow().clone()
    }

    /// Latest stored snapshot.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.inner.store.current()
    }

    /// Subscribe to polling state changes.
    pub fn state(&self) -> watch::Receiver<PollState> {
        self.inner.state.subscribe()
    }

    /// Subscribe to snapshot version bumps.
    pub fn snapshots(&self) -> watch::Receiver<u64> {
        self.inner.store.subscribe()
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Start polling the configured URL. Without one the poller stays idle.
    pub async fn start(&self) -> Result<(), CoreError> {
        match self.url() {
            Some(url) => self.restart(url).await,
            None => {
                debug!("no proxy URL configured, poller idle");
                Ok(())
            }
        }
    }

    /// Point the poller at a new URL.
    ///
    /// `Some` cancels the running task and starts a new one; `None` stops
    /// polling and drops the stored snapshot.
    pub async fn set_url(&self, url: Option<Url>) -> Result<(), CoreError> {
        match url {
            Some(url) => self.restart(url).await,
            None => {
                self.stop().await;
                // Under the source lock so no in-flight cycle can store after the clear
                let mut source = self.inner.source.lock().await;
                source.replace(None);
                self.inner.url.send_replace(None);
                self.inner.store.clear();
                drop(source);
                info!("proxy URL cleared, polling stopped");
                Ok(())
            }
        }
    }

    /// Cancel the polling task, if any, and wait for it to finish.
    ///
    /// A manual refresh still in flight is discarded when it completes.
    pub async fn stop(&self) {
        if let Some(task) = self.inner.task.lock().await.take() {
            task.cancel.cancel();
            let _ = task.handle.await;
            debug!("poll task joined");
        }
        let mut source = self.inner.source.lock().await;
        source.generation += 1;
        self.inner.state.send_replace(PollState::Idle);
        drop(source);
    }

    /// Run one cycle now, outside the timer.
    ///
    /// Fails with [`CoreError::Superseded`] if the URL changes or polling
    /// stops before the cycle completes; nothing is stored in that case.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, CoreError> {
        self.poll_once().await
    }

    /// Fetch a single snapshot without spawning anything.
    ///
    /// Optimized for the CLI: one request per endpoint, no store, no task.
    pub async fn oneshot(config: PollerConfig) -> Result<Snapshot, CoreError> {
        let url = config.url.clone().ok_or(CoreError::NoUrl)?;
        let client = TraefikClient::new(url.as_str(), &build_transport(&config))?;

        let mut snapshot = fetch_snapshot(&client).await.map_err(|e| match e {
            CoreError::Timeout { .. } => CoreError::Timeout {
                timeout_secs: config.timeout.as_secs(),
            },
            other => other,
        })?;
        snapshot.fetched_at = Some(Utc::now());
        Ok(snapshot)
    }

    async fn restart(&self, url: Url) -> Result<(), CoreError> {
        let client = TraefikClient::new(url.as_str(), &build_transport(&self.inner.config))?;

        let mut task = self.inner.task.lock().await;
        if let Some(old) = task.take() {
            old.cancel.cancel();
            let _ = old.handle.await;
            debug!("previous poll task cancelled");
        }

        self.inner.source.lock().await.replace(Some(client));
        self.inner.url.send_replace(Some(url.clone()));

        let cancel = CancellationToken::new();
        let every = self.inner.config.poll_interval.max(MIN_POLL_INTERVAL);
        let handle = tokio::spawn(poll_task(self.clone(), every, cancel.clone()));
        *task = Some(PollTask { cancel, handle });

        info!(%url, interval = ?every, "polling started");
        Ok(())
    }

    async fn poll_once(&self) -> Result<Arc<Snapshot>, CoreError> {
        let (generation, client) = {
            let source = self.inner.source.lock().await;
            let client = source.client.clone().ok_or(CoreError::NoUrl)?;
            self.inner.state.send_replace(PollState::Fetching);
            (source.generation, client)
        };

        let result = fetch_snapshot(&client).await;

        // Held until the result is published so a concurrent restart or
        // clear lands strictly before or after it.
        let source = self.inner.source.lock().await;
        if source.generation != generation {
            debug!("source changed mid-cycle, discarding result");
            return Err(CoreError::Superseded);
        }
        match result {
            Ok(mut snapshot) => {
                let at = Utc::now();
                snapshot.fetched_at = Some(at);
                let snapshot = self.inner.store.replace(snapshot);
                self.inner.state.send_replace(PollState::Ready { at });
                drop(source);
                Ok(snapshot)
            }
            Err(e) => {
                self.inner.state.send_replace(PollState::Failed {
                    message: e.to_string(),
                });
                drop(source);
                Err(e)
            }
        }
    }
}

// ── Background task ──────────────────────────────────────────────

/// One tick per interval, the first immediately. Cancellation drops an
/// in-flight cycle.
async fn poll_task(poller: Poller, every: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            result = poller.poll_once() => {
                if let Err(e) = result {
                    warn!(error = %e, "poll cycle failed");
                }
            }
        }
    }
    debug!("poll task stopped");
}

// ── Fetching ─────────────────────────────────────────────────────

/// Fetch every endpoint in parallel and normalize.
///
/// A failing endpoint degrades its kind to absent. Only a cycle where
/// nothing at all answered is an error.
async fn fetch_snapshot(client: &TraefikClient) -> Result<Snapshot, CoreError> {
    let (routers, services, entrypoints, middlewares, certificates, overview, version) = tokio::join!(
        client.list_routers(),
        client.list_services(),
        client.list_entrypoints(),
        client.list_middlewares(),
        client.list_certificates(),
        client.get_overview(),
        client.get_version(),
    );

    let mut first_error = None;
    let payloads = Payloads {
        routers: degrade("http/routers", routers, &mut first_error),
        services: degrade("http/services", services, &mut first_error),
        entrypoints: degrade("entrypoints", entrypoints, &mut first_error),
        middlewares: degrade("http/middlewares", middlewares, &mut first_error),
        certificates: degrade("tls/certificates", certificates, &mut first_error),
        overview: degrade("overview", overview, &mut first_error),
        version: degrade("version", version, &mut first_error),
    };

    if payloads.is_empty() {
        return Err(first_error.map_or_else(
            || CoreError::Api {
                message: "no endpoint answered".into(),
                status: None,
            },
            CoreError::from,
        ));
    }

    let snapshot = normalize(payloads);
    debug!(
        routers = snapshot.entities.count(EntityKind::Routers),
        services = snapshot.entities.count(EntityKind::Services),
        missing = ?snapshot.missing,
        "poll cycle complete"
    );
    Ok(snapshot)
}

/// 404 means the proxy does not serve the endpoint; anything else is
/// unexpected. Either way the kind becomes absent for this cycle.
fn degrade<T>(
    endpoint: &str,
    result: Result<T, routemap_api::Error>,
    first_error: &mut Option<routemap_api::Error>,
) -> Option<T> {
    match result {
        Ok(payload) => Some(payload),
        Err(e) => {
            if e.is_not_found() {
                debug!("{endpoint}: not available (404), treating as absent");
            } else {
                warn!("{endpoint}: {e}, treating as absent");
            }
            first_error.get_or_insert(e);
            None
        }
    }
}

fn build_transport(config: &PollerConfig) -> TransportConfig {
    let tls = match &config.tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    };
    TransportConfig {
        tls,
        timeout: config.timeout,
    }
}
