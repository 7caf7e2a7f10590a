//! UI actions. Every state change in the app goes through one of these.

use std::sync::Arc;

use url::Url;

use routemap_core::{PollState, Render, Snapshot};

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Overlays ──
    ToggleHelp,
    OpenSearch,
    /// Live query update while the search field is open.
    QueryChanged(String),
    /// Close the search field and keep the query.
    CloseSearch,
    /// Close the search field and drop the query.
    ClearSearch,
    OpenUrlInput,
    CloseUrlInput,
    /// Raw text from the URL field. Empty stops polling.
    SubmitUrl(String),

    // ── Poller ──
    Refresh,
    UrlApplied(Option<Url>),
    SnapshotUpdated(Option<Arc<Snapshot>>),
    PollStateChanged(PollState),

    /// Compiled output for the current snapshot and query. `None` before
    /// the first snapshot.
    RenderUpdated(Option<Arc<Render>>),

    /// One-line message for the status bar.
    Notify(String),
}
