//! Topology engine between `routemap-api` and the render sinks (CLI / TUI).
//!
//! One refresh cycle flows one way:
//!
//! snapshot → [`normalize`] → [`filter`] (if a query is active) →
//! [`graph::build`] → render sink.
//!
//! - **[`normalize()`]**: raw per-endpoint payloads into [`Entities`] keyed
//!   by `name@provider` ([`CompositeKey`]). Missing payloads become empty.
//! - **[`filter()`]**: case-insensitive free-text filter that keeps
//!   router → service references resolvable.
//! - **[`graph::build`]**: a backend tree (provider → service → server) and a
//!   frontage tree (entrypoints, routes) with width hints from [`layout`].
//! - **[`compile()`]**: the whole pipeline, returning a [`Render`] that is
//!   either a [`Topology`] or a named empty state.
//! - **[`Poller`]**: the async side. One cancellable interval task per URL,
//!   parallel endpoint fetches, results in a [`SnapshotStore`].
//!
//! Everything except the poller is synchronous and pure.

pub mod config;
pub mod convert;
pub mod error;
pub mod filter;
pub mod graph;
pub mod layout;
pub mod model;
pub mod normalize;
pub mod poller;
pub mod render;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{PollerConfig, TlsVerification};
pub use error::CoreError;
pub use filter::{FilterOutcome, Query, filter};
pub use graph::{Node, NodeKind, Topology, Tree};
pub use layout::Anchor;
pub use normalize::{Payloads, Snapshot, normalize};
pub use poller::{PollState, Poller};
pub use render::{Render, compile};
pub use store::SnapshotStore;

pub use model::{
    Certificate, CompositeKey, Counts, Entities, EntityKind, Entrypoint, Middleware, Overview,
    Router, Server, ServerHealth, Service, ServiceKind,
};
