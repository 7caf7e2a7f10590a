// ── Render pipeline ──
//
// snapshot → filter (if a query is active) → build trees. The result is
// either a topology or one of two named empty states the sinks show as
// text instead of an empty canvas.

use serde::Serialize;

use crate::filter::{self, Query};
use crate::graph::{self, Topology};
use crate::model::EntityKind;
use crate::normalize::Snapshot;

/// What a render sink should draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Render {
    /// Nothing to visualize at all.
    NoData,
    /// A query was active and matched nothing.
    NoResults { query: String },
    Topology(Box<Topology>),
}

impl Render {
    pub fn topology(&self) -> Option<&Topology> {
        match self {
            Self::Topology(topology) => Some(topology),
            Self::NoData | Self::NoResults { .. } => None,
        }
    }

    /// Empty-state message, `None` for a topology.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::NoData => Some("No data to visualize".to_owned()),
            Self::NoResults { query } => Some(format!("No results for \"{query}\"")),
            Self::Topology(_) => None,
        }
    }
}

/// Compile a snapshot and query into a [`Render`].
///
/// Checked in order: routers and services both absent → `NoData`;
/// an active query with no match → `NoResults`; no query and routers and
/// services both empty → `NoData`; otherwise both trees.
pub fn compile(snapshot: &Snapshot, query: &str) -> Render {
    if snapshot.is_missing(EntityKind::Routers) && snapshot.is_missing(EntityKind::Services) {
        return Render::NoData;
    }

    let outcome = filter::filter(&snapshot.entities, query);
    let active = Query::parse(query).is_some();

    if active && outcome.no_match {
        return Render::NoResults {
            query: query.trim().to_owned(),
        };
    }
    if !active && outcome.entities.routers.is_empty() && outcome.entities.services.is_empty() {
        return Render::NoData;
    }

    Render::Topology(Box::new(graph::build(
        &outcome.entities,
        snapshot.overview.as_ref(),
    )))
}
