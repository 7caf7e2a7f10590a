//! `routemap overview`: proxy version and entity totals.

use std::fmt::Write as _;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use routemap_core::{Counts, EntityKind, Overview, Snapshot};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

/// What `overview` prints: the proxy's own summary plus what this
/// snapshot actually holds.
#[derive(Debug, Serialize)]
struct Summary<'a> {
    overview: Option<&'a Overview>,
    fetched: Vec<(EntityKind, usize)>,
    missing: &'a [EntityKind],
    fetched_at: Option<DateTime<Utc>>,
}

pub fn handle(snapshot: &Snapshot, format: OutputFormat, global: &GlobalOpts) -> Result<(), CliError> {
    let summary = Summary {
        overview: snapshot.overview.as_ref(),
        fetched: [
            EntityKind::Routers,
            EntityKind::Services,
            EntityKind::Entrypoints,
            EntityKind::Middlewares,
            EntityKind::Certificates,
        ]
        .into_iter()
        .map(|kind| (kind, snapshot.entities.count(kind)))
        .collect(),
        missing: &snapshot.missing,
        fetched_at: snapshot.fetched_at,
    };

    let out = output::render_single(format, &summary, detail, |s| {
        s.overview
            .and_then(|o| o.version.clone())
            .unwrap_or_default()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(summary: &Summary<'_>) -> String {
    let mut out = String::new();
    if let Some(overview) = summary.overview {
        let version = overview.version.as_deref().unwrap_or("unknown");
        match overview.codename {
            Some(ref codename) => {
                let _ = writeln!(out, "Traefik {version} ({codename})");
            }
            None => {
                let _ = writeln!(out, "Traefik {version}");
            }
        }
        if !overview.providers.is_empty() {
            let _ = writeln!(out, "Providers: {}", overview.providers.join(", "));
        }
        for (label, counts) in [
            ("Routers", overview.routers),
            ("Services", overview.services),
            ("Middlewares", overview.middlewares),
        ] {
            let _ = writeln!(out, "{label:<12} {}", totals(counts));
        }
        out.push('\n');
    }

    for (kind, count) in &summary.fetched {
        let marker = if summary.missing.contains(kind) {
            " (unavailable)"
        } else {
            ""
        };
        let _ = writeln!(out, "{:<12} {count}{marker}", kind.to_string());
    }
    if let Some(at) = summary.fetched_at {
        let _ = writeln!(out, "\nFetched at {}", at.to_rfc3339_opts(SecondsFormat::Secs, true));
    }
    out
}

fn totals(counts: Counts) -> String {
    format!(
        "{} total, {} warnings, {} errors",
        counts.total, counts.warnings, counts.errors
    )
}
