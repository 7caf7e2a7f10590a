// ── Entity normalizer ──
//
// Turns the raw per-endpoint payloads of one poll cycle into `Entities`
// keyed by composite identity. Pure: no I/O, no clock.

use std::fmt::Display;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use routemap_api::models::{
    Listing, RawCertificate, RawEntrypoint, RawMiddleware, RawOverview, RawRouter, RawService,
    RawVersion,
};

use crate::convert;
use crate::model::{Certificate, Entities, EntityKind, Overview};

/// Raw payloads of one poll cycle. `None` marks a kind whose fetch failed
/// or never completed.
#[derive(Debug, Clone, Default)]
pub struct Payloads {
    pub routers: Option<Listing<RawRouter>>,
    pub services: Option<Listing<RawService>>,
    pub entrypoints: Option<Listing<RawEntrypoint>>,
    pub middlewares: Option<Listing<RawMiddleware>>,
    pub certificates: Option<Listing<RawCertificate>>,
    pub overview: Option<RawOverview>,
    pub version: Option<RawVersion>,
}

impl Payloads {
    /// `true` when not a single payload arrived.
    pub fn is_empty(&self) -> bool {
        self.routers.is_none()
            && self.services.is_none()
            && self.entrypoints.is_none()
            && self.middlewares.is_none()
            && self.certificates.is_none()
            && self.overview.is_none()
            && self.version.is_none()
    }
}

/// A normalized point-in-time view of the proxy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub entities: Entities,
    /// Kinds whose payload was absent, in [`EntityKind`] order.
    pub missing: Vec<EntityKind>,
    pub overview: Option<Overview>,
    /// Set by the poller when the snapshot is stored.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn is_missing(&self, kind: EntityKind) -> bool {
        self.missing.contains(&kind)
    }
}

/// Normalize one cycle's payloads.
///
/// A missing payload yields an empty mapping and is recorded in
/// [`Snapshot::missing`]. When two entities share a key the later one
/// replaces the earlier in place (last write wins, position kept).
pub fn normalize(payloads: Payloads) -> Snapshot {
    let mut missing = Vec::new();
    let mut entities = Entities::default();

    match payloads.routers {
        Some(listing) => {
            for (listing_key, raw) in listing.into_entries() {
                let router = convert::router(listing_key, raw);
                insert_last_wins(
                    &mut entities.routers,
                    router.key.clone(),
                    router,
                    EntityKind::Routers,
                );
            }
        }
        None => missing.push(EntityKind::Routers),
    }

    match payloads.services {
        Some(listing) => {
            for (listing_key, raw) in listing.into_entries() {
                let service = convert::service(listing_key, raw);
                insert_last_wins(
                    &mut entities.services,
                    service.key.clone(),
                    service,
                    EntityKind::Services,
                );
            }
        }
        None => missing.push(EntityKind::Services),
    }

    match payloads.entrypoints {
        Some(listing) => {
            for (listing_key, raw) in listing.into_entries() {
                let entrypoint = convert::entrypoint(listing_key, raw);
                insert_last_wins(
                    &mut entities.entrypoints,
                    entrypoint.name.clone(),
                    entrypoint,
                    EntityKind::Entrypoints,
                );
            }
        }
        None => missing.push(EntityKind::Entrypoints),
    }

    match payloads.middlewares {
        Some(listing) => {
            for (listing_key, raw) in listing.into_entries() {
                let middleware = convert::middleware(listing_key, raw);
                insert_last_wins(
                    &mut entities.middlewares,
                    middleware.key.clone(),
                    middleware,
                    EntityKind::Middlewares,
                );
            }
        }
        None => missing.push(EntityKind::Middlewares),
    }

    match payloads.certificates {
        Some(listing) => {
            entities.certificates = listing
                .into_entries()
                .into_iter()
                .map(|(_, raw)| Certificate::from(raw))
                .collect();
        }
        None => missing.push(EntityKind::Certificates),
    }

    Snapshot {
        entities,
        missing,
        overview: convert::overview(payloads.overview, payloads.version),
        fetched_at: None,
    }
}

fn insert_last_wins<K, V>(map: &mut IndexMap<K, V>, key: K, value: V, kind: EntityKind)
where
    K: Hash + Eq + Display,
{
    let (index, previous) = map.insert_full(key, value);
    if previous.is_none() {
        return;
    }
    if let Some((key, _)) = map.get_index(index) {
        debug!(%kind, %key, "duplicate key in payload, keeping the later entry");
    }
}
