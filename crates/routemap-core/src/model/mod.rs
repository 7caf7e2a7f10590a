// ── Unified domain model ──
//
// Canonical representation of everything a proxy snapshot contains.
// Raw `routemap_api` payloads are converted into these types by
// `crate::convert`; the filter and graph builder only ever see these.

pub mod key;
pub mod overview;
pub mod routing;
pub mod service;
pub mod tls;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

pub use key::CompositeKey;
pub use overview::{Counts, Overview};
pub use routing::{Entrypoint, Middleware, Router};
pub use service::{Server, ServerHealth, Service, ServiceKind};
pub use tls::Certificate;

/// The five entity kinds a snapshot is made of.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Routers,
    Services,
    Entrypoints,
    Middlewares,
    Certificates,
}

/// Normalized entities of one snapshot, each in payload order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entities {
    pub routers: IndexMap<CompositeKey, Router>,
    pub services: IndexMap<CompositeKey, Service>,
    /// Keyed by entrypoint name.
    pub entrypoints: IndexMap<String, Entrypoint>,
    pub middlewares: IndexMap<CompositeKey, Middleware>,
    pub certificates: Vec<Certificate>,
}

impl Entities {
    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Routers => self.routers.len(),
            EntityKind::Services => self.services.len(),
            EntityKind::Entrypoints => self.entrypoints.len(),
            EntityKind::Middlewares => self.middlewares.len(),
            EntityKind::Certificates => self.certificates.len(),
        }
    }

    /// `true` when no kind holds any entity.
    pub fn is_empty(&self) -> bool {
        self.routers.is_empty()
            && self.services.is_empty()
            && self.entrypoints.is_empty()
            && self.middlewares.is_empty()
            && self.certificates.is_empty()
    }
}
