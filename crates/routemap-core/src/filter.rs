// ── Consistency-preserving filter ──
//
// Narrows a snapshot's entities to those matching a free-text query while
// keeping router → service references resolvable: a matched router pulls
// in its service, a matched service pulls in the routers pointing at it.
// Entrypoints, middlewares and certificates are matched directly only.

use std::collections::HashSet;

use serde::Serialize;

use crate::model::{
    Certificate, CompositeKey, Entities, Entrypoint, Middleware, Router, Service,
};

// ── Query ──────────────────────────────────────────────────────────

/// A normalized, non-empty search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Lowercase and trim `raw`. Blank input is "no query".
    pub fn parse(raw: &str) -> Option<Self> {
        let needle = raw.trim().to_lowercase();
        (!needle.is_empty()).then_some(Self(needle))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive substring test.
    pub fn hits(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.0)
    }

    pub fn matches_router(&self, router: &Router) -> bool {
        // the key holds both name and provider
        self.hits(router.key.as_str())
            || self.hits(&router.name)
            || self.hits(&router.provider)
            || self.hits(&router.rule)
            || router.entry_points.iter().any(|ep| self.hits(ep))
    }

    pub fn matches_service(&self, service: &Service) -> bool {
        self.hits(service.key.as_str())
            || self.hits(&service.name)
            || self.hits(&service.provider)
            || (service.kind.is_load_balancer()
                && service.servers.iter().any(|s| self.hits(&s.address)))
            || service.server_status.values().any(|status| self.hits(status))
    }

    pub fn matches_entrypoint(&self, name: &str, entrypoint: &Entrypoint) -> bool {
        self.hits(name) || entrypoint.address.as_deref().is_some_and(|a| self.hits(a))
    }

    pub fn matches_middleware(&self, middleware: &Middleware) -> bool {
        self.hits(middleware.key.name()) || self.hits(middleware.key.provider())
    }

    pub fn matches_certificate(&self, certificate: &Certificate) -> bool {
        certificate.sans.iter().any(|san| self.hits(san))
    }
}

// ── Selection / closure ────────────────────────────────────────────

/// Keys of the routers and services selected so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub routers: HashSet<CompositeKey>,
    pub services: HashSet<CompositeKey>,
}

impl Selection {
    /// Every router and service of `entities`.
    pub fn of(entities: &Entities) -> Self {
        Self {
            routers: entities.routers.keys().cloned().collect(),
            services: entities.services.keys().cloned().collect(),
        }
    }
}

/// Expand `selection` across router → service references until neither
/// set grows. Returns the number of passes that added something.
///
/// Routers whose service is selected join the selection; services
/// referenced by a selected router join it too, but only if they exist in
/// `entities`. A dangling reference is left dangling.
pub fn close_references(entities: &Entities, selection: &mut Selection) -> usize {
    let mut passes = 0;
    loop {
        let mut grew = false;

        for (key, router) in &entities.routers {
            if selection.routers.contains(key) {
                continue;
            }
            if router
                .service_key()
                .is_some_and(|svc| selection.services.contains(&svc))
            {
                selection.routers.insert(key.clone());
                grew = true;
            }
        }

        for key in &selection.routers {
            let Some(svc) = entities.routers.get(key).and_then(Router::service_key) else {
                continue;
            };
            if entities.services.contains_key(&svc) && selection.services.insert(svc) {
                grew = true;
            }
        }

        if !grew {
            return passes;
        }
        passes += 1;
    }
}

// ── Filter ─────────────────────────────────────────────────────────

/// Result of filtering a snapshot's entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOutcome {
    pub entities: Entities,
    /// A query was given and nothing of any kind matched it.
    pub no_match: bool,
}

/// Filter `entities` by `query`.
///
/// A blank query returns a clone of the input. Otherwise every kind keeps
/// its source order and router/service references are closed over.
pub fn filter(entities: &Entities, query: &str) -> FilterOutcome {
    let Some(query) = Query::parse(query) else {
        return FilterOutcome {
            entities: entities.clone(),
            no_match: false,
        };
    };

    let mut selection = Selection {
        routers: entities
            .routers
            .iter()
            .filter(|(_, r)| query.matches_router(r))
            .map(|(k, _)| k.clone())
            .collect(),
        services: entities
            .services
            .iter()
            .filter(|(_, s)| query.matches_service(s))
            .map(|(k, _)| k.clone())
            .collect(),
    };
    close_references(entities, &mut selection);

    let filtered = Entities {
        routers: entities
            .routers
            .iter()
            .filter(|(k, _)| selection.routers.contains(*k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        services: entities
            .services
            .iter()
            .filter(|(k, _)| selection.services.contains(*k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        entrypoints: entities
            .entrypoints
            .iter()
            .filter(|(name, ep)| query.matches_entrypoint(name, ep))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        middlewares: entities
            .middlewares
            .iter()
            .filter(|(_, mw)| query.matches_middleware(mw))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        certificates: entities
            .certificates
            .iter()
            .filter(|cert| query.matches_certificate(cert))
            .cloned()
            .collect(),
    };

    FilterOutcome {
        no_match: filtered.is_empty(),
        entities: filtered,
    }
}
