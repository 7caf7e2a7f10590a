// ── API-to-domain type conversions ──
//
// Bridges raw `routemap_api` payload types into canonical
// `routemap_core::model` types. Each converter takes the map key the item
// was listed under (keyed payloads only) so a missing `name` can fall
// back to it, normalizes identity into `name@provider`, and fills
// defaults for absent optional data.

use routemap_api::models::{
    RawCertificate, RawEntrypoint, RawMiddleware, RawOverview, RawRouter, RawService, RawVersion,
};

use crate::model::{
    Certificate, CompositeKey, Counts, Entrypoint, Middleware, Overview, Router, Server, Service,
    ServiceKind,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Resolve `(key, bare name, provider)` for a provider-scoped entity.
///
/// The name falls back to the listing key. When the provider is missing
/// it is recovered from a qualified name; when present, a matching
/// `@provider` suffix on the name is dropped.
fn identity(
    name: Option<String>,
    provider: Option<String>,
    listing_key: Option<String>,
) -> (CompositeKey, String, String) {
    let name = name
        .filter(|n| !n.is_empty())
        .or(listing_key)
        .unwrap_or_default();

    match provider.filter(|p| !p.is_empty()) {
        Some(provider) => {
            let key = CompositeKey::new(&name, &provider);
            let bare = key.name().to_owned();
            (key, bare, provider)
        }
        None => match name.rsplit_once('@') {
            Some((bare, provider)) => (
                CompositeKey::qualified(name.clone()),
                bare.to_owned(),
                provider.to_owned(),
            ),
            None => (CompositeKey::new(&name, ""), name, String::new()),
        },
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ── Routers ────────────────────────────────────────────────────────

pub(crate) fn router(listing_key: Option<String>, raw: RawRouter) -> Router {
    let (key, name, provider) = identity(raw.name, raw.provider, listing_key);
    Router {
        key,
        name,
        provider,
        rule: raw.rule.unwrap_or_default(),
        entry_points: raw.entry_points.unwrap_or_default(),
        service: non_empty(raw.service),
        middlewares: raw.middlewares.unwrap_or_default(),
        status: raw.status,
        priority: raw.priority,
        tls: raw.tls.is_some_and(|tls| !tls.is_null()),
    }
}

// ── Services ───────────────────────────────────────────────────────

pub(crate) fn service(listing_key: Option<String>, raw: RawService) -> Service {
    let (key, name, provider) = identity(raw.name, raw.provider, listing_key);
    let servers = raw
        .load_balancer
        .and_then(|lb| lb.servers)
        .unwrap_or_default()
        .iter()
        .filter_map(|s| s.address())
        .map(|address| Server {
            address: address.to_owned(),
        })
        .collect();

    Service {
        key,
        name,
        provider,
        kind: raw.service_type.map(ServiceKind::from).unwrap_or_default(),
        servers,
        server_status: raw.server_status.unwrap_or_default(),
        status: raw.status,
        used_by: raw.used_by.unwrap_or_default(),
    }
}

// ── Entrypoints ────────────────────────────────────────────────────

pub(crate) fn entrypoint(listing_key: Option<String>, raw: RawEntrypoint) -> Entrypoint {
    Entrypoint {
        name: non_empty(raw.name).or(listing_key).unwrap_or_default(),
        address: non_empty(raw.address),
        protocol: raw.transport.and_then(|t| non_empty(t.protocol)),
    }
}

// ── Middlewares ────────────────────────────────────────────────────

pub(crate) fn middleware(listing_key: Option<String>, raw: RawMiddleware) -> Middleware {
    let (key, name, provider) = identity(raw.name, raw.provider, listing_key);
    let headers_modified = raw.headers.is_some_and(|h| {
        h.custom_request_headers.is_some_and(|m| !m.is_empty())
            || h.custom_response_headers.is_some_and(|m| !m.is_empty())
    });

    Middleware {
        key,
        name,
        provider,
        kind: non_empty(raw.middleware_type),
        strip_prefixes: raw
            .strip_prefix
            .and_then(|sp| sp.prefixes)
            .unwrap_or_default(),
        headers_modified,
        status: raw.status,
    }
}

// ── Certificates ───────────────────────────────────────────────────

impl From<RawCertificate> for Certificate {
    fn from(raw: RawCertificate) -> Self {
        let (domain_main, domain_sans) = raw
            .domains
            .map(|d| (d.main, d.sans))
            .unwrap_or_default();

        Certificate {
            main: non_empty(domain_main).or_else(|| non_empty(raw.main)),
            sans: domain_sans.or(raw.sans).unwrap_or_default(),
        }
    }
}

// ── Overview ───────────────────────────────────────────────────────

pub(crate) fn overview(raw: Option<RawOverview>, version: Option<RawVersion>) -> Option<Overview> {
    if raw.is_none() && version.is_none() {
        return None;
    }
    let raw = raw.unwrap_or_default();
    let version = version.unwrap_or_default();
    let http = raw.http.unwrap_or_default();
    let counts = |c: Option<routemap_api::models::RawCounts>| {
        c.map(|c| Counts {
            total: c.total,
            warnings: c.warnings,
            errors: c.errors,
        })
        .unwrap_or_default()
    };

    Some(Overview {
        version: non_empty(version.version).or_else(|| non_empty(raw.version)),
        codename: non_empty(version.codename),
        providers: raw.providers.unwrap_or_default(),
        routers: counts(http.routers),
        services: counts(http.services),
        middlewares: counts(http.middlewares),
    })
}
