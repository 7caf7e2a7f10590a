// Traefik API payload types
//
// Raw shapes as returned by `/api/...`. Every field is optional or
// defaulted: Traefik omits empty fields, and keyed-map exports from other
// tooling may drop `name`/`provider` entirely. Nothing here is validated;
// `routemap-core` turns these into the domain model.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ── Listing ──────────────────────────────────────────────────────────

/// An endpoint payload: either a JSON array or an object keyed by name.
///
/// Traefik returns arrays; static dumps and older tooling use
/// `{ "whoami@docker": { ... } }`. Both are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Array(Vec<T>),
    Keyed(IndexMap<String, T>),
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self::Array(Vec::new())
    }
}

impl<T> Listing<T> {
    pub fn len(&self) -> usize {
        match self {
            Self::Array(items) => items.len(),
            Self::Keyed(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten into `(map key, item)` pairs, preserving payload order.
    /// Array entries carry no key.
    pub fn into_entries(self) -> Vec<(Option<String>, T)> {
        match self {
            Self::Array(items) => items.into_iter().map(|item| (None, item)).collect(),
            Self::Keyed(map) => map.into_iter().map(|(k, v)| (Some(k), v)).collect(),
        }
    }
}

// ── HTTP routers ─────────────────────────────────────────────────────

/// Router object from `/api/http/routers`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawRouter {
    /// Traefik reports `name@provider` here.
    pub name: Option<String>,
    pub provider: Option<String>,
    pub rule: Option<String>,
    pub entry_points: Option<Vec<String>>,
    pub service: Option<String>,
    pub middlewares: Option<Vec<String>>,
    pub status: Option<String>,
    pub priority: Option<i64>,
    pub tls: Option<serde_json::Value>,
}

// ── HTTP services ────────────────────────────────────────────────────

/// Service object from `/api/http/services`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawService {
    pub name: Option<String>,
    pub provider: Option<String>,
    /// `loadbalancer`, `weighted`, `mirroring`, `failover`.
    #[serde(rename = "type")]
    pub service_type: Option<String>,
    pub load_balancer: Option<RawLoadBalancer>,
    /// Server address → `UP` / `DOWN`.
    pub server_status: Option<IndexMap<String, String>>,
    pub status: Option<String>,
    pub used_by: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawLoadBalancer {
    pub servers: Option<Vec<RawServer>>,
    pub pass_host_header: Option<bool>,
}

/// HTTP servers carry `url`, TCP servers carry `address`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawServer {
    pub url: Option<String>,
    pub address: Option<String>,
}

impl RawServer {
    /// The server's identity within its service.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref().or(self.url.as_deref())
    }
}

// ── Entrypoints ──────────────────────────────────────────────────────

/// Entrypoint object from `/api/entrypoints`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEntrypoint {
    pub name: Option<String>,
    pub address: Option<String>,
    pub transport: Option<RawTransport>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTransport {
    pub protocol: Option<String>,
}

// ── Middlewares ──────────────────────────────────────────────────────

/// Middleware object from `/api/http/middlewares`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawMiddleware {
    pub name: Option<String>,
    pub provider: Option<String>,
    #[serde(rename = "type")]
    pub middleware_type: Option<String>,
    pub strip_prefix: Option<RawStripPrefix>,
    pub headers: Option<RawHeaders>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawStripPrefix {
    pub prefixes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawHeaders {
    pub custom_request_headers: Option<IndexMap<String, String>>,
    pub custom_response_headers: Option<IndexMap<String, String>>,
}

// ── TLS certificates ─────────────────────────────────────────────────

/// Certificate entry from `/api/tls/certificates`.
///
/// Depending on the source the domain names sit at the top level or
/// under `domains`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCertificate {
    pub main: Option<String>,
    pub sans: Option<Vec<String>>,
    pub domains: Option<RawDomain>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawDomain {
    pub main: Option<String>,
    pub sans: Option<Vec<String>>,
}

// ── Overview / version ───────────────────────────────────────────────

/// `/api/overview`: per-protocol totals plus enabled providers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOverview {
    pub version: Option<String>,
    pub message: Option<String>,
    pub http: Option<RawOverviewSection>,
    pub providers: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOverviewSection {
    pub routers: Option<RawCounts>,
    pub services: Option<RawCounts>,
    pub middlewares: Option<RawCounts>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCounts {
    pub total: u64,
    pub warnings: u64,
    pub errors: u64,
}

/// `/api/version`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawVersion {
    #[serde(rename = "Version")]
    pub version: Option<String>,
    #[serde(rename = "Codename")]
    pub codename: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn listing_accepts_array_and_keyed_shapes() {
        let array: Listing<RawRouter> =
            serde_json::from_value(json!([{ "name": "r1@docker", "provider": "docker" }]))
                .unwrap();
        assert!(matches!(array, Listing::Array(ref v) if v.len() == 1));

        let keyed: Listing<RawRouter> =
            serde_json::from_value(json!({ "r1@docker": { "rule": "Host(`a`)" } })).unwrap();
        let entries = keyed.into_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0.as_deref(), Some("r1@docker"));
        assert_eq!(entries[0].1.rule.as_deref(), Some("Host(`a`)"));
    }

    #[test]
    fn service_fields_use_traefik_names() {
        let svc: RawService = serde_json::from_value(json!({
            "name": "whoami@docker",
            "provider": "docker",
            "type": "loadbalancer",
            "loadBalancer": {
                "servers": [{ "url": "http://10.0.0.1:80" }],
                "passHostHeader": true
            },
            "serverStatus": { "http://10.0.0.1:80": "UP" },
            "status": "enabled",
            "usedBy": ["whoami@docker"]
        }))
        .unwrap();

        assert_eq!(svc.service_type.as_deref(), Some("loadbalancer"));
        let servers = svc.load_balancer.unwrap().servers.unwrap();
        assert_eq!(servers[0].address(), Some("http://10.0.0.1:80"));
        assert_eq!(
            svc.server_status.unwrap().get("http://10.0.0.1:80").map(String::as_str),
            Some("UP")
        );
    }

    #[test]
    fn tcp_style_server_prefers_address() {
        let server: RawServer =
            serde_json::from_value(json!({ "address": "10.0.0.2:5432" })).unwrap();
        assert_eq!(server.address(), Some("10.0.0.2:5432"));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let ep: RawEntrypoint = serde_json::from_value(json!({
            "name": "web",
            "address": ":80",
            "transport": { "lifeCycle": { "graceTimeOut": "10s" } },
            "http": {}
        }))
        .unwrap();
        assert_eq!(ep.address.as_deref(), Some(":80"));
        assert_eq!(ep.transport.unwrap().protocol, None);
    }
}
