// ── Routing domain types ──

use serde::{Deserialize, Serialize};

use super::key::CompositeKey;

/// An HTTP router: a rule that sends matching requests to one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Router {
    pub key: CompositeKey,
    /// Bare name, without the `@provider` suffix.
    pub name: String,
    pub provider: String,
    /// Rule expression, e.g. ``Host(`a.example.com`) && PathPrefix(`/api`)``.
    pub rule: String,
    pub entry_points: Vec<String>,
    /// Referenced service name. `None` for routers without one.
    pub service: Option<String>,
    pub middlewares: Vec<String>,
    pub status: Option<String>,
    pub priority: Option<i64>,
    /// Whether the router terminates TLS.
    pub tls: bool,
}

impl Router {
    /// Composite key of the referenced service, if any.
    pub fn service_key(&self) -> Option<CompositeKey> {
        self.service
            .as_deref()
            .map(|service| CompositeKey::service_ref(service, &self.provider))
    }
}

/// A listening address on the proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entrypoint {
    pub name: String,
    pub address: Option<String>,
    pub protocol: Option<String>,
}

impl Entrypoint {
    /// Transport protocol, `TCP` when the proxy does not say.
    pub fn transport(&self) -> &str {
        self.protocol.as_deref().unwrap_or("TCP")
    }
}

/// Request/response middleware attached to routers by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Middleware {
    pub key: CompositeKey,
    pub name: String,
    pub provider: String,
    /// Middleware type, e.g. `stripprefix`, `headers`, `basicauth`.
    pub kind: Option<String>,
    pub strip_prefixes: Vec<String>,
    /// Custom request or response headers are set.
    pub headers_modified: bool,
    pub status: Option<String>,
}
