// ── Service domain types ──

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::EnumString;

use super::key::CompositeKey;

/// Service type as reported by the proxy.
///
/// Only load balancers carry servers; the other kinds compose services.
#[derive(Debug, Clone, PartialEq, Eq, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(into = "String", from = "String")]
pub enum ServiceKind {
    LoadBalancer,
    Weighted,
    Mirroring,
    Failover,
    #[strum(default)]
    Other(String),
}

impl ServiceKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::LoadBalancer => "loadbalancer",
            Self::Weighted => "weighted",
            Self::Mirroring => "mirroring",
            Self::Failover => "failover",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_load_balancer(&self) -> bool {
        matches!(self, Self::LoadBalancer)
    }
}

impl Default for ServiceKind {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ServiceKind {
    fn from(raw: String) -> Self {
        Self::from_str(&raw).unwrap_or(Self::Other(raw))
    }
}

impl From<ServiceKind> for String {
    fn from(kind: ServiceKind) -> Self {
        kind.as_str().to_owned()
    }
}

/// Health of one backend server, parsed from the proxy's status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, strum::Display)]
#[strum(ascii_case_insensitive)]
pub enum ServerHealth {
    #[strum(serialize = "UP")]
    Up,
    #[strum(serialize = "DOWN")]
    Down,
    #[strum(serialize = "Unknown")]
    Unknown,
}

impl ServerHealth {
    pub fn from_status(status: &str) -> Self {
        status.parse().unwrap_or(Self::Unknown)
    }
}

/// One upstream address of a load-balanced service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    /// URL for HTTP servers, `host:port` for TCP. Unique within its service.
    pub address: String,
}

/// An HTTP service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub key: CompositeKey,
    pub name: String,
    pub provider: String,
    pub kind: ServiceKind,
    pub servers: Vec<Server>,
    /// Server address → status string (`UP`, `DOWN`).
    pub server_status: IndexMap<String, String>,
    pub status: Option<String>,
    /// Routers that reference this service, as reported by the proxy.
    pub used_by: Vec<String>,
}

impl Service {
    /// Status of the server at `address`, if the proxy reported one.
    pub fn status_of(&self, address: &str) -> Option<&str> {
        self.server_status.get(address).map(String::as_str)
    }

    /// Load balancers with at least one server get a backend node.
    pub fn is_visualized(&self) -> bool {
        self.kind.is_load_balancer() && !self.servers.is_empty()
    }
}
