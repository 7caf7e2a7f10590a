// ── Proxy overview ──

use serde::{Deserialize, Serialize};

/// Totals for one entity kind as counted by the proxy itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub total: u64,
    pub warnings: u64,
    pub errors: u64,
}

/// Instance-level information from `/api/overview` and `/api/version`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overview {
    pub version: Option<String>,
    pub codename: Option<String>,
    pub providers: Vec<String>,
    pub routers: Counts,
    pub services: Counts,
    pub middlewares: Counts,
}
