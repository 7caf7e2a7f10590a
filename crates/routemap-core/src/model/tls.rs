// ── TLS certificate domain type ──

use serde::{Deserialize, Serialize};

/// A TLS certificate known to the proxy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// Main domain (`domains.main` or `main`).
    pub main: Option<String>,
    /// Subject alternative names (`domains.sans` or `sans`).
    pub sans: Vec<String>,
}

impl Certificate {
    pub fn display_name(&self) -> &str {
        self.main.as_deref().unwrap_or("Unknown Certificate")
    }
}
