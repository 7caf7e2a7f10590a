// ── Composite identity ──
//
// Routers, services and middlewares are identified by `name@provider`.
// Traefik already reports names in that form, other sources may not, so
// construction never doubles the provider suffix.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// `name@provider` identity of a router, service or middleware.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompositeKey(String);

impl CompositeKey {
    /// Build a key from a name and its provider.
    ///
    /// `new("whoami@docker", "docker")` and `new("whoami", "docker")` both
    /// yield `whoami@docker`.
    pub fn new(name: &str, provider: &str) -> Self {
        match name.strip_suffix(provider) {
            Some(head) if !provider.is_empty() && head.ends_with('@') => Self(name.to_owned()),
            _ => Self(format!("{name}@{provider}")),
        }
    }

    /// Wrap an already-qualified `name@provider` string verbatim.
    pub fn qualified(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Resolve a router's service reference.
    ///
    /// A bare service name lives in the router's provider; a qualified
    /// `svc@other` reference is taken as-is.
    pub fn service_ref(service: &str, router_provider: &str) -> Self {
        if service.contains('@') {
            Self::qualified(service)
        } else {
            Self::new(service, router_provider)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Everything before the last `@`.
    pub fn name(&self) -> &str {
        self.0.rsplit_once('@').map_or(self.0.as_str(), |(name, _)| name)
    }

    /// Everything after the last `@` (empty if there is none).
    pub fn provider(&self) -> &str {
        self.0.rsplit_once('@').map_or("", |(_, provider)| provider)
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CompositeKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CompositeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_joins_name_and_provider() {
        assert_eq!(CompositeKey::new("whoami", "docker").as_str(), "whoami@docker");
    }

    #[test]
    fn new_does_not_double_the_suffix() {
        let key = CompositeKey::new("whoami@docker", "docker");
        assert_eq!(key.as_str(), "whoami@docker");
        assert_eq!(key.name(), "whoami");
        assert_eq!(key.provider(), "docker");
    }

    #[test]
    fn suffix_check_requires_the_separator() {
        // "mydocker" merely ends with "docker"
        assert_eq!(
            CompositeKey::new("mydocker", "docker").as_str(),
            "mydocker@docker"
        );
    }

    #[test]
    fn accessors_split_on_last_at() {
        let key = CompositeKey::qualified("user@host@file");
        assert_eq!(key.name(), "user@host");
        assert_eq!(key.provider(), "file");
    }

    #[test]
    fn service_ref_respects_qualified_names() {
        assert_eq!(
            CompositeKey::service_ref("api", "kubernetes").as_str(),
            "api@kubernetes"
        );
        assert_eq!(
            CompositeKey::service_ref("api@file", "kubernetes").as_str(),
            "api@file"
        );
    }
}
