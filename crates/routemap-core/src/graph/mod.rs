// ── Graph builder ──
//
// Walks normalized entities once and produces two independent view-model
// trees: the backend (instance → provider → service → server) and the
// frontage (ingress → entrypoints, routes). Route nodes resolve their
// service against a lookup of *all* services gathered during the backend
// pass, so a service without a visible node still resolves.

pub mod link;

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;
use strum::Display;

use crate::layout::{self, Anchor};
use crate::model::{
    Certificate, CompositeKey, Entities, Entrypoint, Middleware, Overview, Router, Service,
};

pub const BACKEND_ROOT: &str = "Traefik Instance";
pub const FRONTAGE_ROOT: &str = "Internet / Entrypoints";
/// Server status when the proxy did not report one.
pub const UNKNOWN_STATUS: &str = "Unknown";

// ── View model ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Instance,
    Provider,
    Service,
    Server,
    Ingress,
    Entrypoint,
    Route,
    Middleware,
    Certificate,
}

/// One node of a view-model tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    pub label: String,
    /// Identity of the entity behind the node (services and routes).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<CompositeKey>,
    /// Human-readable lines for a detail panel.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Route nodes: best-effort URL derived from the rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Route nodes: the backend service the route resolved to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<CompositeKey>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            key: None,
            details: Vec::new(),
            status: None,
            link: None,
            service: None,
            children: Vec::new(),
        }
    }

    /// Nodes in this subtree, including `self`.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(Node::size).sum::<usize>()
    }

    /// Depth-first search for the first node satisfying `pred`.
    pub fn find(&self, pred: &impl Fn(&Node) -> bool) -> Option<&Node> {
        if pred(self) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(pred))
    }
}

/// A rooted tree with its sizing hint and drawing direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tree {
    pub root: Node,
    pub width_hint: u32,
    pub anchor: Anchor,
}

/// Everything the render sinks draw for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topology {
    pub backend: Tree,
    pub frontage: Tree,
    /// Flat middleware catalog, outside both trees.
    pub middlewares: Vec<Node>,
    /// Flat certificate catalog, outside both trees.
    pub certificates: Vec<Node>,
}

/// Service lookup built during the backend pass. Holds every service,
/// visualized or not.
type ServiceLookup<'a> = HashMap<&'a CompositeKey, &'a Service>;

// ── Build ──────────────────────────────────────────────────────────

/// Build both trees plus the catalog from (possibly filtered) entities.
pub fn build(entities: &Entities, overview: Option<&Overview>) -> Topology {
    let (backend, lookup) = backend(entities, overview);
    let frontage = frontage(entities, &lookup);

    Topology {
        backend: Tree {
            width_hint: layout::backend_width(&backend),
            root: backend,
            anchor: Anchor::LeftToRight,
        },
        frontage: Tree {
            width_hint: layout::frontage_width(&frontage),
            root: frontage,
            anchor: Anchor::RightToLeft,
        },
        middlewares: entities.middlewares.values().map(middleware_node).collect(),
        certificates: entities.certificates.iter().map(certificate_node).collect(),
    }
}

fn backend<'a>(entities: &'a Entities, overview: Option<&Overview>) -> (Node, ServiceLookup<'a>) {
    let mut root = Node::new(NodeKind::Instance, BACKEND_ROOT);
    root.details
        .push(overview.and_then(|o| o.version.as_deref()).map_or_else(
            || "Traefik Core".to_owned(),
            |version| format!("Version: {version}"),
        ));

    // provider → index into root.children, scoped to this call
    let mut groups: IndexMap<&str, usize> = IndexMap::new();
    let mut lookup = ServiceLookup::with_capacity(entities.services.len());

    for (key, service) in &entities.services {
        lookup.insert(key, service);
        if !service.is_visualized() {
            continue;
        }

        let index = *groups.entry(service.provider.as_str()).or_insert_with(|| {
            root.children.push(provider_node(&service.provider));
            root.children.len() - 1
        });
        if let Some(group) = root.children.get_mut(index) {
            group.children.push(service_node(service));
        }
    }

    for group in &mut root.children {
        let count = group.children.len();
        group.details.push(format!("Services: {count}"));
    }

    (root, lookup)
}

fn frontage(entities: &Entities, lookup: &ServiceLookup<'_>) -> Node {
    let mut root = Node::new(NodeKind::Ingress, FRONTAGE_ROOT);
    root.children
        .extend(entities.entrypoints.values().map(entrypoint_node));
    root.children.extend(
        entities
            .routers
            .values()
            .filter_map(|router| route_node(router, lookup)),
    );
    root
}

// ── Node constructors ──────────────────────────────────────────────

fn provider_node(provider: &str) -> Node {
    let label = if provider.is_empty() { "unknown" } else { provider };
    Node::new(NodeKind::Provider, label)
}

fn service_node(service: &Service) -> Node {
    let mut node = Node::new(NodeKind::Service, service.key.as_str());
    node.key = Some(service.key.clone());
    node.status.clone_from(&service.status);
    node.details = vec![
        format!("Type: {}", service.kind),
        format!("Provider: {}", service.provider),
        format!("Servers: {}", service.servers.len()),
    ];
    node.children = service
        .servers
        .iter()
        .map(|server| {
            let status = service
                .status_of(&server.address)
                .unwrap_or(UNKNOWN_STATUS);
            let mut leaf = Node::new(NodeKind::Server, server.address.as_str());
            leaf.details.push(format!("Status: {status}"));
            leaf.status = Some(status.to_owned());
            leaf
        })
        .collect();
    node
}

fn entrypoint_node(entrypoint: &Entrypoint) -> Node {
    let mut node = Node::new(NodeKind::Entrypoint, entrypoint.name.as_str());
    node.details = vec![
        format!(
            "Address: {}",
            entrypoint.address.as_deref().unwrap_or("N/A")
        ),
        format!("Transport: {}", entrypoint.transport()),
    ];
    node
}

/// `None` for routers without a service reference.
fn route_node(router: &Router, lookup: &ServiceLookup<'_>) -> Option<Node> {
    let service_key = router.service_key()?;

    let mut node = Node::new(NodeKind::Route, router.key.as_str());
    node.key = Some(router.key.clone());
    node.status.clone_from(&router.status);
    node.link = link::derive(&router.rule, &router.entry_points);

    let entry_points = if router.entry_points.is_empty() {
        "N/A".to_owned()
    } else {
        router.entry_points.join(", ")
    };
    node.details = vec![
        format!(
            "Rule: {}",
            if router.rule.is_empty() {
                "N/A"
            } else {
                router.rule.as_str()
            }
        ),
        format!("Entrypoints: {entry_points}"),
        format!("Provider: {}", router.provider),
    ];
    if !router.middlewares.is_empty() {
        node.details
            .push(format!("Middlewares: {}", router.middlewares.join(", ")));
    }

    match lookup.get(&service_key) {
        Some(service) => {
            node.details
                .push(format!("Service: {} ({})", service.name, service.provider));
            node.service = Some(service.key.clone());
        }
        None => node
            .details
            .push(format!("Service: {service_key} (Not Found/Visualized)")),
    }

    Some(node)
}

fn middleware_node(middleware: &Middleware) -> Node {
    let mut node = Node::new(NodeKind::Middleware, middleware.key.as_str());
    node.key = Some(middleware.key.clone());
    node.status.clone_from(&middleware.status);
    node.details
        .push(format!("Type: {}", middleware.kind.as_deref().unwrap_or("unknown")));
    if !middleware.strip_prefixes.is_empty() {
        node.details
            .push(format!("Prefixes: {}", middleware.strip_prefixes.join(", ")));
    }
    if middleware.headers_modified {
        node.details.push("Headers Modified".to_owned());
    }
    node
}

fn certificate_node(certificate: &Certificate) -> Node {
    let mut node = Node::new(NodeKind::Certificate, certificate.display_name());
    if !certificate.sans.is_empty() {
        node.details
            .push(format!("SANs: {}", certificate.sans.join(", ")));
    }
    node
}
