// ── Layout sizing ──
//
// Minimum canvas width hints derived purely from tree shape. The
// constants are presentation tuning; only monotonicity and the floors
// matter to callers.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::graph::Node;

/// Width per server leaf in the backend tree.
pub const BACKEND_LEAF_WIDTH: u32 = 150;
/// Smallest backend hint.
pub const BACKEND_MIN_WIDTH: u32 = 300;
/// Width per direct child of the frontage root.
pub const FRONTAGE_CHILD_WIDTH: u32 = 170;
/// Smallest frontage hint.
pub const FRONTAGE_MIN_WIDTH: u32 = 300;

/// Drawing direction of a tree, from its root outward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    LeftToRight,
    RightToLeft,
}

/// Server leaves under `instance → provider → service`.
pub fn server_leaves(root: &Node) -> usize {
    root.children
        .iter()
        .flat_map(|group| &group.children)
        .map(|service| service.children.len())
        .sum()
}

fn scaled(count: usize, per_item: u32, floor: u32) -> u32 {
    u32::try_from(count)
        .unwrap_or(u32::MAX)
        .saturating_mul(per_item)
        .max(floor)
}

/// Backend hint: server leaves × [`BACKEND_LEAF_WIDTH`], at least
/// [`BACKEND_MIN_WIDTH`].
pub fn backend_width(root: &Node) -> u32 {
    scaled(server_leaves(root), BACKEND_LEAF_WIDTH, BACKEND_MIN_WIDTH)
}

/// Frontage hint: direct children × [`FRONTAGE_CHILD_WIDTH`], at least
/// [`FRONTAGE_MIN_WIDTH`].
pub fn frontage_width(root: &Node) -> u32 {
    scaled(root.children.len(), FRONTAGE_CHILD_WIDTH, FRONTAGE_MIN_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeKind;

    fn backend_with(leaves_per_service: &[usize]) -> Node {
        let services = leaves_per_service
            .iter()
            .map(|&n| {
                let mut svc = Node::new(NodeKind::Service, "svc");
                svc.children = (0..n)
                    .map(|i| Node::new(NodeKind::Server, format!("10.0.0.{i}:80")))
                    .collect();
                svc
            })
            .collect();
        let mut group = Node::new(NodeKind::Provider, "docker");
        group.children = services;
        let mut root = Node::new(NodeKind::Instance, "Traefik Instance");
        root.children = vec![group];
        root
    }

    #[test]
    fn floors_apply_to_empty_trees() {
        let empty = Node::new(NodeKind::Instance, "Traefik Instance");
        assert_eq!(backend_width(&empty), BACKEND_MIN_WIDTH);
        assert_eq!(frontage_width(&empty), FRONTAGE_MIN_WIDTH);
    }

    #[test]
    fn backend_scales_with_leaves() {
        assert_eq!(server_leaves(&backend_with(&[2, 3])), 5);
        assert_eq!(backend_width(&backend_with(&[2, 3])), 750);
        assert_eq!(backend_width(&backend_with(&[1])), BACKEND_MIN_WIDTH);
    }

    #[test]
    fn backend_is_monotonic() {
        let mut previous = 0;
        for leaves in 0..20 {
            let width = backend_width(&backend_with(&[leaves]));
            assert!(width >= previous);
            assert!(width >= BACKEND_MIN_WIDTH);
            previous = width;
        }
    }

    #[test]
    fn frontage_counts_direct_children_only() {
        let mut root = Node::new(NodeKind::Ingress, "Internet / Entrypoints");
        for i in 0..4 {
            let mut route = Node::new(NodeKind::Route, format!("r{i}"));
            route.children.push(Node::new(NodeKind::Route, "nested"));
            root.children.push(route);
        }
        assert_eq!(frontage_width(&root), 680);
    }

    #[test]
    fn anchor_display() {
        assert_eq!(Anchor::LeftToRight.to_string(), "left-to-right");
        assert_eq!(Anchor::RightToLeft.to_string(), "right-to-left");
    }
}
