//! Flattened view of a [`Node`] tree for list rendering.
//!
//! Rows hold a child-index path back into the tree instead of a borrow, so
//! a screen can keep them next to the `Arc<Render>` they came from.

use ratatui::text::{Line, Span};

use routemap_core::{Node, NodeKind, ServerHealth};

use crate::theme;

/// One visible row: the guide prefix and the path from the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub prefix: String,
    pub path: Vec<usize>,
}

/// Pre-order rows with `├──`/`└──` guides. The root has an empty prefix.
pub fn flatten(root: &Node) -> Vec<TreeRow> {
    let mut rows = Vec::with_capacity(root.size());
    rows.push(TreeRow {
        prefix: String::new(),
        path: Vec::new(),
    });
    walk(root, "", &mut Vec::new(), &mut rows);
    rows
}

fn walk(node: &Node, indent: &str, path: &mut Vec<usize>, rows: &mut Vec<TreeRow>) {
    let last = node.children.len().saturating_sub(1);
    for (i, child) in node.children.iter().enumerate() {
        let (branch, carry) = if i == last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        path.push(i);
        rows.push(TreeRow {
            prefix: format!("{indent}{branch}"),
            path: path.clone(),
        });
        walk(child, &format!("{indent}{carry}"), path, rows);
        path.pop();
    }
}

/// Follow `path` down from `root`.
pub fn node_at<'a>(root: &'a Node, path: &[usize]) -> Option<&'a Node> {
    path.iter()
        .try_fold(root, |node, &i| node.children.get(i))
}

/// Styled line for one row: guides, label, then a kind-specific annotation.
pub fn row_line<'a>(row: &'a TreeRow, node: &'a Node) -> Line<'a> {
    let mut spans = vec![
        Span::styled(row.prefix.as_str(), theme::guide()),
        Span::styled(node.label.as_str(), theme::node_label(node.kind)),
    ];

    match node.kind {
        NodeKind::Server => {
            if let Some(status) = node.status.as_deref() {
                spans.push(Span::raw("  "));
                spans.push(Span::styled(
                    status,
                    theme::health(ServerHealth::from_status(status)),
                ));
            }
        }
        NodeKind::Service => {
            if let Some(status) = node.status.as_deref() {
                spans.push(Span::raw("  "));
                spans.push(Span::styled(status, theme::status(status)));
            }
        }
        NodeKind::Route => {
            spans.push(Span::styled("  → ", theme::guide()));
            match node.service.as_ref() {
                Some(service) => spans.push(Span::styled(
                    service.to_string(),
                    theme::node_label(NodeKind::Service),
                )),
                None => spans.push(Span::styled(
                    "unresolved",
                    theme::status("down"),
                )),
            }
        }
        NodeKind::Entrypoint => {
            if let Some(address) = node.details.first() {
                spans.push(Span::styled(format!("  {address}"), theme::dim()));
            }
        }
        _ => {}
    }

    Line::from(spans)
}
