//! Output formatting: trees, tables, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Tables use `tabled`,
//! trees are drawn with box guides, structured formats go through serde,
//! plain emits one identifier per line.

use std::fmt::Write as _;
use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use routemap_core::{Node, NodeKind};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Applies styles only when color is enabled.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn heading(self, s: &str) -> String {
        if self.enabled {
            s.bold().cyan().to_string()
        } else {
            s.to_owned()
        }
    }

    pub fn dim(self, s: &str) -> String {
        if self.enabled {
            s.dimmed().to_string()
        } else {
            s.to_owned()
        }
    }

    pub fn accent(self, s: &str) -> String {
        if self.enabled {
            s.magenta().to_string()
        } else {
            s.to_owned()
        }
    }

    /// Green for UP/enabled, red for DOWN/disabled, yellow otherwise.
    pub fn status(self, s: &str) -> String {
        if !self.enabled {
            return s.to_owned();
        }
        match s.to_ascii_lowercase().as_str() {
            "up" | "enabled" => s.green().to_string(),
            "down" | "disabled" => s.red().to_string(),
            _ => s.yellow().to_string(),
        }
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Plain => Ok(data.iter().map(id_fn).collect::<Vec<_>>().join("\n")),
        structured => render_structured(structured, data),
    }
}

/// Render a single item; table mode uses a pre-formatted detail view.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Plain => Ok(id_fn(data)),
        structured => render_structured(structured, data),
    }
}

/// JSON / compact JSON / YAML. Table and plain fall back to pretty JSON.
pub fn render_structured<T: serde::Serialize + ?Sized>(
    format: OutputFormat,
    data: &T,
) -> Result<String, CliError> {
    let rendered = match format {
        OutputFormat::JsonCompact => serde_json::to_string(data).map_err(ser_err)?,
        OutputFormat::Yaml => serde_yaml::to_string(data).map_err(ser_err)?,
        OutputFormat::Json | OutputFormat::Table | OutputFormat::Plain => {
            serde_json::to_string_pretty(data).map_err(ser_err)?
        }
    };
    Ok(rendered)
}

fn ser_err(e: impl std::fmt::Display) -> CliError {
    CliError::Serialize(e.to_string())
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", output.trim_end_matches('\n'));
}

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

// ── Trees ────────────────────────────────────────────────────────────

/// Draw `root` and its descendants with `├──` / `└──` guides.
pub fn render_tree(root: &Node, palette: Palette) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", palette.heading(&root.label));
    let count = root.children.len();
    for (i, child) in root.children.iter().enumerate() {
        write_node(&mut out, child, "", i + 1 == count, palette);
    }
    out
}

fn write_node(out: &mut String, node: &Node, prefix: &str, last: bool, palette: Palette) {
    let connector = if last { "└── " } else { "├── " };
    let _ = writeln!(
        out,
        "{prefix}{}{}{}",
        palette.dim(connector),
        node_label(node, palette),
        annotation(node, palette)
    );

    let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        write_node(out, child, &child_prefix, i + 1 == count, palette);
    }
}

fn node_label(node: &Node, palette: Palette) -> String {
    match node.kind {
        NodeKind::Provider | NodeKind::Ingress => palette.heading(&node.label),
        NodeKind::Entrypoint => palette.accent(&node.label),
        _ => node.label.clone(),
    }
}

/// Trailing info per node kind: server health, route target and link,
/// entrypoint address.
fn annotation(node: &Node, palette: Palette) -> String {
    let mut parts = Vec::new();
    match node.kind {
        NodeKind::Server => {
            if let Some(ref status) = node.status {
                parts.push(palette.status(status));
            }
        }
        NodeKind::Route => {
            if let Some(ref service) = node.service {
                parts.push(format!("→ {service}"));
            }
            if let Some(ref link) = node.link {
                parts.push(palette.dim(link));
            }
        }
        NodeKind::Entrypoint | NodeKind::Provider | NodeKind::Service => {
            if let Some(first) = node.details.first() {
                parts.push(palette.dim(first));
            }
        }
        _ => {}
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!("  {}", parts.join("  "))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn leaf(kind: NodeKind, label: &str) -> Node {
        Node::new(kind, label)
    }

    #[test]
    fn tree_guides() {
        let mut root = leaf(NodeKind::Instance, "Traefik Instance");
        let mut provider = leaf(NodeKind::Provider, "docker");
        let mut service = leaf(NodeKind::Service, "s1@docker");
        let mut up = leaf(NodeKind::Server, "10.0.0.1:80");
        up.status = Some("UP".into());
        service.children.push(up);
        service.children.push(leaf(NodeKind::Server, "10.0.0.2:80"));
        provider.children.push(service);
        root.children.push(provider);
        root.children.push(leaf(NodeKind::Provider, "file"));

        let text = render_tree(&root, Palette::new(false));
        let expected = "\
Traefik Instance
├── docker
│   └── s1@docker
│       ├── 10.0.0.1:80  UP
│       └── 10.0.0.2:80
└── file
";
        assert_eq!(text, expected);
    }

    #[test]
    fn route_annotation_shows_target_and_link() {
        let mut route = leaf(NodeKind::Route, "r1@docker");
        route.service = Some(routemap_core::CompositeKey::new("s1", "docker"));
        route.link = Some("https://one.example.com".into());
        assert_eq!(
            annotation(&route, Palette::new(false)),
            "  → s1@docker  https://one.example.com"
        );
    }

    #[test]
    fn structured_formats() {
        let data = vec!["a", "b"];
        assert_eq!(
            render_structured(OutputFormat::JsonCompact, &data).unwrap(),
            r#"["a","b"]"#
        );
        assert_eq!(
            render_structured(OutputFormat::Yaml, &data).unwrap(),
            "- a\n- b\n"
        );
    }
}
