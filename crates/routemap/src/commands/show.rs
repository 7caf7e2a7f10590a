//! `routemap show`: compile one snapshot and print both trees.

use std::fmt::Write as _;

use routemap_core::{Node, NodeKind, Render, Snapshot, Topology, compile};

use crate::cli::{GlobalOpts, OutputFormat, ShowArgs, Side};
use crate::error::CliError;
use crate::output::{self, Palette};

pub fn handle(
    snapshot: &Snapshot,
    query: &str,
    args: &ShowArgs,
    format: OutputFormat,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let render = compile(snapshot, query);

    let out = match format {
        OutputFormat::Table => {
            let palette = Palette::new(output::should_color(global.color));
            render_text(&render, args, palette)
        }
        OutputFormat::Plain => render_plain(&render),
        structured => output::render_structured(structured, &render)?,
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

fn render_text(render: &Render, args: &ShowArgs, palette: Palette) -> String {
    let Some(topology) = render.topology() else {
        return render.message().unwrap_or_default();
    };

    let mut out = String::new();
    if args.side != Side::Backend {
        out.push_str(&output::render_tree(&topology.frontage.root, palette));
    }
    if args.side == Side::Both {
        out.push('\n');
    }
    if args.side != Side::Frontage {
        out.push_str(&output::render_tree(&topology.backend.root, palette));
    }
    if !args.no_catalog {
        write_catalog(&mut out, topology, palette);
    }
    out
}

fn write_catalog(out: &mut String, topology: &Topology, palette: Palette) {
    for (title, nodes) in [
        ("Middlewares", &topology.middlewares),
        ("Certificates", &topology.certificates),
    ] {
        if nodes.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n{}", palette.heading(title));
        for node in nodes {
            let _ = writeln!(
                out,
                "  • {}  {}",
                node.label,
                palette.dim(&node.details.join("; "))
            );
        }
    }
}

/// `router -> service` per route, or the empty-state message.
fn render_plain(render: &Render) -> String {
    let Some(topology) = render.topology() else {
        return render.message().unwrap_or_default();
    };
    topology
        .frontage
        .root
        .children
        .iter()
        .filter(|n: &&Node| n.kind == NodeKind::Route)
        .map(|route| match route.service {
            Some(ref service) => format!("{} -> {service}", route.label),
            None => route.label.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use routemap_core::{Payloads, normalize};

    use super::*;

    fn snapshot() -> Snapshot {
        let routers = serde_json::from_str(
            r#"[{"name":"r1@docker","provider":"docker","service":"s1",
                "rule":"Host(`one.example.com`)","entryPoints":["https"]}]"#,
        )
        .unwrap();
        let services = serde_json::from_str(
            r#"[{"name":"s1@docker","provider":"docker","type":"loadbalancer",
                "loadBalancer":{"servers":[{"url":"http://10.0.0.1:80"}]},
                "serverStatus":{"http://10.0.0.1:80":"UP"}}]"#,
        )
        .unwrap();
        normalize(Payloads {
            routers: Some(routers),
            services: Some(services),
            ..Payloads::default()
        })
    }

    fn args(side: Side) -> ShowArgs {
        ShowArgs {
            side,
            no_catalog: true,
        }
    }

    #[test]
    fn text_contains_both_trees() {
        let render = compile(&snapshot(), "");
        let text = render_text(&render, &args(Side::Both), Palette::new(false));
        assert!(text.contains("Internet / Entrypoints"));
        assert!(text.contains("└── r1@docker  → s1@docker  https://one.example.com"));
        assert!(text.contains("Traefik Instance"));
        assert!(text.contains("10.0.0.1:80  UP"));
    }

    #[test]
    fn side_selects_one_tree() {
        let render = compile(&snapshot(), "");
        let text = render_text(&render, &args(Side::Backend), Palette::new(false));
        assert!(!text.contains("Internet / Entrypoints"));
        assert!(text.contains("Traefik Instance"));
    }

    #[test]
    fn empty_states_print_message() {
        let render = compile(&snapshot(), "nomatch");
        assert_eq!(
            render_text(&render, &args(Side::Both), Palette::new(false)),
            "No results for \"nomatch\""
        );
        assert_eq!(render_plain(&render), "No results for \"nomatch\"");
    }

    #[test]
    fn plain_lists_routes() {
        let render = compile(&snapshot(), "");
        assert_eq!(render_plain(&render), "r1@docker -> s1@docker");
    }
}
