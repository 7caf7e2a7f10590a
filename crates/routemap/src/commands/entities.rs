//! Entity list handlers: routers, services, entrypoints, middlewares, certs.
//!
//! Lists go through the same filter as `show`, so `--query` keeps the
//! router → service closure here too.

use tabled::Tabled;

use routemap_core::{
    Certificate, Entrypoint, Middleware, Router, Service, Snapshot, filter,
};

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct RouterRow {
    #[tabled(rename = "Router")]
    key: String,
    #[tabled(rename = "Rule")]
    rule: String,
    #[tabled(rename = "Entrypoints")]
    entry_points: String,
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "TLS")]
    tls: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Router> for RouterRow {
    fn from(r: &Router) -> Self {
        Self {
            key: r.key.to_string(),
            rule: r.rule.clone(),
            entry_points: r.entry_points.join(", "),
            service: r.service_key().map(|k| k.to_string()).unwrap_or_default(),
            tls: if r.tls { "yes".into() } else { String::new() },
            status: r.status.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "Service")]
    key: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Servers")]
    servers: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Service> for ServiceRow {
    fn from(s: &Service) -> Self {
        let servers = s
            .servers
            .iter()
            .map(|server| match s.status_of(&server.address) {
                Some(health) => format!("{} ({health})", server.address),
                None => server.address.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            key: s.key.to_string(),
            kind: s.kind.to_string(),
            servers,
            status: s.status.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct EntrypointRow {
    #[tabled(rename = "Entrypoint")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Transport")]
    transport: String,
}

impl From<&Entrypoint> for EntrypointRow {
    fn from(e: &Entrypoint) -> Self {
        Self {
            name: e.name.clone(),
            address: e.address.clone().unwrap_or_default(),
            transport: e.transport().to_owned(),
        }
    }
}

#[derive(Tabled)]
struct MiddlewareRow {
    #[tabled(rename = "Middleware")]
    key: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Middleware> for MiddlewareRow {
    fn from(m: &Middleware) -> Self {
        Self {
            key: m.key.to_string(),
            kind: m.kind.clone().unwrap_or_default(),
            status: m.status.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct CertificateRow {
    #[tabled(rename = "Main")]
    main: String,
    #[tabled(rename = "SANs")]
    sans: String,
}

impl From<&Certificate> for CertificateRow {
    fn from(c: &Certificate) -> Self {
        Self {
            main: c.display_name().to_owned(),
            sans: c.sans.join(", "),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(
    cmd: &Command,
    snapshot: &Snapshot,
    query: &str,
    format: OutputFormat,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let outcome = filter(&snapshot.entities, query);
    let entities = outcome.entities;

    let out = match cmd {
        Command::Routers => {
            let data: Vec<&Router> = entities.routers.values().collect();
            output::render_list(format, &data, |r| RouterRow::from(*r), |r| r.key.to_string())?
        }
        Command::Services => {
            let data: Vec<&Service> = entities.services.values().collect();
            output::render_list(format, &data, |s| ServiceRow::from(*s), |s| s.key.to_string())?
        }
        Command::Entrypoints => {
            let data: Vec<&Entrypoint> = entities.entrypoints.values().collect();
            output::render_list(
                format,
                &data,
                |e| EntrypointRow::from(*e),
                |e| e.name.clone(),
            )?
        }
        Command::Middlewares => {
            let data: Vec<&Middleware> = entities.middlewares.values().collect();
            output::render_list(
                format,
                &data,
                |m| MiddlewareRow::from(*m),
                |m| m.key.to_string(),
            )?
        }
        Command::Certs => output::render_list(
            format,
            &entities.certificates,
            |c| CertificateRow::from(c),
            |c| c.display_name().to_owned(),
        )?,
        _ => String::new(),
    };

    output::print_output(&out, global.quiet);
    Ok(())
}
