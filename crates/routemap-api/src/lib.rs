// routemap-api: Async Rust client for the Traefik introspection API

pub mod client;
mod endpoints;
pub mod error;
pub mod models;
pub mod transport;

pub use client::TraefikClient;
pub use error::Error;
pub use models::{
    Listing, RawCertificate, RawEntrypoint, RawMiddleware, RawOverview, RawRouter, RawService,
    RawVersion,
};
pub use transport::{TlsMode, TransportConfig};
