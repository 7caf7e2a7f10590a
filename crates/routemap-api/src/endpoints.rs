// Traefik API read endpoints
//
// One method per introspection resource. All are plain GETs; list
// endpoints walk pages transparently.

use tracing::debug;

use crate::client::TraefikClient;
use crate::error::Error;
use crate::models::{
    Listing, RawCertificate, RawEntrypoint, RawMiddleware, RawOverview, RawRouter, RawService,
    RawVersion,
};

impl TraefikClient {
    /// List HTTP routers.
    ///
    /// `GET /api/http/routers`
    pub async fn list_routers(&self) -> Result<Listing<RawRouter>, Error> {
        debug!("listing routers");
        self.get_listing("http/routers").await
    }

    /// List HTTP services.
    ///
    /// `GET /api/http/services`
    pub async fn list_services(&self) -> Result<Listing<RawService>, Error> {
        debug!("listing services");
        self.get_listing("http/services").await
    }

    /// List entrypoints.
    ///
    /// `GET /api/entrypoints`
    pub async fn list_entrypoints(&self) -> Result<Listing<RawEntrypoint>, Error> {
        debug!("listing entrypoints");
        self.get_listing("entrypoints").await
    }

    /// List HTTP middlewares.
    ///
    /// `GET /api/http/middlewares`
    pub async fn list_middlewares(&self) -> Result<Listing<RawMiddleware>, Error> {
        debug!("listing middlewares");
        self.get_listing("http/middlewares").await
    }

    /// List TLS certificates.
    ///
    /// `GET /api/tls/certificates`. Not every Traefik release serves this;
    /// callers should treat a 404 as "no certificates".
    pub async fn list_certificates(&self) -> Result<Listing<RawCertificate>, Error> {
        debug!("listing certificates");
        self.get_listing("tls/certificates").await
    }

    /// Instance overview (totals, providers).
    ///
    /// `GET /api/overview`
    pub async fn get_overview(&self) -> Result<RawOverview, Error> {
        debug!("fetching overview");
        self.get_object("overview").await
    }

    /// Version information.
    ///
    /// `GET /api/version`
    pub async fn get_version(&self) -> Result<RawVersion, Error> {
        debug!("fetching version");
        self.get_object("version").await
    }
}
