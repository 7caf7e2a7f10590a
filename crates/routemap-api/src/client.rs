// Traefik API HTTP client
//
// Wraps `reqwest::Client` with base-URL handling, status mapping and
// page walking. Endpoint methods live in `endpoints.rs` as inherent
// methods so this module stays focused on transport mechanics.

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::Listing;
use crate::transport::TransportConfig;

/// Items requested per page on list endpoints.
pub const PAGE_SIZE: u32 = 100;

/// Upper bound on pages walked for one listing.
const MAX_PAGES: u32 = 1_000;

/// Header carrying the next page number on Traefik list endpoints.
const NEXT_PAGE_HEADER: &str = "X-Next-Page";

/// Raw HTTP client for a Traefik instance's `/api` surface.
///
/// The base URL is the dashboard/API root (e.g. `http://traefik:8080`);
/// trailing slashes are ignored.
#[derive(Debug, Clone)]
pub struct TraefikClient {
    http: reqwest::Client,
    base_url: Url,
}

impl TraefikClient {
    /// Create a client from a base URL string and transport settings.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let base_url = parse_base_url(base_url)?;
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The proxy base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}/api/{path}`
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// GET a single JSON object. A `null` body yields the default value.
    pub(crate) async fn get_object<T>(&self, path: &str) -> Result<T, Error>
    where
        T: DeserializeOwned + Default,
    {
        let url = self.api_url(path)?;
        let (_, body) = self.fetch(url).await?;
        Ok(parse_body::<Option<T>>(&body)?.unwrap_or_default())
    }

    /// GET a list endpoint, following `X-Next-Page` until the last page.
    ///
    /// Keyed-map payloads are returned as-is from the first page.
    pub(crate) async fn get_listing<T>(&self, path: &str) -> Result<Listing<T>, Error>
    where
        T: DeserializeOwned,
    {
        let mut page: u32 = 1;
        let mut items: Vec<T> = Vec::new();

        loop {
            let mut url = self.api_url(path)?;
            url.query_pairs_mut()
                .append_pair("per_page", &PAGE_SIZE.to_string())
                .append_pair("page", &page.to_string());

            let (headers, body) = self.fetch(url).await?;
            match parse_body::<Option<Listing<T>>>(&body)? {
                None => break,
                Some(Listing::Keyed(map)) if page == 1 => return Ok(Listing::Keyed(map)),
                Some(Listing::Keyed(map)) => items.extend(map.into_values()),
                Some(Listing::Array(batch)) => items.extend(batch),
            }

            match next_page(&headers) {
                Some(next) if next > page && next <= MAX_PAGES => {
                    trace!(path, next, "following next page");
                    page = next;
                }
                _ => break,
            }
        }

        Ok(Listing::Array(items))
    }

    /// Send a GET and return headers plus body text, mapping non-2xx
    /// statuses to [`Error::Http`].
    async fn fetch(&self, url: Url) -> Result<(HeaderMap, String), Error> {
        debug!("GET {}", url);

        let path = url.path().to_owned();
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let headers = resp.headers().clone();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                path,
                body: preview(&body),
            });
        }

        let body = resp.text().await?;
        Ok((headers, body))
    }
}

/// Parse and normalize a user-supplied base URL.
fn parse_base_url(raw: &str) -> Result<Url, Error> {
    let trimmed = raw.trim().trim_end_matches('/');
    Ok(Url::parse(trimmed)?)
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(body)),
        body: body.to_owned(),
    })
}

fn next_page(headers: &HeaderMap) -> Option<u32> {
    headers
        .get(NEXT_PAGE_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let client = TraefikClient::new("http://traefik:8080///", &TransportConfig::default())
            .unwrap();
        assert_eq!(
            client.api_url("http/routers").unwrap().as_str(),
            "http://traefik:8080/api/http/routers"
        );
    }

    #[test]
    fn base_url_with_path_prefix_is_kept() {
        let client =
            TraefikClient::new("https://edge.example.com/traefik/", &TransportConfig::default())
                .unwrap();
        assert_eq!(
            client.api_url("overview").unwrap().as_str(),
            "https://edge.example.com/traefik/api/overview"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = TraefikClient::new("not a url", &TransportConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn next_page_header_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(next_page(&headers), None);
        headers.insert(NEXT_PAGE_HEADER, HeaderValue::from_static("3"));
        assert_eq!(next_page(&headers), Some(3));
        headers.insert(NEXT_PAGE_HEADER, HeaderValue::from_static("nope"));
        assert_eq!(next_page(&headers), None);
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "é".repeat(300);
        assert_eq!(preview(&body).chars().count(), 200);
    }
}
