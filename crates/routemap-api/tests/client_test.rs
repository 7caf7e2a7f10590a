#![allow(clippy::unwrap_used)]
// Integration tests for `TraefikClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use routemap_api::{Error, Listing, TraefikClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, TraefikClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = TraefikClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

// ── List endpoints ──────────────────────────────────────────────────

#[tokio::test]
async fn test_list_routers() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/http/routers"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "entryPoints": ["websecure"],
            "middlewares": ["auth@file"],
            "service": "whoami",
            "rule": "Host(`whoami.example.com`)",
            "status": "enabled",
            "name": "whoami@docker",
            "provider": "docker"
        }])))
        .mount(&server)
        .await;

    let routers = client.list_routers().await.unwrap();
    let Listing::Array(routers) = routers else {
        panic!("expected array listing");
    };
    assert_eq!(routers.len(), 1);
    assert_eq!(routers[0].name.as_deref(), Some("whoami@docker"));
    assert_eq!(routers[0].entry_points.as_deref(), Some(&["websecure".to_owned()][..]));
    assert_eq!(routers[0].service.as_deref(), Some("whoami"));
}

#[tokio::test]
async fn test_list_follows_next_page_header() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/http/services"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Next-Page", "2")
                .set_body_json(json!([{ "name": "a@file", "provider": "file" }])),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/http/services"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Next-Page", "1")
                .set_body_json(json!([{ "name": "b@file", "provider": "file" }])),
        )
        .mount(&server)
        .await;

    let services = client.list_services().await.unwrap();
    let names: Vec<_> = services
        .into_entries()
        .into_iter()
        .filter_map(|(_, s)| s.name)
        .collect();
    assert_eq!(names, vec!["a@file".to_owned(), "b@file".to_owned()]);
}

#[tokio::test]
async fn test_keyed_payload_is_accepted() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/entrypoints"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "web": { "address": ":80" },
            "websecure": { "address": ":443", "transport": { "protocol": "TCP" } }
        })))
        .mount(&server)
        .await;

    let entrypoints = client.list_entrypoints().await.unwrap();
    assert!(matches!(entrypoints, Listing::Keyed(ref m) if m.len() == 2));
}

#[tokio::test]
async fn test_null_payload_is_empty() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/http/middlewares"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    let middlewares = client.list_middlewares().await.unwrap();
    assert!(middlewares.is_empty());
}

// ── Object endpoints ────────────────────────────────────────────────

#[tokio::test]
async fn test_overview_and_version() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/overview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "http": {
                "routers": { "total": 3, "warnings": 0, "errors": 1 },
                "services": { "total": 2, "warnings": 0, "errors": 0 }
            },
            "providers": ["Docker", "File"]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/version"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "Version": "3.1.2", "Codename": "comte" })),
        )
        .mount(&server)
        .await;

    let overview = client.get_overview().await.unwrap();
    let routers = overview.http.unwrap().routers.unwrap();
    assert_eq!(routers.total, 3);
    assert_eq!(routers.errors, 1);

    let version = client.get_version().await.unwrap();
    assert_eq!(version.version.as_deref(), Some("3.1.2"));
}

// ── Error mapping ───────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_endpoint_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/tls/certificates"))
        .respond_with(ResponseTemplate::new(404).set_body_string("404 page not found"))
        .mount(&server)
        .await;

    let err = client.list_certificates().await.unwrap_err();
    assert!(err.is_not_found(), "expected not-found, got: {err:?}");
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_server_error_is_transient() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/http/routers"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let err = client.list_routers().await.unwrap_err();
    assert!(
        matches!(err, Error::Http { status: 503, ref path, .. } if path == "/api/http/routers"),
        "unexpected error: {err:?}"
    );
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_malformed_json_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/http/routers"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let err = client.list_routers().await.unwrap_err();
    assert!(
        matches!(err, Error::Deserialization { ref body, .. } if body == "{not json"),
        "unexpected error: {err:?}"
    );
}
