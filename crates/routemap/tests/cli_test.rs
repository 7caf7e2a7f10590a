//! Integration tests for the `routemap` CLI binary.
//!
//! Help, completions, the URL store round trip and error exits run
//! without a proxy; `show` and the list commands run against a wiremock
//! Traefik API.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `routemap` binary with env isolation.
///
/// Clears all `ROUTEMAP_*` env vars and points config and state at
/// `dir` so tests never touch the user's real configuration.
fn routemap_cmd(dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("routemap");
    cmd.env("HOME", "/tmp/routemap-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/routemap-cli-test-nonexistent")
        .env("ROUTEMAP_CONFIG", dir.join("config.toml"))
        .env("ROUTEMAP_STATE", dir.join("state.toml"))
        .env("NO_COLOR", "1")
        .env_remove("ROUTEMAP_URL")
        .env_remove("ROUTEMAP_OUTPUT")
        .env_remove("ROUTEMAP_INSECURE")
        .env_remove("ROUTEMAP_TIMEOUT")
        .env_remove("ROUTEMAP_POLL_INTERVAL")
        .env_remove("RUST_LOG");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Routers, services and entrypoints; everything else 404s.
async fn mock_traefik() -> MockServer {
    let server = MockServer::start().await;
    let routes = [
        (
            "/api/http/routers",
            json!([
                { "name": "whoami@docker", "provider": "docker", "service": "whoami",
                  "rule": "Host(`whoami.local`)", "entryPoints": ["web"] },
                { "name": "api@internal", "provider": "internal", "service": "api@internal",
                  "rule": "PathPrefix(`/api`)", "entryPoints": ["traefik"] }
            ]),
        ),
        (
            "/api/http/services",
            json!([
                { "name": "whoami@docker", "provider": "docker", "type": "loadbalancer",
                  "loadBalancer": { "servers": [{ "url": "http://172.18.0.3:80" }] },
                  "serverStatus": { "http://172.18.0.3:80": "UP" } },
                { "name": "api@internal", "provider": "internal" }
            ]),
        ),
        (
            "/api/entrypoints",
            json!([{ "name": "web", "address": ":80" }]),
        ),
    ];
    for (route, body) in routes {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
    }
    server
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let dir = tempfile::tempdir().unwrap();
    let output = routemap_cmd(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_flag() {
    let dir = tempfile::tempdir().unwrap();
    routemap_cmd(dir.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("Traefik")
            .and(predicate::str::contains("show"))
            .and(predicate::str::contains("routers"))
            .and(predicate::str::contains("url")),
    );
}

#[test]
fn test_completions_zsh() {
    let dir = tempfile::tempdir().unwrap();
    routemap_cmd(dir.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_invalid_output_format() {
    let dir = tempfile::tempdir().unwrap();
    routemap_cmd(dir.path())
        .args(["--output", "invalid", "show"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("possible values"));
}

// ── URL store ───────────────────────────────────────────────────────

#[test]
fn test_url_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();

    routemap_cmd(dir.path())
        .args(["url", "get"])
        .assert()
        .code(4);

    routemap_cmd(dir.path())
        .args(["url", "set", "traefik.local:8080"])
        .assert()
        .success();
    assert!(dir.path().join("state.toml").exists());

    routemap_cmd(dir.path())
        .args(["url", "get"])
        .assert()
        .success()
        .stdout("http://traefik.local:8080/\n");

    routemap_cmd(dir.path())
        .args(["url", "clear"])
        .assert()
        .success();
    routemap_cmd(dir.path())
        .args(["url", "get"])
        .assert()
        .code(4);
}

#[test]
fn test_url_set_rejects_bad_scheme() {
    let dir = tempfile::tempdir().unwrap();
    routemap_cmd(dir.path())
        .args(["url", "set", "ftp://traefik"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("scheme"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_init_then_show() {
    let dir = tempfile::tempdir().unwrap();

    routemap_cmd(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));

    routemap_cmd(dir.path())
        .args(["config", "init"])
        .assert()
        .success();
    routemap_cmd(dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    routemap_cmd(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("poll_interval = \"15s\""));
}

// ── Proxy-bound commands ────────────────────────────────────────────

#[test]
fn test_show_without_url() {
    let dir = tempfile::tempdir().unwrap();
    routemap_cmd(dir.path())
        .arg("show")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No Traefik URL configured"));
}

#[test]
fn test_show_connection_refused() {
    let dir = tempfile::tempdir().unwrap();
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    routemap_cmd(dir.path())
        .args(["--url", &format!("http://127.0.0.1:{port}"), "show"])
        .assert()
        .code(7);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_show_prints_both_trees() {
    let server = mock_traefik().await;
    let dir = tempfile::tempdir().unwrap();

    routemap_cmd(dir.path())
        .args(["--url", &server.uri(), "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Internet / Entrypoints")
                .and(predicate::str::contains("whoami@docker  → whoami@docker  http://whoami.local"))
                .and(predicate::str::contains("Traefik Instance"))
                .and(predicate::str::contains("172.18.0.3:80  UP")),
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_show_uses_stored_url() {
    let server = mock_traefik().await;
    let dir = tempfile::tempdir().unwrap();

    routemap_cmd(dir.path())
        .args(["url", "set", &server.uri()])
        .assert()
        .success();
    routemap_cmd(dir.path())
        .args(["show", "--side", "backend"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Traefik Instance"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_show_query_without_match() {
    let server = mock_traefik().await;
    let dir = tempfile::tempdir().unwrap();

    routemap_cmd(dir.path())
        .args(["--url", &server.uri(), "--query", "nomatch", "show"])
        .assert()
        .success()
        .stdout("No results for \"nomatch\"\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_show_json_render_state() {
    let server = mock_traefik().await;
    let dir = tempfile::tempdir().unwrap();

    let output = routemap_cmd(dir.path())
        .args(["--url", &server.uri(), "-o", "json", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["state"], "topology");
    assert_eq!(value["backend"]["anchor"], "left-to-right");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_routers_plain_with_query_keeps_closure() {
    let server = mock_traefik().await;
    let dir = tempfile::tempdir().unwrap();

    routemap_cmd(dir.path())
        .args(["--url", &server.uri(), "-o", "plain", "-q", "172.18", "routers"])
        .assert()
        .success()
        .stdout("whoami@docker\n");

    routemap_cmd(dir.path())
        .args(["--url", &server.uri(), "-o", "plain", "-q", "172.18", "services"])
        .assert()
        .success()
        .stdout("whoami@docker\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_every_endpoint_404_is_not_found() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    routemap_cmd(dir.path())
        .args(["--url", &server.uri(), "show"])
        .assert()
        .code(4);
}
