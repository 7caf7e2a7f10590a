// ── Core error types ──
//
// User-facing errors from routemap-core. Consumers never see reqwest
// errors or JSON parse failures directly; the `From<routemap_api::Error>`
// impl translates them into domain-appropriate variants.
//
// The topology engine itself (normalize, filter, graph) never fails.
// These errors only come out of the poller and the one-shot fetch.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to proxy at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Proxy API request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("No proxy URL configured")]
    NoUrl,

    /// The URL changed or polling stopped while a cycle was in flight.
    #[error("Proxy URL changed before the refresh completed")]
    Superseded,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Returns `true` when the proxy answered 404 for the request.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Api {
                status: Some(404),
                ..
            }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<routemap_api::Error> for CoreError {
    fn from(err: routemap_api::Error) -> Self {
        match err {
            routemap_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            routemap_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            routemap_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            routemap_api::Error::Http { status, path, body } => CoreError::Api {
                message: if body.is_empty() {
                    format!("HTTP {status} from {path}")
                } else {
                    format!("HTTP {status} from {path}: {body}")
                },
                status: Some(status),
            },
            routemap_api::Error::Deserialization { message, body: _ } => CoreError::Api {
                message: format!("Unexpected payload: {message}"),
                status: None,
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn http_errors_keep_status() {
        let err = CoreError::from(routemap_api::Error::Http {
            status: 404,
            path: "/api/tls/certificates".into(),
            body: String::new(),
        });
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "API error: HTTP 404 from /api/tls/certificates");
    }

    #[test]
    fn invalid_url_is_a_config_error() {
        let parse_err = url::Url::parse("::nope").unwrap_err();
        let err = CoreError::from(routemap_api::Error::InvalidUrl(parse_err));
        assert!(matches!(err, CoreError::Config { .. }));
    }
}
