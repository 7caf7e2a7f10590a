//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use routemap_config::ConfigError;
use routemap_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to Traefik at {url}: {reason}")]
    #[diagnostic(
        code(routemap::connection_failed),
        help(
            "Check that the Traefik API is enabled and reachable.\n\
             URL: {url}\n\
             Self-signed dashboard? Try: routemap show --insecure"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(routemap::timeout),
        help("Increase the timeout with --timeout or check the proxy's responsiveness.")
    )]
    Timeout { seconds: u64 },

    #[error("No Traefik URL configured")]
    #[diagnostic(
        code(routemap::no_url),
        help(
            "Pass --url, set ROUTEMAP_URL, or store one with:\n  \
             routemap url set http://traefik:8080"
        )
    )]
    NoUrl,

    // ── Resources ────────────────────────────────────────────────────
    #[error("{what} not found")]
    #[diagnostic(code(routemap::not_found), help("{hint}"))]
    NotFound { what: String, hint: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error: {message}")]
    #[diagnostic(code(routemap::api_error))]
    Api { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(routemap::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Config file already exists at {path}")]
    #[diagnostic(
        code(routemap::config_exists),
        help("Use `routemap config init --force` to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(routemap::config))]
    Config(Box<ConfigError>),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    #[diagnostic(code(routemap::serialize))]
    Serialize(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::NoUrl | Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        if err.is_not_found() {
            return Self::NotFound {
                what: "Traefik API endpoint".into(),
                hint: "Every endpoint answered 404. Is the URL the Traefik API \
                       (usually port 8080) rather than a routed service?"
                    .into(),
            };
        }
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },
            CoreError::NoUrl => Self::NoUrl,
            CoreError::Api { message, .. } => Self::Api { message },
            CoreError::Superseded => Self::Api {
                message: CoreError::Superseded.to_string(),
            },
            CoreError::Config { message } => Self::Validation {
                field: "url".into(),
                reason: message,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config(Box::new(other)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let cases = [
            (
                CoreError::ConnectionFailed {
                    url: "http://x".into(),
                    reason: "refused".into(),
                },
                exit_code::CONNECTION,
            ),
            (CoreError::Timeout { timeout_secs: 3 }, exit_code::TIMEOUT),
            (CoreError::NoUrl, exit_code::USAGE),
            (
                CoreError::Api {
                    message: "HTTP 404 from /api/http/routers".into(),
                    status: Some(404),
                },
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::Api {
                    message: "HTTP 500".into(),
                    status: Some(500),
                },
                exit_code::GENERAL,
            ),
        ];
        for (core, code) in cases {
            assert_eq!(CliError::from(core).exit_code(), code);
        }
    }

    #[test]
    fn config_validation_is_usage() {
        let err = CliError::from(ConfigError::Validation {
            field: "url".into(),
            reason: "must not be empty".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }
}
