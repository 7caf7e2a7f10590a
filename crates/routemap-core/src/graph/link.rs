// Best-effort outbound link for a route.
//
// Only two predicates are understood: ``Host(`…`)`` (required) and an
// optional ``PathPrefix(`…`)``. Anything fancier yields no link rather
// than a guess.

use std::sync::LazyLock;

use regex::Regex;

static HOST: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\bHost\(\s*`([^`]+)`").ok());

static PATH_PREFIX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\bPathPrefix\(\s*`([^`]*)`").ok());

fn capture<'a>(re: Option<&Regex>, text: &'a str) -> Option<&'a str> {
    re?.captures(text)?
        .get(1)
        .map(|m| m.as_str())
}

/// `https` when any entry point name mentions it, else `http`.
pub fn scheme(entry_points: &[String]) -> &'static str {
    if entry_points
        .iter()
        .any(|ep| ep.to_ascii_lowercase().contains("https"))
    {
        "https"
    } else {
        "http"
    }
}

/// Derive `scheme://host[prefix]` from a router rule.
pub fn derive(rule: &str, entry_points: &[String]) -> Option<String> {
    let host = capture(HOST.as_ref(), rule)?;
    let path = capture(PATH_PREFIX.as_ref(), rule).unwrap_or_default();
    Some(format!("{}://{host}{path}", scheme(entry_points)))
}
