#![deny(clippy::all, clippy::pedantic)]

use reqwest::Url;

use crate::client::CliError;

const HOST_PLACEHOLDERS: [&str; 3] = ["{host}", "{hostname}", "{ip}"];
const PORT_PLACEHOLDER: &str = "{port}";
const WILDCARD_ADDRS: [&str; 3] = ["0.0.0.0", "::", "[::]"];
const LOOPBACK: &str = "127.0.0.1";

/// Substitute the configured address into the public link pattern.
///
/// The returned base never ends in `/`.
pub fn resolve_host(ip: &str, port: u16, pattern: &str) -> String {
    let ip = if WILDCARD_ADDRS.contains(&ip) {
        LOOPBACK.to_string()
    } else if ip.contains(':') && !ip.starts_with('[') {
        format!("[{ip}]")
    } else {
        ip.to_string()
    };

    let mut base = pattern.trim().to_string();
    for placeholder in HOST_PLACEHOLDERS {
        base = base.replace(placeholder, &ip);
    }
    base = base.replace(PORT_PLACEHOLDER, &port.to_string());

    with_scheme(&base)
}

/// Prefix `http://` when `host` carries no scheme and drop trailing slashes.
pub fn with_scheme(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.contains("://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}

/// Append `segments` to `base` as path segments.
///
/// Each segment is split on `/` and empty pieces are dropped, so separators
/// never double up. Pieces are percent-encoded, so `#`, `?` and `%` stay in
/// the path; `.` and `..` are rejected.
pub fn resolve_target(base: &str, segments: &[&str]) -> Result<Url, CliError> {
    let pieces: Vec<&str> = segments
        .iter()
        .flat_map(|segment| segment.split('/'))
        .filter(|piece| !piece.is_empty())
        .collect();
    if let Some(dot) = pieces.iter().find(|piece| matches!(**piece, "." | "..")) {
        return Err(CliError::InvalidInput(format!(
            "path segment `{dot}` is not allowed"
        )));
    }

    let mut url = Url::parse(base.trim_end_matches('/'))?;
    url.path_segments_mut()
        .map_err(|()| CliError::InvalidInput(format!("`{base}` cannot be used as a base URL")))?
        .pop_if_empty()
        .extend(pieces);

    Ok(url)
}
