//! Best-effort client identity extraction for rate-limit keys.

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Resolves the caller's IP from proxy headers, falling back to the peer
/// address.
///
/// Order: first `X-Forwarded-For` entry, then `X-Real-IP`, then the host
/// portion of `remote_addr`. A `remote_addr` that does not parse as a socket
/// address is returned verbatim rather than rejected.
///
/// Both headers are client-controlled unless a trusted reverse proxy in front
/// of the service overwrites them; without one, anything keyed on this value
/// can be bypassed with forged headers.
#[must_use]
pub fn client_ip(headers: &HeaderMap, remote_addr: &str) -> String {
    forwarded_ip(headers).unwrap_or_else(|| match remote_addr.parse::<SocketAddr>() {
        Ok(addr) => addr.ip().to_string(),
        Err(_) => remote_addr.to_string(),
    })
}

fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(ToString::to_string)
        })
}
