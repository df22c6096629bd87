//! Client identity extraction for rate limiting.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

/// Resolves the client IP of a request.
///
/// When `behind_proxy` is set, the first address in `X-Forwarded-For` wins,
/// then `X-Real-IP`. Otherwise, and when neither header holds a valid IP, the
/// socket peer address is used. Only enable `behind_proxy` behind a trusted
/// reverse proxy: the headers are client-controlled.
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> IpAddr {
    if behind_proxy && let Some(ip) = forwarded_ip(headers) {
        return ip;
    }

    peer.ip()
}

/// Rate limiter key for a request.
pub fn client_key(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> String {
    client_ip(headers, peer, behind_proxy).to_string()
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let from_forwarded_for = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok());

    from_forwarded_for.or_else(|| {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    })
}
