use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::infrastructure::security::rate_limiter::window_key;
use crate::presentation::http::{errors::AppError, state::AppState};

fn header_ip(headers: &HeaderMap, name: &str) -> Option<IpAddr> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}

/// Client address for rate limiting.
///
/// Forwarding headers are only read when the socket peer is a trusted proxy.
/// `X-Forwarded-For` is walked right to left, skipping trusted hops, so a
/// client cannot prepend its own entries.
pub fn client_ip(peer: IpAddr, headers: &HeaderMap, trusted_proxies: &[IpAddr]) -> IpAddr {
    if !trusted_proxies.contains(&peer) {
        return peer;
    }

    let forwarded: Vec<&str> = headers
        .get_all("x-forwarded-for")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    for hop in forwarded.iter().rev() {
        match hop.parse::<IpAddr>() {
            Ok(ip) if trusted_proxies.contains(&ip) => continue,
            Ok(ip) => return ip,
            Err(_) => return peer,
        }
    }

    header_ip(headers, "x-real-ip").unwrap_or(peer)
}

/// Fixed-window limit per client IP. A limiter outage lets traffic through.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let max = state.config.rate_limit_max_requests;
    // In-process callers have no socket.
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
    let ip = client_ip(peer, request.headers(), &state.config.trusted_proxies);
    if max == 0 || ip.is_loopback() {
        return Ok(next.run(request).await);
    }

    let window = state.config.rate_limit_window_seconds;
    let key = window_key(&ip.to_string(), chrono::Utc::now().timestamp(), window);
    match state.rate_limiter.hit(&key, window).await {
        Ok(count) if count > max => {
            tracing::debug!(ip = %ip, count, "Rate limit exceeded");
            return Err(AppError::RateLimited);
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "Rate limiter unavailable, allowing request"),
    }

    Ok(next.run(request).await)
}
