//! Per-request access log.

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{ConnectInfo, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::info;

const SKIPPED_PATHS: [&str; 1] = ["/health"];

pub async fn log_request(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    if SKIPPED_PATHS.contains(&path.as_str()) {
        return next.run(req).await;
    }

    let method = req.method().clone();
    let query = req.uri().query().unwrap_or_default().to_string();
    let remote = client_address(&req);
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let outcome = if status.is_success() { "success" } else { "fail" };
    info!(
        "{} {} query=[{}] from {} -> {} {} in {}ms",
        method,
        path,
        query,
        remote,
        status.as_u16(),
        outcome,
        started.elapsed().as_millis()
    );

    response
}

/// First `X-Forwarded-For` hop, else the peer address.
fn client_address(req: &Request) -> String {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return forwarded.to_string();
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_forwarded_header_wins() {
        let req = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_address(&req), "203.0.113.7");
    }

    #[test]
    fn test_peer_address_fallback() {
        let mut req = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_address(&req), "unknown");

        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 168, 0, 5], 4000))));
        assert_eq!(client_address(&req), "192.168.0.5");
    }
}
