//! Request logging middleware.
//!
//! Logs every HTTP request with method, route, status code, and latency.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{debug, info, warn};

const UNMATCHED_ROUTE: &str = "<unmatched>";

/// Route template for the request, e.g. `/users/:id`, so per-id paths
/// group under one route in the logs.
fn route_of(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}

/// Logs at INFO level for completed requests, WARN level for server errors.
/// Rejected bearer credentials are noted at DEBUG with the route they hit.
pub async fn request_logging(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let route = route_of(&request);
    let has_bearer = request.headers().contains_key(header::AUTHORIZATION);

    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status().as_u16();

    if status == 401 {
        debug!(
            route = %route,
            has_bearer = has_bearer,
            "Authentication rejected"
        );
    }

    if status >= 500 {
        warn!(
            method = %method,
            route = %route,
            path = %path,
            status = status,
            latency_ms = latency.as_millis(),
            "Request failed (5xx)"
        );
    } else {
        info!(
            method = %method,
            route = %route,
            path = %path,
            status = status,
            latency_ms = latency.as_millis(),
            "Request completed"
        );
    }

    response
}
