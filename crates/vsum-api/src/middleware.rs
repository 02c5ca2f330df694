//! HTTP middleware: upload throttling, security headers, CORS and request tracing.

use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, Request, Response, StatusCode};
use axum::middleware::Next;
use axum::response::IntoResponse;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info_span, warn, Span};

use crate::metrics;

/// Header carrying the request id, set or propagated by tower-http.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Client keys tracked before stale entries are swept.
const SWEEP_THRESHOLD: usize = 10_000;

const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("referrer-policy", "same-origin"),
    ("content-security-policy", "default-src 'self'; style-src 'self' 'unsafe-inline'"),
];

// =============================================================================
// Upload Throttling
// =============================================================================

/// Per-client limiter for `POST /upload`.
///
/// Clients are keyed by peer address. `X-Forwarded-For` is only consulted
/// when the server sits behind a trusted proxy; otherwise any client could
/// pick a fresh key per request.
pub struct UploadThrottle {
    limiter: DefaultKeyedRateLimiter<IpAddr>,
    trust_forwarded_for: bool,
}

impl UploadThrottle {
    /// Zero requests per second is treated as one.
    pub fn new(requests_per_second: u32, trust_forwarded_for: bool) -> Self {
        let rate = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::keyed(Quota::per_second(rate)),
            trust_forwarded_for,
        }
    }

    /// Admit one request from `client`.
    pub fn admit(&self, client: IpAddr) -> bool {
        if self.limiter.len() >= SWEEP_THRESHOLD {
            self.limiter.retain_recent();
        }
        self.limiter.check_key(&client).is_ok()
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }

    /// Resolve the key a request is throttled under.
    pub fn client_key(&self, headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<IpAddr> {
        if self.trust_forwarded_for {
            if let Some(ip) = forwarded_for(headers) {
                return Some(ip);
            }
        }
        peer.map(|addr| addr.ip())
    }
}

/// First address of `X-Forwarded-For`, as appended by the nearest proxy.
fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}

/// Reject uploads from clients over their quota.
///
/// Requests without a resolvable client address pass through.
pub async fn throttle_uploads(
    State(throttle): State<Arc<UploadThrottle>>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    if let Some(client) = throttle.client_key(request.headers(), peer) {
        if !throttle.admit(client) {
            warn!(client = %client, "Upload rate limit exceeded");
            metrics::record_rate_limit_hit(request.uri().path());
            return (
                StatusCode::TOO_MANY_REQUESTS,
                [("retry-after", "1")],
                "Too many uploads. Please try again later.",
            )
                .into_response();
        }
    }

    next.run(request).await
}

// =============================================================================
// Headers & Tracing
// =============================================================================

/// Add security headers to every response.
pub async fn security_headers(request: Request<Body>, next: Next) -> Response<Body> {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    for &(name, value) in SECURITY_HEADERS {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    response
}

/// CORS for the configured origins. `*` allows any origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| HeaderValue::from_str(o).ok()))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
}

/// Span for one HTTP request, tagged with the id set by `SetRequestIdLayer`.
pub fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}
