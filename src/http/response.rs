//! Response handling and transformation.
//!
//! # Responsibilities
//! - Transform upstream response headers for the client
//! - Rewrite `Set-Cookie` headers for the endpoint
//! - Map upstream failures to gateway status codes
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body
//! - Hop-by-hop headers stripped automatically
//! - `Location` is relayed unmodified
//! - Upstream timeouts result in 504 Gateway Timeout

use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::http::cookies::rewrite_set_cookie;
use crate::routing::ProxyEndpoint;
use crate::security::headers::strip_hop_by_hop;

/// Rewrite upstream response headers in place.
pub fn rewrite_response_headers(headers: &mut HeaderMap, endpoint: &ProxyEndpoint) {
    strip_hop_by_hop(headers);

    let cookies: Vec<HeaderValue> = headers
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| rewrite_set_cookie(v, endpoint))
        .collect();
    if cookies.is_empty() {
        return;
    }

    headers.remove(SET_COOKIE);
    for cookie in cookies {
        headers.append(SET_COOKIE, cookie);
    }
}

/// Response sent when the upstream could not be reached.
pub fn upstream_error(timed_out: bool) -> Response {
    if timed_out {
        (StatusCode::GATEWAY_TIMEOUT, "Upstream request timed out").into_response()
    } else {
        (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
    }
}
