//! Request forwarding.
//!
//! # Responsibilities
//! - Dispatch requests through the route table
//! - Send the rewritten request to the endpoint's target
//! - Stream the upstream response back to the client
//!
//! # Design Decisions
//! - Bodies are streamed in both directions, never buffered
//! - Redirects are relayed unless the endpoint asks to follow them
//! - The timeout covers the upstream response head only

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::{Body, HttpBody},
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};
use reqwest::redirect;

use crate::config::TimeoutConfig;
use crate::http::request::{has_dot_segment, upstream_headers, upstream_url, X_REQUEST_ID};
use crate::http::response::{rewrite_response_headers, upstream_error};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::ProxyEndpoint;

/// Maximum redirects followed for endpoints with `handle_redirects`.
const MAX_REDIRECTS: usize = 10;

/// Upstream HTTP clients shared by all endpoints.
#[derive(Clone)]
pub struct Forwarder {
    /// Relays 3xx responses to the client.
    relaying: reqwest::Client,
    /// Follows 3xx responses itself.
    following: reqwest::Client,
    request_timeout: Duration,
}

impl Forwarder {
    /// Create the upstream clients.
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, reqwest::Error> {
        let builder = || {
            reqwest::Client::builder()
                .connect_timeout(Duration::from_secs(timeouts.connect_secs))
                .pool_idle_timeout(Duration::from_secs(timeouts.idle_secs))
                .referer(false)
                .no_proxy()
        };

        Ok(Self {
            relaying: builder().redirect(redirect::Policy::none()).build()?,
            following: builder().redirect(redirect::Policy::limited(MAX_REDIRECTS)).build()?,
            request_timeout: Duration::from_secs(timeouts.request_secs),
        })
    }

    /// Forward one request to `endpoint`.
    pub async fn forward(
        &self,
        endpoint: &ProxyEndpoint,
        path_info: &str,
        client: SocketAddr,
        scheme: &str,
        request: Request<Body>,
    ) -> Response {
        let start_time = Instant::now();
        let (parts, body) = request.into_parts();

        let url = upstream_url(&endpoint.target, path_info, parts.uri.query());
        let headers = upstream_headers(&parts.headers, endpoint, client, scheme);
        let request_id = parts
            .headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown");

        if endpoint.options.log {
            tracing::info!(
                request_id = %request_id,
                endpoint = %endpoint.name,
                method = %parts.method,
                uri = %parts.uri,
                upstream = %url,
                "Proxying request"
            );
        }

        let http = if endpoint.options.handle_redirects {
            &self.following
        } else {
            &self.relaying
        };
        let mut upstream = http.request(parts.method.clone(), &url).headers(headers);
        if !(body.is_end_stream() || body.size_hint().exact() == Some(0)) {
            upstream = upstream.body(reqwest::Body::wrap_stream(body.into_data_stream()));
        }

        let method = parts.method.as_str();
        let result = match tokio::time::timeout(self.request_timeout, upstream.send()).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(request_id = %request_id, endpoint = %endpoint.name, upstream = %url, "Upstream timed out");
                metrics::record_request(&endpoint.name, method, 504, start_time);
                return upstream_error(true);
            }
        };

        match result {
            Ok(response) => {
                let status = response.status();
                let mut headers = response.headers().clone();
                rewrite_response_headers(&mut headers, endpoint);

                tracing::debug!(
                    request_id = %request_id,
                    endpoint = %endpoint.name,
                    status = %status,
                    "Upstream responded"
                );
                metrics::record_request(&endpoint.name, method, status.as_u16(), start_time);

                let mut proxied = Response::new(Body::from_stream(response.bytes_stream()));
                *proxied.status_mut() = status;
                *proxied.headers_mut() = headers;
                proxied
            }
            Err(e) => {
                tracing::error!(
                    request_id = %request_id,
                    endpoint = %endpoint.name,
                    upstream = %url,
                    error = %e,
                    "Upstream error"
                );
                let timed_out = e.is_timeout();
                metrics::record_request(&endpoint.name, method, if timed_out { 504 } else { 502 }, start_time);
                upstream_error(timed_out)
            }
        }
    }
}

/// Main proxy handler.
/// Looks up the endpoint for the path and forwards the request to it.
pub async fn proxy_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let path = request.uri().path().to_string();
    if has_dot_segment(&path) {
        tracing::warn!(path = %path, "Rejected path with dot segments");
        return StatusCode::BAD_REQUEST.into_response();
    }

    let (endpoint, path_info) = match state.routes.lookup(&path) {
        Some(route) => (Arc::clone(route.endpoint), route.path_info.to_string()),
        None => {
            tracing::debug!(path = %path, "No proxy endpoint matched");
            return StatusCode::NOT_FOUND.into_response();
        }
    };

    state
        .forwarder
        .forward(&endpoint, &path_info, addr, state.scheme, request)
        .await
}
