//! Request handling and transformation.
//!
//! # Responsibilities
//! - Build the upstream URL from the endpoint target and the path suffix
//! - Prepare request headers for forwarding to the upstream
//! - Refuse paths whose dot segments would escape the target's base path
//!
//! # Design Decisions
//! - The path suffix is appended as received (already percent-encoded)
//! - Original request preserved for logging; modified copy forwarded

use std::net::SocketAddr;

use axum::http::header::HOST;
use axum::http::HeaderMap;
use url::Url;

use crate::http::cookies::rewrite_request_cookies;
use crate::routing::ProxyEndpoint;
use crate::security::headers::{append_forwarded, strip_hop_by_hop};

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Upstream URL for a request: target + path suffix + query.
pub fn upstream_url(target: &Url, path_info: &str, query: Option<&str>) -> String {
    let mut url = target.as_str().trim_end_matches('/').to_string();
    url.push_str(path_info);
    if let Some(query) = query {
        url.push('?');
        url.push_str(query);
    }
    url
}

/// True if `path` has a `.` or `..` segment, literal or percent-encoded.
///
/// Such paths are refused: the upstream URL parser would resolve them and
/// could leave the target's base path.
pub fn has_dot_segment(path: &str) -> bool {
    path.split(['/', '\\']).any(|segment| {
        let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
        decoded == "." || decoded == ".."
    })
}

/// Headers to send upstream for a client request.
pub fn upstream_headers(
    original: &HeaderMap,
    endpoint: &ProxyEndpoint,
    client: SocketAddr,
    scheme: &str,
) -> HeaderMap {
    let mut headers = original.clone();
    strip_hop_by_hop(&mut headers);

    if !endpoint.options.preserve_host {
        // The client fills in the target authority.
        headers.remove(HOST);
    }
    rewrite_request_cookies(&mut headers, endpoint);
    if endpoint.options.forward_ip {
        append_forwarded(&mut headers, client, scheme);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForwardOptions;
    use crate::routing::{EndpointId, PathPattern};
    use axum::http::HeaderValue;

    fn endpoint(options: ForwardOptions) -> ProxyEndpoint {
        ProxyEndpoint {
            id: EndpointId::for_key("svcA"),
            key: "svcA".into(),
            name: "svcA".into(),
            pattern: PathPattern::parse("/api/a/*").unwrap(),
            target: "http://localhost:9001".parse().unwrap(),
            options,
        }
    }

    #[test]
    fn test_upstream_url() {
        let root: Url = "http://localhost:9001".parse().unwrap();
        assert_eq!(upstream_url(&root, "/widgets", None), "http://localhost:9001/widgets");
        assert_eq!(
            upstream_url(&root, "/widgets", Some("page=2")),
            "http://localhost:9001/widgets?page=2"
        );
        assert_eq!(upstream_url(&root, "", None), "http://localhost:9001");

        let based: Url = "http://localhost:9001/base/".parse().unwrap();
        assert_eq!(upstream_url(&based, "/x%20y", None), "http://localhost:9001/base/x%20y");
        assert_eq!(upstream_url(&based, "", None), "http://localhost:9001/base");
    }

    #[test]
    fn test_dot_segments() {
        for path in ["/svc/../admin", "/svc/%2e%2e/secret", "/svc/%2E./x", "/svc/.", "/a/..\\b"] {
            assert!(has_dot_segment(path), "{path}");
        }
        for path in ["/svc/a..b", "/svc/.hidden", "/svc/%2e%2ex", "/", ""] {
            assert!(!has_dot_segment(path), "{path}");
        }
    }

    #[test]
    fn test_host_dropped_unless_preserved() {
        let client: SocketAddr = "127.0.0.1:4000".parse().unwrap();
        let mut original = HeaderMap::new();
        original.insert(HOST, HeaderValue::from_static("proxy.example.com"));
        original.insert("accept", HeaderValue::from_static("text/plain"));

        let headers = upstream_headers(&original, &endpoint(ForwardOptions::default()), client, "http");
        assert!(headers.get(HOST).is_none());
        assert_eq!(headers.get("accept").unwrap(), "text/plain");
        assert_eq!(headers.get("x-forwarded-for").unwrap(), "127.0.0.1");
        assert_eq!(headers.get("x-forwarded-proto").unwrap(), "http");

        let options = ForwardOptions {
            preserve_host: true,
            forward_ip: false,
            ..Default::default()
        };
        let headers = upstream_headers(&original, &endpoint(options), client, "http");
        assert_eq!(headers.get(HOST).unwrap(), "proxy.example.com");
        assert!(headers.get("x-forwarded-for").is_none());
    }
}
