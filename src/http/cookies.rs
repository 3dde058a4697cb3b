//! Cookie rewriting between client and upstream.
//!
//! With `preserve_cookies` off, cookies set by the upstream are renamed with
//! the endpoint prefix (`!Proxy!<name>`), and only prefixed cookies are sent
//! back upstream, with the prefix removed. This keeps cookies of different
//! upstreams apart on the client.
//!
//! `Set-Cookie` always loses its `Domain` attribute, which names the upstream
//! host. Its `Path` is kept when `preserve_cookie_path` is on and the upstream
//! sent one; otherwise it becomes the endpoint's mount path.

use axum::http::header::COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use cookie::Cookie;

use crate::routing::ProxyEndpoint;

/// Filter and unprefix the `Cookie` headers of a request going upstream.
pub fn rewrite_request_cookies(headers: &mut HeaderMap, endpoint: &ProxyEndpoint) {
    if endpoint.options.preserve_cookies {
        return;
    }

    let prefix = endpoint.cookie_prefix();
    let kept: Vec<String> = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            let name = name.strip_prefix(prefix.as_str())?;
            Some(format!("{name}={value}"))
        })
        .collect();

    headers.remove(COOKIE);
    if kept.is_empty() {
        return;
    }
    if let Ok(value) = HeaderValue::from_str(&kept.join("; ")) {
        headers.insert(COOKIE, value);
    }
}

/// Rewrite one `Set-Cookie` value coming back from upstream.
///
/// Values that do not parse as a cookie are passed through unchanged.
pub fn rewrite_set_cookie(value: &HeaderValue, endpoint: &ProxyEndpoint) -> HeaderValue {
    let Ok(raw) = value.to_str() else {
        return value.clone();
    };
    let Ok(mut cookie) = Cookie::parse(raw.to_owned()) else {
        return value.clone();
    };

    if !endpoint.options.preserve_cookies {
        let name = format!("{}{}", endpoint.cookie_prefix(), cookie.name());
        cookie.set_name(name);
    }

    let keep_path = endpoint.options.preserve_cookie_path && cookie.path().is_some();
    if !keep_path {
        cookie.set_path(endpoint.pattern.mount_path().to_string());
    }
    cookie.unset_domain();

    HeaderValue::from_str(&cookie.to_string()).unwrap_or_else(|_| value.clone())
}
