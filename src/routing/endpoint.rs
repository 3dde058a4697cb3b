//! Forwarding endpoint descriptors.

use std::fmt;

use url::Url;

use crate::config::ForwardOptions;
use crate::routing::matcher::PathPattern;

/// Internal identifier of a mounted endpoint, derived from the config key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EndpointId(String);

impl EndpointId {
    /// Identifier for the endpoint registered from `key`.
    pub fn for_key(key: &str) -> Self {
        Self(format!("{key}ProxyEndpoint"))
    }

    /// Get the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A configured forwarding endpoint, ready to be mounted.
#[derive(Debug, Clone)]
pub struct ProxyEndpoint {
    /// Internal identifier.
    pub id: EndpointId,
    /// Config key the endpoint was built from.
    pub key: String,
    /// Display name for logs and metrics.
    pub name: String,
    /// Route pattern the endpoint is mounted at.
    pub pattern: PathPattern,
    /// Upstream base URL.
    pub target: Url,
    /// Forwarding behaviour.
    pub options: ForwardOptions,
}

impl ProxyEndpoint {
    /// Prefix applied to cookie names when cookies are not preserved.
    pub fn cookie_prefix(&self) -> String {
        format!("!Proxy!{}", self.name)
    }
}
