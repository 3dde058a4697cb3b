//! Route table and lookup.
//!
//! # Responsibilities
//! - Store mounted endpoints
//! - Reject duplicate identifiers, names and patterns
//! - Look up the endpoint for a request path
//!
//! # Design Decisions
//! - Immutable after startup (shared via Arc, no locks)
//! - O(n) scan (acceptable for typical endpoint counts)
//! - Exact mappings win, then the longest prefix, then the catch-all
//! - Explicit NoMatch rather than silent default
//! - Names are unique: they label metrics and prefix cookies

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::ProxyDefinition;
use crate::routing::endpoint::{EndpointId, ProxyEndpoint};
use crate::routing::matcher::PathPattern;
use crate::routing::registrar::{register_all, RegistrationError};

/// Something endpoints can be mounted into.
pub trait RoutingTarget {
    /// Attach an endpoint at its pattern.
    fn mount(&mut self, endpoint: ProxyEndpoint) -> Result<(), RegistrationError>;
}

/// Result of a successful lookup.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub endpoint: &'a Arc<ProxyEndpoint>,
    /// Request path with the mapped portion removed.
    pub path_info: &'a str,
}

/// The set of mounted proxy endpoints.
#[derive(Debug, Default)]
pub struct RouteTable {
    endpoints: Vec<Arc<ProxyEndpoint>>,
}

impl RouteTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every definition into a fresh table.
    ///
    /// Either all definitions are mounted or none: on error the partially
    /// filled table is dropped.
    pub fn build(definitions: &BTreeMap<String, ProxyDefinition>) -> Result<Self, RegistrationError> {
        let mut table = Self::new();
        register_all(definitions, &mut table)?;
        Ok(table)
    }

    /// Find the endpoint responsible for `path`.
    pub fn lookup<'a>(&'a self, path: &'a str) -> Option<RouteMatch<'a>> {
        let mut best: Option<(usize, RouteMatch<'a>)> = None;

        for endpoint in &self.endpoints {
            let Some(path_info) = endpoint.pattern.path_info(path) else {
                continue;
            };
            let rank = match &endpoint.pattern {
                PathPattern::Exact(_) => usize::MAX,
                PathPattern::Prefix(prefix) => prefix.len(),
            };
            if best.as_ref().map_or(true, |(r, _)| rank > *r) {
                best = Some((rank, RouteMatch { endpoint, path_info }));
            }
        }

        best.map(|(_, m)| m)
    }

    /// Get a mounted endpoint by identifier.
    pub fn get(&self, id: &EndpointId) -> Option<&Arc<ProxyEndpoint>> {
        self.endpoints.iter().find(|e| &e.id == id)
    }

    /// All mounted endpoints, in registration order.
    pub fn endpoints(&self) -> impl Iterator<Item = &Arc<ProxyEndpoint>> {
        self.endpoints.iter()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

impl RoutingTarget for RouteTable {
    fn mount(&mut self, endpoint: ProxyEndpoint) -> Result<(), RegistrationError> {
        if self.get(&endpoint.id).is_some() {
            return Err(RegistrationError::DuplicateRegistration {
                key: endpoint.key,
                id: endpoint.id,
            });
        }

        for existing in &self.endpoints {
            if existing.pattern == endpoint.pattern {
                return Err(RegistrationError::DuplicateRoute {
                    key: endpoint.key,
                    path: endpoint.pattern.to_string(),
                    existing: existing.key.clone(),
                });
            }
            if existing.name == endpoint.name {
                return Err(RegistrationError::DuplicateName {
                    key: endpoint.key,
                    name: endpoint.name,
                    existing: existing.key.clone(),
                });
            }
            if !existing.pattern.is_catch_all()
                && !endpoint.pattern.is_catch_all()
                && existing.pattern.overlaps(&endpoint.pattern)
            {
                tracing::warn!(
                    endpoint = %endpoint.name,
                    path = %endpoint.pattern,
                    other = %existing.name,
                    other_path = %existing.pattern,
                    "Overlapping proxy paths; the more specific mapping wins"
                );
            }
        }

        self.endpoints.push(Arc::new(endpoint));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForwardOptions;

    fn endpoint(key: &str, pattern: &str) -> ProxyEndpoint {
        ProxyEndpoint {
            id: EndpointId::for_key(key),
            key: key.to_string(),
            name: key.to_string(),
            pattern: PathPattern::parse(pattern).unwrap(),
            target: "http://localhost:9001".parse().unwrap(),
            options: ForwardOptions::default(),
        }
    }

    #[test]
    fn test_lookup_prefers_exact_then_longest_prefix() {
        let mut table = RouteTable::new();
        table.mount(endpoint("all", "/*")).unwrap();
        table.mount(endpoint("api", "/api/*")).unwrap();
        table.mount(endpoint("api_a", "/api/a/*")).unwrap();
        table.mount(endpoint("status", "/api/a/status")).unwrap();

        let m = table.lookup("/api/a/widgets").unwrap();
        assert_eq!(m.endpoint.key, "api_a");
        assert_eq!(m.path_info, "/widgets");

        assert_eq!(table.lookup("/api/b").unwrap().endpoint.key, "api");
        assert_eq!(table.lookup("/api/a/status").unwrap().endpoint.key, "status");
        assert_eq!(table.lookup("/elsewhere").unwrap().endpoint.key, "all");
    }

    #[test]
    fn test_no_match() {
        let mut table = RouteTable::new();
        table.mount(endpoint("api", "/api/*")).unwrap();
        assert!(table.lookup("/other").is_none());
        assert!(table.lookup("/apix").is_none());
    }

    #[test]
    fn test_duplicate_route_rejected() {
        let mut table = RouteTable::new();
        table.mount(endpoint("a", "/x/*")).unwrap();

        let err = table.mount(endpoint("b", "/x/*")).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::DuplicateRoute { ref key, ref existing, .. } if key == "b" && existing == "a"
        ));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_catch_all_spellings_conflict() {
        let mut table = RouteTable::new();
        table.mount(endpoint("a", "/")).unwrap();
        assert!(matches!(
            table.mount(endpoint("b", "/*")),
            Err(RegistrationError::DuplicateRoute { .. })
        ));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut table = RouteTable::new();
        let mut a = endpoint("a", "/a/*");
        a.name = "Shared".into();
        table.mount(a).unwrap();

        let mut b = endpoint("b", "/b/*");
        b.name = "Shared".into();
        let err = table.mount(b).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::DuplicateName { ref key, ref existing, .. } if key == "b" && existing == "a"
        ));
        assert!(table.lookup("/b/1").is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut table = RouteTable::new();
        table.mount(endpoint("a", "/x/*")).unwrap();

        let err = table.mount(endpoint("a", "/y/*")).unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateRegistration { .. }));
        assert!(table.lookup("/y/1").is_none());
    }
}
