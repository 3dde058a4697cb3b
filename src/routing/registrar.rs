//! Startup registration of proxy endpoints.
//!
//! Turns each [`ProxyDefinition`] into a [`ProxyEndpoint`] and mounts it
//! into a [`RoutingTarget`]. Runs once, before the listener is bound.

use std::collections::BTreeMap;

use url::Url;

use crate::config::ProxyDefinition;
use crate::routing::endpoint::{EndpointId, ProxyEndpoint};
use crate::routing::matcher::{PathPattern, PatternError};
use crate::routing::router::RoutingTarget;

/// Error raised while registering a single definition.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("proxy `{key}`: target `{target}` is not a valid URL: {reason}")]
    InvalidTarget {
        key: String,
        target: String,
        reason: String,
    },

    #[error("proxy `{key}`: path `{path}` is not a valid mapping: {source}")]
    InvalidPath {
        key: String,
        path: String,
        source: PatternError,
    },

    #[error("proxy `{key}`: endpoint `{id}` is already registered")]
    DuplicateRegistration { key: String, id: EndpointId },

    #[error("proxy `{key}`: name `{name}` is already used by proxy `{existing}`")]
    DuplicateName {
        key: String,
        name: String,
        existing: String,
    },

    #[error("proxy `{key}`: path `{path}` is already mapped by proxy `{existing}`")]
    DuplicateRoute {
        key: String,
        path: String,
        existing: String,
    },
}

impl RegistrationError {
    /// Config key of the definition that failed.
    pub fn key(&self) -> &str {
        match self {
            RegistrationError::InvalidTarget { key, .. }
            | RegistrationError::InvalidPath { key, .. }
            | RegistrationError::DuplicateRegistration { key, .. }
            | RegistrationError::DuplicateName { key, .. }
            | RegistrationError::DuplicateRoute { key, .. } => key,
        }
    }
}

/// Register every definition. Stops at the first failure.
pub fn register_all<T: RoutingTarget>(
    definitions: &BTreeMap<String, ProxyDefinition>,
    target: &mut T,
) -> Result<usize, RegistrationError> {
    for (key, definition) in definitions {
        register(target, key, definition)?;
    }
    Ok(definitions.len())
}

/// Build the endpoint for one definition and mount it.
pub fn register<T: RoutingTarget>(
    target: &mut T,
    key: &str,
    definition: &ProxyDefinition,
) -> Result<EndpointId, RegistrationError> {
    let endpoint = build_endpoint(key, definition)?;
    let id = endpoint.id.clone();

    tracing::info!(
        name = %endpoint.name,
        path = %definition.path,
        target = %endpoint.target,
        "Registering proxy endpoint"
    );

    target.mount(endpoint)?;
    Ok(id)
}

/// Build the endpoint for one definition without mounting it.
pub fn build_endpoint(key: &str, definition: &ProxyDefinition) -> Result<ProxyEndpoint, RegistrationError> {
    let pattern = PathPattern::parse(&definition.path).map_err(|source| RegistrationError::InvalidPath {
        key: key.to_string(),
        path: definition.path.clone(),
        source,
    })?;

    let target = parse_target(&definition.target).map_err(|reason| RegistrationError::InvalidTarget {
        key: key.to_string(),
        target: definition.target.clone(),
        reason,
    })?;

    Ok(ProxyEndpoint {
        id: EndpointId::for_key(key),
        key: key.to_string(),
        name: definition.display_name().to_string(),
        pattern,
        target,
        options: definition.options,
    })
}

fn parse_target(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme `{}`", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err("query and fragment are not allowed".to_string());
    }
    Ok(url)
}
