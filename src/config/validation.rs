//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check required fields of every proxy definition
//! - Validate listener settings
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Target URLs and path patterns are checked by the registrar, not here

use std::collections::BTreeMap;
use std::net::SocketAddr;

use crate::config::definition::ProxyDefinition;
use crate::config::schema::{ProxyConfig, ProxySection, ServerConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("proxy.servers.{key}: missing required field `{field}`")]
    MissingField { key: String, field: &'static str },

    #[error("proxy.servers.{key}: field `{field}` must not be empty")]
    EmptyField { key: String, field: &'static str },

    #[error("proxy.servers contains an entry with an empty key")]
    EmptyKey,

    #[error("listener.bind_address `{0}` is not a valid socket address")]
    BindAddress(String),

    #[error("listener.max_connections must be greater than zero")]
    MaxConnections,

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Validate the whole configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::MaxConnections);
    }
    for (field, secs) in [
        ("connect_secs", config.timeouts.connect_secs),
        ("request_secs", config.timeouts.request_secs),
        ("idle_secs", config.timeouts.idle_secs),
    ] {
        if secs == 0 {
            errors.push(ValidationError::ZeroTimeout(field));
        }
    }
    if let Err(definition_errors) = config.proxy.definitions() {
        errors.extend(definition_errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

impl ProxySection {
    /// Turn the raw `servers` map into validated definitions.
    pub fn definitions(&self) -> Result<BTreeMap<String, ProxyDefinition>, Vec<ValidationError>> {
        let mut definitions = BTreeMap::new();
        let mut errors = Vec::new();

        for (key, server) in &self.servers {
            match definition_from(key, server) {
                Ok(def) => {
                    definitions.insert(key.clone(), def);
                }
                Err(mut e) => errors.append(&mut e),
            }
        }

        if errors.is_empty() {
            Ok(definitions)
        } else {
            Err(errors)
        }
    }
}

fn definition_from(key: &str, server: &ServerConfig) -> Result<ProxyDefinition, Vec<ValidationError>> {
    if key.trim().is_empty() {
        return Err(vec![ValidationError::EmptyKey]);
    }

    let mut errors = Vec::new();
    let path = required(key, "path", server.path.as_deref(), &mut errors);
    let target = required(key, "target", server.target.as_deref(), &mut errors);

    match (path, target) {
        (Some(path), Some(target)) => Ok(ProxyDefinition {
            key: key.to_string(),
            path: path.to_string(),
            target: target.to_string(),
            name: server.name.clone(),
            options: server.options(),
        }),
        _ => Err(errors),
    }
}

fn required<'a>(
    key: &str,
    field: &'static str,
    value: Option<&'a str>,
    errors: &mut Vec<ValidationError>,
) -> Option<&'a str> {
    match value.map(str::trim) {
        None => {
            errors.push(ValidationError::MissingField { key: key.to_string(), field });
            None
        }
        Some("") => {
            errors.push(ValidationError::EmptyField { key: key.to_string(), field });
            None
        }
        Some(v) => Some(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(path: Option<&str>, target: Option<&str>) -> ServerConfig {
        ServerConfig {
            path: path.map(String::from),
            target: target.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_target_names_key_and_field() {
        let mut config = ProxyConfig::default();
        config.proxy.servers.insert("svcA".into(), server(Some("/a/*"), None));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::MissingField { key: "svcA".into(), field: "target" }]
        );
        assert!(errors[0].to_string().contains("svcA"));
        assert!(errors[0].to_string().contains("`target`"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ProxyConfig::default();
        config.listener.max_connections = 0;
        config.proxy.servers.insert("a".into(), server(None, None));
        config.proxy.servers.insert("b".into(), server(Some(" "), Some("http://x")));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::MaxConnections));
        assert!(errors.contains(&ValidationError::EmptyField { key: "b".into(), field: "path" }));
    }

    #[test]
    fn test_definitions_keep_options_and_name() {
        let mut section = ProxySection::default();
        let mut raw = server(Some("/a/*"), Some("http://localhost:9001"));
        raw.name = Some("Service A".into());
        raw.preserve_host = true;
        section.servers.insert("svcA".into(), raw);

        let defs = section.definitions().unwrap();
        let def = &defs["svcA"];
        assert_eq!(def.key, "svcA");
        assert_eq!(def.display_name(), "Service A");
        assert!(def.options.preserve_host);
        assert!(def.options.preserve_cookies);
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = ProxyConfig::default();
        config.timeouts.request_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::ZeroTimeout("request_secs")]);
    }

    #[test]
    fn test_bad_bind_address() {
        let mut config = ProxyConfig::default();
        config.listener.bind_address = "localhost".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::BindAddress("localhost".into())]);
    }
}
