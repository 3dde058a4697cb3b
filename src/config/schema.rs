//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Proxy definitions (`[proxy.servers.<key>]` tables).
    pub proxy: ProxySection,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,

    /// Maximum concurrent in-flight requests (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
            max_connections: 10_000,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// The `proxy` section.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ProxySection {
    /// Proxy definitions keyed by an arbitrary identifier.
    pub servers: BTreeMap<String, ServerConfig>,
}

/// A single proxy definition as written in the config file.
///
/// `path` and `target` are required but kept optional here so that a missing
/// field is reported with the key it belongs to. Unknown keys are rejected,
/// so a misspelt option fails to parse instead of falling back to its default.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// URL path pattern routed to this definition (e.g. `/api/a/*`).
    pub path: Option<String>,

    /// Absolute base URL requests are forwarded to.
    pub target: Option<String>,

    /// Display name; the key is used when absent.
    pub name: Option<String>,

    pub log: bool,
    pub preserve_cookies: bool,
    pub preserve_cookie_path: bool,
    pub preserve_host: bool,
    pub handle_redirects: bool,
    pub forward_ip: bool,
}

impl ServerConfig {
    /// Forwarding options of this entry.
    pub fn options(&self) -> ForwardOptions {
        ForwardOptions {
            log: self.log,
            preserve_cookies: self.preserve_cookies,
            preserve_cookie_path: self.preserve_cookie_path,
            preserve_host: self.preserve_host,
            handle_redirects: self.handle_redirects,
            forward_ip: self.forward_ip,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        let options = ForwardOptions::default();
        Self {
            path: None,
            target: None,
            name: None,
            log: options.log,
            preserve_cookies: options.preserve_cookies,
            preserve_cookie_path: options.preserve_cookie_path,
            preserve_host: options.preserve_host,
            handle_redirects: options.handle_redirects,
            forward_ip: options.forward_ip,
        }
    }
}

/// Options handed to the forwarding layer for one endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardOptions {
    /// Log every forwarded request.
    pub log: bool,

    /// Pass cookie names through unchanged.
    pub preserve_cookies: bool,

    /// Keep the `Path` attribute of `Set-Cookie` as sent by the target.
    pub preserve_cookie_path: bool,

    /// Forward the client's `Host` header instead of the target's authority.
    pub preserve_host: bool,

    /// Follow redirects from the target instead of relaying them.
    pub handle_redirects: bool,

    /// Add `X-Forwarded-For` and `X-Forwarded-Proto`.
    pub forward_ip: bool,
}

impl Default for ForwardOptions {
    fn default() -> Self {
        Self {
            log: true,
            preserve_cookies: true,
            preserve_cookie_path: true,
            preserve_host: false,
            handle_redirects: false,
            forward_ip: true,
        }
    }
}

/// Timeout configuration for upstream calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Time allowed until the upstream response head arrives, in seconds.
    pub request_secs: u64,

    /// Idle pooled connection timeout in seconds.
    pub idle_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
            idle_secs: 60,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
