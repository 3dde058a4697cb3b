//! Configuration-driven reverse-proxy mounts.
//!
//! Each `[proxy.servers.<key>]` entry of the configuration becomes one
//! forwarding endpoint, mounted at its path pattern before the listener
//! accepts connections.
//!
//! ```text
//!   proxy.toml ──▶ config ──▶ ProxyDefinition map
//!                                   │
//!                                   ▼
//!                         routing::registrar ──▶ RouteTable (frozen)
//!                                                     │
//!   Client ──▶ http::server ──▶ http::proxy ──lookup──┘
//!                                   │
//!                                   ▼
//!                              upstream target
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::{ProxyConfig, ProxyDefinition};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{RegistrationError, RouteTable};
