//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration and extract proxy definitions
//! - Register every endpoint into the route table
//! - Start the metrics exporter when enabled
//! - Bind listeners and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listeners start last (traffic only when every endpoint is mounted)

use std::net::SocketAddr;

use metrics_exporter_prometheus::BuildError;
use tokio::net::TcpListener;

use crate::config::validation::validate_config;
use crate::config::{ConfigError, ProxyConfig};
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::net::tls::load_tls_config;
use crate::observability::metrics;
use crate::routing::{RegistrationError, RouteTable};

/// Error that prevents the proxy from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] BuildError),

    #[error("invalid address `{0}`")]
    Address(String),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("failed to load TLS material: {0}")]
    Tls(std::io::Error),

    #[error("server error: {0}")]
    Serve(std::io::Error),
}

/// Validate the configuration, register all endpoints and build the server.
///
/// Nothing is bound yet; the returned server owns a complete route table.
pub fn prepare(config: ProxyConfig) -> Result<HttpServer, StartupError> {
    validate_config(&config).map_err(ConfigError::Validation)?;
    let definitions = config
        .proxy
        .definitions()
        .map_err(ConfigError::Validation)?;

    if definitions.is_empty() {
        tracing::warn!("No proxy servers configured; every request will return 404");
    }

    let routes = RouteTable::build(&definitions)?;
    tracing::info!(endpoints = routes.len(), "Proxy endpoints registered");

    Ok(HttpServer::new(config, routes)?)
}

/// Start the metrics exporter, bind the listener and serve until shutdown.
pub async fn serve(server: HttpServer, shutdown: &Shutdown) -> Result<(), StartupError> {
    let observability = server.config().observability.clone();
    if observability.metrics_enabled {
        let addr = parse_addr(&observability.metrics_address)?;
        metrics::init_metrics(addr)?;
        metrics::record_registered_endpoints(server.routes().len());
    }

    let listener_config = server.config().listener.clone();
    match &listener_config.tls {
        Some(tls) => {
            let addr = parse_addr(&listener_config.bind_address)?;
            let tls = load_tls_config(tls).await.map_err(StartupError::Tls)?;
            server
                .run_tls(addr, tls, shutdown.subscribe())
                .await
                .map_err(StartupError::Serve)
        }
        None => {
            let listener = TcpListener::bind(&listener_config.bind_address)
                .await
                .map_err(|source| StartupError::Bind {
                    address: listener_config.bind_address.clone(),
                    source,
                })?;
            server
                .run(listener, shutdown.subscribe())
                .await
                .map_err(StartupError::Serve)
        }
    }
}

fn parse_addr(raw: &str) -> Result<SocketAddr, StartupError> {
    raw.parse()
        .map_err(|_| StartupError::Address(raw.to_string()))
}
