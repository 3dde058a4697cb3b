use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use proxy_mounts::config::{load_config, ObservabilityConfig};
use proxy_mounts::lifecycle::{signals, startup, Shutdown};
use proxy_mounts::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "proxy-mounts", version)]
#[command(about = "Mount reverse-proxy endpoints from a configuration file", long_about = None)]
struct Cli {
    /// Configuration file (TOML).
    #[arg(short, long, env = "PROXY_MOUNTS_CONFIG", default_value = "proxy.toml")]
    config: PathBuf,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Validate the configuration and register endpoints, then exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            let _ = init_logging(&ObservabilityConfig::default());
            tracing::error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    if let Err(e) = init_logging(&config.observability) {
        eprintln!("failed to initialize logging: {e}");
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config.display(),
        "proxy-mounts starting"
    );

    let server = match startup::prepare(config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    if cli.check {
        for endpoint in server.routes().endpoints() {
            tracing::info!(
                id = %endpoint.id,
                path = %endpoint.pattern,
                target = %endpoint.target,
                "Mounted"
            );
        }
        tracing::info!(endpoints = server.routes().len(), "Configuration OK");
        return ExitCode::SUCCESS;
    }

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    if let Err(e) = startup::serve(server, &shutdown).await {
        tracing::error!(error = %e, "Proxy stopped with an error");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
