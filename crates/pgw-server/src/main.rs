//! pgw-server: policy-gated forwarding gateway.
//!
//! Listens on a configured port, asks the policy authority about every
//! inbound request, and relays approved requests (credential attached) to
//! the backend. Everything else is a 403.

use clap::Parser;
use pgw_server::config::GatewayConfig;
use pgw_server::gateway::{router, GatewayState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// pgw-server — policy-gated forwarding gateway
#[derive(Parser, Debug)]
#[command(name = "pgw-server", version, about = "Policy-gated forwarding gateway")]
struct Cli {
    /// Listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Backend base URL
    #[arg(long)]
    backend_url: Option<String>,

    /// Policy authority check endpoint URL
    #[arg(long)]
    authority_url: Option<String>,

    /// Authority call timeout in seconds
    #[arg(long)]
    authority_timeout: Option<u64>,

    /// Config file path
    #[arg(long, default_value = "~/.pgw/config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    use tracing_subscriber::EnvFilter;
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    // Load config (file + CLI overrides)
    let config_path = PathBuf::from(&cli.config);
    let config = match GatewayConfig::load(
        Some(&config_path),
        cli.port,
        cli.backend_url.as_deref(),
        cli.authority_url.as_deref(),
        cli.authority_timeout,
    ) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "failed to load config");
            std::process::exit(1);
        }
    };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = config.port,
        backend = %config.backend_url,
        authority = %config.authority_url,
        "starting pgw-server"
    );

    let state = match GatewayState::new(&config) {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to create gateway state");
            std::process::exit(1);
        }
    };
    let app = router(Arc::new(state));

    let listener = match tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, port = config.port, "failed to bind listen port");
            std::process::exit(1);
        }
    };

    // Run until shutdown signal
    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(e) = result {
                error!(error = %e, "server error");
                std::process::exit(1);
            }
        }
        _ = shutdown_signal() => {
            info!("received shutdown signal");
        }
    }

    info!("pgw-server stopped");
}

/// Wait for SIGTERM or SIGINT (Ctrl+C).
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => {}
            _ = sigterm.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
    }
}
