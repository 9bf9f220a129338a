//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Build the gateway (or simulated backend) and bind its listener
//! - Start the metrics exporter when enabled
//! - Serve until the shutdown broadcast fires
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listeners start last (traffic only when ready)

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{validate_config, ConfigError, GatewayConfig, Mode, ValidationError};
use crate::http::GatewayServer;
use crate::lifecycle::Shutdown;
use crate::net::tls::load_tls_config;
use crate::observability::metrics;
use crate::simulator::{self, BackendInstance};

/// Anything that stops the process from coming up or keeps it from serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Run the process in the configured mode until `shutdown` fires.
pub async fn start(config: GatewayConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    validate_config(&config).map_err(ConfigError::Validation)?;

    match config.mode {
        Mode::Backend => start_backend(&config, shutdown).await,
        Mode::Proxy => start_gateway(config, shutdown).await,
    }
}

async fn start_gateway(config: GatewayConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    let bind_address = config.listener.bind_address.clone();
    let addr: SocketAddr = bind_address.parse().map_err(|_| {
        ConfigError::Validation(vec![ValidationError::InvalidBindAddress(bind_address.clone())])
    })?;

    if config.observability.metrics_enabled {
        let metrics_address = &config.observability.metrics_address;
        let metrics_addr: SocketAddr = metrics_address.parse().map_err(|_| {
            ConfigError::Validation(vec![ValidationError::InvalidMetricsAddress(
                metrics_address.clone(),
            )])
        })?;
        metrics::init_metrics(metrics_addr);
    }

    let tls = match &config.listener.tls {
        Some(tls) => Some(load_tls_config(tls).await?),
        None => None,
    };

    let server = GatewayServer::new(&config)?;

    match tls {
        Some(tls) => server.run_tls(addr, tls, shutdown.subscribe()).await?,
        None => {
            let listener = TcpListener::bind(addr)
                .await
                .map_err(|source| StartupError::Bind {
                    address: bind_address,
                    source,
                })?;
            server.run(listener, shutdown.subscribe()).await?;
        }
    }

    Ok(())
}

async fn start_backend(config: &GatewayConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    let instance = BackendInstance::new(
        config.simulator.instance_id,
        config.simulator.effective_port(),
    );
    let address = format!("{}:{}", config.simulator.bind_host, instance.port);
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    simulator::run(instance, listener, shutdown.subscribe()).await?;
    Ok(())
}
