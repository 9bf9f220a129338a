//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router: status routes plus a proxy fallback
//! - Wire up middleware (request logger/counter, tracing)
//! - Serve over plaintext (`axum::serve`) or TLS (`axum-server` + rustls)
//! - Stop gracefully when the shutdown broadcast fires

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::{ConfigError, GatewayConfig};
use crate::gateway::Gateway;
use crate::http::request_log::log_request;
use crate::http::status::status_handler;

/// How long in-flight TLS connections get to finish after shutdown.
const TLS_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    gateway: Arc<Gateway>,
}

impl GatewayServer {
    /// Create a new server with the given configuration.
    pub fn new(config: &GatewayConfig) -> Result<Self, ConfigError> {
        let gateway = Arc::new(Gateway::new(config)?);
        let router = Self::build_router(gateway.clone());
        Ok(Self { router, gateway })
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(gateway: Arc<Gateway>) -> Router {
        Router::new()
            .route("/ping", any(status_handler))
            .route("/health", any(status_handler))
            .fallback(proxy_handler)
            .layer(middleware::from_fn_with_state(gateway.clone(), log_request))
            .layer(TraceLayer::new_for_http())
            .with_state(gateway)
    }

    /// Shared gateway context, e.g. for reading counters.
    pub fn gateway(&self) -> Arc<Gateway> {
        self.gateway.clone()
    }

    /// Run plaintext HTTP on an already bound listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backends = ?self.gateway.registry().addresses(),
            "Reverse proxy (HTTP) started"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run HTTPS on `addr` with the given certificate material.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(
            address = %addr,
            backends = ?self.gateway.registry().addresses(),
            "Reverse proxy (HTTPS) started"
        );

        let handle = axum_server::Handle::new();
        let drain = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            drain.graceful_shutdown(Some(TLS_DRAIN_TIMEOUT));
        });

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(app)
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

/// Everything that is not a status route is proxied.
async fn proxy_handler(State(gateway): State<Arc<Gateway>>, request: Request) -> Response {
    let client_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    match gateway.proxy(request, client_addr).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}
