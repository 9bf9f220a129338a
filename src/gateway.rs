//! The gateway context.
//!
//! One `Gateway` is built at startup and shared with every handler through
//! axum state. Several independent gateways can live in the same process.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};

use crate::config::{ConfigError, GatewayConfig};
use crate::http::request_log::RequestCounter;
use crate::http::status::StatusSnapshot;
use crate::load_balancer::{BackendRegistry, RoundRobin};
use crate::proxy::{Forwarder, ProxyError};

/// Version reported by the status endpoint.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug)]
pub struct Gateway {
    balancer: RoundRobin,
    forwarder: Forwarder,
    requests: RequestCounter,
}

impl Gateway {
    /// Build a gateway from configuration.
    ///
    /// Fails if any backend address is invalid or the list is empty.
    pub fn new(config: &GatewayConfig) -> Result<Self, ConfigError> {
        let registry = Arc::new(BackendRegistry::load(&config.backends)?);
        let forwarder = Forwarder::new(&config.upstream, config.listener.tls.is_some());
        Self::with_registry(registry, forwarder)
    }

    pub fn with_registry(
        registry: Arc<BackendRegistry>,
        forwarder: Forwarder,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            balancer: RoundRobin::new(registry)?,
            forwarder,
            requests: RequestCounter::new(),
        })
    }

    pub fn registry(&self) -> &BackendRegistry {
        self.balancer.registry()
    }

    pub fn balancer(&self) -> &RoundRobin {
        &self.balancer
    }

    /// Count one inbound request and return its sequence number (starting at 1).
    pub fn record_request(&self) -> u64 {
        self.requests.record()
    }

    /// Total inbound requests seen so far.
    pub fn requests_served(&self) -> u64 {
        self.requests.total()
    }

    /// Read-only snapshot for the status endpoint.
    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot::new(VERSION, self.registry().addresses(), self.requests_served())
    }

    /// Select the next backend and relay `request` to it. Exactly one attempt.
    pub async fn proxy(
        &self,
        request: Request<Body>,
        client_addr: Option<SocketAddr>,
    ) -> Result<Response<Body>, ProxyError> {
        let backend = self.balancer.next_server();
        self.forwarder.forward(backend, request, client_addr).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_backend_list() {
        let mut config = GatewayConfig::default();
        config.backends.clear();
        assert!(matches!(Gateway::new(&config), Err(ConfigError::EmptyRegistry)));
    }

    #[test]
    fn rejects_invalid_backend() {
        let mut config = GatewayConfig::default();
        config.backends = vec!["http://ok:1".into(), "::nope".into()];
        assert!(matches!(
            Gateway::new(&config),
            Err(ConfigError::InvalidBackend { .. })
        ));
    }

    #[test]
    fn independent_gateways_do_not_share_counters() {
        let config = GatewayConfig::default();
        let a = Gateway::new(&config).unwrap();
        let b = Gateway::new(&config).unwrap();

        assert_eq!(a.record_request(), 1);
        assert_eq!(a.record_request(), 2);
        assert_eq!(b.record_request(), 1);
        assert_eq!(a.balancer().next_server().index(), 0);
        assert_eq!(a.balancer().next_server().index(), 1);
        assert_eq!(b.balancer().next_server().index(), 0);
    }

    #[test]
    fn status_reflects_registry_and_counter() {
        let gateway = Gateway::new(&GatewayConfig::default()).unwrap();
        gateway.record_request();

        let status = gateway.status();
        assert_eq!(status.backends, vec!["http://localhost:8080", "http://localhost:8081"]);
        assert_eq!(status.total_requests, 1);
        assert_eq!(status.version, VERSION);
    }
}
