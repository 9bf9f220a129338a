//! Request forwarding to a single selected backend.
//!
//! # Responsibilities
//! - Rebuild the inbound request for the backend (URI, headers)
//! - Stream the request body up and the response body down without buffering
//! - Map transport failures to `ProxyError::UpstreamUnavailable`
//!
//! # Design Decisions
//! - One request maps to exactly one upstream attempt; nothing is retried
//! - Outbound requests are always HTTP/1.1, whatever the inbound version was
//! - Protocol upgrades (WebSocket, h2c) are not tunnelled: `Upgrade` and
//!   `Connection` are hop-by-hop and get stripped, so the backend sees a plain
//!   request and the caller gets whatever that request returns
//! - If the caller goes away the handler future is dropped, which drops the
//!   in-flight upstream request with it

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{Request, Response, Version};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::{TokioExecutor, TokioTimer};

use crate::config::UpstreamConfig;
use crate::load_balancer::Backend;
use crate::observability::metrics;
use crate::proxy::error::ProxyError;
use crate::proxy::headers::{rewrite_request_headers, strip_hop_by_hop, upstream_uri};

type UpstreamClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Relays requests to backends over a pooled HTTP client.
#[derive(Clone, Debug)]
pub struct Forwarder {
    client: UpstreamClient,
    /// Scheme of the gateway's own listener, reported in `X-Forwarded-Proto`.
    inbound_scheme: &'static str,
}

impl Forwarder {
    /// Create a forwarder able to reach both `http://` and `https://` backends.
    pub fn new(config: &UpstreamConfig, inbound_tls: bool) -> Self {
        let mut http = HttpConnector::new();
        http.enforce_http(false);
        if config.connect_timeout_secs > 0 {
            http.set_connect_timeout(Some(Duration::from_secs(config.connect_timeout_secs)));
        }

        let connector = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .wrap_connector(http);

        let client = Client::builder(TokioExecutor::new())
            .pool_timer(TokioTimer::new())
            .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_secs))
            .build(connector);

        Self {
            client,
            inbound_scheme: if inbound_tls { "https" } else { "http" },
        }
    }

    /// Forward `request` to `backend` and return the upstream response as-is.
    pub async fn forward(
        &self,
        backend: &Backend,
        request: Request<Body>,
        client_addr: Option<SocketAddr>,
    ) -> Result<Response<Body>, ProxyError> {
        let start_time = Instant::now();
        let (mut parts, body) = request.into_parts();
        let method = parts.method.clone();
        let path = parts.uri.path().to_string();

        tracing::info!(
            backend = %backend,
            method = %method,
            path = %path,
            "Routing to backend"
        );

        parts.uri = upstream_uri(backend, &parts.uri)?;
        parts.version = Version::HTTP_11;
        rewrite_request_headers(
            &mut parts.headers,
            backend,
            client_addr.map(|a| a.ip()),
            self.inbound_scheme,
        )?;

        let upstream_request = Request::from_parts(parts, body);

        match self.client.request(upstream_request).await {
            Ok(response) => {
                let (mut parts, body) = response.into_parts();
                strip_hop_by_hop(&mut parts.headers);

                tracing::debug!(
                    backend = %backend,
                    status = %parts.status,
                    elapsed_ms = start_time.elapsed().as_millis() as u64,
                    "Upstream responded"
                );
                metrics::record_request(method.as_str(), parts.status.as_u16(), backend.address(), start_time);

                Ok(Response::from_parts(parts, Body::new(body)))
            }
            Err(e) => {
                tracing::error!(
                    backend = %backend,
                    method = %method,
                    path = %path,
                    error = %e,
                    cause = ?std::error::Error::source(&e),
                    "Upstream unavailable"
                );
                metrics::record_upstream_error(backend.address());
                metrics::record_request(method.as_str(), 502, backend.address(), start_time);

                Err(ProxyError::UpstreamUnavailable {
                    backend: backend.to_string(),
                    source: e,
                })
            }
        }
    }
}
