//! Inbound request logging and counting.
//!
//! Every request that reaches the gateway, status requests included, passes
//! through [`log_request`] first. It takes a sequence number, logs it, and
//! hands the request on untouched.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;

use crate::gateway::Gateway;
use crate::observability::metrics;

/// Monotonic count of inbound requests.
#[derive(Debug, Default)]
pub struct RequestCounter {
    count: AtomicU64,
}

impl RequestCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment and return the new value.
    pub fn record(&self) -> u64 {
        self.count.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn total(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

/// Middleware assigning each request its sequence number.
pub async fn log_request(
    State(gateway): State<Arc<Gateway>>,
    request: Request,
    next: Next,
) -> Response {
    let seq = gateway.record_request();
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    tracing::info!(
        request = seq,
        from = %peer,
        method = %request.method(),
        uri = %request.uri(),
        "Incoming request"
    );
    metrics::record_inbound();

    next.run(request)
        .instrument(tracing::info_span!("request", seq))
        .await
}
