//! Simulated backend instances.
//!
//! A tiny server that answers every path with a page naming its instance id
//! and port, so round-robin rotation can be seen from the outside. `/health`
//! returns a JSON liveness payload.

use std::net::SocketAddr;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

/// Header naming the instance that produced a response.
pub const X_BACKEND_INSTANCE: HeaderName = HeaderName::from_static("x-backend-instance");

/// Environment variable overriding the reported request time.
pub const TIME_OVERRIDE_VAR: &str = "TEST_TIME";

/// Identity of one simulated backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendInstance {
    pub id: u32,
    pub port: u16,
}

impl BackendInstance {
    pub fn new(id: u32, port: u16) -> Self {
        Self { id, port }
    }

    fn label(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("Backend-{}", self.id))
            .unwrap_or_else(|_| HeaderValue::from_static("Backend"))
    }
}

pub fn router(instance: BackendInstance) -> Router {
    Router::new()
        .route("/health", get(health))
        .fallback(identify)
        .with_state(instance)
}

/// Serve `instance` on `listener` until shutdown fires.
pub async fn run(
    instance: BackendInstance,
    listener: TcpListener,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(instance = instance.id, address = %addr, "Backend starting");

    axum::serve(
        listener,
        router(instance).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        let _ = shutdown.recv().await;
    })
    .await?;

    tracing::info!(instance = instance.id, "Backend stopped");
    Ok(())
}

fn request_time() -> String {
    std::env::var(TIME_OVERRIDE_VAR).unwrap_or_else(|_| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs().to_string())
            .unwrap_or_default()
    })
}

async fn identify(State(instance): State<BackendInstance>, request: Request) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    tracing::info!(
        instance = instance.id,
        method = %request.method(),
        uri = %request.uri(),
        from = %peer,
        "Backend request"
    );

    let body = format!(
        r#"<html>
<title>Backend Service</title>
<style>
html {{
	background: linear-gradient(0.25turn, rgb(2,0,36) 0%, rgb(59,9,121) 50%, rgb(0,21,66) 100%);
	color: #fafafa;
	margin: 0;
	padding: 20px;
	font-family: Arial, sans-serif;
}}
.badge {{
	background-color: #00ff00;
	color: #000;
	padding: 10px 20px;
	border-radius: 5px;
	display: inline-block;
	font-weight: bold;
	margin-bottom: 20px;
}}
</style>
<h1>Backend Service</h1>
<div class="badge">Instance ID: {id} | Port: {port}</div>
<p>Request Path: {path}</p>
<p>Request Time: {time}</p>
</html>"#,
        id = instance.id,
        port = instance.port,
        path = request.uri(),
        time = request_time(),
    );

    (
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/html; charset=utf-8"),
            ),
            (X_BACKEND_INSTANCE, instance.label()),
        ],
        body,
    )
        .into_response()
}

async fn health(State(instance): State<BackendInstance>) -> Response {
    tracing::info!(instance = instance.id, "Health check");
    (
        [(X_BACKEND_INSTANCE, instance.label())],
        Json(serde_json::json!({ "status": "healthy", "instance": instance.id })),
    )
        .into_response()
}
