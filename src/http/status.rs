//! Gateway status endpoint (`/ping`, `/health`).
//!
//! The snapshot is the contract; HTML vs JSON is picked from `Accept`.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::gateway::Gateway;

/// Point-in-time view of the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub version: String,
    pub status: String,
    pub balancer: String,
    pub backends: Vec<String>,
    pub total_requests: u64,
}

impl StatusSnapshot {
    pub fn new(version: &str, backends: Vec<String>, total_requests: u64) -> Self {
        Self {
            version: version.to_string(),
            status: "operational".to_string(),
            balancer: "round-robin".to_string(),
            backends,
            total_requests,
        }
    }

    pub fn render_html(&self) -> String {
        let backends = escape_html(&self.backends.join(", "));
        format!(
            r#"<html>
<title>Reverse Proxy Gateway</title>
<style>
html {{
	background: linear-gradient(0.25turn, rgb(2,0,36) 0%, rgb(59,9,121) 50%, rgb(0,21,66) 100%);
	color: #fafafa;
	margin: 0;
	padding: 10px;
	font-family: Arial, sans-serif;
}}
.info-box {{
	background: rgba(255,255,255,0.1);
	padding: 15px;
	border-radius: 5px;
	margin: 10px 0;
}}
</style>
<h1>Reverse Proxy Gateway v{version}</h1>
<div class="info-box">
	<p><strong>Status:</strong> Operational</p>
	<p><strong>Load Balancer:</strong> Round-Robin</p>
	<p><strong>Backends:</strong> {backends}</p>
	<p><strong>Total Requests:</strong> {requests}</p>
</div>
</html>"#,
            version = escape_html(&self.version),
            backends = backends,
            requests = self.total_requests,
        )
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

/// Always 200. Reads state, never writes it.
pub async fn status_handler(State(gateway): State<Arc<Gateway>>, headers: HeaderMap) -> Response {
    let snapshot = gateway.status();
    if wants_json(&headers) {
        Json(snapshot).into_response()
    } else {
        Html(snapshot.render_html()).into_response()
    }
}
