//! Round-robin reverse proxy gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request_log (seq #, log line)
//!                          │
//!                          ├── /ping, /health ──▶ status snapshot
//!                          │
//!                          └── anything else ──▶ RoundRobin ──▶ Forwarder ──▶ Backend
//!                                                                   │
//!     Client Response ◀──────────────────── upstream response ◀─────┘
//! ```
//!
//! A [`gateway::Gateway`] owns the immutable backend registry, the selection
//! counter and the request counter. It is built once and shared with every
//! handler; there is no global state.

pub mod cli;
pub mod config;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;
pub mod net;
pub mod observability;
pub mod proxy;
pub mod simulator;

pub use config::{ConfigError, GatewayConfig};
pub use gateway::Gateway;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
