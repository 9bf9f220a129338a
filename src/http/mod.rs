//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup)
//!     → request_log.rs (sequence number, log line, every request)
//!     → /ping, /health → status.rs (snapshot)
//!     → anything else  → gateway (round-robin pick) → proxy::Forwarder
//!     → Send to client
//! ```

pub mod request_log;
pub mod server;
pub mod status;

pub use request_log::RequestCounter;
pub use server::GatewayServer;
pub use status::StatusSnapshot;
