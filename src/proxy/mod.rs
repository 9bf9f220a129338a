//! Reverse proxy subsystem.
//!
//! # Data Flow
//! ```text
//! selected Backend + inbound request
//!     → headers.rs (upstream URI, Host, X-Forwarded-*, hop-by-hop removal)
//!     → forwarder.rs (pooled client, streamed bodies)
//!     → upstream response relayed to the caller
//!     → error.rs on transport failure (502, no retry)
//! ```

pub mod error;
pub mod forwarder;
pub mod headers;

pub use error::ProxyError;
pub use forwarder::Forwarder;
