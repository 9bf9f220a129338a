//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! cert + key paths (config)
//!     → tls.rs (PEM sanity check, rustls server config)
//!     → handed to the HTTPS listener
//! ```
//!
//! # Design Decisions
//! - TLS is optional; plaintext is the default
//! - Unreadable or empty PEM files fail startup, not the first handshake

pub mod tls;
