//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → cli overrides (flags win over the file)
//!     → validation.rs (semantic checks, once, at startup)
//!     → GatewayConfig (validated, immutable)
//!     → handed to the gateway as plain data
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the backend list never changes at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    GatewayConfig, ListenerConfig, LogFormat, Mode, ObservabilityConfig, SimulatorConfig,
    TlsConfig, UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};
