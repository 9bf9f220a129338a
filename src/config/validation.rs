//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the backend list is non-empty and every entry is a usable URL
//! - Check the bind and metrics addresses parse
//! - Check TLS material exists before the listener is started
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{GatewayConfig, Mode};
use crate::load_balancer::registry::parse_backend_url;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no backends configured")]
    NoBackends,

    #[error("backend #{index} '{address}' is invalid: {reason}")]
    InvalidBackend {
        index: usize,
        address: String,
        reason: String,
    },

    #[error("bind address '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("metrics address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("{kind} file not found: {path}")]
    MissingTlsFile { kind: &'static str, path: String },
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.mode == Mode::Proxy {
        if config.backends.is_empty() {
            errors.push(ValidationError::NoBackends);
        }
        for (index, address) in config.backends.iter().enumerate() {
            if let Err(reason) = parse_backend_url(address) {
                errors.push(ValidationError::InvalidBackend {
                    index,
                    address: address.clone(),
                    reason,
                });
            }
        }

        if config.listener.bind_address.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidBindAddress(
                config.listener.bind_address.clone(),
            ));
        }

        let observability = &config.observability;
        if observability.metrics_enabled
            && observability.metrics_address.parse::<SocketAddr>().is_err()
        {
            errors.push(ValidationError::InvalidMetricsAddress(
                observability.metrics_address.clone(),
            ));
        }

        if let Some(tls) = &config.listener.tls {
            for (kind, path) in [("certificate", &tls.cert_path), ("private key", &tls.key_path)] {
                if !Path::new(path).exists() {
                    errors.push(ValidationError::MissingTlsFile {
                        kind,
                        path: path.clone(),
                    });
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
