//! Backend registry.
//!
//! # Responsibilities
//! - Parse the configured address strings into backends
//! - Preserve configuration order and length (no dedup, no sorting)
//!
//! The registry is built once at startup and never mutated afterwards, so it
//! is shared behind an `Arc` without any locking.

use std::ops::Index;

use url::Url;

use crate::config::ConfigError;
use crate::load_balancer::backend::Backend;

/// Parse a backend address, requiring both a scheme and a host.
pub fn parse_backend_url(address: &str) -> Result<Url, String> {
    let url = Url::parse(address).map_err(|e| e.to_string())?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err("missing host".to_string());
    }
    Ok(url)
}

/// Ordered, immutable list of upstream backends.
#[derive(Debug, Clone, Default)]
pub struct BackendRegistry {
    backends: Vec<Backend>,
}

impl BackendRegistry {
    /// Build a registry from address strings, failing on the first invalid one.
    ///
    /// An empty input yields an empty registry; it is the selector that
    /// refuses to work over it.
    pub fn load<S: AsRef<str>>(addresses: &[S]) -> Result<Self, ConfigError> {
        let backends = addresses
            .iter()
            .enumerate()
            .map(|(index, address)| {
                let address = address.as_ref();
                parse_backend_url(address)
                    .map(|url| Backend::new(index, address.to_string(), url))
                    .map_err(|reason| ConfigError::InvalidBackend {
                        address: address.to_string(),
                        reason,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { backends })
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Backend> {
        self.backends.iter()
    }

    /// Configured addresses, in order.
    pub fn addresses(&self) -> Vec<String> {
        self.backends.iter().map(|b| b.address().to_string()).collect()
    }
}

impl Index<usize> for BackendRegistry {
    type Output = Backend;

    fn index(&self, index: usize) -> &Backend {
        &self.backends[index]
    }
}
