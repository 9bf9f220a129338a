//! Backend abstraction.
//!
//! A backend is nothing more than an upstream address and its position in
//! the registry. It carries no health state and no connection accounting.

use std::fmt;

use url::Url;

/// A single upstream server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backend {
    /// Position in the registry.
    index: usize,
    /// Address exactly as configured, used for display.
    address: String,
    /// Parsed form of `address`.
    url: Url,
}

impl Backend {
    pub(crate) fn new(index: usize, address: String, url: Url) -> Self {
        Self {
            index,
            address,
            url,
        }
    }

    /// Position of this backend in the registry.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The address as it was configured.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Parsed upstream URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// `host[:port]` of the upstream, suitable for a `Host` header.
    pub fn authority(&self) -> String {
        let host = self.url.host_str().unwrap_or_default();
        match self.url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}
