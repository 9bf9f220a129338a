//! Round-robin load balancing strategy.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::ConfigError;
use crate::load_balancer::backend::Backend;
use crate::load_balancer::registry::BackendRegistry;

/// The outcome of one selection: the counter value consumed and the backend it maps to.
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    pub ticket: u64,
    pub backend: &'a Backend,
}

/// Round-robin selector.
///
/// Each call consumes exactly one value of a shared atomic counter and maps
/// it onto the registry by modulo. The increment is a single `fetch_add`, so
/// concurrent callers never observe the same value and no value is skipped.
#[derive(Debug)]
pub struct RoundRobin {
    registry: Arc<BackendRegistry>,
    counter: AtomicU64,
}

impl RoundRobin {
    /// Create a selector over a non-empty registry.
    pub fn new(registry: Arc<BackendRegistry>) -> Result<Self, ConfigError> {
        if registry.is_empty() {
            return Err(ConfigError::EmptyRegistry);
        }
        Ok(Self {
            registry,
            counter: AtomicU64::new(0),
        })
    }

    /// Pick the next backend.
    pub fn next_server(&self) -> &Backend {
        self.select().backend
    }

    /// Pick the next backend, also returning the counter value that chose it.
    pub fn select(&self) -> Selection<'_> {
        let ticket = self.counter.fetch_add(1, Ordering::Relaxed);
        // len >= 1 is guaranteed by `new`.
        let index = (ticket % self.registry.len() as u64) as usize;
        Selection {
            ticket,
            backend: &self.registry[index],
        }
    }

    /// Number of selections made so far.
    pub fn selections(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }

    pub fn registry(&self) -> &Arc<BackendRegistry> {
        &self.registry
    }
}
